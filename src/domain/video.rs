use serde::Serialize;

/// A single video in the playlist, as seen by consumers of the cache.
///
/// Immutable value object. The `url` doubles as the stable identity of the
/// video and its playback location; `updated` carries the feed's timestamp
/// string verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Video {
    pub url: String,
    pub title: String,
    pub description: String,
    pub updated: String,
    pub thumbnail: String,
    pub closed_captions: Option<String>,
}
