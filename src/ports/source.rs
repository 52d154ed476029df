use async_trait::async_trait;
use serde::Deserialize;
use std::error::Error;

use crate::ports::store::VideoRecord;

/// One video as returned by the remote playlist feed.
///
/// Wire-format representation: field names and types follow the feed JSON,
/// so timestamps stay strings and optional fields stay optional.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistEntry {
    pub title: String,
    pub description: String,
    pub url: String,
    pub updated: String,
    pub thumbnail: String,
    #[serde(rename = "closedCaptions")]
    pub closed_captions: Option<String>,
}

/// Top-level payload returned by the feed endpoint.
#[derive(Debug, Deserialize)]
pub struct PlaylistPayload {
    pub videos: Vec<PlaylistEntry>,
}

impl From<PlaylistEntry> for VideoRecord {
    fn from(entry: PlaylistEntry) -> Self {
        Self {
            url: entry.url,
            title: entry.title,
            description: entry.description,
            updated: entry.updated,
            thumbnail: entry.thumbnail,
            closed_captions: entry.closed_captions,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaylistSource: Send + Sync {
    /// Fetch the full current playlist.
    ///
    /// Always returns the complete remote state; there is no pagination or
    /// incremental variant.
    async fn fetch_playlist(&self) -> Result<Vec<PlaylistEntry>, Box<dyn Error + Send + Sync>>;
}
