use async_trait::async_trait;
use std::error::Error;
use tokio::sync::watch;

use crate::domain::video::Video;

/// One cached video row.
///
/// Keyed by `url`. The full row set is always the complete result of the
/// latest successful refresh; rows are never mutated individually.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRecord {
    pub url: String,
    pub title: String,
    pub description: String,
    pub updated: String,
    pub thumbnail: String,
    pub closed_captions: Option<String>,
}

impl From<VideoRecord> for Video {
    fn from(record: VideoRecord) -> Self {
        Self {
            url: record.url,
            title: record.title,
            description: record.description,
            updated: record.updated,
            thumbnail: record.thumbnail,
            closed_captions: record.closed_captions,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Atomically replace the entire cached set.
    ///
    /// Prior rows are discarded and `records` installed within a single
    /// transaction; a failure leaves the previous contents in place.
    async fn replace_all(
        &self,
        records: Vec<VideoRecord>,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Read the current cached set, in playlist order.
    async fn load_all(&self) -> Result<Vec<VideoRecord>, Box<dyn Error + Send + Sync>>;

    /// Live query over the cached set.
    ///
    /// The receiver holds the current snapshot from the moment of the call
    /// and is notified once per committed replace.
    fn watch(&self) -> watch::Receiver<Vec<VideoRecord>>;
}
