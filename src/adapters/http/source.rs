//! HTTP PlaylistSource implementation.

use async_trait::async_trait;
use std::error::Error;

use super::error::FeedError;
use crate::ports::source::{PlaylistEntry, PlaylistPayload, PlaylistSource};

/// Reqwest-backed client for the playlist feed endpoint.
#[derive(Debug, Clone)]
pub struct HttpPlaylistSource {
    client: reqwest::Client,
    feed_url: String,
}

impl HttpPlaylistSource {
    pub fn new(feed_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            feed_url: feed_url.into(),
        }
    }
}

#[async_trait]
impl PlaylistSource for HttpPlaylistSource {
    async fn fetch_playlist(&self) -> Result<Vec<PlaylistEntry>, Box<dyn Error + Send + Sync>> {
        let response = self
            .client
            .get(&self.feed_url)
            .send()
            .await
            .map_err(FeedError::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()).into());
        }

        let body = response.text().await.map_err(FeedError::from)?;
        let payload: PlaylistPayload = serde_json::from_str(&body).map_err(FeedError::from)?;
        Ok(payload.videos)
    }
}
