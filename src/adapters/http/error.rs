//! Feed error types for the HTTP adapter.

use std::fmt;

#[derive(Debug)]
pub enum FeedError {
    Transport(reqwest::Error),
    Status(u16),
    Decode(serde_json::Error),
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::Transport(e) => write!(f, "Transport error: {}", e),
            FeedError::Status(code) => write!(f, "Feed returned HTTP status {}", code),
            FeedError::Decode(e) => write!(f, "Decode error: {}", e),
        }
    }
}

impl std::error::Error for FeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeedError::Transport(e) => Some(e),
            FeedError::Status(_) => None,
            FeedError::Decode(e) => Some(e),
        }
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        FeedError::Transport(err)
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::Decode(err)
    }
}
