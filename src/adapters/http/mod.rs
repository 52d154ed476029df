//! HTTP adapter for the remote playlist feed.
//!
//! This module provides the reqwest-backed implementation of
//! `PlaylistSource`.

mod error;
mod source;

pub use error::FeedError;
pub use source::HttpPlaylistSource;
