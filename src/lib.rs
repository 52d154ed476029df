//! Stashcast - Offline Playlist Cache
//!
//! Hexagonal Architecture:
//! - domain/: Pure domain types (videos)
//! - ports/: Trait definitions
//! - adapters/: Concrete implementations (HTTP feed, SQLite cache)
//! - application/: Generic services (cache repository, job scheduler)
//! - config: Environment configuration
//!
//! The core is the cache-refresh policy in `application::repository`: fetch
//! the remote playlist, transform it into storage rows, and install the full
//! set atomically so that subscribers of the live view only ever observe
//! complete, durable snapshots.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports for convenience
pub use adapters::http::HttpPlaylistSource;
pub use adapters::sqlite::SqliteStore;
pub use application::repository::{RefreshError, VideoFeed, VideoRepository};
pub use application::scheduler::JobScheduler;
pub use config::Config;
pub use domain::video::Video;
