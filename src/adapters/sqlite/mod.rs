//! SQLite adapter for the persisted video cache.
//!
//! This module provides the sqlx-backed implementation of `VideoStore`:
//! - transactional replace-all writes over the `videos` table
//! - a watch channel mirroring the table for live queries

mod error;
mod store;

pub use error::StoreError;
pub use store::SqliteStore;
