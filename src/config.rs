//! Configuration for the stashcast daemon.

use std::env;
use std::time::Duration;

/// Runtime configuration, loaded from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    /// HTTP server bind address
    pub addr: String,
    /// HTTP server port
    pub port: String,
    /// Remote playlist feed URL
    pub feed_url: String,
    /// Path to the SQLite cache database
    pub database_path: String,
    /// Interval between scheduled refreshes
    pub refresh_every: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics if `STASHCAST_FEED_URL` is not set.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let refresh_secs = env::var("STASHCAST_REFRESH_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86_400);

        Self {
            addr: env::var("ADDR").unwrap_or_else(|_| String::from("127.0.0.1")),
            port: env::var("PORT").unwrap_or_else(|_| String::from("3000")),
            feed_url: env::var("STASHCAST_FEED_URL").expect("STASHCAST_FEED_URL env var required"),
            database_path: env::var("STASHCAST_DB_PATH")
                .unwrap_or_else(|_| String::from("./stashcast.db")),
            refresh_every: Duration::from_secs(refresh_secs),
        }
    }
}
