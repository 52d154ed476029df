//! Stashcast daemon - offline playlist cache.
//!
//! This is the main entry point. It wires up:
//! - Local adapters (SQLite cache, HTTP playlist feed)
//! - The cache repository and its periodic refresh job
//! - An HTTP read surface over the cached snapshot

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use stashcast::application::repository::VideoRepository;
use stashcast::application::scheduler::{
    ExistingJobPolicy, JobScheduler, PeriodicJob, REFRESH_JOB_NAME,
};
use stashcast::adapters::http::HttpPlaylistSource;
use stashcast::adapters::sqlite::SqliteStore;
use stashcast::config::Config;
use stashcast::domain::video::Video;
use stashcast::ports::probe::{Constraints, PermissiveProbe};

type Repository = VideoRepository<HttpPlaylistSource, SqliteStore>;

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    tracing_subscriber::fmt::init();

    // 1. Adapters (local cache + remote feed)
    let store = match SqliteStore::open(&config.database_path).await {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to open cache database: {:?}", e);
            std::process::exit(1);
        }
    };
    let source = HttpPlaylistSource::new(config.feed_url.clone());

    // 2. Application services
    let repository = Arc::new(VideoRepository::new(source, store));

    // 3. Startup refresh; on failure the stale cache stays visible.
    match repository.refresh().await {
        Ok(()) => println!("Startup refresh complete"),
        Err(e) => eprintln!("Startup refresh failed: {}", e),
    }

    // 4. Periodic refresh job
    let scheduler = JobScheduler::new(PermissiveProbe);
    let job = PeriodicJob {
        name: REFRESH_JOB_NAME.to_string(),
        every: config.refresh_every,
        constraints: Constraints {
            unmetered_network: true,
            battery_not_low: true,
            charging: true,
            device_idle: true,
        },
    };
    let refresher = repository.clone();
    scheduler.schedule_unique(job, ExistingJobPolicy::Keep, move || {
        let repository = refresher.clone();
        async move {
            match repository.refresh().await {
                Ok(()) => println!("[Job {}] Refresh complete", REFRESH_JOB_NAME),
                Err(e) => eprintln!("[Job {}] Refresh failed: {}", REFRESH_JOB_NAME, e),
            }
        }
    });
    println!(
        "Scheduled {} every {:?}",
        REFRESH_JOB_NAME, config.refresh_every
    );

    // 5. HTTP read surface over the cache
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/videos", get(list_videos))
        .route("/refresh", post(trigger_refresh))
        .layer(cors)
        .with_state(repository);

    // 6. Start Server
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", config.addr, config.port))
        .await
        .expect("Failed to bind TCP listener");
    println!("Listening at {}:{}", config.addr, config.port);
    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}

// Handler that returns the current cached snapshot.
async fn list_videos(State(repository): State<Arc<Repository>>) -> Json<Vec<Video>> {
    Json(repository.subscribe().current())
}

// Handler that triggers a manual refresh cycle.
async fn trigger_refresh(
    State(repository): State<Arc<Repository>>,
) -> Result<StatusCode, (StatusCode, String)> {
    match repository.refresh().await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err((StatusCode::BAD_GATEWAY, e.to_string())),
    }
}
