//! sqlx-backed VideoStore implementation.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;

use super::error::StoreError;
use crate::ports::store::{VideoRecord, VideoStore};

/// SQLite-backed cache for playlist videos.
///
/// Holds a watch channel mirroring the `videos` table. The channel is seeded
/// from disk on open, so a restarted process immediately observes the last
/// successful refresh, and it is re-published once per committed replace.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    snapshot: Arc<watch::Sender<Vec<VideoRecord>>>,
}

impl SqliteStore {
    /// Open (or create) the cache database at `path` and run migrations.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        Self::from_pool(pool).await
    }

    /// Open an in-memory cache, for tests and ephemeral runs.
    pub async fn in_memory() -> Result<Self, StoreError> {
        // A single never-recycled connection: the database lives and dies
        // with it.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect(":memory:")
            .await?;
        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        let initial = load_records(&pool).await?;
        let (snapshot, _) = watch::channel(initial);
        Ok(Self {
            pool,
            snapshot: Arc::new(snapshot),
        })
    }
}

#[async_trait]
impl VideoStore for SqliteStore {
    async fn replace_all(
        &self,
        records: Vec<VideoRecord>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut tx = self.pool.begin().await.map_err(StoreError::from)?;

        sqlx::query("DELETE FROM videos")
            .execute(&mut *tx)
            .await
            .map_err(StoreError::from)?;

        for (position, record) in records.iter().enumerate() {
            sqlx::query(
                "INSERT INTO videos \
                 (url, title, description, updated, thumbnail, closed_captions, position) \
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&record.url)
            .bind(&record.title)
            .bind(&record.description)
            .bind(&record.updated)
            .bind(&record.thumbnail)
            .bind(&record.closed_captions)
            .bind(position as i64)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::from)?;
        }

        tx.commit().await.map_err(StoreError::from)?;

        // Publish only after the transaction is durable.
        self.snapshot.send_replace(records);
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<VideoRecord>, Box<dyn Error + Send + Sync>> {
        Ok(load_records(&self.pool).await.map_err(StoreError::from)?)
    }

    fn watch(&self) -> watch::Receiver<Vec<VideoRecord>> {
        self.snapshot.subscribe()
    }
}

async fn load_records(pool: &SqlitePool) -> Result<Vec<VideoRecord>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT url, title, description, updated, thumbnail, closed_captions \
         FROM videos ORDER BY position",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| VideoRecord {
            url: row.get("url"),
            title: row.get("title"),
            description: row.get("description"),
            updated: row.get("updated"),
            thumbnail: row.get("thumbnail"),
            closed_captions: row.get("closed_captions"),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str, title: &str) -> VideoRecord {
        VideoRecord {
            url: url.to_string(),
            title: title.to_string(),
            description: format!("{} description", title),
            updated: "2024-04-02T12:00:00Z".to_string(),
            thumbnail: format!("{}.jpg", url),
            closed_captions: None,
        }
    }

    #[tokio::test]
    async fn starts_empty() {
        let store = SqliteStore::in_memory().await.unwrap();

        assert!(store.load_all().await.unwrap().is_empty());
        assert!(store.watch().borrow().is_empty());
    }

    #[tokio::test]
    async fn replace_all_round_trips_records_in_order() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut captioned = record("https://example.test/b", "Advanced");
        captioned.closed_captions = Some("https://example.test/b.vtt".to_string());
        let records = vec![record("https://example.test/a", "Intro"), captioned];

        store.replace_all(records.clone()).await.unwrap();

        assert_eq!(store.load_all().await.unwrap(), records);
    }

    #[tokio::test]
    async fn replace_all_evicts_rows_missing_from_the_new_set() {
        let store = SqliteStore::in_memory().await.unwrap();
        store
            .replace_all(vec![record("a", "Intro"), record("b", "Advanced")])
            .await
            .unwrap();

        store
            .replace_all(vec![record("b", "Advanced"), record("c", "Expert")])
            .await
            .unwrap();

        let urls: Vec<String> = store
            .load_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.url)
            .collect();
        assert_eq!(urls, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn watch_is_notified_once_per_replace() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut rx = store.watch();

        store.replace_all(vec![record("a", "Intro")]).await.unwrap();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn reopening_a_database_seeds_the_watch_channel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.db");

        {
            let store = SqliteStore::open(&path).await.unwrap();
            store
                .replace_all(vec![record("a", "Intro"), record("b", "Advanced")])
                .await
                .unwrap();
        }

        let reopened = SqliteStore::open(&path).await.unwrap();
        let snapshot = reopened.watch().borrow().clone();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].url, "a");
    }
}
