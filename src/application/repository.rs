//! The cache repository: single authority for keeping the local video cache
//! consistent with the remote playlist feed, and for exposing that cache as
//! a live view.

use std::error::Error;
use std::fmt;
use tokio::sync::watch;

use crate::domain::video::Video;
use crate::ports::source::PlaylistSource;
use crate::ports::store::{VideoRecord, VideoStore};

/// Failure outcome of a refresh cycle.
///
/// Transport, decode and storage failures all collapse into this one type at
/// the repository boundary. A failed refresh never touches the cache, so the
/// previous snapshot stays visible.
#[derive(Debug)]
pub enum RefreshError {
    Source(Box<dyn Error + Send + Sync>),
    Store(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for RefreshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshError::Source(e) => write!(f, "Playlist fetch failed: {}", e),
            RefreshError::Store(e) => write!(f, "Cache write failed: {}", e),
        }
    }
}

impl Error for RefreshError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RefreshError::Source(e) => Some(e.as_ref()),
            RefreshError::Store(e) => Some(e.as_ref()),
        }
    }
}

/// Live, read-only view over the cached playlist.
///
/// Holds the snapshot current at the moment it was created; `changed` wakes
/// once per committed refresh.
pub struct VideoFeed {
    rx: watch::Receiver<Vec<VideoRecord>>,
}

impl VideoFeed {
    /// The latest durable snapshot, as domain videos.
    ///
    /// Empty until the first successful refresh.
    pub fn current(&self) -> Vec<Video> {
        self.rx.borrow().iter().cloned().map(Video::from).collect()
    }

    /// Wait for the next committed refresh and return the new snapshot.
    ///
    /// Returns `None` once the backing store has gone away.
    pub async fn changed(&mut self) -> Option<Vec<Video>> {
        match self.rx.changed().await {
            Ok(()) => Some(self.current()),
            Err(_) => None,
        }
    }
}

/// Repository mediating between the remote playlist feed and the local
/// cache. Collaborators are constructor-injected so tests can substitute
/// fakes for either side.
pub struct VideoRepository<S, P> {
    source: S,
    store: P,
}

impl<S, P> VideoRepository<S, P>
where
    S: PlaylistSource,
    P: VideoStore,
{
    pub fn new(source: S, store: P) -> Self {
        Self { source, store }
    }

    /// Subscribe to the cached playlist.
    pub fn subscribe(&self) -> VideoFeed {
        VideoFeed {
            rx: self.store.watch(),
        }
    }

    /// Run one fetch-transform-store cycle.
    ///
    /// The full remote playlist replaces the cached set in a single
    /// transaction; on any failure the previous cache is left untouched.
    /// Cadence and retry belong to the scheduler, not here.
    pub async fn refresh(&self) -> Result<(), RefreshError> {
        let playlist = self
            .source
            .fetch_playlist()
            .await
            .map_err(RefreshError::Source)?;

        let records: Vec<VideoRecord> = playlist.into_iter().map(VideoRecord::from).collect();

        self.store
            .replace_all(records)
            .await
            .map_err(RefreshError::Store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::SqliteStore;
    use crate::ports::source::{MockPlaylistSource, PlaylistEntry};
    use crate::ports::store::MockVideoStore;

    fn entry(url: &str, title: &str) -> PlaylistEntry {
        PlaylistEntry {
            title: title.to_string(),
            description: format!("{} description", title),
            url: url.to_string(),
            updated: "2024-04-02T12:00:00Z".to_string(),
            thumbnail: format!("{}.jpg", url),
            closed_captions: None,
        }
    }

    #[tokio::test]
    async fn refresh_installs_the_fetched_playlist() {
        let mut source = MockPlaylistSource::new();
        source
            .expect_fetch_playlist()
            .returning(|| Ok(vec![entry("a", "Intro"), entry("b", "Advanced")]));

        let store = SqliteStore::in_memory().await.unwrap();
        let repository = VideoRepository::new(source, store);

        repository.refresh().await.unwrap();

        let videos = repository.subscribe().current();
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].url, "a");
        assert_eq!(videos[0].title, "Intro");
        assert_eq!(videos[1].url, "b");
    }

    #[tokio::test]
    async fn refresh_replaces_rather_than_merges() {
        let mut source = MockPlaylistSource::new();
        source
            .expect_fetch_playlist()
            .times(1)
            .returning(|| Ok(vec![entry("a", "Intro"), entry("b", "Advanced")]));
        source
            .expect_fetch_playlist()
            .times(1)
            .returning(|| Ok(vec![entry("b", "Advanced"), entry("c", "Expert")]));

        let store = SqliteStore::in_memory().await.unwrap();
        let repository = VideoRepository::new(source, store);

        repository.refresh().await.unwrap();
        repository.refresh().await.unwrap();

        let urls: Vec<String> = repository
            .subscribe()
            .current()
            .into_iter()
            .map(|v| v.url)
            .collect();
        assert_eq!(urls, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn failed_fetch_leaves_the_cache_untouched() {
        let mut source = MockPlaylistSource::new();
        source
            .expect_fetch_playlist()
            .times(1)
            .returning(|| Ok(vec![entry("a", "Intro"), entry("b", "Advanced")]));
        source
            .expect_fetch_playlist()
            .times(1)
            .returning(|| Err("connection refused".into()));

        let store = SqliteStore::in_memory().await.unwrap();
        let repository = VideoRepository::new(source, store);

        repository.refresh().await.unwrap();
        let err = repository.refresh().await.unwrap_err();

        assert!(matches!(err, RefreshError::Source(_)));
        let urls: Vec<String> = repository
            .subscribe()
            .current()
            .into_iter()
            .map(|v| v.url)
            .collect();
        assert_eq!(urls, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn subscribe_starts_empty_then_emits_once_per_refresh() {
        let mut source = MockPlaylistSource::new();
        source
            .expect_fetch_playlist()
            .returning(|| Ok(vec![entry("a", "Intro")]));

        let store = SqliteStore::in_memory().await.unwrap();
        let repository = VideoRepository::new(source, store);

        let mut feed = repository.subscribe();
        assert!(feed.current().is_empty());

        repository.refresh().await.unwrap();

        let videos = feed.changed().await.unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].title, "Intro");
        assert!(!feed.rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn storage_failures_surface_as_refresh_errors() {
        let mut source = MockPlaylistSource::new();
        source
            .expect_fetch_playlist()
            .returning(|| Ok(vec![entry("a", "Intro")]));

        let mut store = MockVideoStore::new();
        store
            .expect_replace_all()
            .returning(|_| Err("disk full".into()));

        let repository = VideoRepository::new(source, store);
        let err = repository.refresh().await.unwrap_err();

        assert!(matches!(err, RefreshError::Store(_)));
    }
}
