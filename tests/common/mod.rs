#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;

use library_browser::backend::{FetchError, LibraryBackend};
use library_browser::model::{Album, AlbumDetail, Artist, ArtistDetail, EntityId, Page, Track};
use library_browser::BrowserConfig;

pub fn track(id: EntityId, title: &str, artist: &str, album_id: EntityId) -> Track {
    Track {
        id,
        title: title.to_string(),
        artist: artist.to_string(),
        album: format!("Album {album_id}"),
        album_id: Some(album_id),
        duration_secs: Some(200),
        favorite: false,
    }
}

pub fn album(id: EntityId, title: &str, artist: &str) -> Album {
    Album {
        id,
        title: title.to_string(),
        artist: artist.to_string(),
        year: Some(1975),
        track_count: Some(2),
    }
}

pub fn artist(id: EntityId, name: &str) -> Artist {
    Artist {
        id,
        name: name.to_string(),
        album_count: Some(1),
    }
}

/// `count` tracks named "Track N" by "Artist N % 3", ids starting at 1
pub fn numbered_tracks(count: i64) -> Vec<Track> {
    (1..=count)
        .map(|id| track(id, &format!("Track {id}"), &format!("Artist {}", id % 3), 1))
        .collect()
}

/// Config with timings the tests rely on and no log directory side effects
pub fn test_config() -> BrowserConfig {
    let mut config = BrowserConfig::default();
    config.search.debounce_ms = 300;
    config.search.min_query_chars = 2;
    config.search.per_kind_cap = 5;
    config.pagination.page_size = 20;
    config.scroll.cooldown_ms = 500;
    config
}

#[derive(Default)]
pub struct Calls {
    pub tracks: AtomicUsize,
    pub albums: AtomicUsize,
    pub album_tracks: AtomicUsize,
    pub artists: AtomicUsize,
    pub artist_detail: AtomicUsize,
    pub favorite: AtomicUsize,
    pub unfavorite: AtomicUsize,
    pub queue_add: AtomicUsize,
}

impl Calls {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

/// In-memory backend with per-endpoint call counters, failure switches and
/// artificial latency.
#[derive(Default)]
pub struct MockBackend {
    pub tracks: Vec<Track>,
    pub albums: Vec<Album>,
    pub artists: Vec<Artist>,
    pub album_tracks: HashMap<EntityId, Vec<Track>>,
    pub artist_albums: HashMap<EntityId, Vec<EntityId>>,
    pub calls: Calls,
    pub fail_tracks: bool,
    pub fail_albums: bool,
    pub fail_artists: bool,
    /// Number of upcoming track requests that fail
    pub track_failures: AtomicUsize,
    pub fail_queue_ids: HashSet<EntityId>,
    pub delay: Duration,
    /// Extra latency for list requests filtered by exactly this string
    pub slow_filter: Option<(String, Duration)>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tracks(mut self, tracks: Vec<Track>) -> Self {
        self.tracks = tracks;
        self
    }

    pub fn fail_next_track_requests(&self, count: usize) {
        self.track_failures.store(count, Ordering::SeqCst);
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    async fn latency(&self, filter: Option<&str>) {
        let mut delay = self.delay;
        if let (Some((slow, extra)), Some(filter)) = (&self.slow_filter, filter) {
            if slow == filter {
                delay += *extra;
            }
        }
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    fn matching_tracks(&self, filter: Option<&str>) -> Vec<Track> {
        let needle = filter.map(str::to_lowercase);
        self.tracks
            .iter()
            .filter(|t| match &needle {
                Some(n) => t.title.to_lowercase().contains(n) || t.artist.to_lowercase().contains(n),
                None => true,
            })
            .cloned()
            .collect()
    }
}

fn take_failure(remaining: &AtomicUsize) -> bool {
    remaining
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

fn unavailable() -> FetchError {
    FetchError::BadResponse { status: 503 }
}

impl LibraryBackend for MockBackend {
    fn tracks<'a>(
        &'a self,
        filter: Option<&'a str>,
        limit: usize,
        offset: usize,
    ) -> BoxFuture<'a, Result<Page<Track>, FetchError>> {
        async move {
            self.calls.tracks.fetch_add(1, Ordering::SeqCst);
            self.latency(filter).await;
            if self.fail_tracks || take_failure(&self.track_failures) {
                return Err(unavailable());
            }
            let all = self.matching_tracks(filter);
            let end = (offset + limit).min(all.len());
            let items = all.get(offset..end).map(<[Track]>::to_vec).unwrap_or_default();
            Ok(Page {
                items,
                has_more: end < all.len(),
            })
        }
        .boxed()
    }

    fn albums<'a>(&'a self, filter: Option<&'a str>) -> BoxFuture<'a, Result<Vec<Album>, FetchError>> {
        async move {
            self.calls.albums.fetch_add(1, Ordering::SeqCst);
            self.latency(filter).await;
            if self.fail_albums {
                return Err(unavailable());
            }
            let needle = filter.map(str::to_lowercase);
            Ok(self
                .albums
                .iter()
                .filter(|a| {
                    needle.as_ref().is_none_or(|n| {
                        a.title.to_lowercase().contains(n) || a.artist.to_lowercase().contains(n)
                    })
                })
                .cloned()
                .collect())
        }
        .boxed()
    }

    fn album_tracks(&self, album_id: EntityId) -> BoxFuture<'_, Result<AlbumDetail, FetchError>> {
        async move {
            self.calls.album_tracks.fetch_add(1, Ordering::SeqCst);
            self.latency(None).await;
            let album = self
                .albums
                .iter()
                .find(|a| a.id == album_id)
                .ok_or(FetchError::BadResponse { status: 404 })?;
            Ok(AlbumDetail {
                id: album.id,
                title: album.title.clone(),
                artist: album.artist.clone(),
                year: album.year,
                tracks: self.album_tracks.get(&album_id).cloned().unwrap_or_default(),
            })
        }
        .boxed()
    }

    fn artists<'a>(&'a self, filter: Option<&'a str>) -> BoxFuture<'a, Result<Vec<Artist>, FetchError>> {
        async move {
            self.calls.artists.fetch_add(1, Ordering::SeqCst);
            self.latency(filter).await;
            if self.fail_artists {
                return Err(unavailable());
            }
            let needle = filter.map(str::to_lowercase);
            Ok(self
                .artists
                .iter()
                .filter(|a| needle.as_ref().is_none_or(|n| a.name.to_lowercase().contains(n)))
                .cloned()
                .collect())
        }
        .boxed()
    }

    fn artist_detail(&self, artist_id: EntityId) -> BoxFuture<'_, Result<ArtistDetail, FetchError>> {
        async move {
            self.calls.artist_detail.fetch_add(1, Ordering::SeqCst);
            self.latency(None).await;
            let artist = self
                .artists
                .iter()
                .find(|a| a.id == artist_id)
                .ok_or(FetchError::BadResponse { status: 404 })?;
            let album_ids = self.artist_albums.get(&artist_id).cloned().unwrap_or_default();
            let albums: Vec<Album> = self
                .albums
                .iter()
                .filter(|a| album_ids.contains(&a.id))
                .cloned()
                .collect();
            Ok(ArtistDetail {
                id: artist.id,
                name: artist.name.clone(),
                total_tracks: albums.iter().filter_map(|a| a.track_count).sum(),
                albums,
            })
        }
        .boxed()
    }

    fn favorite(&self, _track_id: EntityId) -> BoxFuture<'_, Result<(), FetchError>> {
        async move {
            self.calls.favorite.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        .boxed()
    }

    fn unfavorite(&self, _track_id: EntityId) -> BoxFuture<'_, Result<(), FetchError>> {
        async move {
            self.calls.unfavorite.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        .boxed()
    }

    fn queue_add(&self, track_id: EntityId) -> BoxFuture<'_, Result<(), FetchError>> {
        async move {
            self.calls.queue_add.fetch_add(1, Ordering::SeqCst);
            if self.fail_queue_ids.contains(&track_id) {
                return Err(unavailable());
            }
            Ok(())
        }
        .boxed()
    }
}
