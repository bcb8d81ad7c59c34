mod common;

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;

use common::{Calls, MockBackend, album, artist, test_config, track};
use library_browser::backend::FetchError;
use library_browser::controller::{SearchAggregator, SearchProvider, default_providers};
use library_browser::model::{ResourceKind, SearchResult, SearchRow};
use library_browser::LibraryBrowser;

fn floyd_library() -> MockBackend {
    let mut backend = MockBackend::new();
    backend.tracks = (1..=8)
        .map(|id| track(id, &format!("Song {id}"), "Pink Floyd", 100 + id % 2))
        .collect();
    backend.albums = (1..=6)
        .map(|id| album(100 + id, &format!("Record {id}"), "Pink Floyd"))
        .collect();
    backend.artists = vec![artist(7, "Pink Floyd"), artist(8, "Floydian Slip"), artist(9, "Queen")];
    backend
}

fn aggregator(backend: Arc<MockBackend>) -> SearchAggregator {
    let config = test_config();
    SearchAggregator::new(default_providers(backend, config.search.fetch_limit), config.search)
}

#[tokio::test(start_paused = true)]
async fn typing_burst_fans_out_once_with_last_query() {
    let backend = floyd_library().into_arc();
    let search = aggregator(backend.clone());

    let keystrokes = ["p", "pi", "pin", "pink", "pink ", "pink f", "pink fl", "pink flo", "pink floy", "pink floyd"];
    for query in keystrokes {
        search.on_query_change(query).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert_eq!(Calls::get(&backend.calls.tracks), 0);
    assert!(search.state().await.loading);

    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(Calls::get(&backend.calls.tracks), 1);
    assert_eq!(Calls::get(&backend.calls.albums), 1);
    assert_eq!(Calls::get(&backend.calls.artists), 1);

    let state = search.state().await;
    assert_eq!(state.query, "pink floyd");
    assert!(!state.loading);
    assert!(state.show_results);
    let artists = state.results.bucket(ResourceKind::Artist).unwrap();
    assert_eq!(artists.results.len(), 1);
    assert_eq!(artists.results[0].title, "Pink Floyd");
}

#[tokio::test(start_paused = true)]
async fn slow_stale_response_never_overwrites_newer_results() {
    let mut backend = MockBackend::new()
        .with_tracks(vec![track(50, "Flower", "Someone", 200), track(51, "Fly Away", "Someone", 200)]);
    backend.slow_filter = Some(("fl".to_string(), Duration::from_secs(2)));
    let backend = backend.into_arc();
    let search = aggregator(backend.clone());

    search.on_query_change("fl").await;
    // past the debounce, so the slow "fl" fan-out is in flight
    tokio::time::sleep(Duration::from_millis(350)).await;
    assert_eq!(Calls::get(&backend.calls.tracks), 1);

    search.on_query_change("flo").await;
    tokio::time::sleep(Duration::from_millis(400)).await;
    let fresh = search.state().await;
    assert_eq!(fresh.query, "flo");
    assert!(!fresh.loading);

    // let the "fl" response land
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(Calls::get(&backend.calls.tracks), 2);

    let state = search.state().await;
    assert_eq!(state, fresh);
    let titles: Vec<&str> = state
        .results
        .bucket(ResourceKind::Track)
        .unwrap()
        .results
        .iter()
        .map(|r| r.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Flower"]);
}

#[tokio::test(start_paused = true)]
async fn superseded_single_letter_results_never_appear() {
    let mut backend = MockBackend::new()
        .with_tracks(vec![track(1, "Ab Initio", "X", 1), track(2, "Alpha", "X", 1)]);
    backend.slow_filter = Some(("a".to_string(), Duration::from_secs(2)));
    let mut config = test_config();
    config.search.min_query_chars = 1;
    let search = SearchAggregator::new(default_providers(backend.into_arc(), 50), config.search);

    search.on_query_change("a").await;
    tokio::time::sleep(Duration::from_millis(350)).await;
    search.on_query_change("ab").await;
    tokio::time::sleep(Duration::from_secs(5)).await;

    let state = search.state().await;
    let ids: Vec<i64> = state.results.bucket(ResourceKind::Track).unwrap().results.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1]);
    assert_eq!(state.query, "ab");
}

#[tokio::test(start_paused = true)]
async fn short_query_clears_without_network() {
    let backend = floyd_library().into_arc();
    let search = aggregator(backend.clone());

    search.search_now("floyd").await;
    assert!(search.state().await.show_results);

    search.on_query_change("f").await;
    let state = search.state().await;
    assert_eq!(state.query, "f");
    assert!(!state.show_results);
    assert!(!state.loading);
    assert!(state.results.is_empty());

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(Calls::get(&backend.calls.tracks), 1);

    search.on_query_change("   ").await;
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(Calls::get(&backend.calls.tracks), 1);
}

#[tokio::test]
async fn immediate_search_respects_minimum_length() {
    let backend = floyd_library().into_arc();
    let search = aggregator(backend.clone());
    search.search_now("floyd").await;

    let results = search.search_now(" ").await;

    assert!(results.is_empty());
    assert_eq!(Calls::get(&backend.calls.tracks), 1);
    let state = search.state().await;
    assert!(!state.show_results);
    assert!(!state.loading);
    assert!(state.results.is_empty());
}

#[tokio::test(start_paused = true)]
async fn one_character_minimum_searches_single_letters() {
    let backend = floyd_library().into_arc();
    let mut config = test_config();
    config.search.min_query_chars = 1;
    let search = SearchAggregator::new(default_providers(backend.clone(), 50), config.search);

    search.on_query_change("q").await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    search.on_query_change("qu").await;
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(Calls::get(&backend.calls.artists), 1);
    let state = search.state().await;
    assert_eq!(state.query, "qu");
    assert_eq!(state.results.bucket(ResourceKind::Artist).unwrap().results[0].title, "Queen");
}

#[tokio::test]
async fn buckets_are_capped_and_ordered() {
    let backend = floyd_library().into_arc();
    let search = aggregator(backend);

    let results = search.search_now("floyd").await;

    let kinds: Vec<ResourceKind> = results.buckets.iter().map(|b| b.kind).collect();
    assert_eq!(kinds, vec![ResourceKind::Track, ResourceKind::Album, ResourceKind::Artist]);
    assert_eq!(results.bucket(ResourceKind::Track).unwrap().results.len(), 5);
    assert_eq!(results.bucket(ResourceKind::Album).unwrap().results.len(), 5);
    assert_eq!(results.bucket(ResourceKind::Artist).unwrap().results.len(), 2);
    assert!(results.total() <= 15);

    // backend order survives the cap
    let track_ids: Vec<i64> = results
        .bucket(ResourceKind::Track)
        .unwrap()
        .results
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(track_ids, vec![1, 2, 3, 4, 5]);

    let dividers = results
        .rows()
        .iter()
        .filter(|row| matches!(row, SearchRow::Divider(_)))
        .count();
    assert_eq!(dividers, 2);
}

#[tokio::test]
async fn failed_provider_leaves_others_intact() {
    let mut backend = floyd_library();
    backend.fail_albums = true;
    let search = aggregator(backend.into_arc());

    let results = search.search_now("floyd").await;

    assert!(results.bucket(ResourceKind::Album).unwrap().is_empty());
    assert_eq!(results.bucket(ResourceKind::Track).unwrap().results.len(), 5);
    assert_eq!(results.bucket(ResourceKind::Artist).unwrap().results.len(), 2);

    let state = search.state().await;
    assert_eq!(state.degraded, vec![ResourceKind::Album]);
    assert!(!state.loading);
    assert!(!state.shows_empty_state());
}

#[tokio::test]
async fn every_provider_failing_shows_empty_state() {
    let mut backend = floyd_library();
    backend.fail_tracks = true;
    backend.fail_albums = true;
    backend.fail_artists = true;
    let search = aggregator(backend.into_arc());

    let results = search.search_now("floyd").await;

    assert!(results.is_empty());
    let state = search.state().await;
    assert_eq!(state.degraded.len(), 3);
    assert!(state.shows_empty_state());
}

#[tokio::test]
async fn no_matches_shows_empty_state() {
    let search = aggregator(floyd_library().into_arc());

    search.search_now("zeppelin").await;

    let state = search.state().await;
    assert!(state.degraded.is_empty());
    assert!(state.shows_empty_state());
}

#[tokio::test]
async fn selecting_a_result_returns_to_idle() {
    let search = aggregator(floyd_library().into_arc());
    let results = search.search_now("floyd").await;
    let picked = results.bucket(ResourceKind::Artist).unwrap().results[0].clone();

    let returned = search.select_result(picked.clone()).await;

    assert_eq!(returned, picked);
    let state = search.state().await;
    assert_eq!(state.query, "");
    assert!(state.results.is_empty());
    assert!(!state.show_results);
    assert!(!state.loading);
}

#[tokio::test(start_paused = true)]
async fn clearing_cancels_pending_debounce() {
    let backend = floyd_library().into_arc();
    let search = aggregator(backend.clone());

    search.on_query_change("floyd").await;
    search.clear().await;
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(Calls::get(&backend.calls.tracks), 0);
    assert!(!search.state().await.show_results);
}

struct Repeating;

impl SearchProvider for Repeating {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Album
    }

    fn search<'a>(&'a self, _query: &'a str) -> BoxFuture<'a, Result<Vec<SearchResult>, FetchError>> {
        async move {
            let result = SearchResult {
                kind: ResourceKind::Album,
                id: 3,
                title: "Animals".to_string(),
                subtitle: None,
                album_id: Some(3),
            };
            Ok(vec![result.clone(), result])
        }
        .boxed()
    }
}

#[tokio::test]
async fn duplicate_results_collapse_per_kind() {
    let search = SearchAggregator::new(vec![Arc::new(Repeating)], test_config().search);

    let results = search.search_now("animals").await;

    assert_eq!(results.total(), 1);
    assert!(results.rows().iter().all(|row| !matches!(row, SearchRow::Divider(_))));
}

#[tokio::test]
async fn picking_a_track_opens_its_album() {
    let mut backend = floyd_library();
    backend.album_tracks.insert(101, vec![track(1, "Song 1", "Pink Floyd", 101)]);
    let browser = LibraryBrowser::new(backend.into_arc(), test_config());

    let results = browser.search().search_now("song 1").await;
    let picked = results.bucket(ResourceKind::Track).unwrap().results[0].clone();
    browser.open_search_result(picked).await;

    assert!(!browser.search().state().await.show_results);
    let detail = browser.detail().await;
    assert_eq!(detail.album.map(|a| a.id), Some(101));
}
