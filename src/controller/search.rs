//! Debounced search across every registered resource provider

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use tokio::sync::Mutex;

use crate::backend::{FetchError, LibraryBackend};
use crate::config::SearchConfig;
use crate::model::{Entity, ResourceKind, ResultBucket, SearchResult, SearchResults, SearchState};

/// One searchable resource collection
pub trait SearchProvider: Send + Sync {
    fn kind(&self) -> ResourceKind;

    /// Matches for `query` in backend order. Capping is the aggregator's job.
    fn search<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<Vec<SearchResult>, FetchError>>;
}

/// Searches one backend collection, filtering client-side by case-insensitive
/// substring over the entity's search fields.
pub struct BackendSearchProvider {
    backend: Arc<dyn LibraryBackend>,
    kind: ResourceKind,
    fetch_limit: usize,
}

impl BackendSearchProvider {
    pub fn new(backend: Arc<dyn LibraryBackend>, kind: ResourceKind, fetch_limit: usize) -> Self {
        Self { backend, kind, fetch_limit }
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Entity>, FetchError> {
        let filter = Some(query);
        Ok(match self.kind {
            ResourceKind::Track => self
                .backend
                .tracks(filter, self.fetch_limit, 0)
                .await?
                .items
                .into_iter()
                .map(Entity::Track)
                .collect(),
            ResourceKind::Album => self
                .backend
                .albums(filter)
                .await?
                .into_iter()
                .map(Entity::Album)
                .collect(),
            ResourceKind::Artist => self
                .backend
                .artists(filter)
                .await?
                .into_iter()
                .map(Entity::Artist)
                .collect(),
        })
    }
}

impl SearchProvider for BackendSearchProvider {
    fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn search<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<Vec<SearchResult>, FetchError>> {
        async move {
            let needle = query.to_lowercase();
            let entities = self.fetch(query).await?;
            Ok(entities
                .iter()
                .filter(|e| e.matches(&needle))
                .map(SearchResult::from)
                .collect())
        }
        .boxed()
    }
}

/// Track, album and artist providers, in display order
pub fn default_providers(backend: Arc<dyn LibraryBackend>, fetch_limit: usize) -> Vec<Arc<dyn SearchProvider>> {
    [ResourceKind::Track, ResourceKind::Album, ResourceKind::Artist]
        .into_iter()
        .map(|kind| {
            Arc::new(BackendSearchProvider::new(backend.clone(), kind, fetch_limit))
                as Arc<dyn SearchProvider>
        })
        .collect()
}

/// Debounces the search box and merges provider results into buckets.
///
/// Every query change takes a new sequence number. A debounce timer or a
/// fan-out only writes state while its sequence number is still the latest.
#[derive(Clone)]
pub struct SearchAggregator {
    providers: Arc<Vec<Arc<dyn SearchProvider>>>,
    config: SearchConfig,
    state: Arc<Mutex<SearchState>>,
    sequence: Arc<AtomicU64>,
}

impl SearchAggregator {
    pub fn new(providers: Vec<Arc<dyn SearchProvider>>, config: SearchConfig) -> Self {
        Self {
            providers: Arc::new(providers),
            config,
            state: Arc::new(Mutex::new(SearchState::default())),
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn state(&self) -> SearchState {
        self.state.lock().await.clone()
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, sequence: u64) -> bool {
        self.sequence.load(Ordering::SeqCst) == sequence
    }

    fn is_searchable(&self, query: &str) -> bool {
        query.trim().chars().count() >= self.config.min_query_chars
    }

    /// Called on every keystroke. Short queries clear the panel right away;
    /// anything else is searched once input has been quiet for the debounce
    /// period.
    pub async fn on_query_change(&self, query: &str) {
        let sequence = self.next_sequence();
        if !self.begin_query(query).await {
            return;
        }

        let aggregator = self.clone();
        let query = query.trim().to_string();
        let debounce = self.config.debounce();
        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if !aggregator.is_current(sequence) {
                return;
            }
            aggregator.fan_out(sequence, &query).await;
        });
    }

    /// Search immediately, bypassing the debounce timer. Short queries clear
    /// the panel and return no results.
    pub async fn search_now(&self, query: &str) -> SearchResults {
        let sequence = self.next_sequence();
        if !self.begin_query(query).await {
            return SearchResults::default();
        }
        self.fan_out(sequence, query.trim()).await
    }

    /// Record `query` and mark the panel loading. Returns false, with the
    /// panel cleared, when the query is too short to search.
    async fn begin_query(&self, query: &str) -> bool {
        let mut state = self.state.lock().await;
        state.query = query.to_string();
        if !self.is_searchable(query) {
            state.results = SearchResults::default();
            state.degraded.clear();
            state.loading = false;
            state.show_results = false;
            return false;
        }
        state.loading = true;
        state.show_results = true;
        true
    }

    async fn fan_out(&self, sequence: u64, query: &str) -> SearchResults {
        tracing::debug!(query, sequence, providers = self.providers.len(), "Performing search");

        let responses = join_all(self.providers.iter().map(|provider| async move {
            (provider.kind(), provider.search(query).await)
        }))
        .await;

        let mut degraded = Vec::new();
        let buckets: Vec<ResultBucket> = responses
            .into_iter()
            .map(|(kind, response)| match response {
                Ok(results) => ResultBucket::from_results(kind, results, self.config.per_kind_cap),
                Err(e) => {
                    tracing::warn!(query, kind = ?kind, error = %e, "Search provider failed");
                    degraded.push(kind);
                    ResultBucket::empty(kind)
                }
            })
            .collect();
        let results = SearchResults { buckets };

        let mut state = self.state.lock().await;
        if !self.is_current(sequence) {
            tracing::debug!(query, sequence, "Discarding stale search results");
            return results;
        }
        tracing::info!(
            query,
            total = results.total(),
            degraded = degraded.len(),
            "Search completed"
        );
        state.results = results.clone();
        state.degraded = degraded;
        state.loading = false;
        state.show_results = true;
        results
    }

    /// Picking a result returns the box to idle
    pub async fn select_result(&self, result: SearchResult) -> SearchResult {
        tracing::debug!(kind = ?result.kind, id = result.id, "Search result selected");
        self.clear().await;
        result
    }

    pub async fn clear(&self) {
        self.next_sequence();
        *self.state.lock().await = SearchState::default();
    }
}
