//! Search result data structures shared by the aggregator and the renderer

use std::collections::HashSet;

use super::types::{Entity, EntityId, ResourceKind};

/// A single labelled search hit
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    pub kind: ResourceKind,
    pub id: EntityId,
    pub title: String,
    pub subtitle: Option<String>,
    pub album_id: Option<EntityId>,
}

impl SearchResult {
    pub fn key(&self) -> (ResourceKind, EntityId) {
        (self.kind, self.id)
    }
}

impl From<&Entity> for SearchResult {
    fn from(entity: &Entity) -> Self {
        match entity {
            Entity::Track(t) => Self {
                kind: ResourceKind::Track,
                id: t.id,
                title: t.title.clone(),
                subtitle: non_empty(&t.artist),
                album_id: t.album_id,
            },
            Entity::Album(a) => Self {
                kind: ResourceKind::Album,
                id: a.id,
                title: a.title.clone(),
                subtitle: non_empty(&a.artist),
                album_id: Some(a.id),
            },
            Entity::Artist(a) => Self {
                kind: ResourceKind::Artist,
                id: a.id,
                title: a.name.clone(),
                subtitle: None,
                album_id: None,
            },
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() { None } else { Some(value.to_string()) }
}

/// Results of one kind, in backend order
#[derive(Clone, Debug, PartialEq)]
pub struct ResultBucket {
    pub kind: ResourceKind,
    pub results: Vec<SearchResult>,
}

impl ResultBucket {
    /// Build a bucket from a provider response, dropping duplicate `(kind, id)`
    /// keys and anything past `cap`.
    pub fn from_results(kind: ResourceKind, results: Vec<SearchResult>, cap: usize) -> Self {
        let mut seen = HashSet::new();
        let results = results
            .into_iter()
            .filter(|r| r.kind == kind && seen.insert(r.key()))
            .take(cap)
            .collect();
        Self { kind, results }
    }

    pub fn empty(kind: ResourceKind) -> Self {
        Self { kind, results: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// One line of the results panel
#[derive(Clone, Debug, PartialEq)]
pub enum SearchRow<'a> {
    Divider(ResourceKind),
    Result(&'a SearchResult),
}

/// Combined search results, one bucket per registered provider
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchResults {
    pub buckets: Vec<ResultBucket>,
}

impl SearchResults {
    pub fn bucket(&self, kind: ResourceKind) -> Option<&ResultBucket> {
        self.buckets.iter().find(|b| b.kind == kind)
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.results.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Flatten buckets for display. A divider precedes a bucket only when some
    /// earlier bucket already produced rows.
    pub fn rows(&self) -> Vec<SearchRow<'_>> {
        let mut rows = Vec::with_capacity(self.total() + self.buckets.len());
        let mut emitted_any = false;
        for bucket in self.buckets.iter().filter(|b| !b.is_empty()) {
            if emitted_any {
                rows.push(SearchRow::Divider(bucket.kind));
            }
            rows.extend(bucket.results.iter().map(SearchRow::Result));
            emitted_any = true;
        }
        rows
    }
}

/// What the search box and its results panel render
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: SearchResults,
    pub loading: bool,
    pub show_results: bool,
    /// Providers whose request failed for the current results
    pub degraded: Vec<ResourceKind>,
}

impl SearchState {
    /// True when the panel should show its "no results" placeholder
    pub fn shows_empty_state(&self) -> bool {
        self.show_results && !self.loading && self.results.is_empty()
    }
}
