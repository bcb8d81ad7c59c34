//! Infinite-scroll pagination for one list view

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::backend::PageSource;
use crate::model::{PageState, SkipReason};
use super::lifetime::LivenessToken;

/// Result of a load request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page arrived with this many items
    Appended(usize),
    Skipped(SkipReason),
    /// The fetch failed; the error is stored in the page state for retry
    Failed,
    /// The owning view ended before the response arrived
    Discarded,
}

/// Serializes page loads of one list view.
///
/// Clones share the same state; spawning a clone into a task is how the scroll
/// trigger drives it.
pub struct PaginationCoordinator<S: PageSource> {
    source: Arc<S>,
    state: Arc<Mutex<PageState<S::Item>>>,
    token: LivenessToken,
}

impl<S: PageSource> Clone for PaginationCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            state: self.state.clone(),
            token: self.token.clone(),
        }
    }
}

impl<S: PageSource> PaginationCoordinator<S> {
    pub fn new(source: S, token: LivenessToken) -> Self {
        Self {
            source: Arc::new(source),
            state: Arc::new(Mutex::new(PageState::default())),
            token,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn is_live(&self) -> bool {
        self.token.is_live()
    }

    pub async fn snapshot(&self) -> PageState<S::Item> {
        self.state.lock().await.clone()
    }

    /// Read the page state in place without cloning its items
    pub async fn inspect<R>(&self, f: impl FnOnce(&PageState<S::Item>) -> R) -> R {
        f(&*self.state.lock().await)
    }

    pub async fn can_load_more(&self) -> Result<(), SkipReason> {
        self.state.lock().await.can_load_more()
    }

    pub async fn load_initial(&self) -> LoadOutcome {
        if let Err(reason) = self.state.lock().await.begin_initial() {
            return LoadOutcome::Skipped(reason);
        }

        let result = self.source.fetch_page(0).await;
        if !self.token.is_live() {
            tracing::debug!("Dropping initial page for ended view");
            return LoadOutcome::Discarded;
        }

        let mut state = self.state.lock().await;
        match result {
            Ok(page) => {
                let count = page.items.len();
                state.finish_initial(page);
                tracing::debug!(count, has_more = state.has_more, "Initial page loaded");
                LoadOutcome::Appended(count)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Initial page load failed");
                state.fail(e.to_string());
                LoadOutcome::Failed
            }
        }
    }

    /// Fetch and append the next page. Calls made while any load is in flight
    /// return `Skipped` and leave the in-flight load as the only fetch.
    pub async fn load_more(&self) -> LoadOutcome {
        let offset = match self.state.lock().await.begin_more() {
            Ok(offset) => offset,
            Err(reason) => {
                tracing::trace!(?reason, "load_more skipped");
                return LoadOutcome::Skipped(reason);
            }
        };

        tracing::debug!(offset, "Loading next page");
        let result = self.source.fetch_page(offset).await;
        if !self.token.is_live() {
            tracing::debug!(offset, "Dropping page for ended view");
            return LoadOutcome::Discarded;
        }

        let mut state = self.state.lock().await;
        match result {
            Ok(page) => {
                let count = state.finish_more(page);
                tracing::info!(
                    offset,
                    loaded = count,
                    total = state.items.len(),
                    has_more = state.has_more,
                    "Loaded more items"
                );
                LoadOutcome::Appended(count)
            }
            Err(e) => {
                tracing::error!(offset, error = %e, "Failed to load more items");
                state.fail(e.to_string());
                LoadOutcome::Failed
            }
        }
    }

    /// Re-issue whichever load last failed
    pub async fn retry(&self) -> LoadOutcome {
        let needs_initial = {
            let state = self.state.lock().await;
            state.items.is_empty() && state.offset == 0
        };
        if needs_initial {
            self.load_initial().await
        } else {
            self.load_more().await
        }
    }
}
