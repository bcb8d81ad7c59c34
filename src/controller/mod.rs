//! Controller module - Browsing logic and async coordination
//!
//! This module contains the library browser controller that the rendering
//! layer drives, plus the coordinators it is built from:
//!
//! - `search`: Debounced multi-provider search aggregation
//! - `pagination`: Guarded page loading for one list view
//! - `scroll`: Sentinel visibility trigger feeding pagination
//! - `navigation`: Drill-down into album and artist details
//! - `batch`: Sequential batch actions over the selection
//! - `lifetime`: Liveness tokens for async work owned by a view

mod batch;
mod lifetime;
mod navigation;
mod pagination;
mod scroll;
mod search;

use std::sync::Arc;
use tokio::time::Instant;
use tokio::sync::Mutex;

use crate::backend::{LibraryBackend, ResourceFetcher};
use crate::config::BrowserConfig;
use crate::model::{
    Entity, EntityId, FavoritesCache, LibraryTab, NavigationFrame, NavigationStack, Notice,
    NoticeLevel, PageState, SelectionSet, SelectionSnapshot, Track,
};

pub use batch::{BatchAction, BatchReport, run_batch};
pub use lifetime::{LivenessToken, ViewLifetime};
pub use navigation::DetailState;
pub use pagination::{LoadOutcome, PaginationCoordinator};
pub use scroll::{ScrollTrigger, SentinelGeometry, TriggerOutcome};
pub use search::{BackendSearchProvider, SearchAggregator, SearchProvider, default_providers};

/// Coordinator type backing every library list view
pub type ListCoordinator = PaginationCoordinator<ResourceFetcher>;

const NOTICE_TTL_SECS: u64 = 5;

/// One mounted list view. Dropping it ends its lifetime, so responses for
/// its loads are discarded.
struct ListView {
    lifetime: ViewLifetime,
    coordinator: ListCoordinator,
}

impl ListView {
    fn mount(
        backend: Arc<dyn LibraryBackend>,
        tab: LibraryTab,
        filter: Option<String>,
        page_size: usize,
    ) -> Self {
        let lifetime = ViewLifetime::new();
        let fetcher = ResourceFetcher::new(backend, tab.resource(), filter, page_size);
        let coordinator = PaginationCoordinator::new(fetcher, lifetime.token());
        Self { lifetime, coordinator }
    }
}

struct BrowserState {
    navigation: NavigationStack,
    filter: Option<String>,
    list: ListView,
    selection: SelectionSet,
    detail: DetailState,
    notice: Option<Notice>,
}

/// Entry point for the rendering layer: one library tab with its list,
/// drill-down details, selection and search box.
#[derive(Clone)]
pub struct LibraryBrowser {
    backend: Arc<dyn LibraryBackend>,
    config: Arc<BrowserConfig>,
    favorites: FavoritesCache,
    search: SearchAggregator,
    state: Arc<Mutex<BrowserState>>,
}

impl LibraryBrowser {
    pub fn new(backend: Arc<dyn LibraryBackend>, config: BrowserConfig) -> Self {
        let providers = default_providers(backend.clone(), config.search.fetch_limit);
        Self::with_providers(backend, config, providers)
    }

    pub fn with_providers(
        backend: Arc<dyn LibraryBackend>,
        config: BrowserConfig,
        providers: Vec<Arc<dyn SearchProvider>>,
    ) -> Self {
        let tab = LibraryTab::default();
        let state = BrowserState {
            navigation: NavigationStack::new(tab),
            filter: None,
            list: ListView::mount(backend.clone(), tab, None, config.pagination.page_size),
            selection: SelectionSet::new(config.selection.prune_on_filter_change),
            detail: DetailState::default(),
            notice: None,
        };
        Self {
            backend,
            search: SearchAggregator::new(providers, config.search.clone()),
            config: Arc::new(config),
            favorites: FavoritesCache::new(),
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    pub fn search(&self) -> &SearchAggregator {
        &self.search
    }

    pub fn favorites(&self) -> &FavoritesCache {
        &self.favorites
    }

    // ========================================================================
    // List view
    // ========================================================================

    /// Load the first page of the current list view
    pub async fn mount(&self) -> LoadOutcome {
        let coordinator = self.coordinator().await;
        let outcome = coordinator.load_initial().await;
        self.after_load(&coordinator, outcome).await;
        outcome
    }

    pub async fn coordinator(&self) -> ListCoordinator {
        self.state.lock().await.list.coordinator.clone()
    }

    pub async fn tab(&self) -> LibraryTab {
        self.state.lock().await.navigation.tab()
    }

    pub async fn filter(&self) -> Option<String> {
        self.state.lock().await.filter.clone()
    }

    pub async fn page(&self) -> PageState<Entity> {
        self.coordinator().await.snapshot().await
    }

    /// Switch the top-level tab. Navigation resets to the new tab's list and
    /// the previous view's pending loads are abandoned. Returns `None` when
    /// `tab` is already active.
    pub async fn switch_tab(&self, tab: LibraryTab) -> Option<LoadOutcome> {
        {
            let mut state = self.state.lock().await;
            if !state.navigation.switch_tab(tab) {
                return None;
            }
            tracing::info!(?tab, "Switched library tab");
            state.list.lifetime.end();
            state.filter = None;
            state.list = self.mount_list(tab, None);
            state.selection = SelectionSet::new(self.config.selection.prune_on_filter_change);
            state.detail = DetailState::default();
        }
        Some(self.mount().await)
    }

    /// Replace the list filter. The page state starts over; the selection is
    /// rescoped once the first filtered page is in. Returns `None` when the
    /// filter is unchanged.
    pub async fn set_filter(&self, filter: Option<String>) -> Option<LoadOutcome> {
        let filter = filter.filter(|f| !f.trim().is_empty());
        {
            let mut state = self.state.lock().await;
            if state.filter == filter {
                return None;
            }
            tracing::debug!(filter = filter.as_deref().unwrap_or(""), "List filter changed");
            let tab = state.navigation.tab();
            state.list.lifetime.end();
            state.filter = filter.clone();
            state.list = self.mount_list(tab, filter);
        }
        Some(self.mount().await)
    }

    pub async fn load_more(&self) -> LoadOutcome {
        let coordinator = self.coordinator().await;
        let outcome = coordinator.load_more().await;
        self.after_load(&coordinator, outcome).await;
        outcome
    }

    pub async fn retry(&self) -> LoadOutcome {
        let coordinator = self.coordinator().await;
        let outcome = coordinator.retry().await;
        self.after_load(&coordinator, outcome).await;
        outcome
    }

    /// Scroll trigger bound to the current list view. A new one is needed
    /// after every tab or filter change.
    pub async fn scroll_trigger(&self) -> ScrollTrigger<ResourceFetcher> {
        ScrollTrigger::new(self.coordinator().await, &self.config.scroll)
    }

    fn mount_list(&self, tab: LibraryTab, filter: Option<String>) -> ListView {
        ListView::mount(self.backend.clone(), tab, filter, self.config.pagination.page_size)
    }

    async fn after_load(&self, coordinator: &ListCoordinator, outcome: LoadOutcome) {
        match outcome {
            LoadOutcome::Appended(count) => {
                let tracks: Vec<Track> = coordinator
                    .inspect(|page| {
                        let start = page.items.len().saturating_sub(count);
                        page.items[start..]
                            .iter()
                            .filter_map(|e| match e {
                                Entity::Track(t) => Some(t.clone()),
                                _ => None,
                            })
                            .collect()
                    })
                    .await;
                self.favorites.observe(&tracks).await;
                self.sync_selection().await;
            }
            LoadOutcome::Failed => {
                if let Some(error) = coordinator.inspect(|page| page.error.clone()).await {
                    self.set_notice(format!("Loading failed: {error}"), NoticeLevel::Error).await;
                }
            }
            LoadOutcome::Skipped(_) | LoadOutcome::Discarded => {}
        }
    }

    /// Rescope the selection to whatever the current list has loaded
    async fn sync_selection(&self) {
        let mut state = self.state.lock().await;
        let visible: Vec<EntityId> = state
            .list
            .coordinator
            .inspect(|page| page.items.iter().map(Entity::id).collect())
            .await;
        state.selection.set_visible(visible);
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub async fn selection(&self) -> SelectionSnapshot {
        self.state.lock().await.selection.snapshot()
    }

    pub async fn is_selected(&self, id: EntityId) -> bool {
        self.state.lock().await.selection.is_selected(id)
    }

    pub async fn toggle_selection(&self, id: EntityId) -> bool {
        self.sync_selection().await;
        self.state.lock().await.selection.toggle(id)
    }

    pub async fn select_all(&self) {
        self.sync_selection().await;
        self.state.lock().await.selection.select_all();
    }

    pub async fn clear_selection(&self) {
        self.state.lock().await.selection.clear();
    }

    /// Run `action` over the selected tracks. A fully successful run clears
    /// the selection; otherwise only the failed ids stay selected.
    pub async fn run_batch(&self, action: BatchAction) -> BatchReport {
        let (ids, is_track_list) = {
            let state = self.state.lock().await;
            (
                state.selection.selected_ids(),
                state.navigation.tab() == LibraryTab::Tracks,
            )
        };
        if !is_track_list || ids.is_empty() {
            return BatchReport {
                action,
                attempted: 0,
                succeeded: 0,
                failed_ids: Vec::new(),
            };
        }

        let report = run_batch(self.backend.as_ref(), &self.favorites, action, &ids).await;

        let level = if report.is_complete_success() {
            NoticeLevel::Info
        } else {
            NoticeLevel::Error
        };
        {
            let mut state = self.state.lock().await;
            if report.is_complete_success() {
                state.selection.clear();
            } else {
                state.selection.retain_only(&report.failed_ids);
            }
        }
        self.set_notice(report.message(), level).await;
        report
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub async fn current_frame(&self) -> NavigationFrame {
        self.state.lock().await.navigation.current_frame()
    }

    pub async fn navigation(&self) -> NavigationStack {
        self.state.lock().await.navigation.clone()
    }

    pub async fn detail(&self) -> DetailState {
        self.state.lock().await.detail.clone()
    }

    // ========================================================================
    // Notices
    // ========================================================================

    pub async fn notice(&self) -> Option<Notice> {
        self.state.lock().await.notice.clone()
    }

    async fn set_notice(&self, message: String, level: NoticeLevel) {
        let mut state = self.state.lock().await;
        state.notice = Some(Notice {
            message,
            level,
            raised_at: Instant::now(),
        });
    }

    pub async fn clear_notice(&self) {
        self.state.lock().await.notice = None;
    }

    pub async fn auto_clear_old_notice(&self) {
        let mut state = self.state.lock().await;
        if let Some(notice) = &state.notice {
            if notice.raised_at.elapsed().as_secs() >= NOTICE_TTL_SECS {
                state.notice = None;
            }
        }
    }
}
