//! Paged reads against one named resource collection

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::Mutex;

use crate::model::{Entity, Page, ResourceKind};
use super::{FetchError, LibraryBackend};

/// Anything a `PaginationCoordinator` can pull pages from
pub trait PageSource: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    fn fetch_page(&self, offset: usize) -> BoxFuture<'_, Result<Page<Self::Item>, FetchError>>;
}

/// Filtered, paged reads of tracks, albums or artists.
///
/// Tracks are paged by the backend. Album and artist listings come back whole,
/// so they are fetched once and paged out of memory.
pub struct ResourceFetcher {
    backend: Arc<dyn LibraryBackend>,
    kind: ResourceKind,
    filter: Option<String>,
    page_size: usize,
    collection: Mutex<Option<Vec<Entity>>>,
}

impl ResourceFetcher {
    pub fn new(
        backend: Arc<dyn LibraryBackend>,
        kind: ResourceKind,
        filter: Option<String>,
        page_size: usize,
    ) -> Self {
        Self {
            backend,
            kind,
            filter: filter.filter(|f| !f.trim().is_empty()),
            page_size: page_size.max(1),
            collection: Mutex::new(None),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    async fn whole_collection(&self) -> Result<Vec<Entity>, FetchError> {
        let mut collection = self.collection.lock().await;
        if let Some(items) = collection.as_ref() {
            return Ok(items.clone());
        }
        let filter = self.filter.as_deref();
        let items: Vec<Entity> = match self.kind {
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
            ResourceKind::Track => Vec::new(),
        };
        tracing::debug!(kind = ?self.kind, count = items.len(), "Fetched whole collection");
        *collection = Some(items.clone());
        Ok(items)
    }

    async fn page_at(&self, offset: usize) -> Result<Page<Entity>, FetchError> {
        if self.kind == ResourceKind::Track {
            let page = self
                .backend
                .tracks(self.filter.as_deref(), self.page_size, offset)
                .await?;
            return Ok(Page {
                items: page.items.into_iter().map(Entity::Track).collect(),
                has_more: page.has_more,
            });
        }

        let items = self.whole_collection().await?;
        let end = offset.saturating_add(self.page_size).min(items.len());
        let page = items.get(offset..end).map(<[Entity]>::to_vec).unwrap_or_default();
        Ok(Page {
            items: page,
            has_more: end < items.len(),
        })
    }
}

impl PageSource for ResourceFetcher {
    type Item = Entity;

    fn fetch_page(&self, offset: usize) -> BoxFuture<'_, Result<Page<Entity>, FetchError>> {
        self.page_at(offset).boxed()
    }
}
