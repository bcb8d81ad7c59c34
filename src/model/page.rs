//! Pagination state for one list view

use super::types::Page;

/// Why a load request did not reach the backend
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    Exhausted,
    InitialLoadInFlight,
    AlreadyLoading,
}

/// Loaded items and loading flags of one list view.
///
/// Only `PaginationCoordinator` mutates this; renderers read clones of it.
#[derive(Clone, Debug, PartialEq)]
pub struct PageState<T> {
    pub items: Vec<T>,
    pub offset: usize,
    pub has_more: bool,
    pub is_loading_initial: bool,
    pub is_loading_more: bool,
    /// Retryable error from the last failed load
    pub error: Option<String>,
}

impl<T> Default for PageState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            offset: 0,
            has_more: true,
            is_loading_initial: false,
            is_loading_more: false,
            error: None,
        }
    }
}

impl<T> PageState<T> {
    pub fn is_loading(&self) -> bool {
        self.is_loading_initial || self.is_loading_more
    }

    /// Checks the preconditions for a next-page fetch
    pub fn can_load_more(&self) -> Result<(), SkipReason> {
        if self.is_loading_initial {
            Err(SkipReason::InitialLoadInFlight)
        } else if self.is_loading_more {
            Err(SkipReason::AlreadyLoading)
        } else if !self.has_more {
            Err(SkipReason::Exhausted)
        } else {
            Ok(())
        }
    }

    pub fn begin_initial(&mut self) -> Result<(), SkipReason> {
        if self.is_loading() {
            return Err(SkipReason::AlreadyLoading);
        }
        self.is_loading_initial = true;
        self.error = None;
        Ok(())
    }

    pub fn begin_more(&mut self) -> Result<usize, SkipReason> {
        self.can_load_more()?;
        self.is_loading_more = true;
        self.error = None;
        Ok(self.offset)
    }

    pub fn finish_initial(&mut self, page: Page<T>) {
        self.offset = page.items.len();
        self.items = page.items;
        self.has_more = page.has_more;
        self.is_loading_initial = false;
    }

    /// Appends a page; items are never replaced here
    pub fn finish_more(&mut self, page: Page<T>) -> usize {
        let count = page.items.len();
        self.items.extend(page.items);
        self.offset += count;
        self.has_more = page.has_more;
        self.is_loading_more = false;
        count
    }

    /// Records a failed load. Items, offset and `has_more` are left alone.
    pub fn fail(&mut self, message: String) {
        self.is_loading_initial = false;
        self.is_loading_more = false;
        self.error = Some(message);
    }
}
