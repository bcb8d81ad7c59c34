//! Model module - Browsing state and data types
//!
//! This module contains the data structures and pure state transitions of the
//! library browser. It is organized into submodules by responsibility:
//!
//! - `types`: Entities, resource kinds and notices
//! - `content`: Search results and the search panel state
//! - `page`: Pagination state of one list view
//! - `navigation`: Drill-down navigation stack
//! - `selection`: Batch selection scoped to the visible list
//! - `cache`: Favorite track cache used by favorite toggles

mod types;
mod content;
mod page;
mod navigation;
mod selection;
mod cache;

pub use types::{
    Album, AlbumDetail, Artist, ArtistDetail, Entity, EntityId, LibraryTab,
    Notice, NoticeLevel, Page, ResourceKind, Track,
};

pub use content::{ResultBucket, SearchResult, SearchResults, SearchRow, SearchState};

pub use page::{PageState, SkipReason};

pub use navigation::{NavigationFrame, NavigationStack};

pub use selection::{SelectionSet, SelectionSnapshot};

pub use cache::FavoritesCache;
