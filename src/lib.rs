//! Library browsing core of a personal music library client.
//!
//! Debounced search across tracks, albums and artists, infinite-scroll
//! pagination, drill-down navigation and batch selection, all driven against
//! a REST backend through [`backend::LibraryBackend`].

pub mod backend;
pub mod config;
pub mod controller;
pub mod logging;
pub mod model;

pub use backend::{FetchError, LibraryBackend, RestBackend};
pub use config::BrowserConfig;
pub use controller::LibraryBrowser;
