//! Backend module - Collaborator contracts of the REST library backend
//!
//! - `rest`: `reqwest` implementation of [`LibraryBackend`]
//! - `fetcher`: Paged, filterable reads over one resource collection

mod rest;
mod fetcher;

use futures::future::BoxFuture;

use crate::model::{Album, AlbumDetail, Artist, ArtistDetail, EntityId, Page, Track};

pub use fetcher::{PageSource, ResourceFetcher};
pub use rest::RestBackend;

/// Failure of a single backend call
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("network failure: {0}")]
    Network(String),
    #[error("backend answered with status {status}")]
    BadResponse { status: u16 },
    #[error("malformed response: {0}")]
    MalformedData(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            FetchError::MalformedData(error.to_string())
        } else if let Some(status) = error.status() {
            FetchError::BadResponse { status: status.as_u16() }
        } else {
            FetchError::Network(error.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(error: serde_json::Error) -> Self {
        FetchError::MalformedData(error.to_string())
    }
}

/// Reads and batch-action primitives the browsing core consumes.
///
/// Methods return boxed futures so the backend can be shared as
/// `Arc<dyn LibraryBackend>` between views and search providers.
pub trait LibraryBackend: Send + Sync {
    fn tracks<'a>(
        &'a self,
        filter: Option<&'a str>,
        limit: usize,
        offset: usize,
    ) -> BoxFuture<'a, Result<Page<Track>, FetchError>>;

    fn albums<'a>(&'a self, filter: Option<&'a str>) -> BoxFuture<'a, Result<Vec<Album>, FetchError>>;

    fn album_tracks(&self, album_id: EntityId) -> BoxFuture<'_, Result<AlbumDetail, FetchError>>;

    fn artists<'a>(&'a self, filter: Option<&'a str>) -> BoxFuture<'a, Result<Vec<Artist>, FetchError>>;

    fn artist_detail(&self, artist_id: EntityId) -> BoxFuture<'_, Result<ArtistDetail, FetchError>>;

    fn favorite(&self, track_id: EntityId) -> BoxFuture<'_, Result<(), FetchError>>;

    fn unfavorite(&self, track_id: EntityId) -> BoxFuture<'_, Result<(), FetchError>>;

    fn queue_add(&self, track_id: EntityId) -> BoxFuture<'_, Result<(), FetchError>>;
}
