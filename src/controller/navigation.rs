//! Navigation-related controller methods (album/artist drill-down, back, search picks)

use crate::backend::FetchError;
use crate::model::{
    AlbumDetail, ArtistDetail, EntityId, NavigationFrame, NoticeLevel, ResourceKind, SearchResult,
};
use super::LibraryBrowser;

/// Detail pane data for the current frame
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetailState {
    pub loading: bool,
    pub album: Option<AlbumDetail>,
    /// Kept while an album opened from this artist is on top
    pub artist: Option<ArtistDetail>,
    pub error: Option<String>,
}

enum DetailResponse {
    Album(Result<AlbumDetail, FetchError>),
    Artist(Result<ArtistDetail, FetchError>),
}

impl LibraryBrowser {
    pub async fn open_album(&self, album_id: EntityId) -> NavigationFrame {
        let frame = {
            let mut state = self.state.lock().await;
            let frame = state.navigation.select_album(album_id);
            state.selection.clear();
            state.detail.album = None;
            state.detail.error = None;
            if !matches!(frame, NavigationFrame::AlbumDetail { parent_artist_id: Some(_), .. }) {
                state.detail.artist = None;
            }
            state.detail.loading = true;
            frame
        };

        let response = self.backend.album_tracks(album_id).await;
        self.apply_detail(frame, DetailResponse::Album(response)).await;
        frame
    }

    pub async fn open_artist(&self, artist_id: EntityId) -> NavigationFrame {
        let frame = {
            let mut state = self.state.lock().await;
            let frame = state.navigation.select_artist(artist_id);
            state.selection.clear();
            state.detail = DetailState {
                loading: true,
                ..Default::default()
            };
            frame
        };

        let response = self.backend.artist_detail(artist_id).await;
        self.apply_detail(frame, DetailResponse::Artist(response)).await;
        frame
    }

    /// Pop one frame. Returning to an artist reuses its loaded detail when it
    /// is still around. Returns false when already at the list.
    pub async fn back(&self) -> bool {
        let reload = {
            let mut state = self.state.lock().await;
            if !state.navigation.back() {
                return false;
            }
            state.detail.album = None;
            state.detail.error = None;
            match state.navigation.current_frame() {
                NavigationFrame::List => {
                    state.detail = DetailState::default();
                    None
                }
                NavigationFrame::ArtistDetail { artist_id } => {
                    let cached = state.detail.artist.as_ref().is_some_and(|a| a.id == artist_id);
                    if cached {
                        None
                    } else {
                        state.detail.artist = None;
                        state.detail.loading = true;
                        Some(NavigationFrame::ArtistDetail { artist_id })
                    }
                }
                frame @ NavigationFrame::AlbumDetail { .. } => {
                    state.detail.loading = true;
                    Some(frame)
                }
            }
        };

        match reload {
            Some(frame @ NavigationFrame::ArtistDetail { artist_id }) => {
                let response = self.backend.artist_detail(artist_id).await;
                self.apply_detail(frame, DetailResponse::Artist(response)).await;
            }
            Some(frame @ NavigationFrame::AlbumDetail { album_id, .. }) => {
                let response = self.backend.album_tracks(album_id).await;
                self.apply_detail(frame, DetailResponse::Album(response)).await;
            }
            _ => {}
        }
        true
    }

    /// Act on a pick from the search panel: the panel returns to idle and the
    /// matching detail opens. Tracks open their album.
    pub async fn open_search_result(&self, result: SearchResult) -> Option<NavigationFrame> {
        let result = self.search().select_result(result).await;
        match result.kind {
            ResourceKind::Album => Some(self.open_album(result.id).await),
            ResourceKind::Artist => Some(self.open_artist(result.id).await),
            ResourceKind::Track => match result.album_id {
                Some(album_id) => Some(self.open_album(album_id).await),
                None => None,
            },
        }
    }

    async fn apply_detail(&self, frame: NavigationFrame, response: DetailResponse) {
        let mut state = self.state.lock().await;
        if state.navigation.current_frame() != frame {
            tracing::debug!(?frame, "Dropping detail for a frame no longer shown");
            return;
        }
        state.detail.loading = false;

        let error = match response {
            DetailResponse::Album(Ok(detail)) => {
                tracing::info!(album_id = detail.id, tracks = detail.tracks.len(), "Album loaded");
                self.favorites.observe(&detail.tracks).await;
                state.detail.album = Some(detail);
                None
            }
            DetailResponse::Artist(Ok(detail)) => {
                tracing::info!(artist_id = detail.id, albums = detail.albums.len(), "Artist loaded");
                state.detail.artist = Some(detail);
                None
            }
            DetailResponse::Album(Err(e)) | DetailResponse::Artist(Err(e)) => {
                tracing::error!(?frame, error = %e, "Failed to load detail");
                state.detail.error = Some(e.to_string());
                Some(e)
            }
        };
        drop(state);

        if let Some(e) = error {
            self.set_notice(format!("Loading failed: {e}"), NoticeLevel::Error).await;
        }
    }
}
