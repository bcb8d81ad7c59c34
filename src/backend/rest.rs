//! REST client for the library backend

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::{log_api_request, log_api_result};
use crate::model::{Album, AlbumDetail, Artist, ArtistDetail, EntityId, Page, Track};
use super::{FetchError, LibraryBackend};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackPage {
    items: Vec<Track>,
    #[serde(default)]
    has_more: bool,
}

#[derive(Debug, Deserialize)]
struct ItemList<T> {
    items: Vec<T>,
}

/// `reqwest` backed [`LibraryBackend`]
#[derive(Clone)]
pub struct RestBackend {
    client: Client,
    base_url: String,
}

impl RestBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let response = self.client.get(self.url(path)).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadResponse { status: status.as_u16() });
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn send_empty(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<(), FetchError> {
        let mut request = self.client.request(method, self.url(path));
        if let Some(body) = body {
            request = request.json(&body);
        }
        let status = request.send().await?.status();
        // Favoriting an already favorited track answers 409 on some servers
        if status.is_success() || status == StatusCode::CONFLICT {
            Ok(())
        } else {
            Err(FetchError::BadResponse { status: status.as_u16() })
        }
    }
}

fn filter_param(filter: Option<&str>) -> Vec<(&'static str, String)> {
    filter
        .filter(|f| !f.is_empty())
        .map(|f| vec![("filter", f.to_string())])
        .unwrap_or_default()
}

impl LibraryBackend for RestBackend {
    fn tracks<'a>(
        &'a self,
        filter: Option<&'a str>,
        limit: usize,
        offset: usize,
    ) -> BoxFuture<'a, Result<Page<Track>, FetchError>> {
        async move {
            log_api_request!("tracks", limit, offset, filter = filter.unwrap_or(""));
            let mut query = filter_param(filter);
            query.push(("limit", limit.to_string()));
            query.push(("offset", offset.to_string()));
            let result = self
                .get_json::<TrackPage>("tracks", &query)
                .await
                .map(|page| Page { items: page.items, has_more: page.has_more });
            log_api_result!("tracks", result);
            result
        }
        .boxed()
    }

    fn albums<'a>(&'a self, filter: Option<&'a str>) -> BoxFuture<'a, Result<Vec<Album>, FetchError>> {
        async move {
            log_api_request!("albums", filter = filter.unwrap_or(""));
            let result = self
                .get_json::<ItemList<Album>>("albums", &filter_param(filter))
                .await
                .map(|list| list.items);
            log_api_result!("albums", result);
            result
        }
        .boxed()
    }

    fn album_tracks(&self, album_id: EntityId) -> BoxFuture<'_, Result<AlbumDetail, FetchError>> {
        async move {
            log_api_request!("album_tracks", album_id);
            let result = self.get_json::<AlbumDetail>(&format!("albums/{album_id}"), &[]).await;
            log_api_result!("album_tracks", result);
            result
        }
        .boxed()
    }

    fn artists<'a>(&'a self, filter: Option<&'a str>) -> BoxFuture<'a, Result<Vec<Artist>, FetchError>> {
        async move {
            log_api_request!("artists", filter = filter.unwrap_or(""));
            let result = self
                .get_json::<ItemList<Artist>>("artists", &filter_param(filter))
                .await
                .map(|list| list.items);
            log_api_result!("artists", result);
            result
        }
        .boxed()
    }

    fn artist_detail(&self, artist_id: EntityId) -> BoxFuture<'_, Result<ArtistDetail, FetchError>> {
        async move {
            log_api_request!("artist_detail", artist_id);
            let result = self.get_json::<ArtistDetail>(&format!("artists/{artist_id}"), &[]).await;
            log_api_result!("artist_detail", result);
            result
        }
        .boxed()
    }

    fn favorite(&self, track_id: EntityId) -> BoxFuture<'_, Result<(), FetchError>> {
        async move {
            log_api_request!("favorite", track_id);
            let result = self
                .send_empty(Method::POST, &format!("favorites/{track_id}"), None)
                .await;
            log_api_result!("favorite", result);
            result
        }
        .boxed()
    }

    fn unfavorite(&self, track_id: EntityId) -> BoxFuture<'_, Result<(), FetchError>> {
        async move {
            log_api_request!("unfavorite", track_id);
            let result = self
                .send_empty(Method::DELETE, &format!("favorites/{track_id}"), None)
                .await;
            log_api_result!("unfavorite", result);
            result
        }
        .boxed()
    }

    fn queue_add(&self, track_id: EntityId) -> BoxFuture<'_, Result<(), FetchError>> {
        async move {
            log_api_request!("queue_add", track_id);
            let body = serde_json::json!({ "trackId": track_id });
            let result = self.send_empty(Method::POST, "queue/add", Some(body)).await;
            log_api_result!("queue_add", result);
            result
        }
        .boxed()
    }
}
