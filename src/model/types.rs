//! Core type definitions for library entities

use tokio::time::Instant;

use serde::Deserialize;

/// Backend identifier of a track, album or artist
pub type EntityId = i64;

/// Which resource collection an entity or search result belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Track,
    Album,
    Artist,
}

impl ResourceKind {
    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Track => "Tracks",
            ResourceKind::Album => "Albums",
            ResourceKind::Artist => "Artists",
        }
    }
}

/// Top-level library tab. Each tab lists one resource collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LibraryTab {
    #[default]
    Tracks,
    Albums,
    Artists,
}

impl LibraryTab {
    pub fn resource(self) -> ResourceKind {
        match self {
            LibraryTab::Tracks => ResourceKind::Track,
            LibraryTab::Albums => ResourceKind::Album,
            LibraryTab::Artists => ResourceKind::Artist,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub album_id: Option<EntityId>,
    #[serde(default)]
    pub duration_secs: Option<u32>,
    #[serde(default)]
    pub favorite: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub track_count: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub album_count: Option<u32>,
}

/// Album detail view data
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumDetail {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

/// Artist detail view data
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistDetail {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub albums: Vec<Album>,
    #[serde(default)]
    pub total_tracks: u32,
}

/// A row of any list view
#[derive(Clone, Debug, PartialEq)]
pub enum Entity {
    Track(Track),
    Album(Album),
    Artist(Artist),
}

impl Entity {
    pub fn id(&self) -> EntityId {
        match self {
            Entity::Track(t) => t.id,
            Entity::Album(a) => a.id,
            Entity::Artist(a) => a.id,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            Entity::Track(_) => ResourceKind::Track,
            Entity::Album(_) => ResourceKind::Album,
            Entity::Artist(_) => ResourceKind::Artist,
        }
    }

    /// Fields a search query is matched against
    pub fn search_fields(&self) -> Vec<&str> {
        match self {
            Entity::Track(t) => vec![t.title.as_str(), t.artist.as_str()],
            Entity::Album(a) => vec![a.title.as_str(), a.artist.as_str()],
            Entity::Artist(a) => vec![a.name.as_str()],
        }
    }

    /// Case-insensitive substring match against `search_fields`.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// One page of a backend collection
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_more: bool,
}

/// Severity of a transient notice
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Toast shown after batch actions and failed loads
#[derive(Clone, Debug)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
    pub raised_at: Instant,
}
