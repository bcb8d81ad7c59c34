//! Cache of favorited track ids to resolve favorite toggles without a round trip

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::types::{EntityId, Track};

/// Known favorite state of tracks seen by this session
#[derive(Clone)]
pub struct FavoritesCache {
    favorite_ids: Arc<RwLock<HashSet<EntityId>>>,
}

impl FavoritesCache {
    pub fn new() -> Self {
        Self {
            favorite_ids: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Record the favorite flags of freshly loaded tracks
    pub async fn observe(&self, tracks: &[Track]) {
        let mut favorite_ids = self.favorite_ids.write().await;
        for track in tracks {
            if track.favorite {
                favorite_ids.insert(track.id);
            } else {
                favorite_ids.remove(&track.id);
            }
        }
    }

    pub async fn is_favorite(&self, track_id: EntityId) -> bool {
        self.favorite_ids.read().await.contains(&track_id)
    }

    pub async fn add(&self, track_id: EntityId) {
        self.favorite_ids.write().await.insert(track_id);
    }

    pub async fn remove(&self, track_id: EntityId) {
        self.favorite_ids.write().await.remove(&track_id);
    }

    pub async fn len(&self) -> usize {
        self.favorite_ids.read().await.len()
    }
}

impl Default for FavoritesCache {
    fn default() -> Self {
        Self::new()
    }
}
