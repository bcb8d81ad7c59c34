//! Sequential batch actions over selected tracks

use crate::backend::{FetchError, LibraryBackend};
use crate::model::{EntityId, FavoritesCache};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchAction {
    AddToQueue,
    Favorite,
    Unfavorite,
    /// Favorite tracks not known to be favorites, unfavorite the rest
    ToggleFavorite,
}

impl BatchAction {
    pub fn label(self) -> &'static str {
        match self {
            BatchAction::AddToQueue => "Add to queue",
            BatchAction::Favorite => "Favorite",
            BatchAction::Unfavorite => "Unfavorite",
            BatchAction::ToggleFavorite => "Toggle favorite",
        }
    }
}

/// Aggregate result of one batch run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchReport {
    pub action: BatchAction,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed_ids: Vec<EntityId>,
}

impl BatchReport {
    pub fn is_complete_success(&self) -> bool {
        self.failed_ids.is_empty()
    }

    pub fn message(&self) -> String {
        format!(
            "{}: {} of {} succeeded",
            self.action.label(),
            self.succeeded,
            self.attempted
        )
    }
}

async fn apply_one(
    backend: &dyn LibraryBackend,
    favorites: &FavoritesCache,
    action: BatchAction,
    track_id: EntityId,
) -> Result<(), FetchError> {
    match action {
        BatchAction::AddToQueue => backend.queue_add(track_id).await,
        BatchAction::Favorite => {
            backend.favorite(track_id).await?;
            favorites.add(track_id).await;
            Ok(())
        }
        BatchAction::Unfavorite => {
            backend.unfavorite(track_id).await?;
            favorites.remove(track_id).await;
            Ok(())
        }
        BatchAction::ToggleFavorite => {
            if favorites.is_favorite(track_id).await {
                backend.unfavorite(track_id).await?;
                favorites.remove(track_id).await;
            } else {
                backend.favorite(track_id).await?;
                favorites.add(track_id).await;
            }
            Ok(())
        }
    }
}

/// Apply `action` to each id in order. A failure is recorded and the run
/// continues; nothing already applied is rolled back.
pub async fn run_batch(
    backend: &dyn LibraryBackend,
    favorites: &FavoritesCache,
    action: BatchAction,
    track_ids: &[EntityId],
) -> BatchReport {
    let mut report = BatchReport {
        action,
        attempted: track_ids.len(),
        succeeded: 0,
        failed_ids: Vec::new(),
    };

    for &track_id in track_ids {
        match apply_one(backend, favorites, action, track_id).await {
            Ok(()) => report.succeeded += 1,
            Err(e) => {
                tracing::warn!(track_id, action = action.label(), error = %e, "Batch item failed");
                report.failed_ids.push(track_id);
            }
        }
    }

    tracing::info!(
        action = action.label(),
        attempted = report.attempted,
        succeeded = report.succeeded,
        "Batch action finished"
    );
    report
}
