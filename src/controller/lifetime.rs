//! Liveness tokens tying async work to the view that started it

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Owned by a view. Ending it (explicitly or by drop) marks every token
/// handed out as stale.
#[derive(Debug)]
pub struct ViewLifetime {
    alive: Arc<AtomicBool>,
}

/// Cheap handle checked after each await point
#[derive(Clone, Debug)]
pub struct LivenessToken {
    alive: Arc<AtomicBool>,
}

impl ViewLifetime {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn token(&self) -> LivenessToken {
        LivenessToken {
            alive: self.alive.clone(),
        }
    }

    pub fn end(&self) {
        self.alive.store(false, Ordering::Release);
    }
}

impl Default for ViewLifetime {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ViewLifetime {
    fn drop(&mut self) {
        self.end();
    }
}

impl LivenessToken {
    pub fn is_live(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}
