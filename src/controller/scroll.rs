//! Sentinel-driven load trigger for infinite scrolling

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::backend::PageSource;
use crate::config::ScrollConfig;
use crate::model::SkipReason;
use super::pagination::{LoadOutcome, PaginationCoordinator};

/// Position of the sentinel row relative to the scrolling viewport, in layout units
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SentinelGeometry {
    pub sentinel_top: f64,
    pub sentinel_height: f64,
    pub viewport_top: f64,
    pub viewport_height: f64,
}

impl SentinelGeometry {
    /// Fraction of the sentinel inside the viewport grown by `root_margin` on
    /// both edges. A zero-height sentinel counts as fully visible when its top
    /// edge is inside.
    pub fn visible_ratio(&self, root_margin: f64) -> f64 {
        let top = self.viewport_top - root_margin;
        let bottom = self.viewport_top + self.viewport_height + root_margin;
        if self.sentinel_height <= 0.0 {
            return if (top..=bottom).contains(&self.sentinel_top) { 1.0 } else { 0.0 };
        }
        let sentinel_bottom = self.sentinel_top + self.sentinel_height;
        let overlap = sentinel_bottom.min(bottom) - self.sentinel_top.max(top);
        (overlap.max(0.0) / self.sentinel_height).min(1.0)
    }
}

/// What a visibility event led to
#[derive(Debug)]
pub enum TriggerOutcome {
    /// A load was started; the handle resolves with its outcome
    Fired(JoinHandle<LoadOutcome>),
    NotVisible,
    CoolingDown,
    Gated(SkipReason),
    Disconnected,
}

impl TriggerOutcome {
    pub fn fired(&self) -> bool {
        matches!(self, TriggerOutcome::Fired(_))
    }
}

/// Turns sentinel visibility events into `load_more` calls with a local
/// cooldown after every firing.
pub struct ScrollTrigger<S: PageSource> {
    coordinator: PaginationCoordinator<S>,
    threshold: f64,
    root_margin: f64,
    cooldown: Duration,
    last_fired: Option<Instant>,
    connected: bool,
}

impl<S: PageSource> ScrollTrigger<S> {
    pub fn new(coordinator: PaginationCoordinator<S>, config: &ScrollConfig) -> Self {
        Self {
            coordinator,
            threshold: config.threshold,
            root_margin: config.root_margin,
            cooldown: config.cooldown(),
            last_fired: None,
            connected: true,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Stop observing. Also clears the cooldown.
    pub fn disconnect(&mut self) {
        if self.connected {
            tracing::debug!("Scroll trigger disconnected");
        }
        self.connected = false;
        self.last_fired = None;
    }

    fn cooling_down(&self, now: Instant) -> bool {
        self.last_fired
            .is_some_and(|fired| now.duration_since(fired) < self.cooldown)
    }

    /// Disconnect once the view has ended or the list is exhausted. Returns
    /// whether the trigger is still connected.
    pub async fn sync(&mut self) -> bool {
        if !self.connected {
            return false;
        }
        if !self.coordinator.is_live() {
            tracing::debug!("View ended, tearing down scroll trigger");
            self.disconnect();
        } else if self.coordinator.can_load_more().await == Err(SkipReason::Exhausted) {
            self.disconnect();
        }
        self.connected
    }

    pub async fn on_visibility(&mut self, geometry: SentinelGeometry) -> TriggerOutcome {
        if !self.sync().await {
            return TriggerOutcome::Disconnected;
        }
        if geometry.visible_ratio(self.root_margin) < self.threshold {
            return TriggerOutcome::NotVisible;
        }
        let now = Instant::now();
        if self.cooling_down(now) {
            return TriggerOutcome::CoolingDown;
        }

        if let Err(reason) = self.coordinator.can_load_more().await {
            if reason == SkipReason::Exhausted {
                self.disconnect();
                return TriggerOutcome::Disconnected;
            }
            return TriggerOutcome::Gated(reason);
        }

        self.last_fired = Some(now);
        let coordinator = self.coordinator.clone();
        tracing::trace!("Scroll trigger fired");
        TriggerOutcome::Fired(tokio::spawn(async move { coordinator.load_more().await }))
    }
}
