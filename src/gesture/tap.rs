//! Single/double tap disambiguation
//!
//! Consumes release aggregates from the gesture router and decides,
//! per release, between "part of a double tap" and "a single tap once
//! the double-tap window expires". The pending single tap is an explicit
//! deadline drained by [`TapClassifier::tick`]; no wall clock is read
//! here.

use serde::{Deserialize, Serialize};

use super::touch::{ReleaseInfo, TapEvent, TouchPoint};

fn default_delay_ms() -> u64 {
    300
}

fn default_radius() -> f32 {
    50.0
}

fn default_move_slop() -> f32 {
    10.0
}

/// Thresholds for tap classification.
///
/// `restart_timer_on_reject` selects the historical variant that, when a
/// second release arrives too late to pair into a double tap, still emits
/// the held single tap immediately instead of dropping it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TapConfig {
    /// Double-tap window and single-tap hold-back, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Maximum distance between paired releases
    #[serde(default = "default_radius")]
    pub radius: f32,

    /// Total drag displacement above which a release is a scroll, not a tap
    #[serde(default = "default_move_slop")]
    pub move_slop: f32,

    /// Emit the superseded pending tap on a late same-spot release
    #[serde(default)]
    pub restart_timer_on_reject: bool,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            radius: default_radius(),
            move_slop: default_move_slop(),
            restart_timer_on_reject: false,
        }
    }
}

/// A single tap held back until the double-tap window closes.
#[derive(Clone, Copy, Debug)]
struct PendingTap {
    location: TouchPoint,
    deadline_ms: u64,
}

/// Per-instance tap state. Create on attach, [`TapClassifier::cancel`]
/// on detach so no held tap outlives the view.
#[derive(Debug)]
pub struct TapClassifier {
    config: TapConfig,
    /// Touch-down position of the most recent release
    last_origin: TouchPoint,
    /// Timestamp of the most recent release; 0 means none seen yet
    last_release_ms: u64,
    /// Held single taps, oldest first. Releases far apart in space keep
    /// independent timers, so more than one can be in flight.
    pending: Vec<PendingTap>,
}

impl TapClassifier {
    #[must_use]
    pub fn new(config: TapConfig) -> Self {
        Self {
            config,
            last_origin: TouchPoint::default(),
            last_release_ms: 0,
            pending: Vec::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &TapConfig {
        &self.config
    }

    /// Process one release. Returns an immediate emission, if any; a
    /// delayed single tap surfaces later through [`Self::tick`].
    pub fn on_release(&mut self, release: &ReleaseInfo) -> Option<TapEvent> {
        let emitted = if self.pending.is_empty() {
            self.arm_if_tap(release);
            None
        } else if self.is_double(release) {
            self.pending.clear();
            Some(TapEvent::Double)
        } else {
            // Second release, but the thresholds failed: treat it as a
            // fresh tap. Releases far apart in space keep their own
            // timers; a slow same-spot release supersedes the held one.
            let same_spot = self.last_origin.distance_to(release.origin) < self.config.radius;
            let stale = if same_spot { self.pending.pop() } else { None };
            self.arm_if_tap(release);
            match stale {
                Some(stale) if self.config.restart_timer_on_reject => Some(TapEvent::Single {
                    x: stale.location.x,
                    y: stale.location.y,
                }),
                _ => None,
            }
        };
        self.finish(release, emitted)
    }

    /// Fire pending single taps whose window has closed.
    pub fn tick(&mut self, now_ms: u64) -> Vec<TapEvent> {
        let mut fired = Vec::new();
        self.pending.retain(|tap| {
            if now_ms >= tap.deadline_ms {
                fired.push(TapEvent::Single {
                    x: tap.location.x,
                    y: tap.location.y,
                });
                false
            } else {
                true
            }
        });
        fired
    }

    /// Detach hook: drop all held taps without emitting.
    pub fn cancel(&mut self) {
        self.pending.clear();
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    fn is_double(&self, release: &ReleaseInfo) -> bool {
        self.last_release_ms > 0
            && release.at_ms.saturating_sub(self.last_release_ms) < self.config.delay_ms
            && self.last_origin.distance_to(release.origin) < self.config.radius
    }

    fn arm_if_tap(&mut self, release: &ReleaseInfo) {
        if release.travel() >= self.config.move_slop {
            // The finger dragged; scrolls never count as taps.
            log::trace!(
                "release travelled {:.1} >= slop {:.1}, not a tap",
                release.travel(),
                self.config.move_slop
            );
            return;
        }
        self.pending.push(PendingTap {
            location: release.location,
            deadline_ms: release.at_ms + self.config.delay_ms,
        });
    }

    fn finish(&mut self, release: &ReleaseInfo, emitted: Option<TapEvent>) -> Option<TapEvent> {
        self.last_origin = release.origin;
        self.last_release_ms = release.at_ms;
        emitted
    }
}
