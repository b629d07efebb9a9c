//! Pinch recognition over raw multi-touch frames
//!
//! Tracks the separation of the first two touches and emits incremental
//! scale ratios. Each emission re-bases the reference distance, so
//! consumers integrate the deltas into their own absolute scale and apply
//! their own clamping; the recognizer never learns the view's zoom level.

use crate::error::ViewerError;

use super::touch::{PinchUpdate, TouchPoint};

/// Minimum two-finger spread before scale deltas are produced. Nearly
/// coincident fingers would amplify sensor noise into zoom jitter.
pub const MIN_SPREAD: f32 = 100.0;

/// Per-frame ratio bounds, limiting zoom velocity.
const MAX_STEP: f32 = 1.1;
const MIN_STEP: f32 = 0.9;

/// Dead zone around 1.0; ratios inside it are finger tremor, not intent.
const DEAD_ZONE_HI: f32 = 1.05;
const DEAD_ZONE_LO: f32 = 0.95;

/// Per-instance pinch state. A reference distance of zero means no
/// active pinch.
#[derive(Debug, Default)]
pub struct PinchRecognizer {
    reference_distance: f32,
}

impl PinchRecognizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the recognizer should claim a touch set. A single touch
    /// is always left to tap/scroll handling.
    #[must_use]
    pub fn wants(touches: &[TouchPoint]) -> bool {
        touches.len() >= 2
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.reference_distance > 0.0
    }

    /// Sibling recognizers may not preempt an active pinch.
    #[must_use]
    pub fn refuses_termination(&self) -> bool {
        self.is_active()
    }

    /// Claim the gesture: record the current two-finger spread as the
    /// zoom baseline. No scale delta is emitted yet.
    pub fn grant(&mut self, touches: &[TouchPoint]) -> Result<(), ViewerError> {
        let (a, b) = first_two(touches)?;
        self.reference_distance = a.distance_to(b);
        Ok(())
    }

    /// Process a move frame while the gesture is claimed.
    pub fn on_move(&mut self, touches: &[TouchPoint]) -> Result<Option<PinchUpdate>, ViewerError> {
        let (a, b) = first_two(touches)?;
        if self.reference_distance <= MIN_SPREAD {
            return Ok(None);
        }

        let distance = a.distance_to(b);
        let scale = (distance / self.reference_distance).clamp(MIN_STEP, MAX_STEP);
        if scale <= DEAD_ZONE_HI && scale >= DEAD_ZONE_LO {
            return Ok(None);
        }

        // Re-base so the next emission is relative to this frame.
        self.reference_distance = distance;
        let focal = a.midpoint(b);
        Ok(Some(PinchUpdate {
            scale,
            focal_x: focal.x,
            focal_y: focal.y,
        }))
    }

    /// Release or termination: back to idle.
    pub fn end(&mut self) {
        self.reference_distance = 0.0;
    }
}

fn first_two(touches: &[TouchPoint]) -> Result<(TouchPoint, TouchPoint), ViewerError> {
    match touches {
        [a, b, ..] => Ok((*a, *b)),
        _ => Err(ViewerError::gesture_state(format!(
            "pinch expected >=2 touches, got {}",
            touches.len()
        ))),
    }
}
