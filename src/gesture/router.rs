//! Priority composition of the tap and pinch recognizers
//!
//! One raw touch stream feeds both recognizers under the rules: a single
//! touch is never pinch; at two or more touches pinch claims the whole
//! sequence and tap tracking for it is abandoned; an active pinch refuses
//! termination requests. Pinch and tap therefore never both fire for the
//! same touch sequence.

use super::pinch::PinchRecognizer;
use super::tap::{TapClassifier, TapConfig};
use super::touch::{GestureEvent, ReleaseInfo, TouchEvent, TouchPoint};

/// Routes raw touch frames into normalized gesture events.
#[derive(Debug)]
pub struct GestureRouter {
    tap: TapClassifier,
    pinch: PinchRecognizer,
    /// Touch-down position of the current single-touch sequence
    origin: Option<TouchPoint>,
    /// The current sequence has been claimed by pinch
    pinch_claimed: bool,
}

impl GestureRouter {
    #[must_use]
    pub fn new(tap_config: TapConfig) -> Self {
        Self {
            tap: TapClassifier::new(tap_config),
            pinch: PinchRecognizer::new(),
            origin: None,
            pinch_claimed: false,
        }
    }

    /// Process one touch frame, in arrival order.
    pub fn on_event(&mut self, event: &TouchEvent) -> Vec<GestureEvent> {
        let mut out = Vec::new();
        match event {
            TouchEvent::Down { touches, .. } => {
                if PinchRecognizer::wants(touches) {
                    self.claim_pinch(touches, &mut out);
                } else if let Some(first) = touches.first() {
                    if self.origin.is_none() {
                        self.origin = Some(*first);
                    }
                }
            }
            TouchEvent::Move { touches, .. } => {
                if self.pinch_claimed {
                    match self.pinch.on_move(touches) {
                        Ok(Some(update)) => out.push(GestureEvent::Pinch(update)),
                        Ok(None) => {}
                        Err(err) => {
                            // Transient platform inconsistency: reset to
                            // idle and drop the frame.
                            log::warn!("{err}, resetting pinch");
                            self.reset_pinch(&mut out);
                        }
                    }
                } else if PinchRecognizer::wants(touches) {
                    self.claim_pinch(touches, &mut out);
                }
            }
            TouchEvent::Up {
                location,
                touches,
                at_ms,
            } => {
                if self.pinch_claimed {
                    if touches.len() >= 2 {
                        // A third finger lifted; re-base on the survivors.
                        if let Err(err) = self.pinch.grant(touches) {
                            log::warn!("{err}, resetting pinch");
                            self.reset_pinch(&mut out);
                        }
                    } else {
                        self.reset_pinch(&mut out);
                    }
                } else if let Some(origin) = self.origin {
                    let release = ReleaseInfo {
                        location: *location,
                        origin,
                        translation: TouchPoint::new(
                            location.x - origin.x,
                            location.y - origin.y,
                        ),
                        at_ms: *at_ms,
                    };
                    if let Some(tap) = self.tap.on_release(&release) {
                        out.push(GestureEvent::Tap(tap));
                    }
                }
                if touches.is_empty() {
                    self.origin = None;
                    self.pinch_claimed = false;
                }
            }
            TouchEvent::Cancel => {
                if self.pinch_claimed {
                    self.reset_pinch(&mut out);
                }
                self.origin = None;
            }
        }
        out
    }

    /// Drain due timers (the delayed single tap).
    pub fn tick(&mut self, now_ms: u64) -> Vec<GestureEvent> {
        self.tap
            .tick(now_ms)
            .into_iter()
            .map(GestureEvent::Tap)
            .collect()
    }

    /// Whether a sibling recognizer may take the gesture over. Always
    /// refused while a pinch is in progress.
    #[must_use]
    pub fn allows_termination(&self) -> bool {
        !self.pinch.refuses_termination()
    }

    /// Detach hook: cancel outstanding timers and active gestures, no
    /// emissions.
    pub fn detach(&mut self) {
        self.tap.cancel();
        self.pinch.end();
        self.origin = None;
        self.pinch_claimed = false;
    }

    fn claim_pinch(&mut self, touches: &[TouchPoint], out: &mut Vec<GestureEvent>) {
        match self.pinch.grant(touches) {
            Ok(()) => {
                self.pinch_claimed = true;
                // Tap tracking for this sequence is abandoned; the
                // sequence can no longer end in a release for it.
                self.origin = None;
                out.push(GestureEvent::PinchBegan);
            }
            Err(err) => log::warn!("{err}, pinch not claimed"),
        }
    }

    fn reset_pinch(&mut self, out: &mut Vec<GestureEvent>) {
        self.pinch.end();
        if self.pinch_claimed {
            self.pinch_claimed = false;
            out.push(GestureEvent::PinchEnded);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::touch::TapEvent;

    fn down(points: &[(f32, f32)], at_ms: u64) -> TouchEvent {
        TouchEvent::Down {
            touches: points.iter().map(|&(x, y)| TouchPoint::new(x, y)).collect(),
            at_ms,
        }
    }

    fn moved(points: &[(f32, f32)], at_ms: u64) -> TouchEvent {
        TouchEvent::Move {
            touches: points.iter().map(|&(x, y)| TouchPoint::new(x, y)).collect(),
            at_ms,
        }
    }

    fn up(location: (f32, f32), remaining: &[(f32, f32)], at_ms: u64) -> TouchEvent {
        TouchEvent::Up {
            location: TouchPoint::new(location.0, location.1),
            touches: remaining.iter().map(|&(x, y)| TouchPoint::new(x, y)).collect(),
            at_ms,
        }
    }

    #[test]
    fn single_touch_sequence_resolves_to_tap_not_pinch() {
        let mut router = GestureRouter::new(TapConfig::default());

        assert!(router.on_event(&down(&[(50.0, 60.0)], 1_000)).is_empty());
        assert!(router.on_event(&up((50.0, 60.0), &[], 1_050)).is_empty());

        let fired = router.tick(1_350);
        assert_eq!(fired, vec![GestureEvent::Tap(TapEvent::Single { x: 50.0, y: 60.0 })]);
    }

    #[test]
    fn two_finger_sequence_pinches_and_never_taps() {
        let mut router = GestureRouter::new(TapConfig::default());

        router.on_event(&down(&[(100.0, 100.0)], 1_000));
        let events = router.on_event(&down(&[(100.0, 100.0), (300.0, 100.0)], 1_010));
        assert_eq!(events, vec![GestureEvent::PinchBegan]);
        assert!(!router.allows_termination());

        let events = router.on_event(&moved(&[(80.0, 100.0), (340.0, 100.0)], 1_020));
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], GestureEvent::Pinch(u) if u.scale > 1.05));

        let events = router.on_event(&up((80.0, 100.0), &[(340.0, 100.0)], 1_100));
        assert_eq!(events, vec![GestureEvent::PinchEnded]);
        assert!(router.allows_termination());

        // Final lift: no tap is synthesized for the claimed sequence.
        assert!(router.on_event(&up((340.0, 100.0), &[], 1_120)).is_empty());
        assert!(router.tick(2_000).is_empty());
    }

    #[test]
    fn pinch_claim_via_move_frame() {
        let mut router = GestureRouter::new(TapConfig::default());

        router.on_event(&down(&[(0.0, 0.0)], 1_000));
        let events = router.on_event(&moved(&[(0.0, 0.0), (200.0, 0.0)], 1_010));
        assert_eq!(events, vec![GestureEvent::PinchBegan]);
    }

    #[test]
    fn inconsistent_touch_state_resets_to_idle() {
        let mut router = GestureRouter::new(TapConfig::default());

        router.on_event(&down(&[(0.0, 0.0), (200.0, 0.0)], 1_000));
        // The platform reports a lone touch in a claimed pinch: repaired
        // by ending the pinch, not by panicking.
        let events = router.on_event(&TouchEvent::Move {
            touches: vec![TouchPoint::new(10.0, 0.0)],
            at_ms: 1_010,
        });
        assert_eq!(events, vec![GestureEvent::PinchEnded]);

        // The claimed sequence was abandoned for tap purposes too.
        let events = router.on_event(&up((10.0, 0.0), &[], 1_020));
        assert!(events.is_empty());
        assert!(router.tick(2_000).is_empty());
    }

    #[test]
    fn cancel_ends_active_pinch() {
        let mut router = GestureRouter::new(TapConfig::default());

        router.on_event(&down(&[(0.0, 0.0), (200.0, 0.0)], 1_000));
        let events = router.on_event(&TouchEvent::Cancel);
        assert_eq!(events, vec![GestureEvent::PinchEnded]);
        assert!(router.allows_termination());
    }

    #[test]
    fn detach_cancels_pending_single_tap() {
        let mut router = GestureRouter::new(TapConfig::default());

        router.on_event(&down(&[(50.0, 60.0)], 1_000));
        router.on_event(&up((50.0, 60.0), &[], 1_050));
        router.detach();
        assert!(router.tick(2_000).is_empty());
    }

    #[test]
    fn dragged_single_touch_is_a_scroll_not_a_tap() {
        let mut router = GestureRouter::new(TapConfig::default());

        router.on_event(&down(&[(100.0, 100.0)], 1_000));
        router.on_event(&moved(&[(100.0, 150.0)], 1_020));
        assert!(router.on_event(&up((100.0, 200.0), &[], 1_050)).is_empty());
        assert!(router.tick(2_000).is_empty());
    }
}
