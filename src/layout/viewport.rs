//! Viewport scale and offset state
//!
//! Owns the clamped zoom factor and the content offset, and implements
//! the anchor-preserving zoom transform: the content point under the
//! pinch focal coordinate must not appear to jump across a scale change.

use super::{Point, Size};

/// Scale and scroll state for the paged view.
#[derive(Debug)]
pub struct ViewportState {
    scale: f32,
    min_scale: f32,
    max_scale: f32,
    content_offset: Point,
    viewport_size: Size,
    /// Offset the view must be driven back to after a scale-driven
    /// relayout commits, or the visual anchor breaks.
    pending_offset: Option<Point>,
}

impl ViewportState {
    #[must_use]
    pub fn new(min_scale: f32, max_scale: f32) -> Self {
        let min_scale = sanitize(min_scale, 1.0).max(0.01);
        let max_scale = sanitize(max_scale, 3.0).max(min_scale);
        Self {
            scale: 1.0f32.clamp(min_scale, max_scale),
            min_scale,
            max_scale,
            content_offset: Point::default(),
            viewport_size: Size::default(),
            pending_offset: None,
        }
    }

    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[must_use]
    pub fn min_scale(&self) -> f32 {
        self.min_scale
    }

    #[must_use]
    pub fn max_scale(&self) -> f32 {
        self.max_scale
    }

    #[must_use]
    pub fn content_offset(&self) -> Point {
        self.content_offset
    }

    #[must_use]
    pub fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport_size = size;
    }

    /// Record the scroll position reported by the virtualization layer.
    pub fn observe_scroll(&mut self, offset: Point) {
        self.content_offset = offset;
    }

    /// Apply an incremental zoom factor anchored at `focal` (view
    /// coordinates). Returns the new scale, or `None` when the clamped
    /// scale did not change (already saturated at a bound).
    ///
    /// The offset transform keeps the anchored content point fixed:
    /// `new_offset = (old_offset + focal) * (new_scale / old_scale) - focal`
    /// independently per axis.
    pub fn zoom_around(&mut self, factor: f32, focal: Point) -> Option<f32> {
        let factor = sanitize(factor, 1.0);
        let target = (self.scale * factor).clamp(self.min_scale, self.max_scale);
        if (target - self.scale).abs() < f32::EPSILON {
            log::trace!("zoom saturated at {:.3}", self.scale);
            return None;
        }

        let ratio = target / self.scale;
        let offset = Point::new(
            (self.content_offset.x + focal.x) * ratio - focal.x,
            (self.content_offset.y + focal.y) * ratio - focal.y,
        );

        self.scale = target;
        self.content_offset = offset;
        self.pending_offset = Some(offset);
        Some(target)
    }

    /// Take the offset the view must be scrolled to after relayout.
    pub fn take_pending_offset(&mut self) -> Option<Point> {
        self.pending_offset.take()
    }
}

/// Non-finite zoom factors are repaired rather than propagated.
fn sanitize(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_stays_within_bounds_for_any_delta_sequence() {
        let mut viewport = ViewportState::new(1.0, 3.0);

        // Zoom in far past the maximum.
        for _ in 0..40 {
            viewport.zoom_around(1.1, Point::new(100.0, 100.0));
        }
        assert_eq!(viewport.scale(), 3.0);

        // And back out far past the minimum.
        for _ in 0..40 {
            viewport.zoom_around(0.9, Point::new(100.0, 100.0));
        }
        assert_eq!(viewport.scale(), 1.0);
    }

    #[test]
    fn saturated_zoom_reports_no_change() {
        let mut viewport = ViewportState::new(1.0, 3.0);
        assert_eq!(viewport.zoom_around(0.9, Point::default()), None);
        assert!(viewport.take_pending_offset().is_none());
    }

    #[test]
    fn focal_point_stays_stationary_across_zoom() {
        let mut viewport = ViewportState::new(1.0, 4.0);
        viewport.observe_scroll(Point::new(120.0, 340.0));

        let focal = Point::new(80.0, 200.0);
        let old_scale = viewport.scale();
        let old_offset = viewport.content_offset();

        // The content coordinate rendered at the focal point before.
        let content_x = (old_offset.x + focal.x) / old_scale;
        let content_y = (old_offset.y + focal.y) / old_scale;

        let new_scale = viewport.zoom_around(1.1, focal).unwrap();
        let new_offset = viewport.take_pending_offset().unwrap();

        // The same content coordinate maps back to the focal point.
        let screen_x = content_x * new_scale - new_offset.x;
        let screen_y = content_y * new_scale - new_offset.y;
        assert!((screen_x - focal.x).abs() < 1e-3);
        assert!((screen_y - focal.y).abs() < 1e-3);
    }

    #[test]
    fn anchor_holds_through_a_whole_pinch_sequence() {
        let mut viewport = ViewportState::new(1.0, 3.0);
        viewport.observe_scroll(Point::new(50.0, 75.0));
        let focal = Point::new(160.0, 240.0);

        let content_y = (viewport.content_offset().y + focal.y) / viewport.scale();
        for factor in [1.08, 1.1, 0.92, 1.06] {
            viewport.zoom_around(factor, focal);
        }
        let offset = viewport.content_offset();
        let screen_y = content_y * viewport.scale() - offset.y;
        assert!((screen_y - focal.y).abs() < 1e-3);
    }

    #[test]
    fn partial_clamp_still_anchors_correctly() {
        let mut viewport = ViewportState::new(1.0, 3.0);
        viewport.observe_scroll(Point::new(10.0, 20.0));
        // Request 2.8 -> 3.08, clamped to 3.0; the offset must use the
        // effective ratio, not the requested one.
        for _ in 0..12 {
            viewport.zoom_around(1.1, Point::new(100.0, 100.0));
        }
        assert_eq!(viewport.scale(), 3.0);
        let offset = viewport.content_offset();
        assert!(offset.x.is_finite() && offset.y.is_finite());
    }

    #[test]
    fn non_finite_factor_is_repaired() {
        let mut viewport = ViewportState::new(1.0, 3.0);
        assert_eq!(viewport.zoom_around(f32::NAN, Point::default()), None);
        assert_eq!(viewport.scale(), 1.0);
    }

    #[test]
    fn inverted_bounds_are_repaired_at_construction() {
        let viewport = ViewportState::new(2.0, 0.5);
        assert!(viewport.max_scale() >= viewport.min_scale());
        assert!(viewport.scale() >= viewport.min_scale());
        assert!(viewport.scale() <= viewport.max_scale());
    }
}
