//! Page layout: fit policies, viewport transforms, and the paged view

pub mod fit;
pub mod pager;
pub mod viewport;

pub use fit::{FitPolicy, page_size};
pub use pager::{
    PagedScrollView, PagerCommand, PagerConfig, PagerEffect, ViewabilityConfig, VisibleSlot,
};
pub use viewport::ViewportState;

/// A point in content or view coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A box size in view coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width over height; the shape a page is fitted against.
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        if self.height <= 0.0 || !self.height.is_finite() {
            1.0
        } else {
            self.width / self.height
        }
    }
}
