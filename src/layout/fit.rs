//! Page-fit sizing policy
//!
//! Pure function of the viewport box, the document's page aspect ratio,
//! and the current zoom. Single-page documents always fill the viewport
//! regardless of the configured policy.

use serde::{Deserialize, Serialize};

use super::Size;

/// How a page's on-screen size is derived from the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitPolicy {
    /// Page width matches the viewport width
    FitWidth,
    /// Page height matches the viewport height
    FitHeight,
    /// Whichever axis keeps the whole page inside the viewport
    #[default]
    FitBoth,
}

impl FitPolicy {
    /// Wire values used by the host-facing prop (0/1/2).
    #[must_use]
    pub fn from_wire(value: u8) -> Self {
        match value {
            0 => Self::FitWidth,
            1 => Self::FitHeight,
            _ => Self::FitBoth,
        }
    }

    #[must_use]
    pub fn as_wire(self) -> u8 {
        match self {
            Self::FitWidth => 0,
            Self::FitHeight => 1,
            Self::FitBoth => 2,
        }
    }
}

/// Compute a page slot's size.
///
/// `aspect_ratio` is page width over height; degenerate values are
/// repaired to 1. With `single_page` set (or a one-page document) the
/// slot fills the viewport box so the whole page stays centered.
#[must_use]
pub fn page_size(
    policy: FitPolicy,
    viewport: Size,
    aspect_ratio: f32,
    scale: f32,
    single_page: bool,
) -> Size {
    if single_page {
        return Size::new(viewport.width * scale, viewport.height * scale);
    }

    let aspect = if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
        aspect_ratio
    } else {
        1.0
    };

    match policy {
        FitPolicy::FitWidth => Size::new(viewport.width * scale, viewport.width / aspect * scale),
        FitPolicy::FitHeight => {
            Size::new(viewport.height * aspect * scale, viewport.height * scale)
        }
        FitPolicy::FitBoth => {
            if viewport.aspect_ratio() > aspect {
                // Viewport is wider than the page: height constrains.
                Size::new(viewport.height * scale * aspect, viewport.height * scale)
            } else {
                Size::new(viewport.width * scale, viewport.width / aspect * scale)
            }
        }
    }
}
