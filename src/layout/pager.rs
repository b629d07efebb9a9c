//! Virtualized paged scroll/zoom view
//!
//! A state machine over N page slots along one axis. Commands arrive from
//! the gesture router, the host's props, and the virtualization layer;
//! effects tell the embedder what to do (scroll somewhere, report a page
//! change). Wall-clock time is always passed in, never read.

use serde::{Deserialize, Serialize};

use crate::gesture::PinchUpdate;

use super::fit::{FitPolicy, page_size};
use super::viewport::ViewportState;
use super::{Point, Size};

/// Zoom factor applied by a double tap below the maximum scale.
const DOUBLE_TAP_ZOOM_STEP: f32 = 1.2;

/// Scroll stays disabled this long after the last scale change, so the
/// virtualization layer cannot fight the zoom-driven relayout.
const SCROLL_SETTLE_MS: u64 = 1_000;

/// Programmatic page navigation waits this long for layout to settle.
const PAGE_NAV_DEBOUNCE_MS: u64 = 200;

fn default_min_visible_fraction() -> f32 {
    0.1
}

fn default_min_dwell_ms() -> u64 {
    500
}

/// Thresholds for deciding the "current page" from visibility reports.
///
/// Historical deployments used both 10% and 60% visibility thresholds;
/// neither is hard-coded here.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ViewabilityConfig {
    /// Fraction of a slot's area that must be visible
    #[serde(default = "default_min_visible_fraction")]
    pub min_visible_fraction: f32,

    /// How long a slot must stay visible before it becomes current
    #[serde(default = "default_min_dwell_ms")]
    pub min_dwell_ms: u64,
}

impl Default for ViewabilityConfig {
    fn default() -> Self {
        Self {
            min_visible_fraction: default_min_visible_fraction(),
            min_dwell_ms: default_min_dwell_ms(),
        }
    }
}

/// Static configuration of the paged view.
#[derive(Clone, Debug)]
pub struct PagerConfig {
    pub fit_policy: FitPolicy,
    pub horizontal: bool,
    pub spacing: f32,
    pub single_page: bool,
    pub min_scale: f32,
    pub max_scale: f32,
    pub viewability: ViewabilityConfig,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            fit_policy: FitPolicy::default(),
            horizontal: false,
            spacing: 10.0,
            single_page: false,
            min_scale: 1.0,
            max_scale: 3.0,
            viewability: ViewabilityConfig::default(),
        }
    }
}

/// One entry of a visibility report from the virtualization layer.
#[derive(Clone, Copy, Debug)]
pub struct VisibleSlot {
    pub index: usize,
    pub visible_fraction: f32,
}

/// Inputs to the paged view.
#[derive(Clone, Debug)]
pub enum PagerCommand {
    /// The view was laid out at a new size
    SetLayout(Size),
    /// A document finished loading
    SetDocument { page_count: usize, aspect_ratio: f32 },
    /// Controlled scale prop changed; applied as a ratio to the current
    /// scale, anchored at the viewport center
    SetScaleProp(f32),
    /// Controlled page prop changed (0-based slot index)
    SetPageProp(usize),
    /// The virtualization layer reported a scroll position
    Scroll(Point),
    /// A pinch step from the gesture router
    Pinch(PinchUpdate),
    /// A double tap anywhere in the view
    DoubleTap,
    /// A resolved single tap at view coordinates
    SingleTap { x: f32, y: f32 },
    /// Visibility report from the virtualization layer
    Viewability(Vec<VisibleSlot>),
}

/// Outputs of the paged view, for the embedder to act on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PagerEffect {
    ScaleChanged(f32),
    /// De-duplicated; `page` is 1-based
    PageChanged { page: usize, total: usize },
    PageSingleTap { page: usize, x: f32, y: f32 },
    /// Drive the scroll position to keep the zoom anchor
    ScrollToOffset(Point),
    /// Drive the list to a slot (programmatic navigation)
    ScrollToIndex(usize),
}

/// Extent and offset of one slot along the scroll axis, the shape the
/// virtualization layer wants for item layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotLayout {
    pub length: f32,
    pub offset: f32,
}

/// The paged scroll/zoom view.
#[derive(Debug)]
pub struct PagedScrollView {
    config: PagerConfig,
    viewport: ViewportState,
    page_count: usize,
    aspect_ratio: f32,
    /// Current slot (0-based); `None` until the first stable report
    current_slot: Option<usize>,
    /// Candidate slot and when it first became visible enough
    dwell: Option<(usize, u64)>,
    scroll_enabled: bool,
    scroll_unlock_at_ms: Option<u64>,
    /// Debounced programmatic navigation target
    pending_index: Option<(usize, u64)>,
}

impl PagedScrollView {
    #[must_use]
    pub fn new(config: PagerConfig) -> Self {
        let viewport = ViewportState::new(config.min_scale, config.max_scale);
        Self {
            config,
            viewport,
            page_count: 0,
            aspect_ratio: 1.0,
            current_slot: None,
            dwell: None,
            scroll_enabled: true,
            scroll_unlock_at_ms: None,
            pending_index: None,
        }
    }

    #[must_use]
    pub fn scale(&self) -> f32 {
        self.viewport.scale()
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    #[must_use]
    pub fn current_slot(&self) -> Option<usize> {
        self.current_slot
    }

    #[must_use]
    pub fn scroll_enabled(&self) -> bool {
        self.scroll_enabled
    }

    #[must_use]
    pub fn content_offset(&self) -> Point {
        self.viewport.content_offset()
    }

    /// Apply one command and return the resulting effects.
    pub fn apply(&mut self, cmd: PagerCommand, now_ms: u64) -> Vec<PagerEffect> {
        match cmd {
            PagerCommand::SetLayout(size) => {
                self.viewport.set_viewport_size(size);
                Vec::new()
            }

            PagerCommand::SetDocument {
                page_count,
                aspect_ratio,
            } => {
                self.page_count = page_count;
                self.aspect_ratio = if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
                    aspect_ratio
                } else {
                    1.0
                };
                self.current_slot = None;
                self.dwell = None;
                if let Some((index, due)) = self.pending_index {
                    self.pending_index =
                        Some((index.min(page_count.saturating_sub(1)), due));
                }
                Vec::new()
            }

            PagerCommand::SetScaleProp(scale) => {
                let current = self.viewport.scale();
                if current <= 0.0 {
                    return Vec::new();
                }
                self.zoom(scale / current, self.viewport_center(), now_ms)
            }

            PagerCommand::SetPageProp(index) => {
                if self.page_count == 0 {
                    return Vec::new();
                }
                let index = index.min(self.page_count - 1);
                self.pending_index = Some((index, now_ms + PAGE_NAV_DEBOUNCE_MS));
                Vec::new()
            }

            PagerCommand::Scroll(offset) => {
                // Ignored while a scale change is settling; the viewport
                // offset is authoritative until scroll re-enables.
                if self.scroll_enabled {
                    self.viewport.observe_scroll(offset);
                }
                Vec::new()
            }

            PagerCommand::Pinch(update) => self.zoom(
                update.scale,
                Point::new(update.focal_x, update.focal_y),
                now_ms,
            ),

            PagerCommand::DoubleTap => {
                let scale = self.viewport.scale();
                let factor = if scale >= self.viewport.max_scale() {
                    // Toggle back out once fully zoomed in.
                    self.viewport.min_scale() / scale
                } else {
                    DOUBLE_TAP_ZOOM_STEP
                };
                self.zoom(factor, self.viewport_center(), now_ms)
            }

            PagerCommand::SingleTap { x, y } => match self.slot_at(Point::new(x, y)) {
                Some(slot) => vec![PagerEffect::PageSingleTap {
                    page: slot + 1,
                    x,
                    y,
                }],
                None => Vec::new(),
            },

            PagerCommand::Viewability(slots) => self.on_viewability(&slots, now_ms),
        }
    }

    /// Drain due deadlines: scroll re-enable and debounced navigation.
    pub fn tick(&mut self, now_ms: u64) -> Vec<PagerEffect> {
        let mut effects = Vec::new();

        if let Some(due) = self.scroll_unlock_at_ms {
            if now_ms >= due {
                self.scroll_unlock_at_ms = None;
                self.scroll_enabled = true;
                // Re-home after the relayout committed, in case the
                // virtualization layer moved under the lock.
                effects.push(PagerEffect::ScrollToOffset(self.viewport.content_offset()));
            }
        }

        if let Some((index, due)) = self.pending_index {
            if now_ms >= due {
                self.pending_index = None;
                effects.push(PagerEffect::ScrollToIndex(index));
            }
        }

        effects
    }

    /// Size of one page slot under the current viewport and scale.
    #[must_use]
    pub fn page_slot_size(&self) -> Size {
        page_size(
            self.config.fit_policy,
            self.viewport.viewport_size(),
            self.aspect_ratio,
            self.viewport.scale(),
            self.config.single_page || self.page_count == 1,
        )
    }

    /// Item layout for the virtualization layer: slot extent and offset
    /// along the scroll axis, separators included.
    #[must_use]
    pub fn slot_layout(&self, index: usize) -> SlotLayout {
        SlotLayout {
            length: self.slot_extent(),
            offset: self.slot_stride() * index as f32,
        }
    }

    /// Total scrollable extent along the axis.
    #[must_use]
    pub fn content_extent(&self) -> f32 {
        if self.page_count == 0 {
            return 0.0;
        }
        self.slot_stride() * self.page_count as f32 - self.separator_extent()
    }

    /// The slot under a view coordinate, given the current scroll offset.
    #[must_use]
    pub fn slot_at(&self, view_point: Point) -> Option<usize> {
        if self.page_count == 0 {
            return None;
        }
        let stride = self.slot_stride();
        if stride <= 0.0 {
            return None;
        }
        let offset = self.viewport.content_offset();
        let along = if self.config.horizontal {
            view_point.x + offset.x
        } else {
            view_point.y + offset.y
        };
        let slot = (along.max(0.0) / stride) as usize;
        Some(slot.min(self.page_count - 1))
    }

    fn zoom(&mut self, factor: f32, focal: Point, now_ms: u64) -> Vec<PagerEffect> {
        let Some(scale) = self.viewport.zoom_around(factor, focal) else {
            return Vec::new();
        };

        let mut effects = vec![PagerEffect::ScaleChanged(scale)];
        if let Some(offset) = self.viewport.take_pending_offset() {
            effects.push(PagerEffect::ScrollToOffset(offset));
        }

        self.scroll_enabled = false;
        self.scroll_unlock_at_ms = Some(now_ms + SCROLL_SETTLE_MS);
        effects
    }

    fn on_viewability(&mut self, slots: &[VisibleSlot], now_ms: u64) -> Vec<PagerEffect> {
        // Topmost slot that clears the visibility threshold.
        let candidate = slots
            .iter()
            .filter(|slot| slot.visible_fraction >= self.config.viewability.min_visible_fraction)
            .map(|slot| slot.index)
            .min();
        let Some(candidate) = candidate else {
            return Vec::new();
        };

        let since = match self.dwell {
            Some((index, since)) if index == candidate => since,
            _ => {
                self.dwell = Some((candidate, now_ms));
                now_ms
            }
        };

        if now_ms.saturating_sub(since) >= self.config.viewability.min_dwell_ms
            && self.current_slot != Some(candidate)
        {
            self.current_slot = Some(candidate);
            return vec![PagerEffect::PageChanged {
                page: candidate + 1,
                total: self.page_count,
            }];
        }
        Vec::new()
    }

    fn viewport_center(&self) -> Point {
        let size = self.viewport.viewport_size();
        Point::new(size.width / 2.0, size.height / 2.0)
    }

    fn slot_extent(&self) -> f32 {
        let size = self.page_slot_size();
        if self.config.horizontal {
            size.width
        } else {
            size.height
        }
    }

    fn separator_extent(&self) -> f32 {
        self.config.spacing * self.viewport.scale()
    }

    fn slot_stride(&self) -> f32 {
        self.slot_extent() + self.separator_extent()
    }
}
