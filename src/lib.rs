//! folioview: the interactive core of a PDF viewer component.
//!
//! Touch streams go in, typed viewer events come out. The crate owns
//! gesture recognition (tap/double-tap, pinch), the virtualized paged
//! scroll/zoom layout, and the document controller; rasterization,
//! downloading, and platform view embedding stay behind trait seams.

pub mod controller;
pub mod error;
pub mod gesture;
pub mod layout;

pub use controller::loader::{DocumentHandle, DocumentInfo, DocumentLoader};
pub use controller::navigation::{NavigationRequest, RenderBackend};
pub use controller::toc::{TocEntry, TocPayload};
pub use controller::{PdfController, PdfProps, ViewerEvent};
pub use error::ViewerError;
pub use gesture::{GestureEvent, TapConfig, TouchEvent, TouchPoint};
pub use layout::{FitPolicy, Point, Size, ViewabilityConfig, VisibleSlot};
