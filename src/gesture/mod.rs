pub mod pinch;
pub mod router;
pub mod tap;
pub mod touch;

pub use pinch::PinchRecognizer;
pub use router::GestureRouter;
pub use tap::{TapClassifier, TapConfig};
pub use touch::{GestureEvent, PinchUpdate, ReleaseInfo, TapEvent, TouchEvent, TouchPoint};
