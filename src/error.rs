//! Error taxonomy for the viewer core

/// Errors surfaced by the viewer core.
///
/// Loader and bridge failures reach the host through the event stream;
/// gesture and layout inconsistencies are repaired in place and only show
/// up here at API boundaries.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// Caller passed a value outside the API contract
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The document loader collaborator failed; detail is verbatim
    #[error("document load failed: {0}")]
    Load(String),

    /// A native bridge message could not be parsed
    #[error("malformed bridge message: {0}")]
    MessageParse(String),

    /// Touch bookkeeping disagreed with the platform event stream
    #[error("inconsistent gesture state: {0}")]
    GestureState(String),
}

impl ViewerError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn message_parse(msg: impl Into<String>) -> Self {
        Self::MessageParse(msg.into())
    }

    pub fn gesture_state(msg: impl Into<String>) -> Self {
        Self::GestureState(msg.into())
    }
}
