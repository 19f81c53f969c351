//! Scene error types

use thiserror::Error;

/// Scene-related errors
#[derive(Error, Debug, PartialEq)]
pub enum SceneError {
    /// `over`/`with_ease` called with no keyframe to extend
    #[error("timeline has no keyframes to extend; append wait/move/move_position first")]
    EmptyTimeline,

    /// Text selection range is non-finite, out of bounds, or inverted
    #[error("invalid selection range: {0}")]
    InvalidSelection(String),
}

/// Result type for scene operations
pub type Result<T> = std::result::Result<T, SceneError>;
