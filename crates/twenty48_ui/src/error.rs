//! # Animation Error Types

use thiserror::Error;

/// Errors raised by animation callbacks.
///
/// The scheduler never propagates these; it records them in the tick report
/// and drops the animation that raised them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnimationError {
    /// The visual element the animation drives no longer exists.
    #[error("animation target {0} no longer exists")]
    TargetGone(String),

    /// The callback failed for any other reason.
    #[error("animation callback failed: {0}")]
    Callback(String),
}

/// Result type for animation callbacks.
pub type AnimationResult<T> = Result<T, AnimationError>;
