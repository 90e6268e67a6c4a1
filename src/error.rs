//! Error types

use thiserror::Error;

/// Reasons a controller operation could not run.
///
/// These never reach the host: the public event methods skip the operation
/// and the host re-delivers events once layout and image loading complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("no image has been assigned")]
    UninitializedImage,
    #[error("viewport has not been laid out")]
    UninitializedViewport,
}

/// Failure to read a [`ZoomConfig`](crate::config::ZoomConfig) from JSON
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid zoom config: {0}")]
    Json(#[from] serde_json::Error),
}
