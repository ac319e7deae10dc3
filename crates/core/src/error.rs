// Central Error Type for the coordination library

use std::time::Duration;
use thiserror::Error;

/// Library-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// A worker body panicked; the panic payload is surfaced through the
    /// supervised handle instead of vanishing with a detached thread.
    #[error("worker '{worker}' panicked: {message}")]
    WorkerPanicked { worker: String, message: String },

    /// The worker task was cancelled by the runtime before completing.
    #[error("worker '{worker}' was aborted before completing")]
    WorkerAborted { worker: String },

    /// Workers failed to drain within the configured bound.
    #[error("shutdown timed out after {waited:?} with {live} workers still live")]
    ShutdownTimedOut { waited: Duration, live: usize },

    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
