//! Error types for ochre

use thiserror::Error;

/// Result type alias for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;

/// Editor error types
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No file name")]
    NoFileName,

    #[error("Operation aborted")]
    Aborted,

    #[error("{0}")]
    Message(String),
}
