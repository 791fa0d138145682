//! Error types shared across the whiteboard core.

use thiserror::Error;

/// Whiteboard errors.
///
/// Undo or redo with an empty history is not an error; those calls return
/// `false` instead.
#[derive(Debug, Error)]
pub enum WhiteboardError {
    /// A page background could not be read, decoded, or has no usable size.
    #[error("Failed to load image {image}: {reason}")]
    ImageLoad { image: String, reason: String },
    /// The container that should host the surfaces does not exist.
    #[error("Mount target not found: {0}")]
    MissingMountTarget(String),
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WhiteboardError {
    pub(crate) fn image_load(image: impl Into<String>, reason: impl ToString) -> Self {
        Self::ImageLoad {
            image: image.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for whiteboard operations.
pub type Result<T> = std::result::Result<T, WhiteboardError>;
