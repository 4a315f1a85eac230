//! Share flow error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from capturing, encoding, opening or saving a share.
#[derive(Debug, Error)]
pub enum ShareError {
    #[error("Failed to capture the timer display: {0}")]
    Capture(String),

    #[error("Failed to encode screenshot: {0}")]
    Encode(String),

    #[error("Failed to open {url}: {reason}")]
    Open { url: String, reason: String },

    #[error("Failed to save screenshot to {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("There is no screenshot to save")]
    NothingToSave,
}

/// Why an image could not be placed on the clipboard.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// No clipboard is reachable from this session.
    #[error("Clipboard is not available: {0}")]
    Unsupported(String),

    /// The clipboard refused the image.
    #[error("Clipboard rejected the image: {0}")]
    Rejected(String),
}
