//! Error types for the sheet/sprite/frame model.

use thiserror::Error;

/// Errors raised by the bitmap model and its serialization.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum XbmError {
    /// A caller broke a structural rule of the model (bad buffer length,
    /// zero-sized bitmap, removing something that is not a member, ...).
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// Pixel coordinate outside the bitmap.
    #[error("pixel ({x}, {y}) is outside the {width}x{height} bitmap")]
    OutOfRange { x: u32, y: u32, width: u32, height: u32 },

    /// A sprite entry of a sheet document could not be turned into a sprite.
    #[error("sprite #{index}: {message}")]
    Deserialization { index: usize, message: String },

    /// The sheet document is not valid JSON or not shaped like a sheet.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding error
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl XbmError {
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        XbmError::InvariantViolation(message.into())
    }

    pub(crate) fn deserialization(index: usize, message: impl Into<String>) -> Self {
        XbmError::Deserialization { index, message: message.into() }
    }
}

/// Result alias used throughout the model.
pub type Result<T> = std::result::Result<T, XbmError>;
