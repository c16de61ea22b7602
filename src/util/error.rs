//! Error types for bubblegrid.

use thiserror::Error;

/// Result alias for bubblegrid operations.
pub type BubbleGridResult<T> = std::result::Result<T, BubbleGridError>;

/// Errors that can occur when running the detection engine.
///
/// Detection outcomes such as "no circles found" are not errors; only caller
/// contract violations end up here.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BubbleGridError {
    /// The pixel buffer length does not match the declared dimensions.
    #[error("buffer size mismatch: expected {expected} bytes, got {got}")]
    BufferSizeMismatch { expected: usize, got: usize },
    /// The declared dimensions overflow the addressable pixel count.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// A configuration value is out of its valid range.
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },
    /// Image decoding failed (only produced by the `image-io` helpers).
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
}
