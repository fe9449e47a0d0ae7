//! Error types for ssd-decode.

use thiserror::Error;

/// Result alias for decoder operations.
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Errors that can occur when configuring or running the decoder.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// The configured input box format is not supported.
    #[error("unsupported box format {format:?}: only centroids are supported")]
    UnsupportedFormat {
        /// Name of the rejected format.
        format: &'static str,
    },
    /// Coordinate normalization was requested without both image dimensions.
    #[error(
        "normalize_coords requires img_height and img_width (got img_height={img_height:?}, img_width={img_width:?})"
    )]
    MissingImageSize {
        /// Configured image height, if any.
        img_height: Option<f32>,
        /// Configured image width, if any.
        img_width: Option<f32>,
    },
    /// A numeric option lies outside its documented domain.
    #[error("{option} = {value} is out of range, expected {expected}")]
    OutOfRange {
        /// Name of the offending option.
        option: &'static str,
        /// Rejected value.
        value: f64,
        /// Human-readable description of the valid domain.
        expected: &'static str,
    },
    /// The input tensor does not have the expected rank.
    #[error("tensor rank mismatch: expected {expected}, got {got}")]
    RankMismatch {
        /// Required rank.
        expected: usize,
        /// Rank of the provided shape.
        got: usize,
    },
    /// The last tensor axis does not match `n_classes + 12`.
    #[error("record length mismatch: expected {expected} values per box, got {got}")]
    ShapeMismatch {
        /// Configured `n_classes + 12`.
        expected: usize,
        /// Last axis of the input.
        got: usize,
    },
    /// The backing buffer length does not match the tensor shape.
    #[error("buffer length mismatch: shape needs {expected} values, got {got}")]
    BufferLengthMismatch {
        /// Product of the shape.
        expected: usize,
        /// Length of the provided buffer.
        got: usize,
    },
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}

impl DecodeError {
    /// Returns true for errors raised while validating a configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFormat { .. } | Self::MissingImageSize { .. } | Self::OutOfRange { .. }
        )
    }
}
