//! Error types for convolver.
//!
//! Uses thiserror for structured errors with context. The taxonomy follows
//! the three failure classes of the engine:
//! - Configuration errors are detected eagerly, before any computation starts
//! - Resource errors abort the current apply call as a whole
//! - Execution errors abort the current apply call as a whole
//!
//! A failed apply never replaces the engine's current image, so the caller
//! can always save the last successfully produced buffer or exit cleanly.

use thiserror::Error;

/// Configuration errors, surfaced at construction or selection time.
///
/// These are never retried: the input itself is invalid and recomputing
/// would fail the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("kernel dimension must be odd, got {dim}")]
    EvenKernelDimension { dim: usize },

    #[error("kernel of dimension {dim} requires {expected} weights, got {got}")]
    WeightCountMismatch {
        dim: usize,
        expected: usize,
        got: usize,
    },

    #[error("kernel with {weights} weights does not fit the constant region (capacity {capacity})")]
    KernelTooLarge { weights: usize, capacity: usize },

    #[error("\"{token}\" is not a valid filter type")]
    UnknownFilter { token: String },

    #[error("\"{token}\" is not a valid execution mode")]
    UnknownMode { token: String },

    #[error("unsupported channel count {channels}: expected 1, 3, or 4")]
    UnsupportedChannels { channels: usize },

    #[error("image dimensions must be non-zero, got {width}x{height}")]
    EmptyImage { width: usize, height: usize },

    #[error("image dimensions {width}x{height}x{channels} overflow the sample index space")]
    DimensionOverflow {
        width: usize,
        height: usize,
        channels: usize,
    },

    #[error("buffer of {got} samples does not match {width}x{height}x{channels} = {expected}")]
    BufferSizeMismatch {
        width: usize,
        height: usize,
        channels: usize,
        expected: usize,
        got: usize,
    },
}

/// Device/memory resource failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("failed to allocate {bytes} bytes for the output buffer")]
    AllocationFailed { bytes: usize },
}

/// Failures of a strategy mid-computation.
///
/// Any partially written output is discarded by the engine; an execution
/// error never leaks a half-processed buffer to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    #[error("strategy produced a {got}-sample buffer for a {expected}-sample image")]
    OutputSizeMismatch { expected: usize, got: usize },

    #[error("{0}")]
    Other(String),
}

/// Top-level error type for convolver.
///
/// This enum encompasses all error categories and enables automatic
/// conversion between specific error types.
#[derive(Error, Debug)]
pub enum ConvolveError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("execution error: {0}")]
    Execution(#[from] ExecError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl ConvolveError {
    /// Check if this error is a configuration problem the caller can fix
    /// by choosing different inputs, as opposed to a runtime failure.
    pub fn is_config(&self) -> bool {
        matches!(self, ConvolveError::Config(_))
    }
}

/// Result type alias for convolver operations.
pub type ConvolveResult<T> = Result<T, ConvolveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::EvenKernelDimension { dim: 4 };
        assert!(err.to_string().contains("odd"));

        let err = ConfigError::UnknownMode {
            token: "turbo".to_string(),
        };
        assert!(err.to_string().contains("turbo"));
    }

    #[test]
    fn test_error_conversion() {
        let err: ConvolveError = ConfigError::EmptyImage {
            width: 0,
            height: 5,
        }
        .into();
        assert!(err.is_config());

        let err: ConvolveError = ResourceError::AllocationFailed { bytes: 1024 }.into();
        assert!(!err.is_config());
    }
}
