//! Core types for the convolution engine.
//!
//! This module contains the foundational pieces every strategy shares:
//! - The pixel buffer and kernel data holders
//! - The clamp-to-edge boundary policy
//! - Error types

pub mod boundary;
pub mod buffer;
pub mod error;
pub mod kernel;

// Re-export commonly used types
pub use boundary::clamp_coord;
pub use buffer::PixelBuffer;
pub use error::{ConfigError, ConvolveError, ConvolveResult, ExecError, ResourceError};
pub use kernel::KernelMatrix;
