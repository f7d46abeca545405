//! # Convolver - Kernel Image Processing
//!
//! Convolver applies small 2-D convolution filters to raster images,
//! selectable among four execution strategies that compute the identical
//! result with different memory placement and parallelism:
//!
//! - **constant**: parallel, kernel weights in a broadcast constant region
//! - **global**: parallel, every read straight from the shared pool
//! - **shared**: parallel, image tiles staged with a halo into per-group
//!   scratch buffers
//! - **sequential**: single-thread baseline and correctness oracle
//!
//! ## Quick Start
//!
//! ```rust
//! use convolver::prelude::*;
//!
//! let image = PixelBuffer::filled(64, 64, 3, 128).unwrap();
//! let kernel = PresetRegistry::with_builtins().create("gaussian").unwrap();
//!
//! let mut engine = ConvolutionEngine::new(image);
//! let blurred = engine.apply(&kernel, ExecutionMode::Shared).unwrap();
//! assert_eq!(blurred.width(), 64);
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: pixel buffer and kernel data holders, boundary policy, errors
//! - [`strategy`]: the four convolution strategies and the execution mode
//! - [`execution`]: the engine, the constant-memory region, metrics sinks
//! - [`filters`]: built-in filter presets and their registry
//! - [`io`]: image file decode/encode

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod execution;
pub mod filters;
pub mod io;
pub mod strategy;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust
/// use convolver::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::boundary::clamp_coord;
    pub use crate::core::buffer::PixelBuffer;
    pub use crate::core::error::{
        ConfigError, ConvolveError, ConvolveResult, ExecError, ResourceError,
    };
    pub use crate::core::kernel::KernelMatrix;

    // Strategies
    pub use crate::strategy::{
        ConstantMemoryStrategy, ConvolutionStrategy, ExecutionMode, GlobalMemoryStrategy,
        SequentialStrategy, SharedMemoryTiledStrategy,
    };

    // Execution
    pub use crate::execution::constant_region::{
        ConstantBinding, ConstantRegion, CONSTANT_REGION_CAPACITY,
    };
    pub use crate::execution::engine::ConvolutionEngine;
    pub use crate::execution::metrics::{
        format_micros, CsvSink, JsonLinesSink, MetricsSink, RunRecord,
    };

    // Filters
    pub use crate::filters::{presets, PresetRegistry, DEFAULT_FILTER};

    // I/O
    pub use crate::io::{load_image, save_image};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
