//! The convolution strategy family.
//!
//! Four interchangeable strategies compute the identical mathematical
//! result with different memory-access patterns and work partitioning:
//!
//! - [`SequentialStrategy`]: single thread, the correctness oracle
//! - [`GlobalMemoryStrategy`]: one worker per output pixel, every read
//!   straight from the shared source slices
//! - [`ConstantMemoryStrategy`]: same decomposition, weights read from the
//!   broadcast constant region
//! - [`SharedMemoryTiledStrategy`]: tile groups stage their window plus a
//!   halo into per-group scratch before computing
//!
//! All four accumulate in f32 over the window in row-major order and
//! quantize through [`KernelMatrix::quantize`], so their outputs are
//! byte-for-byte identical for the same input.

mod constant;
mod global;
mod sequential;
mod shared;

pub use constant::ConstantMemoryStrategy;
pub use global::GlobalMemoryStrategy;
pub use sequential::SequentialStrategy;
pub use shared::{SharedMemoryTiledStrategy, TILE_SIZE};

use crate::core::buffer::PixelBuffer;
use crate::core::error::{ConfigError, ConvolveError, ResourceError};
use crate::core::kernel::KernelMatrix;
use std::fmt;
use std::str::FromStr;

/// The shared convolution contract.
///
/// `compute` reads the input buffer and kernel and produces a fresh output
/// buffer of identical width, height and channel count. Implementations
/// differ only in where data resides during computation and how work is
/// partitioned; the output value at every `(x, y, c)` is fixed by the
/// kernel and the clamp-to-edge boundary policy.
pub trait ConvolutionStrategy {
    /// Strategy name, matching its execution-mode token.
    fn name(&self) -> &'static str;

    /// Convolve `input` with `kernel` into a new buffer.
    fn compute(
        &self,
        input: &PixelBuffer,
        kernel: &KernelMatrix,
    ) -> Result<PixelBuffer, ConvolveError>;
}

/// Selects which strategy executes. Does not change the output value, only
/// how it is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionMode {
    /// Parallel, kernel weights in the constant region.
    Constant,
    /// Parallel, weights and image read from the general pool.
    Global,
    /// Parallel, image tiles staged into per-group scratch, weights in the
    /// constant region.
    Shared,
    /// Single-thread baseline.
    Sequential,
}

/// Mode used when no mode argument is given, and the fallback for
/// unrecognized mode tokens.
pub const DEFAULT_MODE: ExecutionMode = ExecutionMode::Constant;

impl ExecutionMode {
    /// Every mode, in the order the CLI documents them.
    pub const ALL: [ExecutionMode; 4] = [
        ExecutionMode::Constant,
        ExecutionMode::Global,
        ExecutionMode::Shared,
        ExecutionMode::Sequential,
    ];

    /// The token this mode parses from.
    pub fn token(&self) -> &'static str {
        match self {
            ExecutionMode::Constant => "constant",
            ExecutionMode::Global => "global",
            ExecutionMode::Shared => "shared",
            ExecutionMode::Sequential => "sequential",
        }
    }

    /// Whether this mode partitions work across parallel workers.
    pub fn is_parallel(&self) -> bool {
        !matches!(self, ExecutionMode::Sequential)
    }

    /// Whether this mode binds the process-wide constant region.
    pub fn uses_constant_region(&self) -> bool {
        matches!(self, ExecutionMode::Constant | ExecutionMode::Shared)
    }

    /// Instantiate the strategy for this mode.
    pub fn strategy(&self) -> Box<dyn ConvolutionStrategy> {
        match self {
            ExecutionMode::Constant => Box::new(ConstantMemoryStrategy),
            ExecutionMode::Global => Box::new(GlobalMemoryStrategy),
            ExecutionMode::Shared => Box::new(SharedMemoryTiledStrategy),
            ExecutionMode::Sequential => Box::new(SequentialStrategy),
        }
    }
}

impl FromStr for ExecutionMode {
    type Err = ConfigError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "constant" => Ok(ExecutionMode::Constant),
            "global" => Ok(ExecutionMode::Global),
            "shared" => Ok(ExecutionMode::Shared),
            "sequential" => Ok(ExecutionMode::Sequential),
            _ => Err(ConfigError::UnknownMode {
                token: token.to_string(),
            }),
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Allocate a zeroed output vector, surfacing allocation failure as a
/// resource error instead of aborting the process.
pub(crate) fn alloc_output(len: usize) -> Result<Vec<u8>, ResourceError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| ResourceError::AllocationFailed { bytes: len })?;
    buf.resize(len, 0);
    Ok(buf)
}
