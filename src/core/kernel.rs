//! Convolution kernel: a square odd-sized weight matrix plus normalization.
//!
//! Two normalization forms exist. Blur-type filters pre-scale their weights
//! so they sum to 1 and carry no bias. Emboss-type filters have weights
//! summing to 0 and an additive bias (128) that re-centers signed
//! differences into the unsigned sample range.
//!
//! Quantization baseline shared by every strategy: accumulate in f32 over
//! the window in row-major order, add the bias, clamp to [0, 255], round to
//! nearest. The equivalence tests hold all strategies to this exact rule.

use crate::core::error::ConfigError;

/// A square, odd-dimensioned convolution kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelMatrix {
    dim: usize,
    weights: Vec<f32>,
    bias: f32,
}

impl KernelMatrix {
    /// Create a kernel with no additive bias.
    ///
    /// Fails with a configuration error when `dim` is even or zero, or when
    /// `weights.len() != dim * dim`.
    pub fn new(dim: usize, weights: Vec<f32>) -> Result<Self, ConfigError> {
        Self::with_bias(dim, weights, 0.0)
    }

    /// Create a kernel with an additive normalization bias.
    pub fn with_bias(dim: usize, weights: Vec<f32>, bias: f32) -> Result<Self, ConfigError> {
        if dim == 0 || dim % 2 == 0 {
            return Err(ConfigError::EvenKernelDimension { dim });
        }
        let expected = dim * dim;
        if weights.len() != expected {
            return Err(ConfigError::WeightCountMismatch {
                dim,
                expected,
                got: weights.len(),
            });
        }
        Ok(Self { dim, weights, bias })
    }

    /// Build a 3x3 kernel from a fixed weight table.
    ///
    /// Used by the preset tables, where the dimension and weight count are
    /// correct by construction.
    pub fn square3(weights: [f32; 9], bias: f32) -> Self {
        Self {
            dim: 3,
            weights: weights.to_vec(),
            bias,
        }
    }

    /// Kernel dimension `K`.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Window half-width `K / 2`.
    pub fn radius(&self) -> usize {
        self.dim / 2
    }

    /// Row-major weight slice of length `K * K`.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Additive normalization bias, applied once per output sample.
    pub fn bias(&self) -> f32 {
        self.bias
    }

    /// Complete a weighted sum into an output sample: add the bias, clamp
    /// to the valid sample range, round to nearest.
    #[inline(always)]
    pub fn quantize(&self, acc: f32) -> u8 {
        (acc + self.bias).clamp(0.0, 255.0).round() as u8
    }

    /// Apply the kernel to one window of source samples.
    ///
    /// `window` holds `K * K` samples in row-major order, already resolved
    /// through the boundary policy. Pure function of its inputs.
    pub fn apply(&self, window: &[f32]) -> u8 {
        debug_assert_eq!(window.len(), self.weights.len());
        let mut acc = 0.0f32;
        for (w, s) in self.weights.iter().zip(window) {
            acc += w * s;
        }
        self.quantize(acc)
    }
}
