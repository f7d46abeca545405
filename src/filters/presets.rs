//! Built-in 3x3 filter presets.
//!
//! Weight tables are fixed constants. Blur-type presets bake their divisor
//! into the weights so they sum to 1; the emboss presets carry signed
//! differences re-centered by an additive bias of 128.

use crate::core::kernel::KernelMatrix;

/// Preset used when no filter argument is given, and the fallback for
/// unrecognized filter tokens.
pub const DEFAULT_FILTER: &str = "box_blur";

/// Uniform 3x3 average.
pub fn box_blur() -> KernelMatrix {
    KernelMatrix::square3([1.0 / 9.0; 9], 0.0)
}

/// Laplacian-style edge detection.
pub fn edge() -> KernelMatrix {
    KernelMatrix::square3(
        [-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0],
        0.0,
    )
}

/// 3x3 Gaussian approximation, divisor 16 baked in.
pub fn gaussian() -> KernelMatrix {
    KernelMatrix::square3(
        [
            1.0 / 16.0,
            2.0 / 16.0,
            1.0 / 16.0,
            2.0 / 16.0,
            4.0 / 16.0,
            2.0 / 16.0,
            1.0 / 16.0,
            2.0 / 16.0,
            1.0 / 16.0,
        ],
        0.0,
    )
}

/// Horizontal emboss: left-right difference, bias 128.
pub fn h_emboss() -> KernelMatrix {
    KernelMatrix::square3([0.0, 0.0, 0.0, 1.0, 0.0, -1.0, 0.0, 0.0, 0.0], 128.0)
}

/// Pass-through kernel.
pub fn identity() -> KernelMatrix {
    KernelMatrix::square3([0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0], 0.0)
}

/// Vertical emboss: top-bottom difference, bias 128.
pub fn v_emboss() -> KernelMatrix {
    KernelMatrix::square3([0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, -1.0, 0.0], 128.0)
}

/// Center-weighted sharpen.
pub fn sharpen() -> KernelMatrix {
    KernelMatrix::square3([0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0], 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weight_sum(kernel: &KernelMatrix) -> f32 {
        kernel.weights().iter().sum()
    }

    #[test]
    fn test_blur_weights_sum_to_one() {
        assert!((weight_sum(&box_blur()) - 1.0).abs() < 1e-6);
        assert!((weight_sum(&gaussian()) - 1.0).abs() < 1e-6);
        assert!((weight_sum(&identity()) - 1.0).abs() < 1e-6);
        assert!((weight_sum(&sharpen()) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_emboss_weights_sum_to_zero_with_bias() {
        for kernel in [h_emboss(), v_emboss()] {
            assert!(weight_sum(&kernel).abs() < 1e-6);
            assert_eq!(kernel.bias(), 128.0);
        }
    }

    #[test]
    fn test_edge_weights_sum_to_zero_without_bias() {
        assert!(weight_sum(&edge()).abs() < 1e-6);
        assert_eq!(edge().bias(), 0.0);
    }

    #[test]
    fn test_all_presets_are_3x3() {
        for kernel in [
            box_blur(),
            edge(),
            gaussian(),
            h_emboss(),
            identity(),
            v_emboss(),
            sharpen(),
        ] {
            assert_eq!(kernel.dim(), 3);
            assert_eq!(kernel.radius(), 1);
        }
    }
}
