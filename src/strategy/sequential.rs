//! Single-thread baseline strategy.

use crate::core::boundary::clamp_coord;
use crate::core::buffer::PixelBuffer;
use crate::core::error::ConvolveError;
use crate::core::kernel::KernelMatrix;
use crate::strategy::{alloc_output, ConvolutionStrategy};

/// Nested loops over `y, x, c, i, j` on a single control thread.
///
/// Deterministic single pass with no concurrency; serves as the
/// correctness oracle for the parallel strategies and as the fallback when
/// parallel execution is not wanted.
pub struct SequentialStrategy;

impl ConvolutionStrategy for SequentialStrategy {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn compute(
        &self,
        input: &PixelBuffer,
        kernel: &KernelMatrix,
    ) -> Result<PixelBuffer, ConvolveError> {
        let (w, h, c) = (input.width(), input.height(), input.channels());
        let src = input.as_slice();
        let weights = kernel.weights();
        let k = kernel.dim();
        let radius = kernel.radius() as isize;

        let mut out = alloc_output(src.len())?;

        for y in 0..h {
            for x in 0..w {
                for ch in 0..c {
                    let mut acc = 0.0f32;
                    let mut wi = 0;
                    for i in 0..k {
                        let sy = clamp_coord(y as isize + i as isize - radius, h);
                        for j in 0..k {
                            let sx = clamp_coord(x as isize + j as isize - radius, w);
                            acc += weights[wi] * src[(sy * w + sx) * c + ch] as f32;
                            wi += 1;
                        }
                    }
                    out[(y * w + x) * c + ch] = kernel.quantize(acc);
                }
            }
        }

        Ok(PixelBuffer::new(w, h, c, out)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_kernel_is_noop() {
        let data: Vec<u8> = (0..27).map(|i| (i * 9) as u8).collect();
        let input = PixelBuffer::new(3, 3, 3, data.clone()).unwrap();
        let mut weights = vec![0.0; 9];
        weights[4] = 1.0;
        let kernel = KernelMatrix::new(3, weights).unwrap();

        let output = SequentialStrategy.compute(&input, &kernel).unwrap();
        assert_eq!(output.as_slice(), &data[..]);
    }

    #[test]
    fn test_box_blur_on_edge_pixel() {
        // 2x2 grayscale; clamp-to-edge makes the (0,0) window
        // [a a b; a a b; c c d] for samples [a b; c d].
        let input = PixelBuffer::new(2, 2, 1, vec![9, 18, 27, 36]).unwrap();
        let kernel = KernelMatrix::new(3, vec![1.0 / 9.0; 9]).unwrap();

        let output = SequentialStrategy.compute(&input, &kernel).unwrap();
        // (0,0): (4*9 + 2*18 + 2*27 + 36) / 9 = 162 / 9 = 18
        assert_eq!(output.sample(0, 0, 0), 18);
    }

    #[test]
    fn test_one_by_one_image() {
        let input = PixelBuffer::new(1, 1, 1, vec![77]).unwrap();
        let kernel = KernelMatrix::new(3, vec![1.0 / 9.0; 9]).unwrap();
        // Every window coordinate clamps to the single pixel.
        let output = SequentialStrategy.compute(&input, &kernel).unwrap();
        assert_eq!(output.sample(0, 0, 0), 77);
    }
}
