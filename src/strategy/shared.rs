//! Tiled strategy with per-group scratch staging.

use crate::core::boundary::clamp_coord;
use crate::core::buffer::PixelBuffer;
use crate::core::error::ConvolveError;
use crate::core::kernel::KernelMatrix;
use crate::execution::constant_region::ConstantRegion;
use crate::strategy::{alloc_output, ConvolutionStrategy};
use rayon::prelude::*;

/// Output samples per tile edge.
pub const TILE_SIZE: usize = 16;

/// Partitions the output into fixed-size tiles; each tile's worker group
/// first stages the tile plus a halo border of width `K / 2` from the
/// general pool into a per-group scratch buffer, resolving halo samples
/// that fall outside the image through the boundary policy. Staging must
/// fully complete before any compute read happens — the two phases are
/// strictly ordered, and compute reads come exclusively from the scratch
/// buffer. A window that straddles the tile edge therefore never mixes
/// staged and unstaged samples.
///
/// Work is partitioned across tile row bands so every group writes a
/// disjoint slice of the output. Kernel weights are read from the same
/// constant region as the constant-memory strategy.
pub struct SharedMemoryTiledStrategy;

impl ConvolutionStrategy for SharedMemoryTiledStrategy {
    fn name(&self) -> &'static str {
        "shared"
    }

    fn compute(
        &self,
        input: &PixelBuffer,
        kernel: &KernelMatrix,
    ) -> Result<PixelBuffer, ConvolveError> {
        let binding = ConstantRegion::global().bind(kernel)?;

        let (w, h, c) = (input.width(), input.height(), input.channels());
        let src = input.as_slice();
        let k = kernel.dim();
        let radius = kernel.radius();

        let mut out = alloc_output(src.len())?;

        // Scratch extent per tile: the tile itself plus the halo on every
        // side. The stride stays fixed for every tile; edge tiles stage a
        // smaller window inside the same layout rather than branching.
        let scratch_edge = TILE_SIZE + 2 * radius;
        let band_len = w * c * TILE_SIZE;
        let tiles_x = w.div_ceil(TILE_SIZE);

        out.par_chunks_mut(band_len)
            .enumerate()
            .for_each(|(band, band_out)| {
                let weights = binding.weights();
                let y0 = band * TILE_SIZE;
                let band_h = TILE_SIZE.min(h - y0);
                let mut scratch = vec![0u8; scratch_edge * scratch_edge * c];

                for tile in 0..tiles_x {
                    let x0 = tile * TILE_SIZE;
                    let tile_w = TILE_SIZE.min(w - x0);

                    // Stage phase: disjoint writes fill the tile window and
                    // its halo, clamped to the image edges.
                    for sy in 0..band_h + 2 * radius {
                        let src_y = clamp_coord(y0 as isize + sy as isize - radius as isize, h);
                        for sx in 0..tile_w + 2 * radius {
                            let src_x =
                                clamp_coord(x0 as isize + sx as isize - radius as isize, w);
                            let src_base = (src_y * w + src_x) * c;
                            let dst_base = (sy * scratch_edge + sx) * c;
                            scratch[dst_base..dst_base + c]
                                .copy_from_slice(&src[src_base..src_base + c]);
                        }
                    }

                    // Compute phase: begins only after staging has fully
                    // completed, and reads nothing but the scratch buffer.
                    for ty in 0..band_h {
                        for tx in 0..tile_w {
                            let out_base = (ty * w + x0 + tx) * c;
                            for ch in 0..c {
                                let mut acc = 0.0f32;
                                let mut wi = 0;
                                for i in 0..k {
                                    let row = (ty + i) * scratch_edge;
                                    for j in 0..k {
                                        acc += weights[wi]
                                            * scratch[(row + tx + j) * c + ch] as f32;
                                        wi += 1;
                                    }
                                }
                                band_out[out_base + ch] = kernel.quantize(acc);
                            }
                        }
                    }
                }
            });

        Ok(PixelBuffer::new(w, h, c, out)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::SequentialStrategy;

    fn checker(width: usize, height: usize, channels: usize) -> PixelBuffer {
        let data: Vec<u8> = (0..width * height * channels)
            .map(|i| (i * 73 % 256) as u8)
            .collect();
        PixelBuffer::new(width, height, channels, data).unwrap()
    }

    #[test]
    fn test_matches_sequential_oracle() {
        let input = checker(20, 9, 3);
        let kernel = KernelMatrix::new(
            3,
            vec![-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0],
        )
        .unwrap();

        let expected = SequentialStrategy.compute(&input, &kernel).unwrap();
        let actual = SharedMemoryTiledStrategy.compute(&input, &kernel).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_image_smaller_than_tile() {
        let input = checker(3, 2, 1);
        let kernel = KernelMatrix::new(3, vec![1.0 / 9.0; 9]).unwrap();

        let expected = SequentialStrategy.compute(&input, &kernel).unwrap();
        let actual = SharedMemoryTiledStrategy.compute(&input, &kernel).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_dimensions_straddling_tile_edges() {
        // 17 and 33 force partial tiles on both axes.
        let input = checker(17, 33, 4);
        let kernel =
            KernelMatrix::new(3, vec![0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0]).unwrap();

        let expected = SequentialStrategy.compute(&input, &kernel).unwrap();
        let actual = SharedMemoryTiledStrategy.compute(&input, &kernel).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_five_by_five_kernel_halo() {
        let input = checker(18, 18, 1);
        let kernel = KernelMatrix::new(5, vec![1.0 / 25.0; 25]).unwrap();

        let expected = SequentialStrategy.compute(&input, &kernel).unwrap();
        let actual = SharedMemoryTiledStrategy.compute(&input, &kernel).unwrap();
        assert_eq!(actual, expected);
    }
}
