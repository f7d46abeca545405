//! Baseline parallel strategy: everything read from the general pool.

use crate::core::boundary::clamp_coord;
use crate::core::buffer::PixelBuffer;
use crate::core::error::ConvolveError;
use crate::core::kernel::KernelMatrix;
use crate::strategy::{alloc_output, ConvolutionStrategy};
use rayon::prelude::*;

/// One worker per output pixel, looping over that pixel's channels.
///
/// Every worker re-reads kernel weights and source samples directly from
/// the shared slices on every access; there is no staging and no reuse of
/// neighboring reads across workers. Correctness needs no synchronization:
/// inputs are read-only and each worker owns a disjoint output pixel.
pub struct GlobalMemoryStrategy;

impl ConvolutionStrategy for GlobalMemoryStrategy {
    fn name(&self) -> &'static str {
        "global"
    }

    fn compute(
        &self,
        input: &PixelBuffer,
        kernel: &KernelMatrix,
    ) -> Result<PixelBuffer, ConvolveError> {
        let (w, h, c) = (input.width(), input.height(), input.channels());
        let src = input.as_slice();
        let k = kernel.dim();
        let radius = kernel.radius() as isize;

        let mut out = alloc_output(src.len())?;

        out.par_chunks_mut(c).enumerate().for_each(|(p, pixel)| {
            let x = p % w;
            let y = p / w;
            for (ch, sample) in pixel.iter_mut().enumerate() {
                let mut acc = 0.0f32;
                let mut wi = 0;
                for i in 0..k {
                    let sy = clamp_coord(y as isize + i as isize - radius, h);
                    for j in 0..k {
                        let sx = clamp_coord(x as isize + j as isize - radius, w);
                        acc += kernel.weights()[wi] * src[(sy * w + sx) * c + ch] as f32;
                        wi += 1;
                    }
                }
                *sample = kernel.quantize(acc);
            }
        });

        Ok(PixelBuffer::new(w, h, c, out)?)
    }
}
