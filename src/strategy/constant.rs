//! Parallel strategy with kernel weights in the constant region.

use crate::core::boundary::clamp_coord;
use crate::core::buffer::PixelBuffer;
use crate::core::error::ConvolveError;
use crate::core::kernel::KernelMatrix;
use crate::execution::constant_region::ConstantRegion;
use crate::strategy::{alloc_output, ConvolutionStrategy};
use rayon::prelude::*;

/// Same decomposition as the global strategy, but the kernel weights are
/// bound once into the broadcast constant region before the parallel phase
/// begins; workers read weights through the binding handle instead of the
/// general pool. The source image stays in the general pool.
///
/// A kernel that does not fit the region's fixed capacity fails with a
/// configuration error before any computation starts.
pub struct ConstantMemoryStrategy;

impl ConvolutionStrategy for ConstantMemoryStrategy {
    fn name(&self) -> &'static str {
        "constant"
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
        let radius = kernel.radius() as isize;

        let mut out = alloc_output(src.len())?;

        out.par_chunks_mut(c).enumerate().for_each(|(p, pixel)| {
            let weights = binding.weights();
            let x = p % w;
            let y = p / w;
            for (ch, sample) in pixel.iter_mut().enumerate() {
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
                *sample = kernel.quantize(acc);
            }
        });

        Ok(PixelBuffer::new(w, h, c, out)?)
    }
}
