//! Image file I/O.
//!
//! Thin boundary between the engine's pixel buffers and the `image` crate.
//! Loading preserves the decoder's native channel count where the engine
//! supports it (grayscale, RGB, RGBA); other layouts are converted to the
//! closest supported one. Saving infers the container format from the
//! output extension.

use crate::core::buffer::PixelBuffer;
use crate::core::error::{ConvolveError, ExecError};
use image::DynamicImage;
use std::path::Path;

/// Decode an image file into a pixel buffer.
pub fn load_image(path: impl AsRef<Path>) -> Result<PixelBuffer, ConvolveError> {
    let path = path.as_ref();
    let decoded = image::open(path)?;
    log::debug!(
        "loaded {} ({}x{}, {:?})",
        path.display(),
        decoded.width(),
        decoded.height(),
        decoded.color(),
    );
    buffer_from_dynamic(decoded)
}

/// Encode a pixel buffer to an image file; the format follows the
/// extension (PNG when unrecognized handling is left to the encoder).
pub fn save_image(buffer: &PixelBuffer, path: impl AsRef<Path>) -> Result<(), ConvolveError> {
    let path = path.as_ref();
    let image = dynamic_from_buffer(buffer)?;
    image.save(path)?;
    log::debug!("saved {}", path.display());
    Ok(())
}

fn buffer_from_dynamic(decoded: DynamicImage) -> Result<PixelBuffer, ConvolveError> {
    let (w, h) = (decoded.width() as usize, decoded.height() as usize);
    let buffer = match decoded {
        DynamicImage::ImageLuma8(img) => PixelBuffer::new(w, h, 1, img.into_raw())?,
        DynamicImage::ImageRgb8(img) => PixelBuffer::new(w, h, 3, img.into_raw())?,
        DynamicImage::ImageRgba8(img) => PixelBuffer::new(w, h, 4, img.into_raw())?,
        // Gray+alpha keeps its alpha by widening to RGBA; everything else
        // (16-bit, float) narrows to 8-bit RGB.
        DynamicImage::ImageLumaA8(img) => {
            let rgba = DynamicImage::ImageLumaA8(img).to_rgba8();
            PixelBuffer::new(w, h, 4, rgba.into_raw())?
        }
        other => {
            let rgb = other.to_rgb8();
            PixelBuffer::new(w, h, 3, rgb.into_raw())?
        }
    };
    Ok(buffer)
}

fn dynamic_from_buffer(buffer: &PixelBuffer) -> Result<DynamicImage, ConvolveError> {
    let (w, h) = (buffer.width() as u32, buffer.height() as u32);
    let data = buffer.as_slice().to_vec();
    // The buffer invariants make from_raw infallible here; the error arm
    // guards against that ever changing.
    let image = match buffer.channels() {
        1 => image::GrayImage::from_raw(w, h, data).map(DynamicImage::ImageLuma8),
        3 => image::RgbImage::from_raw(w, h, data).map(DynamicImage::ImageRgb8),
        _ => image::RgbaImage::from_raw(w, h, data).map(DynamicImage::ImageRgba8),
    };
    image.ok_or_else(|| {
        ConvolveError::Execution(ExecError::Other(
            "pixel buffer does not match its declared dimensions".to_string(),
        ))
    })
}
