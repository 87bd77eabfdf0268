//! PNG encoding via the `image` crate's encoder.

use std::io::Cursor;

use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;

use super::EncodeError;
use crate::decode::{ColorMode, PixelBuffer};

/// Encode a buffer to PNG bytes. Both color modes are representable, so
/// there is no conversion path here.
pub(super) fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, EncodeError> {
    let color = match buffer.mode {
        ColorMode::Rgb8 => ExtendedColorType::Rgb8,
        ColorMode::Rgba8 => ExtendedColorType::Rgba8,
    };

    let mut out = Cursor::new(Vec::new());
    PngEncoder::new(&mut out)
        .write_image(&buffer.pixels, buffer.width, buffer.height, color)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(out.into_inner())
}
