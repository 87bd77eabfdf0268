//! JPEG encoding via the `image` crate's encoder.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;

use super::{EncodeError, OutputFormat};
use crate::decode::PixelBuffer;

/// Encode an RGB buffer to JPEG bytes.
///
/// The caller has already validated dimensions and pixel length. An RGBA
/// buffer is refused with `UnsupportedColorMode`; the public `encode` entry
/// point handles the conversion retry.
pub(super) fn encode_jpeg(buffer: &PixelBuffer, quality: u8) -> Result<Vec<u8>, EncodeError> {
    if buffer.mode.has_alpha() {
        return Err(EncodeError::UnsupportedColorMode {
            mode: buffer.mode,
            format: OutputFormat::Jpeg,
        });
    }

    // Clamp quality to the encoder's valid range (1-100)
    let quality = quality.clamp(1, 100);

    let mut out = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut out, quality);
    encoder
        .write_image(
            &buffer.pixels,
            buffer.width,
            buffer.height,
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(out.into_inner())
}
