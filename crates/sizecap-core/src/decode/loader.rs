//! Byte-level image loading with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::DynamicImage;
use image::ImageReader;

use super::{DecodeError, Orientation, PixelBuffer};

/// Decode an image from raw file bytes.
///
/// The format is guessed from the content, so any format the `image` crate
/// is built with can be fed in. EXIF orientation is applied to the pixels
/// before returning: re-encoding strips metadata, so a sideways photo would
/// otherwise come out sideways for good.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes are not a recognized
/// image format, `DecodeError::CorruptedFile` if decoding fails partway.
pub fn decode_image(bytes: &[u8]) -> Result<PixelBuffer, DecodeError> {
    // Extract EXIF orientation before decoding; decoding discards metadata.
    let orientation = extract_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let img = reader.decode().map_err(|e| match e {
        image::ImageError::Unsupported(_) => DecodeError::InvalidFormat,
        other => DecodeError::CorruptedFile(other.to_string()),
    })?;

    let oriented = apply_orientation(img, orientation);
    Ok(PixelBuffer::from_dynamic(oriented))
}

/// Extract EXIF orientation from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let exif_reader = Reader::new();
    let mut cursor = Cursor::new(bytes);

    match exif_reader.read_from_container(&mut cursor) {
        Ok(exif) => {
            if let Some(field) = exif.get_field(Tag::Orientation, In::PRIMARY) {
                if let Some(value) = field.value.get_uint(0) {
                    return Orientation::from(value);
                }
            }
            Orientation::Normal
        }
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
