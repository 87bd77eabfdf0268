//! Exact-dimension resampling on top of the `image` crate.
//!
//! All functions return new `PixelBuffer` instances without modifying the
//! input. The buffer's color mode survives a resize; alpha handling is the
//! encoder's concern.

use super::{ColorMode, DecodeError, FilterType, PixelBuffer};

/// Resize an image to exact dimensions.
///
/// A call with the buffer's current dimensions is a no-op and returns a
/// clone.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if either target dimension is
/// zero.
pub fn resize(
    buffer: &PixelBuffer,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<PixelBuffer, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    if buffer.width == width && buffer.height == height {
        return Ok(buffer.clone());
    }

    match buffer.mode {
        ColorMode::Rgb8 => {
            let img = buffer.to_rgb_image().ok_or_else(|| {
                DecodeError::CorruptedFile("pixel buffer does not match its dimensions".to_string())
            })?;
            let resized = image::imageops::resize(&img, width, height, filter.to_image_filter());
            Ok(PixelBuffer::from_rgb_image(resized))
        }
        ColorMode::Rgba8 => {
            let img = buffer.to_rgba_image().ok_or_else(|| {
                DecodeError::CorruptedFile("pixel buffer does not match its dimensions".to_string())
            })?;
            let resized = image::imageops::resize(&img, width, height, filter.to_image_filter());
            Ok(PixelBuffer::from_rgba_image(resized))
        }
    }
}

/// Scale a shape by a fractional ratio, flooring each axis.
///
/// Mirrors the arithmetic of the optimization loop; a small enough ratio
/// yields a zero dimension, which the caller must treat as a boundary.
pub fn scaled_dimensions(width: u32, height: u32, ratio: f64) -> (u32, u32) {
    (
        (f64::from(width) * ratio).floor() as u32,
        (f64::from(height) * ratio).floor() as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_buffer(width: u32, height: u32) -> PixelBuffer {
        // Simple gradient so resampling has something to chew on
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((x * 255) / width.max(1)) as u8);
                pixels.push(((y * 255) / height.max(1)) as u8);
                pixels.push(128);
            }
        }
        PixelBuffer::new(width, height, ColorMode::Rgb8, pixels)
    }

    #[test]
    fn test_resize_basic() {
        let buf = create_test_buffer(100, 50);
        let resized = resize(&buf, 50, 25, FilterType::Bilinear).unwrap();

        assert_eq!(resized.dimensions(), (50, 25));
        assert_eq!(resized.byte_size(), 50 * 25 * 3);
    }

    #[test]
    fn test_resize_same_dimensions_is_noop() {
        let buf = create_test_buffer(100, 50);
        let resized = resize(&buf, 100, 50, FilterType::Lanczos3).unwrap();

        assert_eq!(resized.dimensions(), (100, 50));
        assert_eq!(resized.pixels, buf.pixels);
    }

    #[test]
    fn test_resize_zero_dimensions_error() {
        let buf = create_test_buffer(100, 50);

        assert!(matches!(
            resize(&buf, 0, 50, FilterType::Bilinear),
            Err(DecodeError::InvalidDimensions { width: 0, .. })
        ));
        assert!(matches!(
            resize(&buf, 50, 0, FilterType::Bilinear),
            Err(DecodeError::InvalidDimensions { height: 0, .. })
        ));
    }

    #[test]
    fn test_resize_keeps_color_mode() {
        let buf = PixelBuffer::new(4, 4, ColorMode::Rgba8, vec![200u8; 4 * 4 * 4]);
        let resized = resize(&buf, 2, 2, FilterType::Lanczos3).unwrap();

        assert_eq!(resized.mode, ColorMode::Rgba8);
        assert_eq!(resized.byte_size(), 2 * 2 * 4);
    }

    #[test]
    fn test_all_filter_types() {
        let buf = create_test_buffer(100, 50);

        for filter in [
            FilterType::Nearest,
            FilterType::Bilinear,
            FilterType::Lanczos3,
        ] {
            let resized = resize(&buf, 50, 25, filter).unwrap();
            assert_eq!(resized.dimensions(), (50, 25));
        }
    }

    #[test]
    fn test_scaled_dimensions_identity() {
        assert_eq!(scaled_dimensions(4000, 3000, 1.0), (4000, 3000));
    }

    #[test]
    fn test_scaled_dimensions_floors() {
        assert_eq!(scaled_dimensions(100, 50, 0.5), (50, 25));
        assert_eq!(scaled_dimensions(10, 10, 0.33), (3, 3));
    }

    #[test]
    fn test_scaled_dimensions_can_hit_zero() {
        assert_eq!(scaled_dimensions(16, 16, 0.03), (0, 0));
        assert_eq!(scaled_dimensions(1, 1, 0.5), (0, 0));
    }
}
