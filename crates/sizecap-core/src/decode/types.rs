//! Core types for image decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for decode and resize operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// A resize target degenerated below 1x1.
    #[error("Invalid target dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Filter type for image resizing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    #[default]
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Channel layout of a pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMode {
    /// Interleaved 8-bit RGB, 3 bytes per pixel.
    Rgb8,
    /// Interleaved 8-bit RGBA, 4 bytes per pixel.
    Rgba8,
}

impl ColorMode {
    /// Number of bytes a single pixel occupies.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            ColorMode::Rgb8 => 3,
            ColorMode::Rgba8 => 4,
        }
    }

    /// Whether the layout carries an alpha channel.
    pub fn has_alpha(self) -> bool {
        matches!(self, ColorMode::Rgba8)
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// A decoded image held as interleaved 8-bit pixels.
///
/// Alpha is preserved through decode and resize; it is only dropped at an
/// encode boundary that cannot represent it.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Channel layout of `pixels`.
    pub mode: ColorMode,
    /// Pixel data in row-major order.
    /// Length must be width * height * mode.bytes_per_pixel().
    pub pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Create a new PixelBuffer with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, mode: ColorMode, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize) * mode.bytes_per_pixel(),
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            mode,
            pixels,
        }
    }

    /// Create a PixelBuffer from an image::DynamicImage, keeping alpha if the
    /// source has it.
    pub fn from_dynamic(img: image::DynamicImage) -> Self {
        if img.color().has_alpha() {
            Self::from_rgba_image(img.into_rgba8())
        } else {
            Self::from_rgb_image(img.into_rgb8())
        }
    }

    /// Create a PixelBuffer from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            mode: ColorMode::Rgb8,
            pixels: img.into_raw(),
        }
    }

    /// Create a PixelBuffer from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            mode: ColorMode::Rgba8,
            pixels: img.into_raw(),
        }
    }

    /// Convert to an image::RgbImage. Returns None if the buffer is not RGB
    /// or the pixel data does not match the dimensions.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        match self.mode {
            ColorMode::Rgb8 => {
                image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
            }
            ColorMode::Rgba8 => None,
        }
    }

    /// Convert to an image::RgbaImage. Returns None if the buffer is not RGBA
    /// or the pixel data does not match the dimensions.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        match self.mode {
            ColorMode::Rgba8 => {
                image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            }
            ColorMode::Rgb8 => None,
        }
    }

    /// Drop the alpha channel, producing an RGB buffer. An RGB buffer is
    /// returned as a plain clone.
    pub fn to_rgb(&self) -> PixelBuffer {
        match self.mode {
            ColorMode::Rgb8 => self.clone(),
            ColorMode::Rgba8 => {
                let mut pixels =
                    Vec::with_capacity((self.width as usize) * (self.height as usize) * 3);
                for px in self.pixels.chunks_exact(4) {
                    pixels.extend_from_slice(&px[..3]);
                }
                PixelBuffer::new(self.width, self.height, ColorMode::Rgb8, pixels)
            }
        }
    }

    /// Get the image shape as (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_type_conversion() {
        assert!(matches!(
            FilterType::Nearest.to_image_filter(),
            image::imageops::FilterType::Nearest
        ));
        assert!(matches!(
            FilterType::Bilinear.to_image_filter(),
            image::imageops::FilterType::Triangle
        ));
        assert!(matches!(
            FilterType::Lanczos3.to_image_filter(),
            image::imageops::FilterType::Lanczos3
        ));
    }

    #[test]
    fn test_color_mode_layout() {
        assert_eq!(ColorMode::Rgb8.bytes_per_pixel(), 3);
        assert_eq!(ColorMode::Rgba8.bytes_per_pixel(), 4);
        assert!(!ColorMode::Rgb8.has_alpha());
        assert!(ColorMode::Rgba8.has_alpha());
    }

    #[test]
    fn test_orientation_from_u32() {
        assert_eq!(Orientation::from(1), Orientation::Normal);
        assert_eq!(Orientation::from(6), Orientation::Rotate90CW);
        assert_eq!(Orientation::from(99), Orientation::Normal); // Invalid defaults to Normal
    }

    #[test]
    fn test_pixel_buffer_creation() {
        let pixels = vec![0u8; 100 * 50 * 3];
        let buf = PixelBuffer::new(100, 50, ColorMode::Rgb8, pixels);

        assert_eq!(buf.dimensions(), (100, 50));
        assert_eq!(buf.pixel_count(), 5000);
        assert_eq!(buf.byte_size(), 15000);
        assert!(!buf.is_empty());
    }

    #[test]
    fn test_pixel_buffer_empty() {
        let buf = PixelBuffer::new(0, 0, ColorMode::Rgb8, vec![]);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_to_rgb_drops_alpha() {
        let pixels = vec![
            255, 0, 0, 128, // Red, half transparent
            0, 255, 0, 255, // Green, opaque
        ];
        let buf = PixelBuffer::new(2, 1, ColorMode::Rgba8, pixels);

        let rgb = buf.to_rgb();
        assert_eq!(rgb.mode, ColorMode::Rgb8);
        assert_eq!(rgb.pixels, vec![255, 0, 0, 0, 255, 0]);
    }

    #[test]
    fn test_to_rgb_on_rgb_is_clone() {
        let buf = PixelBuffer::new(1, 1, ColorMode::Rgb8, vec![1, 2, 3]);
        let rgb = buf.to_rgb();
        assert_eq!(rgb.pixels, buf.pixels);
    }

    #[test]
    fn test_rgb_image_round_trip() {
        let img = image::RgbImage::from_raw(2, 2, vec![10u8; 12]).unwrap();
        let buf = PixelBuffer::from_rgb_image(img);

        assert_eq!(buf.mode, ColorMode::Rgb8);
        assert!(buf.to_rgb_image().is_some());
        assert!(buf.to_rgba_image().is_none());
    }

    #[test]
    fn test_from_dynamic_keeps_alpha() {
        let rgba = image::RgbaImage::from_raw(1, 1, vec![1, 2, 3, 4]).unwrap();
        let buf = PixelBuffer::from_dynamic(image::DynamicImage::ImageRgba8(rgba));
        assert_eq!(buf.mode, ColorMode::Rgba8);

        let rgb = image::RgbImage::from_raw(1, 1, vec![1, 2, 3]).unwrap();
        let buf = PixelBuffer::from_dynamic(image::DynamicImage::ImageRgb8(rgb));
        assert_eq!(buf.mode, ColorMode::Rgb8);
    }
}
