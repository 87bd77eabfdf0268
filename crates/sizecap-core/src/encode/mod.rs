//! Image encoding for Sizecap.
//!
//! Encoding follows a two-step contract: the buffer is first encoded as-is;
//! if that fails only because the buffer's color mode is unsupported by the
//! target format (an alpha channel going into JPEG), the mode is converted
//! once and the encode retried. Any second failure propagates.

mod jpeg;
mod png;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::{ColorMode, PixelBuffer};

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The buffer's color mode cannot be represented in the target format
    #[error("{format} cannot represent {mode:?} pixel data")]
    UnsupportedColorMode { mode: ColorMode, format: OutputFormat },

    /// The underlying codec rejected the buffer
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Target encodings the optimizer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Lossy JPEG; the default target regardless of source format.
    #[default]
    Jpeg,
    /// Lossless PNG, for callers keeping an alpha-capable source format.
    Png,
}

impl OutputFormat {
    /// File extension for the format, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }

    /// Whether the format can carry an alpha channel.
    pub fn supports_alpha(self) -> bool {
        matches!(self, OutputFormat::Png)
    }

    /// Whether the quality setting has any effect.
    pub fn is_lossy(self) -> bool {
        matches!(self, OutputFormat::Jpeg)
    }

    /// Map a file extension to a format, case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            "png" => Some(OutputFormat::Png),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Jpeg => write!(f, "JPEG"),
            OutputFormat::Png => write!(f, "PNG"),
        }
    }
}

/// An encoded image payload.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    bytes: Vec<u8>,
    format: OutputFormat,
}

impl EncodedImage {
    /// Length of the encoded payload in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if the payload is empty (never the case for a successful encode).
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The format the payload was encoded in.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Borrow the encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take ownership of the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Encode a pixel buffer to the target format.
///
/// `quality` (1-100, higher = larger/less lossy) applies to lossy formats
/// and is ignored otherwise. An RGBA buffer headed for JPEG is converted to
/// RGB once and retried, per the module contract.
pub fn encode(
    buffer: &PixelBuffer,
    format: OutputFormat,
    quality: u8,
) -> Result<EncodedImage, EncodeError> {
    let bytes = match try_encode(buffer, format, quality) {
        Err(EncodeError::UnsupportedColorMode { .. }) => {
            let converted = buffer.to_rgb();
            try_encode(&converted, format, quality)
        }
        other => other,
    }?;

    Ok(EncodedImage { bytes, format })
}

/// Single encode attempt, no mode conversion.
fn try_encode(
    buffer: &PixelBuffer,
    format: OutputFormat,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    validate(buffer)?;
    match format {
        OutputFormat::Jpeg => jpeg::encode_jpeg(buffer, quality),
        OutputFormat::Png => png::encode_png(buffer),
    }
}

/// Shared dimension and pixel-length checks.
fn validate(buffer: &PixelBuffer) -> Result<(), EncodeError> {
    if buffer.width == 0 || buffer.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: buffer.width,
            height: buffer.height,
        });
    }

    let expected =
        (buffer.width as usize) * (buffer.height as usize) * buffer.mode.bytes_per_pixel();
    if buffer.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: buffer.pixels.len(),
        });
    }

    Ok(())
}
