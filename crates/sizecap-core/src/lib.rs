//! Sizecap Core - size-constrained image shrinking
//!
//! This crate shrinks an image until its encoded byte size fits a budget.
//! The pieces:
//!
//! - `decode` - bytes to pixels (EXIF orientation applied) and exact-size
//!   resizing
//! - `encode` - pixels back to JPEG or PNG bytes, with a one-shot
//!   color-mode conversion retry at the JPEG boundary
//! - `scratch` - a scoped temporary directory for spilling and measuring
//!   candidates, cleaned up on every exit path
//! - `optimize` - the linear search loop tying the above together
//!
//! # Usage
//!
//! ```ignore
//! use sizecap_core::{Optimizer, OptimizerConfig};
//!
//! let bytes = std::fs::read("photo.png").unwrap();
//! let optimizer = Optimizer::new(OptimizerConfig::default());
//! let result = optimizer.optimize(&bytes, "photo.png").unwrap();
//! println!("{} bytes at ratio {}", result.size(), result.ratio);
//! ```

pub mod decode;
pub mod encode;
pub mod optimize;
pub mod scratch;

pub use decode::{decode_image, resize, ColorMode, DecodeError, FilterType, PixelBuffer};
pub use encode::{encode, EncodeError, EncodedImage, OutputFormat};
pub use optimize::{OptimizeError, OptimizedImage, Optimizer, OptimizerConfig};
pub use scratch::{ScratchError, ScratchStore};
