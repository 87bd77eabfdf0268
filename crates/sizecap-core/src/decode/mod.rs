//! Image decoding for Sizecap.
//!
//! This module provides functionality for:
//! - Decoding image bytes in any format the `image` crate is built with
//! - Applying EXIF orientation so re-encoded output displays upright
//! - Exact-dimension resizing for the optimization loop
//!
//! All operations are synchronous and allocate fresh buffers; nothing here
//! touches the filesystem.

mod loader;
mod resize;
mod types;

pub use loader::decode_image;
pub use resize::{resize, scaled_dimensions};
pub use types::{ColorMode, DecodeError, FilterType, Orientation, PixelBuffer};
