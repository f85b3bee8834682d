//! Output writer for restored pixel art.
//!
//! This module provides functionality for:
//! - Encoding a palette-indexed image to PNG
//! - Nearest-neighbour upscaling of cells to display size
//! - Optional transparent background from the image corners
//!
//! # Examples
//!
//! ```ignore
//! use regrid_core::encode::encode_png;
//!
//! let restored = regrid_core::restore(&image, &config)?;
//! let png = encode_png(&restored.pixels, &restored.palette, &config.output)?;
//! println!("Encoded {} bytes", png.len());
//! ```

mod png;

pub use png::{corner_background, encode_png, EncodeError, MAX_OUTPUT_SIDE};
