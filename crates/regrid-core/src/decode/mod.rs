//! Image loading for the restoration pipeline.
//!
//! This module provides functionality for:
//! - Decoding PNG and JPEG input from bytes or from a file path
//! - Flattening transparency onto an opaque background
//!
//! # Examples
//!
//! ```ignore
//! use regrid_core::decode::load_image;
//!
//! let bytes = std::fs::read("sprite.png").unwrap();
//! let image = load_image(&bytes).unwrap();
//! println!("Loaded {}x{} image", image.width, image.height);
//! ```

mod load;
mod types;

pub use load::{load_image, load_image_path, load_image_with_background, DEFAULT_BACKGROUND};
pub use types::Image;
