//! Regrid WASM - WebAssembly bindings for Regrid
//!
//! This crate provides WASM bindings to expose the regrid-core pipeline
//! to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for images and results
//! - `config` - Optional JS config objects and error conversion
//! - `decode` - Image decoding bindings (PNG, JPEG)
//! - `grid` - Grid (true resolution) estimation
//! - `restore` - Full restoration pipeline
//! - `encode` - PNG encoding bindings
//!
//! # Usage
//!
//! ```typescript
//! import init, { restore_pixel_art } from '@regrid/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const png = restore_pixel_art(bytes, { palette: { max_colors: 12 } });
//! ```

use wasm_bindgen::prelude::*;

mod config;
mod decode;
mod encode;
mod grid;
mod logging;
mod restore;
mod types;

#[cfg(test)]
mod test_fixtures;

// Re-export public types
pub use config::default_config;
pub use decode::decode_image;
pub use encode::{encode_png, encode_restored};
pub use grid::estimate_grid;
pub use restore::{restore_image, restore_pixel_art};
pub use types::{JsGridEstimate, JsImage, JsRestoredImage};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logging::init(log::LevelFilter::Info);
}

/// Set the console log level ("error", "warn", "info", "debug", "trace" or "off").
#[wasm_bindgen]
pub fn set_log_level(level: &str) {
    logging::init(logging::parse_level(level));
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
