//! WASM-compatible wrapper types for pipeline data.
//!
//! This module provides JavaScript-friendly types that wrap the core Regrid types,
//! handling the conversion between Rust and JavaScript data representations.

use regrid_core::{GridEstimate, Image, RestoredImage};
use wasm_bindgen::prelude::*;

/// An RGB image wrapper for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`.
#[wasm_bindgen]
pub struct JsImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsImage {
    /// Create a new JsImage from dimensions and pixel data.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsImage {
        JsImage {
            width,
            height,
            pixels,
        }
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 3)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGB pixel data as Uint8Array (a copy).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }
}

impl JsImage {
    pub(crate) fn from_image(img: Image) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Convert to a core Image. Clones the pixel data.
    pub(crate) fn to_image(&self) -> Image {
        Image {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }
}

/// Estimated cell size for JavaScript.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy)]
pub struct JsGridEstimate {
    inner: GridEstimate,
}

#[wasm_bindgen]
impl JsGridEstimate {
    /// Cell width in source pixels
    #[wasm_bindgen(getter)]
    pub fn cell_width(&self) -> u32 {
        self.inner.cell_width
    }

    /// Cell height in source pixels
    #[wasm_bindgen(getter)]
    pub fn cell_height(&self) -> u32 {
        self.inner.cell_height
    }

    /// First vertical grid line in source pixels, in [0, cell_width)
    #[wasm_bindgen(getter)]
    pub fn offset_x(&self) -> u32 {
        self.inner.offset_x
    }

    /// First horizontal grid line in source pixels, in [0, cell_height)
    #[wasm_bindgen(getter)]
    pub fn offset_y(&self) -> u32 {
        self.inner.offset_y
    }

    /// Fit quality in [0, 1], or undefined
    #[wasm_bindgen(getter)]
    pub fn confidence(&self) -> Option<f64> {
        self.inner.confidence
    }
}

impl From<GridEstimate> for JsGridEstimate {
    fn from(inner: GridEstimate) -> Self {
        Self { inner }
    }
}

/// Restored pixel art: palette indices at the recovered resolution.
#[wasm_bindgen]
pub struct JsRestoredImage {
    inner: RestoredImage,
}

#[wasm_bindgen]
impl JsRestoredImage {
    /// Width in cells
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.pixels.width
    }

    /// Height in cells
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.pixels.height
    }

    /// Number of palette entries
    #[wasm_bindgen(getter)]
    pub fn palette_size(&self) -> usize {
        self.inner.palette.len()
    }

    /// Grid the source image was sampled on
    #[wasm_bindgen(getter)]
    pub fn grid(&self) -> JsGridEstimate {
        self.inner.grid.into()
    }

    /// Row-major palette indices as Uint8Array.
    pub fn indices(&self) -> Vec<u8> {
        self.inner.pixels.cells.clone()
    }

    /// Palette as packed RGB bytes (3 per entry).
    pub fn palette(&self) -> Vec<u8> {
        self.inner.palette.colors.iter().flatten().copied().collect()
    }

    /// Expanded RGB pixels at cell resolution (3 bytes per cell), or
    /// undefined if an index lies outside the palette.
    pub fn pixels(&self) -> Option<Vec<u8>> {
        let colors = self.inner.palette.apply(&self.inner.pixels)?;
        Some(colors.cells.into_iter().flatten().collect())
    }

    /// The restored image at cell resolution, or undefined if an index lies
    /// outside the palette.
    pub fn to_image(&self) -> Option<JsImage> {
        self.pixels()
            .map(|pixels| JsImage::new(self.width(), self.height(), pixels))
    }
}

impl JsRestoredImage {
    pub(crate) fn inner(&self) -> &RestoredImage {
        &self.inner
    }
}

impl From<RestoredImage> for JsRestoredImage {
    fn from(inner: RestoredImage) -> Self {
        Self { inner }
    }
}
