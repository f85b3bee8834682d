//! Grid estimation WASM bindings.

use crate::config::{parse_config, to_js_error};
use crate::types::{JsGridEstimate, JsImage};
use regrid_core::{denoise, grid, RegridConfig, RegridError};
use wasm_bindgen::prelude::*;

/// Estimate the pixel-block size of an image.
///
/// The image is denoised with the configured filter first, exactly as in a
/// full restoration.
///
/// # Example
///
/// ```typescript
/// const grid = estimate_grid(image, { grid: { method: "reconstruction" } });
/// console.log(`${grid.cell_width}x${grid.cell_height} px cells`);
/// ```
#[wasm_bindgen]
pub fn estimate_grid(image: &JsImage, config: JsValue) -> Result<JsGridEstimate, JsValue> {
    let config = parse_config(config)?;
    estimate_with(image, &config).map_err(to_js_error)
}

pub(crate) fn estimate_with(
    image: &JsImage,
    config: &RegridConfig,
) -> Result<JsGridEstimate, RegridError> {
    let denoised = denoise::denoise(&image.to_image(), &config.denoise)?;
    grid::estimate_grid(&denoised, &config.grid).map(JsGridEstimate::from)
}
