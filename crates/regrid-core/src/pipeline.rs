//! End-to-end restoration: denoise, estimate the grid, sample, quantize.

use serde::{Deserialize, Serialize};

use crate::config::RegridConfig;
use crate::decode::{load_image, Image};
use crate::denoise::denoise;
use crate::encode::encode_png;
use crate::error::RegridError;
use crate::grid::{estimate_grid, GridEstimate};
use crate::palette::{quantize, Palette};
use crate::reduced::ReducedImage;
use crate::sample::reduce;

/// Result of a full restoration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestoredImage {
    /// Grid the source was sampled on.
    pub grid: GridEstimate,
    pub palette: Palette,
    /// Palette indices at the recovered resolution.
    pub pixels: ReducedImage<u8>,
}

/// Restore `image` to its true resolution and a clean palette.
///
/// The configuration is validated before any stage runs; afterwards the
/// first failing stage's error is returned unchanged.
pub fn restore(image: &Image, config: &RegridConfig) -> Result<RestoredImage, RegridError> {
    config.validate()?;

    let denoised = denoise(image, &config.denoise)?;
    let grid = estimate_grid(&denoised, &config.grid)?;
    let cells = reduce(&denoised, &grid, &config.sample)?;
    let (palette, pixels) = quantize(&cells, &config.palette)?;

    log::info!(
        "restored {}x{} image to {}x{} cells with {} colors",
        image.width,
        image.height,
        pixels.width,
        pixels.height,
        palette.len()
    );

    Ok(RestoredImage {
        grid,
        palette,
        pixels,
    })
}

/// Decode an encoded image, restore it, and encode the result as PNG.
pub fn restore_bytes(bytes: &[u8], config: &RegridConfig) -> Result<Vec<u8>, RegridError> {
    config.validate()?;
    let image = load_image(bytes)?;
    let restored = restore(&image, config)?;
    Ok(encode_png(&restored.pixels, &restored.palette, &config.output)?)
}
