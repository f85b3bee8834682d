//! Raster decoding with alpha flattening.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageReader};

use super::Image;
use crate::color::Rgb;
use crate::error::{RegridError, Stage};

/// Background that transparent pixels are composited over.
pub const DEFAULT_BACKGROUND: Rgb = [255, 255, 255];

/// Decode an image from bytes, compositing any alpha over white.
///
/// The format (PNG, JPEG) is detected from the content.
///
/// # Errors
///
/// Returns `RegridError::UnreadableImage` if the bytes are not a supported
/// image, and `RegridError::DegenerateInput` if it has zero area.
pub fn load_image(bytes: &[u8]) -> Result<Image, RegridError> {
    load_image_with_background(bytes, DEFAULT_BACKGROUND)
}

/// Decode an image from bytes, compositing any alpha over `background`.
pub fn load_image_with_background(bytes: &[u8], background: Rgb) -> Result<Image, RegridError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| RegridError::UnreadableImage(e.to_string()))?;

    let img = reader
        .decode()
        .map_err(|e| RegridError::UnreadableImage(e.to_string()))?;

    let image = flatten(img, background);
    if image.is_empty() {
        return Err(RegridError::degenerate(
            Stage::Load,
            format!("image has zero area ({}x{})", image.width, image.height),
        ));
    }

    log::debug!("loaded {}x{} image", image.width, image.height);
    Ok(image)
}

/// Read and decode an image file.
pub fn load_image_path(path: impl AsRef<Path>) -> Result<Image, RegridError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| RegridError::UnreadableImage(format!("{}: {}", path.display(), e)))?;
    load_image(&bytes)
}

/// Composite straight alpha over an opaque background.
fn flatten(img: DynamicImage, background: Rgb) -> Image {
    if !img.color().has_alpha() {
        return Image::from_rgb_image(img.into_rgb8());
    }

    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    let mut pixels = Vec::with_capacity((width as usize) * (height as usize) * 3);

    for px in rgba.pixels() {
        let [r, g, b, a] = px.0;
        let alpha = a as u32;
        for (c, bg) in [r, g, b].into_iter().zip(background) {
            let v = (c as u32 * alpha + bg as u32 * (255 - alpha) + 127) / 255;
            pixels.push(v as u8);
        }
    }

    Image::new(width, height, pixels)
}
