//! Core image type flowing through the pipeline.

use crate::color::Rgb;
use crate::error::{RegridError, Stage};

/// An 8-bit RGB image.
///
/// Stages never mutate an `Image` in place; each produces a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    /// Length should be width * height * 3.
    pub pixels: Vec<u8>,
}

impl Image {
    /// Create a new Image with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize) * 3,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgb) -> Self {
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize) * 3);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create an Image from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert to an image::RgbImage for further processing.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Color at `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 3;
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// Whether the pixel buffer holds exactly `width * height` RGB triples.
    pub fn has_consistent_buffer(&self) -> bool {
        self.pixels.len() == self.pixel_count() * 3
    }

    /// Reject zero-area images and buffers that do not match the dimensions.
    pub(crate) fn ensure_usable(&self, stage: Stage) -> Result<(), RegridError> {
        if self.is_empty() {
            return Err(RegridError::degenerate(
                stage,
                format!("image has zero area ({}x{})", self.width, self.height),
            ));
        }
        if !self.has_consistent_buffer() {
            return Err(RegridError::degenerate(
                stage,
                format!(
                    "pixel buffer holds {} bytes, {}x{} RGB needs {}",
                    self.pixels.len(),
                    self.width,
                    self.height,
                    self.pixel_count() * 3
                ),
            ));
        }
        Ok(())
    }
}
