//! PNG encoding of restored pixel art.
//!
//! Each cell becomes a `scale x scale` square of its palette color. With
//! `transparent_background` the region of equal indices reachable from any
//! corner is written with alpha 0.

use std::collections::VecDeque;
use std::io::Cursor;

use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use thiserror::Error;

use crate::config::OutputConfig;
use crate::palette::Palette;
use crate::reduced::ReducedImage;

/// Largest output side the writer accepts.
pub const MAX_OUTPUT_SIDE: u32 = 16_384;

/// Errors that can occur during PNG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Scale factor is zero
    #[error("Invalid scale: {0} must be at least 1")]
    InvalidScale(u32),

    /// A cell refers past the end of the palette
    #[error("Cell index {index} at ({x}, {y}) is outside the {len}-entry palette")]
    IndexOutOfPalette { index: u8, x: u32, y: u32, len: usize },

    /// Upscaled output exceeds the supported size
    #[error("Output {width}x{height} exceeds the {max} px side limit")]
    TooLarge { width: u64, height: u64, max: u32 },

    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode an index grid and its palette to PNG bytes.
///
/// # Arguments
///
/// * `indexed` - Palette indices, one per cell
/// * `palette` - Colors the indices refer to
/// * `options` - Upscale factor and background transparency
///
/// # Returns
///
/// PNG bytes of size `(width * scale) x (height * scale)`: RGB, or RGBA when
/// `transparent_background` is set.
pub fn encode_png(
    indexed: &ReducedImage<u8>,
    palette: &Palette,
    options: &OutputConfig,
) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = (indexed.width, indexed.height);
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }
    if options.scale == 0 {
        return Err(EncodeError::InvalidScale(options.scale));
    }

    let out_w = width as u64 * options.scale as u64;
    let out_h = height as u64 * options.scale as u64;
    if out_w > MAX_OUTPUT_SIDE as u64 || out_h > MAX_OUTPUT_SIDE as u64 {
        return Err(EncodeError::TooLarge {
            width: out_w,
            height: out_h,
            max: MAX_OUTPUT_SIDE,
        });
    }

    for y in 0..height {
        for x in 0..width {
            let index = indexed.get(x, y);
            if index as usize >= palette.len() {
                return Err(EncodeError::IndexOutOfPalette {
                    index,
                    x,
                    y,
                    len: palette.len(),
                });
            }
        }
    }

    let background = if options.transparent_background {
        Some(corner_background(indexed))
    } else {
        None
    };
    let channels = if background.is_some() { 4 } else { 3 };

    let scale = options.scale as usize;
    let row_len = out_w as usize * channels;
    let mut pixels = Vec::with_capacity(row_len * out_h as usize);
    let mut row = Vec::with_capacity(row_len);

    for y in 0..height {
        row.clear();
        for x in 0..width {
            let index = indexed.get(x, y);
            let color = palette.colors[index as usize];
            let clear = background
                .as_ref()
                .is_some_and(|mask| mask[(y * width + x) as usize]);
            for _ in 0..scale {
                row.extend_from_slice(&color);
                if channels == 4 {
                    row.push(if clear { 0 } else { 255 });
                }
            }
        }
        for _ in 0..scale {
            pixels.extend_from_slice(&row);
        }
    }

    let color_type = if channels == 4 {
        ExtendedColorType::Rgba8
    } else {
        ExtendedColorType::Rgb8
    };

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(&pixels, out_w as u32, out_h as u32, color_type)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    log::debug!(
        "encoded {}x{} cells as {}x{} PNG ({} bytes)",
        width,
        height,
        out_w,
        out_h,
        buffer.get_ref().len()
    );

    Ok(buffer.into_inner())
}

/// Cells connected to a corner through 4-neighbours of the same index.
pub fn corner_background(indexed: &ReducedImage<u8>) -> Vec<bool> {
    let (w, h) = (indexed.width as usize, indexed.height as usize);
    let mut mask = vec![false; w * h];
    if w == 0 || h == 0 {
        return mask;
    }

    let mut queue = VecDeque::new();
    for (x, y) in [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)] {
        let i = y * w + x;
        if mask[i] {
            continue;
        }
        let target = indexed.cells[i];
        mask[i] = true;
        queue.push_back((x, y));

        while let Some((cx, cy)) = queue.pop_front() {
            let neighbours = [
                (cx.wrapping_sub(1), cy),
                (cx + 1, cy),
                (cx, cy.wrapping_sub(1)),
                (cx, cy + 1),
            ];
            for (nx, ny) in neighbours {
                if nx >= w || ny >= h {
                    continue;
                }
                let n = ny * w + nx;
                if !mask[n] && indexed.cells[n] == target {
                    mask[n] = true;
                    queue.push_back((nx, ny));
                }
            }
        }
    }

    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> image::DynamicImage {
        image::load_from_memory(bytes).unwrap()
    }

    fn two_color() -> (ReducedImage<u8>, Palette) {
        let indexed = ReducedImage::new(2, 2, vec![0, 1, 1, 0]);
        let palette = Palette {
            colors: vec![[255, 0, 0], [0, 0, 255]],
        };
        (indexed, palette)
    }

    #[test]
    fn test_encode_png_basic() {
        let (indexed, palette) = two_color();
        let bytes = encode_png(&indexed, &palette, &OutputConfig::default()).unwrap();

        // PNG signature
        assert_eq!(&bytes[0..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);

        let img = decode(&bytes).into_rgb8();
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(img.get_pixel(1, 0).0, [0, 0, 255]);
    }

    #[test]
    fn test_encode_png_scaled() {
        let (indexed, palette) = two_color();
        let options = OutputConfig {
            scale: 3,
            ..OutputConfig::default()
        };
        let img = decode(&encode_png(&indexed, &palette, &options).unwrap()).into_rgb8();
        assert_eq!(img.dimensions(), (6, 6));
        assert_eq!(img.get_pixel(2, 2).0, [255, 0, 0]);
        assert_eq!(img.get_pixel(3, 2).0, [0, 0, 255]);
        assert_eq!(img.get_pixel(5, 5).0, [255, 0, 0]);
    }

    #[test]
    fn test_encode_png_transparent_background() {
        // Ring of index 0 around a single index-1 cell.
        let mut cells = vec![0u8; 9];
        cells[4] = 1;
        let indexed = ReducedImage::new(3, 3, cells);
        let palette = Palette {
            colors: vec![[255, 255, 255], [10, 20, 30]],
        };
        let options = OutputConfig {
            transparent_background: true,
            ..OutputConfig::default()
        };
        let img = decode(&encode_png(&indexed, &palette, &options).unwrap()).into_rgba8();
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
        assert_eq!(img.get_pixel(1, 0).0[3], 0);
        assert_eq!(img.get_pixel(1, 1).0, [10, 20, 30, 255]);
    }

    #[test]
    fn test_corner_background_stops_at_other_indices() {
        // Index 0 on the left edge, a wall of 1s, and an enclosed 0 on the right.
        let indexed = ReducedImage::new(
            4,
            3,
            vec![
                0, 1, 0, 1, //
                0, 1, 0, 1, //
                0, 1, 1, 1,
            ],
        );
        let mask = corner_background(&indexed);
        assert_eq!(
            mask,
            vec![
                true, true, false, true, //
                true, true, false, true, //
                true, true, true, true,
            ]
        );
    }

    #[test]
    fn test_encode_png_invalid_dimensions() {
        let indexed = ReducedImage::new(0, 3, vec![]);
        let palette = Palette {
            colors: vec![[0, 0, 0]],
        };
        let result = encode_png(&indexed, &palette, &OutputConfig::default());
        assert!(matches!(
            result,
            Err(EncodeError::InvalidDimensions {
                width: 0,
                height: 3
            })
        ));
    }

    #[test]
    fn test_encode_png_index_out_of_palette() {
        let indexed = ReducedImage::new(2, 1, vec![0, 2]);
        let palette = Palette {
            colors: vec![[0, 0, 0], [1, 1, 1]],
        };
        let result = encode_png(&indexed, &palette, &OutputConfig::default());
        assert!(matches!(
            result,
            Err(EncodeError::IndexOutOfPalette {
                index: 2,
                x: 1,
                y: 0,
                len: 2
            })
        ));
    }

    #[test]
    fn test_encode_png_too_large() {
        let indexed = ReducedImage::new(1000, 1, vec![0; 1000]);
        let palette = Palette {
            colors: vec![[0, 0, 0]],
        };
        let options = OutputConfig {
            scale: 64,
            ..OutputConfig::default()
        };
        let result = encode_png(&indexed, &palette, &options);
        assert!(matches!(result, Err(EncodeError::TooLarge { .. })));
    }

    #[test]
    fn test_encode_png_zero_scale() {
        let (indexed, palette) = two_color();
        let options = OutputConfig {
            scale: 0,
            ..OutputConfig::default()
        };
        assert!(matches!(
            encode_png(&indexed, &palette, &options),
            Err(EncodeError::InvalidScale(0))
        ));
    }
}
