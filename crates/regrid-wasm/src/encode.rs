//! PNG encoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { encode_png, encode_restored } from '@regrid/wasm';
//!
//! // From raw indices and a packed RGB palette
//! const png = encode_png(indices, width, height, palette, { output: { scale: 4 } });
//!
//! // From a restore_image result
//! const png = encode_restored(restored);
//! ```

use crate::config::{parse_config, to_js_error};
use crate::types::JsRestoredImage;
use regrid_core::encode;
use regrid_core::{OutputConfig, Palette, ReducedImage, Rgb};
use wasm_bindgen::prelude::*;

/// Encode palette indices to PNG bytes.
///
/// # Arguments
///
/// * `indices` - Row-major palette indices, one byte per cell
/// * `width` - Width in cells
/// * `height` - Height in cells
/// * `palette` - Packed RGB palette (3 bytes per entry)
/// * `config` - Optional config; only its `output` section is used
///
/// # Errors
///
/// Returns an error if the buffers don't match the dimensions, an index is
/// outside the palette, or encoding fails.
#[wasm_bindgen]
pub fn encode_png(
    indices: &[u8],
    width: u32,
    height: u32,
    palette: &[u8],
    config: JsValue,
) -> Result<Vec<u8>, JsValue> {
    let config = parse_config(config)?;
    let (indexed, palette) =
        unpack(indices, width, height, palette).map_err(|e| JsValue::from_str(&e))?;
    encode::encode_png(&indexed, &palette, &config.output)
        .map_err(|e| to_js_error(e.into()))
}

/// Encode a restored image to PNG bytes.
#[wasm_bindgen]
pub fn encode_restored(restored: &JsRestoredImage, config: JsValue) -> Result<Vec<u8>, JsValue> {
    let config = parse_config(config)?;
    encode_with(restored, &config.output).map_err(|e| to_js_error(e.into()))
}

pub(crate) fn encode_with(
    restored: &JsRestoredImage,
    output: &OutputConfig,
) -> Result<Vec<u8>, encode::EncodeError> {
    let inner = restored.inner();
    encode::encode_png(&inner.pixels, &inner.palette, output)
}

/// Rebuild core types from flat JS buffers.
fn unpack(
    indices: &[u8],
    width: u32,
    height: u32,
    palette: &[u8],
) -> Result<(ReducedImage<u8>, Palette), String> {
    let expected = width as usize * height as usize;
    if indices.len() != expected {
        return Err(format!(
            "encode stage: expected {} indices (width * height), got {}",
            expected,
            indices.len()
        ));
    }
    if palette.len() % 3 != 0 {
        return Err(format!(
            "encode stage: palette length {} is not a multiple of 3",
            palette.len()
        ));
    }

    let colors: Vec<Rgb> = palette.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();
    Ok((
        ReducedImage::new(width, height, indices.to_vec()),
        Palette { colors },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_bytes;
    use regrid_core::{GridEstimate, RestoredImage};

    #[test]
    fn test_unpack() {
        let (indexed, palette) = unpack(&[0, 1, 1, 0], 2, 2, &[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(indexed.get(1, 0), 1);
        assert_eq!(palette.colors, vec![[1, 2, 3], [4, 5, 6]]);
    }

    #[test]
    fn test_unpack_length_mismatch() {
        assert!(unpack(&[0, 1, 2], 2, 2, &[0, 0, 0]).is_err());
        assert!(unpack(&[0; 4], 2, 2, &[0, 0]).is_err());
    }

    #[test]
    fn test_encode_restored_scaled() {
        let restored: JsRestoredImage = RestoredImage {
            grid: GridEstimate::new(1, 1),
            palette: Palette {
                colors: vec![[0, 0, 0], [255, 255, 255]],
            },
            pixels: ReducedImage::new(2, 1, vec![0, 1]),
        }
        .into();
        let output = OutputConfig {
            scale: 3,
            ..OutputConfig::default()
        };
        let png = encode_with(&restored, &output).unwrap();
        let img = decode_bytes(&png).unwrap();
        assert_eq!((img.width(), img.height()), (6, 3));
        assert_eq!(&img.pixels()[9..12], &[255, 255, 255]);
    }
}
