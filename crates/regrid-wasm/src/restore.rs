//! Full restoration WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { restore_pixel_art, decode_image, restore_image } from '@regrid/wasm';
//!
//! // Bytes in, PNG bytes out
//! const png = restore_pixel_art(bytes, { output: { scale: 8 } });
//!
//! // Or keep the indexed result for further editing
//! const restored = restore_image(decode_image(bytes));
//! console.log(`${restored.width}x${restored.height}, ${restored.palette_size} colors`);
//! ```

use crate::config::{parse_config, to_js_error};
use crate::types::{JsImage, JsRestoredImage};
use regrid_core::pipeline;
use wasm_bindgen::prelude::*;

/// Restore a decoded image to its true resolution and palette.
#[wasm_bindgen]
pub fn restore_image(image: &JsImage, config: JsValue) -> Result<JsRestoredImage, JsValue> {
    let config = parse_config(config)?;
    pipeline::restore(&image.to_image(), &config)
        .map(JsRestoredImage::from)
        .map_err(to_js_error)
}

/// Decode, restore and re-encode pixel art in one call.
///
/// # Returns
///
/// PNG bytes as a `Uint8Array`, upscaled by `output.scale`.
#[wasm_bindgen]
pub fn restore_pixel_art(bytes: &[u8], config: JsValue) -> Result<Vec<u8>, JsValue> {
    let config = parse_config(config)?;
    pipeline::restore_bytes(bytes, &config).map_err(to_js_error)
}

#[cfg(test)]
mod tests {
    use crate::decode::decode_bytes;
    use crate::test_fixtures::{block_js_image, block_png};
    use crate::types::{JsImage, JsRestoredImage};
    use regrid_core::{pipeline, PaletteConfig, RegridConfig, RegridError};

    fn exact_config() -> RegridConfig {
        RegridConfig {
            palette: PaletteConfig {
                max_colors: 64,
                min_distance: 0.0,
                ..PaletteConfig::default()
            },
            ..RegridConfig::default()
        }
    }

    #[test]
    fn test_restore_block_image() {
        let img = block_js_image(8, 8, 8);
        let restored: JsRestoredImage = pipeline::restore(&img.to_image(), &exact_config())
            .unwrap()
            .into();
        assert_eq!((restored.width(), restored.height()), (8, 8));
        assert_eq!(restored.palette_size(), 64);
        assert_eq!(restored.grid().cell_width(), 8);
    }

    #[test]
    fn test_short_pixel_buffer_is_rejected() {
        let img = JsImage::new(16, 16, vec![1, 2, 3]);
        let err = pipeline::restore(&img.to_image(), &RegridConfig::default()).unwrap_err();
        assert!(matches!(err, RegridError::DegenerateInput { .. }), "{}", err);
    }

    #[test]
    fn test_restore_bytes_then_decode() {
        let png = pipeline::restore_bytes(&block_png(8, 8, 8), &exact_config()).unwrap();
        let out = decode_bytes(&png).unwrap();
        assert_eq!((out.width(), out.height()), (8, 8));
    }
}
