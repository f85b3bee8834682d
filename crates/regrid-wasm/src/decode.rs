//! Image decoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image } from '@regrid/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! console.log(`Decoded ${image.width}x${image.height}`);
//! ```

use crate::config::to_js_error;
use crate::types::JsImage;
use regrid_core::{decode, RegridError};
use wasm_bindgen::prelude::*;

/// Decode a PNG or JPEG image from bytes.
///
/// Transparent pixels are composited over white.
///
/// # Errors
///
/// Returns an error if the bytes are not a supported image or the image has
/// zero area.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsImage, JsValue> {
    decode_bytes(bytes).map_err(to_js_error)
}

pub(crate) fn decode_bytes(bytes: &[u8]) -> Result<JsImage, RegridError> {
    decode::load_image(bytes).map(JsImage::from_image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regrid_core::{encode_png, OutputConfig, Palette, ReducedImage, Stage};

    #[test]
    fn test_decode_png() {
        let indexed = ReducedImage::new(2, 1, vec![0, 1]);
        let palette = Palette {
            colors: vec![[1, 2, 3], [250, 0, 9]],
        };
        let bytes = encode_png(&indexed, &palette, &OutputConfig::default()).unwrap();

        let img = decode_bytes(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (2, 1));
        assert_eq!(img.pixels(), vec![1, 2, 3, 250, 0, 9]);
    }

    #[test]
    fn test_decode_garbage_fails_in_load_stage() {
        let err = decode_bytes(b"definitely not a png").err().unwrap();
        assert_eq!(err.stage(), Stage::Load);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_decode_invalid_bytes_is_error() {
        let err = decode_image(&[0, 1, 2, 3]).err().unwrap();
        assert!(err.as_string().unwrap().starts_with("load stage"));
    }
}
