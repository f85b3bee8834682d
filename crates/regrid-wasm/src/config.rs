//! Configuration and error conversion at the JavaScript boundary.
//!
//! Every binding takes an optional plain JS object shaped like
//! `RegridConfig`; `undefined` and `null` select the defaults.
//!
//! ```typescript
//! const png = restore_pixel_art(bytes, {
//!   palette: { max_colors: 8, algorithm: "median-cut" },
//!   output: { scale: 4, transparent_background: true },
//! });
//! ```

use regrid_core::{RegridConfig, RegridError};
use wasm_bindgen::prelude::*;

/// Deserialize and validate an optional config object.
pub(crate) fn parse_config(value: JsValue) -> Result<RegridConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(RegridConfig::default());
    }
    let config: RegridConfig = serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("config stage: invalid configuration: {}", e)))?;
    config.validate().map_err(to_js_error)?;
    Ok(config)
}

pub(crate) fn to_js_error(err: RegridError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// The default configuration as a plain JS object.
#[wasm_bindgen]
pub fn default_config() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&RegridConfig::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
