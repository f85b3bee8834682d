//! Synthetic block images for native tests.

use crate::decode::decode_bytes;
use crate::types::JsImage;
use regrid_core::{encode_png, OutputConfig, Palette, ReducedImage, Rgb};

const LEVELS: [u8; 4] = [24, 88, 152, 216];

fn block_palette() -> Palette {
    let colors: Vec<Rgb> = (0..64usize)
        .map(|i| [LEVELS[i % 4], LEVELS[(i / 4) % 4], LEVELS[(i / 16) % 4]])
        .collect();
    Palette { colors }
}

/// PNG of `cols x rows` flat blocks, each `cell` pixels square.
pub fn block_png(cols: u32, rows: u32, cell: u32) -> Vec<u8> {
    let indices = (0..cols * rows).map(|i| (i % 64) as u8).collect();
    let output = OutputConfig {
        scale: cell,
        ..OutputConfig::default()
    };
    encode_png(&ReducedImage::new(cols, rows, indices), &block_palette(), &output).unwrap()
}

pub fn block_js_image(cols: u32, rows: u32, cell: u32) -> JsImage {
    decode_bytes(&block_png(cols, rows, cell)).unwrap()
}
