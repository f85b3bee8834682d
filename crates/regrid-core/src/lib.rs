//! Regrid Core - pixel art restoration library
//!
//! This crate recovers the true resolution of AI-generated "pixel art" and
//! cleans up its palette. An image flows through four stages:
//!
//! 1. [`denoise`] - edge-preserving noise suppression
//! 2. [`grid`] - estimation of the pixel-block (cell) size
//! 3. [`sample`] - reduction of every cell to one color
//! 4. [`palette`] - quantization of the cell colors to a small palette
//!
//! [`pipeline::restore`] runs all four; [`encode`] writes the result as PNG.

pub mod color;
pub mod config;
pub mod decode;
pub mod denoise;
pub mod encode;
pub mod error;
pub mod fourier;
pub mod grid;
pub mod palette;
pub mod pipeline;
pub mod reduced;
pub mod sample;

mod rows;

#[cfg(test)]
pub(crate) mod test_support;

pub use color::{ColorMetric, Rgb};
pub use config::{
    DenoiseConfig, EdgePolicy, FilterKind, GridConfig, GridMethod, OutputConfig, PaletteAlgorithm,
    PaletteConfig, RegridConfig, SampleConfig, SampleStrategy, StochasticReducer,
};
pub use decode::{load_image, load_image_path, Image};
pub use encode::{encode_png, EncodeError};
pub use error::{Axis, RegridError, Stage};
pub use grid::{estimate_grid, GridEstimate};
pub use palette::{quantize, Palette};
pub use pipeline::{restore, restore_bytes, RestoredImage};
pub use reduced::ReducedImage;
pub use sample::reduce;
