//! Error taxonomy shared by every pipeline stage.
//!
//! Each stage fails fast with a [`RegridError`] that names the stage and the
//! value or metric that caused the failure, so a caller can adjust the
//! configuration and re-run.

use std::fmt;

use thiserror::Error;

use crate::encode::EncodeError;

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Configuration parsing and validation.
    Config,
    /// Image loading.
    Load,
    /// Noise suppression.
    Denoise,
    /// Grid (true resolution) estimation.
    Grid,
    /// Per-cell sampling.
    Sample,
    /// Palette quantization.
    Palette,
    /// Output encoding.
    Encode,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Config => "config",
            Stage::Load => "load",
            Stage::Denoise => "denoise",
            Stage::Grid => "grid",
            Stage::Sample => "sample",
            Stage::Palette => "palette",
            Stage::Encode => "encode",
        };
        f.write_str(name)
    }
}

/// Image axis a grid measurement refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Along the image width (cell width).
    Horizontal,
    /// Along the image height (cell height).
    Vertical,
    /// Both axes at once (isotropic measurements).
    Both,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::Horizontal => "horizontal",
            Axis::Vertical => "vertical",
            Axis::Both => "both",
        };
        f.write_str(name)
    }
}

/// Errors produced by the restoration pipeline.
#[derive(Debug, Error)]
pub enum RegridError {
    /// Malformed or out-of-range configuration.
    #[error("{stage} stage: invalid configuration: {message}")]
    InvalidConfig { stage: Stage, message: String },

    /// The input bytes or file could not be decoded as an image.
    #[error("load stage: unreadable image: {0}")]
    UnreadableImage(String),

    /// No confident grid period could be found.
    #[error("grid stage: ambiguous grid ({axis} axis): {reason}")]
    AmbiguousGrid { axis: Axis, reason: String },

    /// An empty or zero-area intermediate result.
    #[error("{stage} stage: degenerate input: {message}")]
    DegenerateInput { stage: Stage, message: String },

    /// The writer failed to produce output bytes.
    #[error("encode stage: {0}")]
    Encode(#[from] EncodeError),
}

impl RegridError {
    /// Shorthand for an [`RegridError::InvalidConfig`] error.
    pub fn invalid_config(stage: Stage, message: impl Into<String>) -> Self {
        RegridError::InvalidConfig {
            stage,
            message: message.into(),
        }
    }

    /// Shorthand for a [`RegridError::DegenerateInput`] error.
    pub fn degenerate(stage: Stage, message: impl Into<String>) -> Self {
        RegridError::DegenerateInput {
            stage,
            message: message.into(),
        }
    }

    /// Shorthand for an [`RegridError::AmbiguousGrid`] error.
    pub fn ambiguous(axis: Axis, reason: impl Into<String>) -> Self {
        RegridError::AmbiguousGrid {
            axis,
            reason: reason.into(),
        }
    }

    /// The stage that produced this error.
    pub fn stage(&self) -> Stage {
        match self {
            RegridError::InvalidConfig { stage, .. } => *stage,
            RegridError::UnreadableImage(_) => Stage::Load,
            RegridError::AmbiguousGrid { .. } => Stage::Grid,
            RegridError::DegenerateInput { stage, .. } => *stage,
            RegridError::Encode(_) => Stage::Encode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_display_names_stage() {
        let err = RegridError::invalid_config(Stage::Denoise, "kernel_size must be at least 1");
        assert_eq!(
            err.to_string(),
            "denoise stage: invalid configuration: kernel_size must be at least 1"
        );
        assert_eq!(err.stage(), Stage::Denoise);
    }

    #[test]
    fn test_ambiguous_grid_display() {
        let err = RegridError::ambiguous(Axis::Vertical, "prominence 1.80 below required 4.00");
        assert_eq!(
            err.to_string(),
            "grid stage: ambiguous grid (vertical axis): prominence 1.80 below required 4.00"
        );
        assert_eq!(err.stage(), Stage::Grid);
    }

    #[test]
    fn test_unreadable_image_stage() {
        let err = RegridError::UnreadableImage("not a png".to_string());
        assert_eq!(err.stage(), Stage::Load);
        assert!(err.to_string().contains("not a png"));
    }

    #[test]
    fn test_encode_error_converts() {
        let err: RegridError = EncodeError::InvalidDimensions {
            width: 0,
            height: 4,
        }
        .into();
        assert_eq!(err.stage(), Stage::Encode);
        assert!(err.to_string().starts_with("encode stage:"));
    }

    #[test]
    fn test_degenerate_display() {
        let err = RegridError::degenerate(Stage::Palette, "no cells to quantize");
        assert_eq!(
            err.to_string(),
            "palette stage: degenerate input: no cells to quantize"
        );
    }
}
