//! True-resolution (grid) estimation.
//!
//! Two interchangeable methods find the pixel-block size:
//! - **Spectral**: each axis independently, from the spectrum of its edge
//!   profile (see [`profile`] and [`spectral`])
//! - **Reconstruction**: one isotropic scale minimizing the error of a
//!   downscale/upscale round trip
//!
//! Either result is cross-checked against the effective rank of the
//! luminance matrix when `rank_check` is enabled. The estimator never falls
//! back to a default size: a weak or implausible result is an
//! [`RegridError::AmbiguousGrid`].

pub mod profile;
pub mod rank;
pub mod reconstruction;
pub mod spectral;

use serde::{Deserialize, Serialize};

use crate::config::{GridConfig, GridMethod};
use crate::decode::Image;
use crate::error::{Axis, RegridError, Stage};

/// Estimated pixel-block size and phase in source pixels.
///
/// Cells start at `offset_x + k * cell_width` across and
/// `offset_y + k * cell_height` down. A non-zero offset leaves a partial
/// cell of `offset` pixels at the leading edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridEstimate {
    /// Cell width in pixels. Always at least 1.
    pub cell_width: u32,
    /// Cell height in pixels. Always at least 1.
    pub cell_height: u32,
    /// First vertical grid line, in `[0, cell_width)`.
    #[serde(default)]
    pub offset_x: u32,
    /// First horizontal grid line, in `[0, cell_height)`.
    #[serde(default)]
    pub offset_y: u32,
    /// Fit quality in `[0, 1]`, when the method provides one.
    pub confidence: Option<f64>,
}

impl GridEstimate {
    /// An origin-aligned grid without a confidence score.
    pub fn new(cell_width: u32, cell_height: u32) -> Self {
        Self {
            cell_width,
            cell_height,
            offset_x: 0,
            offset_y: 0,
            confidence: None,
        }
    }

    /// The same grid with its first lines at `offset_x` and `offset_y`.
    pub fn with_offset(self, offset_x: u32, offset_y: u32) -> Self {
        Self {
            offset_x: offset_x % self.cell_width.max(1),
            offset_y: offset_y % self.cell_height.max(1),
            ..self
        }
    }

    /// Whole cells across and down an image of the given size.
    pub fn cell_counts(&self, width: u32, height: u32) -> (u32, u32) {
        (
            width / self.cell_width.max(1),
            height / self.cell_height.max(1),
        )
    }

    /// Cells across and down at the grid's phase, counting partial cells
    /// on both edges.
    pub fn covering_cell_counts(&self, width: u32, height: u32) -> (u32, u32) {
        (
            covering(width, self.cell_width, self.offset_x),
            covering(height, self.cell_height, self.offset_y),
        )
    }
}

fn covering(dimension: u32, cell: u32, offset: u32) -> u32 {
    let cell = cell.max(1);
    let offset = offset % cell;
    if offset == 0 || dimension <= offset {
        dimension.div_ceil(cell)
    } else {
        1 + (dimension - offset).div_ceil(cell)
    }
}

/// Estimate the grid of `image`.
///
/// # Errors
///
/// - `InvalidConfig` for out-of-range grid options
/// - `DegenerateInput` for a zero-area image or a pixel buffer that does not
///   match the dimensions
/// - `AmbiguousGrid` when no period is prominent enough or the estimate
///   contradicts the image's effective rank
pub fn estimate_grid(image: &Image, config: &GridConfig) -> Result<GridEstimate, RegridError> {
    config.validate()?;
    image.ensure_usable(Stage::Grid)?;

    let (cell_w, cell_h, offset_x, offset_y, confidence) = match config.method {
        GridMethod::Spectral => {
            let horizontal = spectral::estimate_axis(
                &profile::horizontal_profile(image),
                config,
                Axis::Horizontal,
            )?;
            let vertical = spectral::estimate_axis(
                &profile::vertical_profile(image),
                config,
                Axis::Vertical,
            )?;
            (
                horizontal.cell,
                vertical.cell,
                horizontal.offset,
                vertical.offset,
                horizontal.confidence.min(vertical.confidence),
            )
        }
        GridMethod::Reconstruction => {
            let scale = reconstruction::estimate_scale(image, config)?;
            (scale.cell, scale.cell, 0, 0, scale.confidence)
        }
    };

    let grid = GridEstimate {
        cell_width: clamp_cell(cell_w, image.width, config.max_cell_size),
        cell_height: clamp_cell(cell_h, image.height, config.max_cell_size),
        offset_x: 0,
        offset_y: 0,
        confidence: Some(confidence),
    }
    .with_offset(offset_x as u32, offset_y as u32);

    if config.rank_check {
        check_rank(image, &grid, config.rank_tolerance)?;
    }

    log::info!(
        "grid: {}x{} px cells at offset ({}, {}), confidence {:.3}",
        grid.cell_width,
        grid.cell_height,
        grid.offset_x,
        grid.offset_y,
        confidence
    );

    Ok(grid)
}

fn clamp_cell(cell: usize, dimension: u32, max_cell_size: u32) -> u32 {
    let upper = max_cell_size.min(dimension).max(1);
    (cell.min(u32::MAX as usize) as u32).clamp(1, upper)
}

fn check_rank(image: &Image, grid: &GridEstimate, tolerance: f64) -> Result<(), RegridError> {
    let rank = rank::effective_rank(image, tolerance);
    let (cells_x, cells_y) = grid.covering_cell_counts(image.width, image.height);
    log::debug!(
        "rank check: effective rank {}, cells {}x{}",
        rank,
        cells_x,
        cells_y
    );

    if (cells_x as usize) < rank || (cells_y as usize) < rank {
        return Err(RegridError::ambiguous(
            Axis::Both,
            format!(
                "{}x{} cells cannot hold an image of effective rank {}",
                cells_x, cells_y, rank
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{add_noise, block_color, block_image, noise_image};

    #[test]
    fn test_clean_blocks_give_exact_grid_and_full_confidence() {
        let img = block_image(64, 64, 8, 8);
        let grid = estimate_grid(&img, &GridConfig::default()).unwrap();
        assert_eq!((grid.cell_width, grid.cell_height), (8, 8));
        assert_eq!(grid.confidence, Some(1.0));
    }

    #[test]
    fn test_noisy_blocks_recover_grid() {
        for seed in [1u64, 2, 3] {
            let img = add_noise(&block_image(64, 64, 8, 8), 12, seed);
            let grid = estimate_grid(&img, &GridConfig::default()).unwrap();
            assert_eq!((grid.cell_width, grid.cell_height), (8, 8), "seed {}", seed);
        }
    }

    #[test]
    fn test_heavy_noise_still_recovers_grid() {
        for seed in [4u64, 5] {
            let img = add_noise(&block_image(64, 64, 8, 8), 25, seed);
            let grid = estimate_grid(&img, &GridConfig::default()).unwrap();
            assert_eq!((grid.cell_width, grid.cell_height), (8, 8), "seed {}", seed);
        }
    }

    #[test]
    fn test_shifted_grid_recovers_cell_and_phase() {
        for size in [64u32, 68, 72] {
            for shift in 0..8u32 {
                let img = Image::from_fn(size, size, |x, y| {
                    block_color((x + shift) / 8, (y + shift) / 8)
                });
                let grid = estimate_grid(&img, &GridConfig::default()).unwrap();
                let label = format!("{} px, shift {}", size, shift);
                assert_eq!((grid.cell_width, grid.cell_height), (8, 8), "{}", label);
                assert_eq!(grid.offset_x, (8 - shift) % 8, "{}", label);
                assert_eq!(grid.offset_y, (8 - shift) % 8, "{}", label);
                assert_eq!(grid.confidence, Some(1.0), "{}", label);
            }
        }
    }

    #[test]
    fn test_rectangular_cells() {
        let img = block_image(96, 60, 12, 5);
        let grid = estimate_grid(&img, &GridConfig::default()).unwrap();
        assert_eq!((grid.cell_width, grid.cell_height), (12, 5));
    }

    #[test]
    fn test_dimensions_not_multiple_of_cell() {
        let img = block_image(70, 45, 6, 6);
        let grid = estimate_grid(&img, &GridConfig::default()).unwrap();
        assert_eq!((grid.cell_width, grid.cell_height), (6, 6));
    }

    #[test]
    fn test_noise_is_ambiguous() {
        let img = noise_image(64, 64, 7);
        let err = estimate_grid(&img, &GridConfig::default()).unwrap_err();
        assert!(matches!(err, RegridError::AmbiguousGrid { .. }));
        assert_eq!(err.stage(), Stage::Grid);
    }

    #[test]
    fn test_reconstruction_method() {
        let img = block_image(64, 64, 8, 8);
        let config = GridConfig {
            method: GridMethod::Reconstruction,
            ..GridConfig::default()
        };
        let grid = estimate_grid(&img, &config).unwrap();
        assert_eq!((grid.cell_width, grid.cell_height), (8, 8));
        assert_eq!(grid.confidence, Some(1.0));
    }

    #[test]
    fn test_rank_check_rejects_too_few_cells() {
        // Unstructured noise has an effective rank far above 8.
        let img = noise_image(64, 64, 4);
        let err = check_rank(&img, &GridEstimate::new(8, 8), 0.05).unwrap_err();
        assert!(err.to_string().contains("effective rank"), "{}", err);

        assert!(check_rank(&img, &GridEstimate::new(1, 1), 0.05).is_ok());
    }

    #[test]
    fn test_rank_check_counts_partial_cells() {
        // 7 whole cell rows plus a partial eighth.
        let img = block_image(70, 45, 6, 6);
        assert!(check_rank(&img, &GridEstimate::new(6, 6), 0.05).is_ok());
    }

    #[test]
    fn test_empty_image_is_degenerate() {
        let img = Image::new(0, 0, vec![]);
        let err = estimate_grid(&img, &GridConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            RegridError::DegenerateInput {
                stage: Stage::Grid,
                ..
            }
        ));
    }

    #[test]
    fn test_short_pixel_buffer_is_degenerate() {
        let img = Image {
            width: 16,
            height: 16,
            pixels: vec![1, 2, 3],
        };
        let err = estimate_grid(&img, &GridConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            RegridError::DegenerateInput {
                stage: Stage::Grid,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let img = block_image(16, 16, 4, 4);
        let config = GridConfig {
            max_cell_size: 0,
            ..GridConfig::default()
        };
        assert!(matches!(
            estimate_grid(&img, &config),
            Err(RegridError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_clamp_cell() {
        assert_eq!(clamp_cell(0, 10, 64), 1);
        assert_eq!(clamp_cell(80, 100, 64), 64);
        assert_eq!(clamp_cell(12, 10, 64), 10);
        assert_eq!(clamp_cell(5, 10, 64), 5);
    }

    #[test]
    fn test_cell_counts() {
        let grid = GridEstimate::new(8, 5);
        assert_eq!(grid.cell_counts(64, 23), (8, 4));
        assert_eq!(grid.covering_cell_counts(64, 23), (8, 5));

        // A 3 px leading cell, seven whole cells, a 5 px trailing cell.
        let shifted = grid.with_offset(3, 0);
        assert_eq!(shifted.covering_cell_counts(64, 23), (9, 5));
        assert_eq!(shifted.cell_counts(64, 23), (8, 4));
        assert_eq!(GridEstimate::new(8, 5).with_offset(11, 7).offset_x, 3);
    }
}
