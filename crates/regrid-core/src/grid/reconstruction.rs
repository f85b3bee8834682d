//! Isotropic scale search by reconstruction error.
//!
//! For each candidate scale `c` the image is box-downscaled by `c` and
//! upscaled back with nearest neighbour; the mean squared error of that
//! round trip is the within-cell variance. The true scale is the largest
//! one whose error stays near the best.

use crate::config::GridConfig;
use crate::decode::Image;
use crate::error::{Axis, RegridError};

const FLAT_EPSILON: f64 = 1e-9;

/// Result of the isotropic search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleEstimate {
    pub cell: usize,
    /// Median error over the best error. Infinite for a perfect fit.
    pub prominence: f64,
    pub confidence: f64,
}

/// Find the isotropic cell size minimizing round-trip error.
pub fn estimate_scale(image: &Image, config: &GridConfig) -> Result<ScaleEstimate, RegridError> {
    let w = image.width as usize;
    let h = image.height as usize;
    let max_cell = (config.max_cell_size as usize).min(w / 2).min(h / 2);
    if max_cell < 2 {
        return Err(RegridError::ambiguous(
            Axis::Both,
            format!("{}x{} image is too small to hold two cells per axis", w, h),
        ));
    }

    let errors: Vec<(usize, f64)> = (2..=max_cell)
        .map(|c| (c, reconstruction_error(image, c)))
        .collect();

    let best = errors.iter().map(|&(_, e)| e).fold(f64::INFINITY, f64::min);
    let median = median_error(&errors);
    if median <= FLAT_EPSILON {
        return Err(RegridError::ambiguous(
            Axis::Both,
            "reconstruction error is zero at every scale",
        ));
    }

    let threshold = best + config.tolerance * (median - best);
    let (cell, error) = errors
        .iter()
        .rev()
        .find(|&&(_, e)| e <= threshold)
        .copied()
        .unwrap_or(errors[0]);

    let prominence = if best <= FLAT_EPSILON {
        f64::INFINITY
    } else {
        median / best
    };

    log::debug!(
        "reconstruction: cell {} px, error {:.3}, best {:.3}, median {:.3}, prominence {:.2}",
        cell,
        error,
        best,
        median,
        prominence
    );

    if prominence < config.min_prominence {
        return Err(RegridError::ambiguous(
            Axis::Both,
            format!(
                "prominence {:.2} below required {:.2} (scale {} px)",
                prominence, config.min_prominence, cell
            ),
        ));
    }

    Ok(ScaleEstimate {
        cell,
        prominence,
        confidence: (1.0 - error / median).clamp(0.0, 1.0),
    })
}

/// Mean squared error per channel of a box-down, nearest-up round trip at scale `c`.
///
/// Only whole cells are measured.
fn reconstruction_error(image: &Image, c: usize) -> f64 {
    let w = image.width as usize;
    let cells_x = w / c;
    let cells_y = image.height as usize / c;
    let n = (c * c) as f64;

    let mut sum_sq_err = 0.0;
    for cy in 0..cells_y {
        for cx in 0..cells_x {
            let mut sum = [0.0f64; 3];
            let mut sum_sq = [0.0f64; 3];
            for y in cy * c..(cy + 1) * c {
                let row = &image.pixels[(y * w + cx * c) * 3..(y * w + (cx + 1) * c) * 3];
                for px in row.chunks_exact(3) {
                    for ch in 0..3 {
                        let v = px[ch] as f64;
                        sum[ch] += v;
                        sum_sq[ch] += v * v;
                    }
                }
            }
            for ch in 0..3 {
                sum_sq_err += sum_sq[ch] - sum[ch] * sum[ch] / n;
            }
        }
    }

    let measured = (cells_x * cells_y * c * c * 3) as f64;
    (sum_sq_err / measured).max(0.0)
}

fn median_error(errors: &[(usize, f64)]) -> f64 {
    let mut values: Vec<f64> = errors.iter().map(|&(_, e)| e).collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values[values.len() / 2]
}
