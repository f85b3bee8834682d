//! Per-axis period search on an edge profile.
//!
//! 1. Detrend the profile and take its zero-padded magnitude spectrum, so
//!    periods that do not divide the axis length still give sharp peaks.
//! 2. Search frequencies whose period lies in `[2, max_cell]`; among those
//!    within `tolerance` of the strongest, keep the lowest and climb to its
//!    local maximum.
//! 3. Refine the fractional period to an integer by comb contrast: mean
//!    edge energy on the comb minus the mean off it, best offset.
//! 4. Coarsen to a multiple of that period while the comb lines the
//!    multiple drops carry no more than `tolerance` of the contrast. A
//!    harmonic of the true period passes this test, the true period fails it.
//! 5. Prominence is the contrast in standard deviations of the off-comb
//!    lines, so a uniform noise floor does not dilute a strong comb.

use super::profile::comb_sum;
use crate::config::GridConfig;
use crate::error::{Axis, RegridError};
use crate::fourier::magnitude_spectrum;

const FLAT_EPSILON: f64 = 1e-9;

/// Spectrum bins per cycle over the axis length.
const OVERSAMPLE: usize = 8;

/// Result of a single-axis search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisEstimate {
    /// Cell size along the axis in pixels.
    pub cell: usize,
    /// First grid line in `[0, cell)`; cells start at `offset + k * cell`.
    pub offset: usize,
    /// Fractional period of the chosen spectral peak.
    pub period: f64,
    /// On-comb minus off-comb mean, over the off-comb standard deviation.
    /// Infinite when the off-comb lines are all equal.
    pub prominence: f64,
    /// Fraction of edge energy on the detected grid lines.
    pub confidence: f64,
}

/// Estimate the cell size and phase along one axis from its edge profile.
pub fn estimate_axis(
    profile: &[f64],
    config: &GridConfig,
    axis: Axis,
) -> Result<AxisEstimate, RegridError> {
    let n = profile.len();
    if n < 4 {
        return Err(RegridError::ambiguous(
            axis,
            format!("axis of {} px is too short to hold two cells", n),
        ));
    }

    let max_cell = (config.max_cell_size as usize).clamp(2, n / 2);
    let padded = n * OVERSAMPLE;
    let j_min = padded.div_ceil(max_cell);
    let j_max = padded / 2;

    // Entry 0 is the image border.
    let total: f64 = profile.iter().skip(1).sum();
    if total <= FLAT_EPSILON {
        return Err(RegridError::ambiguous(axis, "edge profile is flat"));
    }

    let mean = profile.iter().sum::<f64>() / n as f64;
    let detrended: Vec<f64> = profile.iter().map(|&v| v - mean).collect();
    let mags = magnitude_spectrum(&detrended, padded);

    let peak = mags[j_min..=j_max].iter().copied().fold(0.0f64, f64::max);
    if peak <= FLAT_EPSILON * total {
        return Err(RegridError::ambiguous(
            axis,
            "edge profile has no periodic component",
        ));
    }

    // Lowest frequency within tolerance of the peak, then up to its local maximum.
    let threshold = (1.0 - config.tolerance) * peak;
    let mut j = (j_min..=j_max)
        .find(|&j| mags[j] >= threshold)
        .unwrap_or(j_min);
    while j < j_max && mags[j + 1] > mags[j] {
        j += 1;
    }

    let period = padded as f64 / j as f64;
    let fit = refine_period(profile, period, max_cell, config.tolerance);
    let prominence = fit.prominence(total);

    log::debug!(
        "{} axis: spectral period {:.2} px, refined cell {} px at offset {}, prominence {:.2}",
        axis,
        period,
        fit.cell,
        fit.offset,
        prominence
    );

    if prominence < config.min_prominence {
        return Err(RegridError::ambiguous(
            axis,
            format!(
                "prominence {:.2} below required {:.2} (period {} px)",
                prominence, config.min_prominence, fit.cell
            ),
        ));
    }

    Ok(AxisEstimate {
        cell: fit.cell,
        offset: fit.offset,
        period,
        prominence,
        confidence: (fit.on_sum / total).clamp(0.0, 1.0),
    })
}

/// Edge statistics of one placement of a comb over the profile.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CombFit {
    cell: usize,
    offset: usize,
    on_sum: f64,
    on_count: usize,
    off_mean: f64,
    off_sd: f64,
}

impl CombFit {
    /// Lines `x ≡ offset (mod cell)` against all other non-border lines.
    fn measure(profile: &[f64], cell: usize, offset: usize) -> Self {
        let (on_sum, on_count) = comb_sum(profile, cell, offset);
        let off: Vec<f64> = profile
            .iter()
            .enumerate()
            .skip(1)
            .filter(|&(x, _)| x % cell != offset)
            .map(|(_, &v)| v)
            .collect();

        let (off_mean, off_sd) = if off.is_empty() {
            (0.0, 0.0)
        } else {
            let count = off.len() as f64;
            let mean = off.iter().sum::<f64>() / count;
            let var = off.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / count;
            (mean, var.sqrt())
        };

        Self {
            cell,
            offset,
            on_sum,
            on_count,
            off_mean,
            off_sd,
        }
    }

    /// The offset of `cell` with the best contrast; the first on ties.
    fn best_offset(profile: &[f64], cell: usize) -> Self {
        let mut best = Self::measure(profile, cell, 0);
        for offset in 1..cell {
            let fit = Self::measure(profile, cell, offset);
            if fit.contrast() > best.contrast() {
                best = fit;
            }
        }
        best
    }

    fn on_mean(&self) -> f64 {
        if self.on_count == 0 {
            0.0
        } else {
            self.on_sum / self.on_count as f64
        }
    }

    fn contrast(&self) -> f64 {
        self.on_mean() - self.off_mean
    }

    fn prominence(&self, total: f64) -> f64 {
        let contrast = self.contrast();
        if contrast <= 0.0 {
            0.0
        } else if self.off_sd <= FLAT_EPSILON * total {
            f64::INFINITY
        } else {
            contrast / self.off_sd
        }
    }
}

/// Pick the integer period near `period` with the best comb contrast, then
/// coarsen it to the largest multiple the profile supports.
fn refine_period(profile: &[f64], period: f64, max_cell: usize, tolerance: f64) -> CombFit {
    let lo = (period.floor() as usize).saturating_sub(1).clamp(2, max_cell);
    let hi = (period.ceil() as usize + 1).min(max_cell).max(lo);

    let distance = |c: usize| (c as f64 - period).abs();
    let mut fit = CombFit::best_offset(profile, lo);
    for c in lo + 1..=hi {
        let candidate = CombFit::best_offset(profile, c);
        let (score, best) = (candidate.contrast(), fit.contrast());
        if score > best || (score == best && distance(c) < distance(fit.cell)) {
            fit = candidate;
        }
    }

    loop {
        let coarser =
            (2..=max_cell / fit.cell).find_map(|m| coarsen(profile, &fit, m, tolerance));
        match coarser {
            Some(next) => fit = next,
            None => return fit,
        }
    }
}

/// Try `m * fit.cell` at the sub-comb of `fit` carrying the most energy.
///
/// Accepted when the `fit` lines left off the coarser comb sit within
/// `tolerance` of the contrast above the off-comb floor.
fn coarsen(profile: &[f64], fit: &CombFit, m: usize, tolerance: f64) -> Option<CombFit> {
    let cell = fit.cell * m;
    let (offset, sub_sum, sub_count) = (0..m)
        .map(|i| {
            let offset = fit.offset + i * fit.cell;
            let (sum, count) = comb_sum(profile, cell, offset);
            (offset, sum, count)
        })
        .filter(|&(_, _, count)| count > 0)
        .fold(None, |best: Option<(usize, f64, usize)>, next| match best {
            Some(b) if b.1 / b.2 as f64 >= next.1 / next.2 as f64 => Some(b),
            _ => Some(next),
        })?;

    let rest_count = fit.on_count.checked_sub(sub_count).filter(|&c| c > 0)?;
    let sub_mean = sub_sum / sub_count as f64;
    let rest_mean = (fit.on_sum - sub_sum) / rest_count as f64;

    let lift = sub_mean - fit.off_mean;
    if lift > 0.0 && rest_mean - fit.off_mean <= tolerance * lift {
        Some(CombFit::measure(profile, cell, offset))
    } else {
        None
    }
}
