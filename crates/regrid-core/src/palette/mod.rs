//! Palette quantization of reduced cells.
//!
//! The raw per-cell colors from the sampler are clustered into at most
//! `max_colors` entries, near-duplicates closer than `min_distance` are
//! merged, and every cell is replaced by the index of its nearest entry.
//!
//! # Invariants
//!
//! - `palette.len() <= max_colors`
//! - every pair of entries is at least `min_distance` apart under the metric
//! - entries are distinct and each is used by at least one cell
//! - entries are ordered by descending usage, ties by color value

pub mod histogram;
pub mod kmeans;
pub mod median_cut;
pub mod merge;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::color::{ColorMetric, Rgb};
use crate::config::{PaletteAlgorithm, PaletteConfig};
use crate::error::{RegridError, Stage};
use crate::reduced::ReducedImage;

use histogram::{color_histogram, weighted_points, HistogramEntry};
use merge::{merge_close, Candidate};

/// Assign/reorder rounds before settling on the current order.
const MAX_ORDER_ROUNDS: usize = 8;

/// Final output colors.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Palette {
    pub colors: Vec<Rgb>,
}

impl Palette {
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: u8) -> Option<Rgb> {
        self.colors.get(index as usize).copied()
    }

    /// Expand an index grid back to colors.
    ///
    /// Returns `None` if any index lies outside the palette.
    pub fn apply(&self, indices: &ReducedImage<u8>) -> Option<ReducedImage<Rgb>> {
        let cells = indices
            .cells
            .iter()
            .map(|&i| self.get(i))
            .collect::<Option<Vec<Rgb>>>()?;
        Some(ReducedImage::new(indices.width, indices.height, cells))
    }
}

/// Quantize reduced cells to a palette and an index grid.
///
/// # Errors
///
/// - `InvalidConfig` (stage `palette`) for out-of-range options
/// - `DegenerateInput` (stage `palette`) when `cells` holds no cells
pub fn quantize(
    cells: &ReducedImage<Rgb>,
    config: &PaletteConfig,
) -> Result<(Palette, ReducedImage<u8>), RegridError> {
    config.validate()?;
    if cells.is_empty() {
        return Err(RegridError::degenerate(
            Stage::Palette,
            format!("reduced image {}x{} has no cells", cells.width, cells.height),
        ));
    }

    let metric = config.metric;
    let hist = color_histogram(&cells.cells);
    let candidates = candidate_entries(&hist, config);
    let candidate_count = candidates.len();
    let merged = merge_close(candidates, config.min_distance, metric);
    let colors = order_by_usage(&hist, merged.iter().map(|c| c.color).collect(), metric);

    log::info!(
        "palette: {} distinct colors -> {} candidates -> {} entries ({:?}, min distance {})",
        hist.len(),
        candidate_count,
        colors.len(),
        config.algorithm,
        config.min_distance
    );

    let lookup = index_lookup(&hist, &colors, metric);
    let indices = cells.map(|c| lookup.get(&c).copied().unwrap_or(0));

    Ok((Palette { colors }, indices))
}

/// Pre-merge entries: the distinct colors themselves when they fit, cluster
/// centers otherwise.
fn candidate_entries(hist: &[HistogramEntry], config: &PaletteConfig) -> Vec<Candidate> {
    if hist.len() <= config.max_colors {
        return hist
            .iter()
            .map(|e| Candidate {
                color: e.color,
                weight: e.count as f32,
            })
            .collect();
    }

    let points = weighted_points(hist, config.metric);
    let centers = match config.algorithm {
        PaletteAlgorithm::KMeans => kmeans::kmeans(&points, config.max_colors),
        PaletteAlgorithm::MedianCut => median_cut::median_cut(&points, config.max_colors),
    };
    log::debug!("palette: {} cluster centers", centers.len());

    let colors: Vec<Rgb> = centers.iter().map(|&p| config.metric.from_space(p)).collect();
    let weights = usage(hist, &colors, config.metric);

    colors
        .into_iter()
        .zip(weights)
        .filter(|&(_, w)| w > 0)
        .map(|(color, w)| Candidate {
            color,
            weight: w as f32,
        })
        .collect()
}

/// Index of the nearest palette entry for each histogram entry.
fn assign(hist: &[HistogramEntry], colors: &[Rgb], metric: ColorMetric) -> Vec<usize> {
    let space: Vec<[f32; 3]> = colors.iter().map(|&c| metric.to_space(c)).collect();
    hist.iter()
        .map(|e| kmeans::nearest(&space, metric.to_space(e.color)))
        .collect()
}

/// Cells assigned to each palette entry.
fn usage(hist: &[HistogramEntry], colors: &[Rgb], metric: ColorMetric) -> Vec<u32> {
    let mut counts = vec![0u32; colors.len()];
    for (e, i) in hist.iter().zip(assign(hist, colors, metric)) {
        counts[i] += e.count;
    }
    counts
}

/// Drop unused entries and sort by descending usage.
///
/// Reordering can flip lowest-index tie-breaks, so assignment is repeated
/// until the order is stable.
fn order_by_usage(hist: &[HistogramEntry], mut colors: Vec<Rgb>, metric: ColorMetric) -> Vec<Rgb> {
    for _ in 0..MAX_ORDER_ROUNDS {
        let counts = usage(hist, &colors, metric);
        let mut ranked: Vec<(Rgb, u32)> = colors
            .iter()
            .copied()
            .zip(counts)
            .filter(|&(_, n)| n > 0)
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        let next: Vec<Rgb> = ranked.into_iter().map(|(c, _)| c).collect();
        if next == colors {
            return colors;
        }
        colors = next;
    }

    log::warn!("palette: usage order did not settle, keeping last order");
    let counts = usage(hist, &colors, metric);
    colors
        .into_iter()
        .zip(counts)
        .filter(|&(_, n)| n > 0)
        .map(|(c, _)| c)
        .collect()
}

fn index_lookup(hist: &[HistogramEntry], colors: &[Rgb], metric: ColorMetric) -> HashMap<Rgb, u8> {
    hist.iter()
        .zip(assign(hist, colors, metric))
        .map(|(e, i)| (e.color, i as u8))
        .collect()
}


// ============================================================================
// Property-Based Tests
// ============================================================================
