//! Color histogram of reduced cells.
//!
//! The quantizer works on distinct colors weighted by how many cells carry
//! them, never on individual cells.

use std::collections::HashMap;

use crate::color::{ColorMetric, Rgb};

/// One distinct color and the number of cells holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramEntry {
    pub color: Rgb,
    pub count: u32,
}

/// Count distinct colors.
///
/// # Arguments
/// * `cells` - Per-cell colors in any order
///
/// # Returns
/// Entries sorted by descending count, ties by ascending color, so the
/// heaviest color is always first.
///
/// # Performance
/// Single pass over the cells plus a sort of the distinct colors.
pub fn color_histogram(cells: &[Rgb]) -> Vec<HistogramEntry> {
    let mut counts: HashMap<Rgb, u32> = HashMap::new();
    for &color in cells {
        *counts.entry(color).or_default() += 1;
    }

    let mut entries: Vec<HistogramEntry> = counts
        .into_iter()
        .map(|(color, count)| HistogramEntry { color, count })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then(a.color.cmp(&b.color)));
    entries
}

/// A histogram entry mapped into a metric's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedPoint {
    pub point: [f32; 3],
    pub weight: f32,
}

/// Map every entry into `metric` space, keeping order.
pub fn weighted_points(entries: &[HistogramEntry], metric: ColorMetric) -> Vec<WeightedPoint> {
    entries
        .iter()
        .map(|e| WeightedPoint {
            point: metric.to_space(e.color),
            weight: e.count as f32,
        })
        .collect()
}
