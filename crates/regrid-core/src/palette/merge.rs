//! Agglomerative merging of near-duplicate palette entries.

use crate::color::{distance_sq, ColorMetric, Rgb};

/// A candidate palette color with the cell weight it represents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub color: Rgb,
    pub weight: f32,
}

/// Merge the closest pair of candidates until every pair is at least
/// `min_distance` apart and no two candidates share a color.
///
/// Distances are measured between the 8-bit colors under `metric`. A merged
/// entry is the weight-averaged point in metric space, mapped back to 8 bits.
/// Ties between equally close pairs go to the first pair in input order.
pub fn merge_close(candidates: Vec<Candidate>, min_distance: f64, metric: ColorMetric) -> Vec<Candidate> {
    let mut entries = candidates;
    let mut points: Vec<[f32; 3]> = entries.iter().map(|c| metric.to_space(c.color)).collect();

    loop {
        let Some((i, j, dist)) = closest_pair(&points) else {
            break;
        };
        if !(dist < min_distance || entries[i].color == entries[j].color) {
            break;
        }

        let (a, b) = (entries[i], entries[j]);
        let total = a.weight + b.weight;
        let (wa, wb) = if total > 0.0 {
            (a.weight / total, b.weight / total)
        } else {
            (0.5, 0.5)
        };
        let mean = [
            points[i][0] * wa + points[j][0] * wb,
            points[i][1] * wa + points[j][1] * wb,
            points[i][2] * wa + points[j][2] * wb,
        ];
        let color = metric.from_space(mean);

        // j > i, so removing j first keeps i valid.
        entries.remove(j);
        points.remove(j);
        entries[i] = Candidate { color, weight: total };
        points[i] = metric.to_space(color);
    }

    entries
}

/// The closest pair by distance, earliest pair on ties.
fn closest_pair(points: &[[f32; 3]]) -> Option<(usize, usize, f64)> {
    let mut best: Option<(usize, usize, f32)> = None;
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            let d = distance_sq(points[i], points[j]);
            if best.map_or(true, |(_, _, bd)| d < bd) {
                best = Some((i, j, d));
            }
        }
    }
    best.map(|(i, j, d)| (i, j, d.sqrt() as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(color: Rgb, weight: f32) -> Candidate {
        Candidate { color, weight }
    }

    #[test]
    fn test_far_entries_untouched() {
        let input = vec![cand([0, 0, 0], 1.0), cand([255, 255, 255], 1.0)];
        let out = merge_close(input.clone(), 10.0, ColorMetric::Rgb);
        assert_eq!(out, input);
    }

    #[test]
    fn test_close_pair_merges_to_weighted_mean() {
        let input = vec![cand([100, 0, 0], 3.0), cand([104, 0, 0], 1.0), cand([0, 200, 0], 1.0)];
        let out = merge_close(input, 10.0, ColorMetric::Rgb);
        assert_eq!(out, vec![cand([101, 0, 0], 4.0), cand([0, 200, 0], 1.0)]);
    }

    #[test]
    fn test_identical_colors_merge_at_zero_distance() {
        let input = vec![cand([9, 9, 9], 1.0), cand([9, 9, 9], 2.0)];
        let out = merge_close(input, 0.0, ColorMetric::Lab);
        assert_eq!(out, vec![cand([9, 9, 9], 3.0)]);
    }

    #[test]
    fn test_chain_collapses() {
        // 0 - 6 - 12: merging the first pair gives 3, still within 10 of 12.
        let input = vec![cand([0, 0, 0], 1.0), cand([6, 0, 0], 1.0), cand([12, 0, 0], 1.0)];
        let out = merge_close(input, 10.0, ColorMetric::Rgb);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].weight, 3.0);
    }

    #[test]
    fn test_result_respects_min_distance() {
        let input: Vec<Candidate> = (0..40u8).map(|i| cand([i * 6, 255 - i * 6, i], 1.0)).collect();
        let out = merge_close(input, 25.0, ColorMetric::Lab);
        for a in 0..out.len() {
            for b in (a + 1)..out.len() {
                assert!(ColorMetric::Lab.distance(out[a].color, out[b].color) as f64 >= 25.0);
            }
        }
    }
}
