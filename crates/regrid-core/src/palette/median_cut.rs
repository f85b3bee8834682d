//! Weighted median-cut over histogram points.

use super::histogram::WeightedPoint;

/// Axis-aligned box of points in metric space.
#[derive(Debug, Clone)]
struct ColorBox {
    indices: Vec<usize>,
    min: [f32; 3],
    max: [f32; 3],
    weight: f32,
}

impl ColorBox {
    fn new(indices: Vec<usize>, points: &[WeightedPoint]) -> Self {
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        let mut weight = 0.0;
        for &i in &indices {
            let p = points[i].point;
            for c in 0..3 {
                min[c] = min[c].min(p[c]);
                max[c] = max[c].max(p[c]);
            }
            weight += points[i].weight;
        }
        Self {
            indices,
            min,
            max,
            weight,
        }
    }

    /// Widest axis and its extent.
    fn widest_axis(&self) -> (usize, f32) {
        (0..3)
            .map(|c| (c, self.max[c] - self.min[c]))
            .fold((0, f32::NEG_INFINITY), |best, cur| if cur.1 > best.1 { cur } else { best })
    }

    fn can_split(&self) -> bool {
        self.indices.len() >= 2 && self.widest_axis().1 > 0.0
    }

    fn priority(&self) -> f32 {
        self.weight * self.widest_axis().1
    }

    /// Split at the weighted median of the widest axis. Both halves are
    /// non-empty for a splittable box.
    fn split(mut self, points: &[WeightedPoint]) -> (ColorBox, ColorBox) {
        let (axis, _) = self.widest_axis();
        self.indices
            .sort_by(|&a, &b| points[a].point[axis].total_cmp(&points[b].point[axis]));

        let half = self.weight / 2.0;
        let mut acc = 0.0;
        let mut cut = 1;
        for (pos, &i) in self.indices.iter().enumerate() {
            acc += points[i].weight;
            if acc >= half {
                cut = pos + 1;
                break;
            }
        }
        let cut = cut.clamp(1, self.indices.len() - 1);

        let upper = self.indices.split_off(cut);
        (
            ColorBox::new(self.indices, points),
            ColorBox::new(upper, points),
        )
    }

    fn centroid(&self, points: &[WeightedPoint]) -> [f32; 3] {
        let mut sum = [0.0f32; 3];
        for &i in &self.indices {
            for c in 0..3 {
                sum[c] += points[i].point[c] * points[i].weight;
            }
        }
        let w = self.weight.max(f32::EPSILON);
        [sum[0] / w, sum[1] / w, sum[2] / w]
    }
}

/// Partition `points` into at most `k` boxes and return their weighted
/// centroids. The box with the largest weight × extent is split first.
pub fn median_cut(points: &[WeightedPoint], k: usize) -> Vec<[f32; 3]> {
    if points.is_empty() || k == 0 {
        return Vec::new();
    }

    let mut boxes = vec![ColorBox::new((0..points.len()).collect(), points)];

    while boxes.len() < k {
        let candidate = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.can_split())
            .fold(None, |best: Option<(usize, f32)>, (i, b)| {
                let p = b.priority();
                match best {
                    Some((_, bp)) if bp >= p => best,
                    _ => Some((i, p)),
                }
            });
        let Some((index, _)) = candidate else {
            break;
        };

        let (lower, upper) = boxes.swap_remove(index).split(points);
        boxes.push(lower);
        boxes.push(upper);
    }

    boxes.iter().map(|b| b.centroid(points)).collect()
}
