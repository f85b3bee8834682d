//! Weighted k-means over histogram points.

use super::histogram::WeightedPoint;
use crate::color::distance_sq;

const MAX_ITERS: usize = 32;
/// Largest squared centroid movement that still counts as converged.
const CONVERGENCE_THRESHOLD: f32 = 1e-6;

/// Cluster `points` into at most `k` centroids.
///
/// Initialisation is deterministic farthest-point seeding from the first
/// (heaviest) point; Lloyd iterations follow until no centroid moves. A
/// centroid that loses all its points stays where it is.
pub fn kmeans(points: &[WeightedPoint], k: usize) -> Vec<[f32; 3]> {
    if points.is_empty() || k == 0 {
        return Vec::new();
    }

    let mut centroids = farthest_point_init(points, k);
    let n = centroids.len();

    for _ in 0..MAX_ITERS {
        let mut sums = vec![[0.0f32; 3]; n];
        let mut weights = vec![0.0f32; n];

        for p in points {
            let nearest = nearest(&centroids, p.point);
            for c in 0..3 {
                sums[nearest][c] += p.point[c] * p.weight;
            }
            weights[nearest] += p.weight;
        }

        let mut max_movement = 0.0f32;
        for i in 0..n {
            if weights[i] <= 0.0 {
                continue;
            }
            let updated = [
                sums[i][0] / weights[i],
                sums[i][1] / weights[i],
                sums[i][2] / weights[i],
            ];
            max_movement = max_movement.max(distance_sq(updated, centroids[i]));
            centroids[i] = updated;
        }

        if max_movement < CONVERGENCE_THRESHOLD {
            break;
        }
    }

    centroids
}

/// Index of the centroid nearest to `point`; ties go to the lowest index.
pub fn nearest(centroids: &[[f32; 3]], point: [f32; 3]) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = distance_sq(*c, point);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

fn farthest_point_init(points: &[WeightedPoint], k: usize) -> Vec<[f32; 3]> {
    let mut centroids = vec![points[0].point];
    let mut min_dist: Vec<f32> = points
        .iter()
        .map(|p| distance_sq(p.point, points[0].point))
        .collect();

    while centroids.len() < k {
        let (idx, &far) = min_dist
            .iter()
            .enumerate()
            .fold((0, &0.0f32), |best, cur| if cur.1 > best.1 { cur } else { best });
        if far <= 0.0 {
            break;
        }
        let next = points[idx].point;
        centroids.push(next);
        for (d, p) in min_dist.iter_mut().zip(points) {
            *d = d.min(distance_sq(p.point, next));
        }
    }

    centroids
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wp(point: [f32; 3], weight: f32) -> WeightedPoint {
        WeightedPoint { point, weight }
    }

    #[test]
    fn test_two_obvious_clusters() {
        let points = vec![
            wp([0.0, 0.0, 0.0], 5.0),
            wp([1.0, 0.0, 0.0], 1.0),
            wp([100.0, 100.0, 100.0], 3.0),
            wp([102.0, 100.0, 100.0], 1.0),
        ];
        let mut c = kmeans(&points, 2);
        c.sort_by(|a, b| a[0].total_cmp(&b[0]));
        assert!((c[0][0] - 1.0 / 6.0).abs() < 1e-4);
        assert!((c[1][0] - 100.5).abs() < 1e-4);
    }

    #[test]
    fn test_first_centroid_is_heaviest_point() {
        let points = vec![wp([5.0, 5.0, 5.0], 10.0), wp([9.0, 9.0, 9.0], 1.0)];
        let init = farthest_point_init(&points, 1);
        assert_eq!(init, vec![[5.0, 5.0, 5.0]]);
    }

    #[test]
    fn test_k_larger_than_distinct_points() {
        let points = vec![wp([1.0, 1.0, 1.0], 1.0), wp([1.0, 1.0, 1.0], 2.0)];
        assert_eq!(kmeans(&points, 4).len(), 1);
    }

    #[test]
    fn test_nearest_tie_goes_to_lowest_index() {
        let centroids = [[0.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
        assert_eq!(nearest(&centroids, [1.0, 0.0, 0.0]), 0);
    }

    #[test]
    fn test_empty_input() {
        assert!(kmeans(&[], 3).is_empty());
    }
}
