//! Effective-rank bound on plausible cell counts.
//!
//! An image upscaled from an `n x m` grid has a luminance matrix that is a
//! block expansion of an `n x m` matrix, so its rank is at most `min(n, m)`.
//! A grid estimate with fewer cells than the effective rank cannot explain
//! the image.

use nalgebra::DMatrix;

use crate::color::luminance;
use crate::decode::Image;

/// Longest side of the matrix handed to the SVD.
pub const MAX_PROXY_SIDE: usize = 256;

/// Number of singular values of the luminance matrix at or above
/// `tolerance` times the largest one.
pub fn effective_rank(image: &Image, tolerance: f64) -> usize {
    let lum = luminance_proxy(image);
    if lum.is_empty() {
        return 0;
    }

    let singular = lum.svd(false, false).singular_values;
    let largest = singular.iter().copied().fold(0.0f64, f64::max);
    if largest <= 0.0 {
        return 0;
    }

    singular
        .iter()
        .filter(|&&s| s >= tolerance * largest)
        .count()
}

/// Luminance matrix, box-averaged so neither side exceeds [`MAX_PROXY_SIDE`].
fn luminance_proxy(image: &Image) -> DMatrix<f64> {
    let w = image.width as usize;
    let h = image.height as usize;
    let fx = w.div_ceil(MAX_PROXY_SIDE).max(1);
    let fy = h.div_ceil(MAX_PROXY_SIDE).max(1);
    let cols = w.div_ceil(fx);
    let rows = h.div_ceil(fy);

    DMatrix::from_fn(rows, cols, |r, c| {
        let x_end = ((c + 1) * fx).min(w);
        let y_end = ((r + 1) * fy).min(h);
        let mut sum = 0.0f64;
        let mut count = 0usize;
        for y in r * fy..y_end {
            for x in c * fx..x_end {
                sum += luminance(image.pixel(x as u32, y as u32)) as f64;
                count += 1;
            }
        }
        sum / count.max(1) as f64
    })
}
