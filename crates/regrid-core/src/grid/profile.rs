//! Edge-energy projections.
//!
//! The structural proxy is the map of absolute color differences between
//! neighbouring pixels. Projecting it onto one axis gives an edge profile
//! whose 1-D DFT is that axis's slice of the 2-D spectrum of the edge map,
//! so per-axis peak finding needs no 2-D transform.
//!
//! Entry `x` of a profile is the boundary between pixels `x - 1` and `x`.
//! Entry 0 is the image border and is always zero.

use crate::decode::Image;

/// Column profile: `E[x] = Σ_y Σ_c |p(x, y) - p(x-1, y)|` for `x` in `1..W`.
pub fn horizontal_profile(image: &Image) -> Vec<f64> {
    let w = image.width as usize;
    let h = image.height as usize;
    let mut profile = vec![0.0f64; w];
    if w == 0 {
        return profile;
    }

    for y in 0..h {
        let row = &image.pixels[y * w * 3..(y + 1) * w * 3];
        for (x, slot) in profile.iter_mut().enumerate().skip(1) {
            *slot += channel_diff(&row[x * 3..x * 3 + 3], &row[(x - 1) * 3..x * 3]);
        }
    }

    profile
}

/// Row profile: `E[y] = Σ_x Σ_c |p(x, y) - p(x, y-1)|` for `y` in `1..H`.
pub fn vertical_profile(image: &Image) -> Vec<f64> {
    let w = image.width as usize;
    let h = image.height as usize;
    let stride = w * 3;
    let mut profile = vec![0.0f64; h];
    if h == 0 {
        return profile;
    }

    for (y, slot) in profile.iter_mut().enumerate().skip(1) {
        let row = &image.pixels[y * stride..(y + 1) * stride];
        let above = &image.pixels[(y - 1) * stride..y * stride];
        *slot = channel_diff(row, above);
    }

    profile
}

#[inline]
fn channel_diff(a: &[u8], b: &[u8]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&p, &q)| p.abs_diff(q) as u64)
        .sum::<u64>() as f64
}

/// Sum of the profile over lines `x ≡ offset (mod period)`, and their count.
///
/// The border entry 0 is never counted.
pub fn comb_sum(profile: &[f64], period: usize, offset: usize) -> (f64, usize) {
    let start = if offset == 0 { period } else { offset };
    profile
        .iter()
        .skip(start)
        .step_by(period.max(1))
        .fold((0.0, 0), |(sum, count), &v| (sum + v, count + 1))
}
