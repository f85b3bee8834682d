//! Window filters in the spatial domain.
//!
//! Both filters compare colors by their largest per-channel difference and
//! clip the window at the image border rather than padding it.

use crate::color::Rgb;
use crate::decode::Image;
use crate::rows::collect_rows;

/// Edge-preserving sigma filter.
///
/// Each pixel becomes the rounded mean of the window pixels whose largest
/// channel difference from it is at most `threshold`. Pixels across a
/// strong edge never contribute, so flat blocks pass through unchanged.
pub fn sigma_filter(image: &Image, radius: usize, threshold: f64) -> Image {
    let w = image.width as usize;
    let h = image.height as usize;

    let pixels = collect_rows(h, |y| {
        let mut row = Vec::with_capacity(w * 3);
        for x in 0..w {
            let center = pixel_at(image, x, y);
            let mut sum = [0u64; 3];
            let mut count = 0u64;
            for_window(w, h, x, y, radius, |qx, qy| {
                let q = pixel_at(image, qx, qy);
                if within(center, q, threshold) {
                    for c in 0..3 {
                        sum[c] += q[c] as u64;
                    }
                    count += 1;
                }
            });
            row.extend_from_slice(&rounded_mean(sum, count));
        }
        row
    });

    Image::new(image.width, image.height, pixels)
}

/// Edge-snapping majority filter.
///
/// Every window pixel proposes the group of window pixels similar to it;
/// the largest group wins, the centre pixel's own group on ties, and the
/// output is that group's mean. A pixel on the wrong side of a wavy edge is
/// outvoted by the block it sits in, which pulls block boundaries straight.
pub fn majority_filter(image: &Image, radius: usize, threshold: f64) -> Image {
    let w = image.width as usize;
    let h = image.height as usize;

    let pixels = collect_rows(h, |y| {
        let mut row = Vec::with_capacity(w * 3);
        let mut window: Vec<Rgb> = Vec::with_capacity((2 * radius + 1).pow(2));
        for x in 0..w {
            let center = pixel_at(image, x, y);
            window.clear();
            for_window(w, h, x, y, radius, |qx, qy| window.push(pixel_at(image, qx, qy)));

            let support = |candidate: Rgb| {
                window
                    .iter()
                    .filter(|&&q| within(candidate, q, threshold))
                    .count()
            };

            let mut winner = center;
            let mut best = support(center);
            for &candidate in &window {
                let s = support(candidate);
                if s > best {
                    best = s;
                    winner = candidate;
                }
            }

            let mut sum = [0u64; 3];
            let mut count = 0u64;
            for &q in window.iter().filter(|&&q| within(winner, q, threshold)) {
                for c in 0..3 {
                    sum[c] += q[c] as u64;
                }
                count += 1;
            }
            row.extend_from_slice(&rounded_mean(sum, count));
        }
        row
    });

    Image::new(image.width, image.height, pixels)
}

/// Clamp each pixel of `filtered` into the per-channel range of the
/// `original` window pixels similar to the original centre pixel.
///
/// A frequency-domain filter rings around block edges; this keeps its
/// output inside the local range of the block each pixel belongs to. A
/// window whose similar pixels all share one color pins that color.
pub fn clamp_to_similar(
    original: &Image,
    filtered: &Image,
    radius: usize,
    threshold: f64,
) -> Image {
    let w = original.width as usize;
    let h = original.height as usize;

    let pixels = collect_rows(h, |y| {
        let mut row = Vec::with_capacity(w * 3);
        for x in 0..w {
            let center = pixel_at(original, x, y);
            let mut lo = center;
            let mut hi = center;
            for_window(w, h, x, y, radius, |qx, qy| {
                let q = pixel_at(original, qx, qy);
                if within(center, q, threshold) {
                    for c in 0..3 {
                        lo[c] = lo[c].min(q[c]);
                        hi[c] = hi[c].max(q[c]);
                    }
                }
            });
            let value = pixel_at(filtered, x, y);
            row.extend((0..3).map(|c| value[c].clamp(lo[c], hi[c])));
        }
        row
    });

    Image::new(original.width, original.height, pixels)
}

#[inline]
fn pixel_at(image: &Image, x: usize, y: usize) -> Rgb {
    let idx = (y * image.width as usize + x) * 3;
    [
        image.pixels[idx],
        image.pixels[idx + 1],
        image.pixels[idx + 2],
    ]
}

/// Visit every in-bounds position of the square window around `(x, y)`.
#[inline]
fn for_window(
    w: usize,
    h: usize,
    x: usize,
    y: usize,
    radius: usize,
    mut visit: impl FnMut(usize, usize),
) {
    let y0 = y.saturating_sub(radius);
    let y1 = (y + radius + 1).min(h);
    let x0 = x.saturating_sub(radius);
    let x1 = (x + radius + 1).min(w);
    for qy in y0..y1 {
        for qx in x0..x1 {
            visit(qx, qy);
        }
    }
}

#[inline]
fn within(a: Rgb, b: Rgb, threshold: f64) -> bool {
    a.iter()
        .zip(&b)
        .all(|(&p, &q)| (p.abs_diff(q) as f64) <= threshold)
}

#[inline]
fn rounded_mean(sum: [u64; 3], count: u64) -> Rgb {
    let n = count.max(1);
    [
        ((sum[0] + n / 2) / n) as u8,
        ((sum[1] + n / 2) / n) as u8,
        ((sum[2] + n / 2) / n) as u8,
    ]
}
