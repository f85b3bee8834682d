//! Per-cell color reducers.

use std::collections::HashMap;

use crate::color::Rgb;

/// Rounded per-channel mean.
pub fn mean(pixels: &[Rgb]) -> Rgb {
    let n = pixels.len().max(1) as u64;
    let mut sum = [0u64; 3];
    for p in pixels {
        for c in 0..3 {
            sum[c] += p[c] as u64;
        }
    }
    [
        ((sum[0] + n / 2) / n) as u8,
        ((sum[1] + n / 2) / n) as u8,
        ((sum[2] + n / 2) / n) as u8,
    ]
}

/// Per-channel median (upper median for even counts).
pub fn median(pixels: &[Rgb]) -> Rgb {
    if pixels.is_empty() {
        return [0, 0, 0];
    }
    let mut out = [0u8; 3];
    let mut channel: Vec<u8> = Vec::with_capacity(pixels.len());
    for (c, slot) in out.iter_mut().enumerate() {
        channel.clear();
        channel.extend(pixels.iter().map(|p| p[c]));
        let mid = channel.len() / 2;
        let (_, value, _) = channel.select_nth_unstable(mid);
        *slot = *value;
    }
    out
}

/// Most frequent exact color; the earliest one wins ties.
pub fn mode(pixels: &[Rgb]) -> Rgb {
    let mut counts: HashMap<Rgb, (usize, usize)> = HashMap::new();
    for (i, &p) in pixels.iter().enumerate() {
        counts.entry(p).or_insert((0, i)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|a, b| {
            let (count_a, first_a) = a.1;
            let (count_b, first_b) = b.1;
            count_a.cmp(&count_b).then(first_b.cmp(&first_a))
        })
        .map(|(color, _)| color)
        .unwrap_or([0, 0, 0])
}
