//! Synthetic fixtures shared by unit tests.

use crate::color::Rgb;
use crate::decode::Image;

/// Small deterministic generator for fixture noise.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed ^ 0x9E37_79B9_7F4A_7C15)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    /// Uniform integer in `[-amplitude, amplitude]`.
    pub fn offset(&mut self, amplitude: i32) -> i32 {
        let span = (2 * amplitude + 1) as u32;
        (self.next_u32() % span) as i32 - amplitude
    }
}

const LEVELS: [u8; 4] = [24, 88, 152, 216];

/// Color of block `(bx, by)`.
///
/// Blocks of an 8x8 grid get 64 distinct colors; any two distinct colors
/// differ by at least 64 in some channel. Horizontal and vertical
/// neighbours always differ, whatever the grid size.
pub fn block_color(bx: u32, by: u32) -> Rgb {
    let index = ((by * 8 + bx) % 64) as usize;
    [
        LEVELS[index % 4],
        LEVELS[(index / 4) % 4],
        LEVELS[(index / 16) % 4],
    ]
}

/// `width x height` image of solid `cell_w x cell_h` blocks.
pub fn block_image(width: u32, height: u32, cell_w: u32, cell_h: u32) -> Image {
    Image::from_fn(width, height, |x, y| block_color(x / cell_w, y / cell_h))
}

/// Add uniform per-channel noise in `[-amplitude, amplitude]`.
pub fn add_noise(image: &Image, amplitude: i32, seed: u64) -> Image {
    let mut rng = Lcg::new(seed);
    let pixels = image
        .pixels
        .iter()
        .map(|&v| (v as i32 + rng.offset(amplitude)).clamp(0, 255) as u8)
        .collect();
    Image::new(image.width, image.height, pixels)
}

/// Uniform random noise with no structure at all.
pub fn noise_image(width: u32, height: u32, seed: u64) -> Image {
    let mut rng = Lcg::new(seed);
    Image::from_fn(width, height, |_, _| {
        [
            (rng.next_u32() % 256) as u8,
            (rng.next_u32() % 256) as u8,
            (rng.next_u32() % 256) as u8,
        ]
    })
}

/// Largest absolute per-channel difference between two equally sized images.
pub fn max_abs_diff(a: &Image, b: &Image) -> u8 {
    a.pixels
        .iter()
        .zip(&b.pixels)
        .map(|(&x, &y)| x.abs_diff(y))
        .max()
        .unwrap_or(0)
}

/// Mean absolute per-channel difference between two equally sized images.
pub fn mean_abs_diff(a: &Image, b: &Image) -> f64 {
    let total: u64 = a
        .pixels
        .iter()
        .zip(&b.pixels)
        .map(|(&x, &y)| x.abs_diff(y) as u64)
        .sum();
    total as f64 / a.pixels.len().max(1) as f64
}
