//! Band-pass filtering in the frequency domain.

use rustfft::num_complex::Complex;

use crate::decode::Image;
use crate::fourier::{fft_2d, folded_frequency};

/// Keep the low band whole and, above it, only strong coefficients.
///
/// Per channel: coefficients whose frequency on both axes is at most
/// `dimension / min_period` (periods of `min_period` pixels or longer)
/// survive; outside that band only those with magnitude at least
/// `strength` times the strongest non-DC coefficient do. Grid harmonics are
/// strong and survive, diffuse noise is weak and is removed.
pub fn band_pass(image: &Image, min_period: usize, strength: f64) -> Image {
    let w = image.width as usize;
    let h = image.height as usize;
    let cutoff_x = w / min_period.max(1);
    let cutoff_y = h / min_period.max(1);
    let scale = (w * h) as f64;

    let mut pixels = vec![0u8; w * h * 3];
    for channel in 0..3 {
        let mut data: Vec<Complex<f64>> = image
            .pixels
            .iter()
            .skip(channel)
            .step_by(3)
            .map(|&v| Complex::new(v as f64, 0.0))
            .collect();

        fft_2d(&mut data, w, h, false);

        let strongest = data
            .iter()
            .skip(1)
            .map(|c| c.norm())
            .fold(0.0f64, f64::max);
        let floor = strength * strongest;

        for ky in 0..h {
            let low_y = folded_frequency(ky, h) <= cutoff_y;
            for kx in 0..w {
                let low = low_y && folded_frequency(kx, w) <= cutoff_x;
                let coeff = &mut data[ky * w + kx];
                if !low && coeff.norm() < floor {
                    *coeff = Complex::new(0.0, 0.0);
                }
            }
        }

        fft_2d(&mut data, w, h, true);

        for (i, value) in data.iter().enumerate() {
            pixels[i * 3 + channel] = (value.re / scale).round().clamp(0.0, 255.0) as u8;
        }
    }

    Image::new(image.width, image.height, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{add_noise, block_image, mean_abs_diff};

    #[test]
    fn test_period_one_keeps_everything() {
        let noisy = add_noise(&block_image(16, 12, 4, 4), 10, 2);
        assert_eq!(band_pass(&noisy, 1, 0.5), noisy);
    }

    #[test]
    fn test_zero_strength_keeps_everything() {
        let noisy = add_noise(&block_image(16, 16, 4, 4), 10, 2);
        assert_eq!(band_pass(&noisy, 8, 0.0), noisy);
    }

    #[test]
    fn test_removes_high_frequency_noise() {
        let clean = Image::from_fn(64, 64, |x, y| {
            let v = 128.0
                + 60.0 * (2.0 * std::f64::consts::PI * x as f64 / 32.0).cos()
                + 30.0 * (2.0 * std::f64::consts::PI * y as f64 / 16.0).sin();
            let v = v.round() as u8;
            [v, v / 2, 255 - v]
        });
        let noisy = add_noise(&clean, 12, 4);
        let filtered = band_pass(&noisy, 4, 0.5);

        let before = mean_abs_diff(&noisy, &clean);
        let after = mean_abs_diff(&filtered, &clean);
        assert!(after < 0.7 * before, "filtered {} vs noisy {}", after, before);
    }

    #[test]
    fn test_uniform_image_unchanged() {
        let img = Image::from_fn(10, 6, |_, _| [40, 90, 200]);
        assert_eq!(band_pass(&img, 3, 0.9), img);
    }

    #[test]
    fn test_dimensions_preserved() {
        let img = block_image(21, 13, 3, 3);
        let out = band_pass(&img, 3, 0.2);
        assert_eq!((out.width, out.height), (21, 13));
        assert_eq!(out.pixels.len(), img.pixels.len());
    }
}
