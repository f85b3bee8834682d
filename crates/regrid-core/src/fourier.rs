//! FFT helpers built on `rustfft`.
//!
//! The grid estimator needs 1-D magnitude spectra of edge profiles and the
//! band-pass denoiser needs a 2-D forward/inverse pair over one channel.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Magnitudes `|X[k]|` for `k` in `0..=n/2` of a real signal zero-padded to
/// `n = padded_len.max(signal.len())` samples.
///
/// Padding interpolates the spectrum: bin `k` corresponds to `k * len / n`
/// cycles over the original signal length.
pub fn magnitude_spectrum(signal: &[f64], padded_len: usize) -> Vec<f64> {
    let n = padded_len.max(signal.len());
    if n == 0 {
        return Vec::new();
    }

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);

    let mut buf: Vec<Complex<f64>> = signal.iter().map(|&v| Complex::new(v, 0.0)).collect();
    buf.resize(n, Complex::new(0.0, 0.0));
    fft.process(&mut buf);

    buf[..=n / 2].iter().map(|c| c.norm()).collect()
}

/// In-place 2-D FFT of a row-major `width x height` buffer.
///
/// The inverse is unnormalized; callers divide by `width * height`.
pub fn fft_2d(data: &mut [Complex<f64>], width: usize, height: usize, inverse: bool) {
    debug_assert_eq!(data.len(), width * height);
    if width == 0 || height == 0 {
        return;
    }

    let mut planner = FftPlanner::<f64>::new();
    let (row_fft, col_fft) = if inverse {
        (
            planner.plan_fft_inverse(width),
            planner.plan_fft_inverse(height),
        )
    } else {
        (
            planner.plan_fft_forward(width),
            planner.plan_fft_forward(height),
        )
    };

    // Rows are contiguous and can be processed as one batch.
    row_fft.process(data);

    let mut column = vec![Complex::new(0.0, 0.0); height];
    for x in 0..width {
        for (y, slot) in column.iter_mut().enumerate() {
            *slot = data[y * width + x];
        }
        col_fft.process(&mut column);
        for (y, value) in column.iter().enumerate() {
            data[y * width + x] = *value;
        }
    }
}

/// Distance of FFT bin `k` from DC on a circular axis of length `n`.
#[inline]
pub fn folded_frequency(k: usize, n: usize) -> usize {
    k.min(n - k)
}
