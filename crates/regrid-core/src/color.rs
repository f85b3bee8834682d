//! Color helpers: luminance, CIELAB conversion and palette distances.
//!
//! Luminance uses ITU-R BT.709 coefficients and feeds the grid estimator's
//! rank check. Distances are Euclidean either in 8-bit RGB or in CIELAB
//! (ΔE76), selected by [`ColorMetric`].

use palette::{FromColor, IntoColor, Lab, LinSrgb, Srgb};
use serde::{Deserialize, Serialize};

/// An 8-bit sRGB color.
pub type Rgb = [u8; 3];

/// ITU-R BT.709 coefficient for red channel in luminance calculation.
pub const LUMINANCE_R: f32 = 0.2126;

/// ITU-R BT.709 coefficient for green channel in luminance calculation.
pub const LUMINANCE_G: f32 = 0.7152;

/// ITU-R BT.709 coefficient for blue channel in luminance calculation.
pub const LUMINANCE_B: f32 = 0.0722;

/// Luminance of an 8-bit color, in the 0.0 to 255.0 range.
#[inline]
pub fn luminance(color: Rgb) -> f32 {
    LUMINANCE_R * color[0] as f32 + LUMINANCE_G * color[1] as f32 + LUMINANCE_B * color[2] as f32
}

/// Color space in which palette distances are measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorMetric {
    /// CIELAB Euclidean distance (ΔE76). Perceptual.
    #[default]
    Lab,
    /// Euclidean distance over 8-bit RGB channels.
    Rgb,
}

impl ColorMetric {
    /// Map a color into the metric's coordinate space.
    #[inline]
    pub fn to_space(self, color: Rgb) -> [f32; 3] {
        match self {
            ColorMetric::Lab => rgb_to_lab(color),
            ColorMetric::Rgb => [color[0] as f32, color[1] as f32, color[2] as f32],
        }
    }

    /// Map a point of the metric's coordinate space back to the nearest 8-bit color.
    #[inline]
    pub fn from_space(self, point: [f32; 3]) -> Rgb {
        match self {
            ColorMetric::Lab => lab_to_rgb(point),
            ColorMetric::Rgb => [
                point[0].clamp(0.0, 255.0).round() as u8,
                point[1].clamp(0.0, 255.0).round() as u8,
                point[2].clamp(0.0, 255.0).round() as u8,
            ],
        }
    }

    /// Distance between two 8-bit colors.
    #[inline]
    pub fn distance(self, a: Rgb, b: Rgb) -> f32 {
        distance_sq(self.to_space(a), self.to_space(b)).sqrt()
    }
}

/// Squared Euclidean distance between two points.
#[inline]
pub fn distance_sq(a: [f32; 3], b: [f32; 3]) -> f32 {
    let d0 = a[0] - b[0];
    let d1 = a[1] - b[1];
    let d2 = a[2] - b[2];
    d0 * d0 + d1 * d1 + d2 * d2
}

/// Convert an 8-bit sRGB color to CIELAB (D65).
#[inline]
pub fn rgb_to_lab(color: Rgb) -> [f32; 3] {
    let srgb: Srgb<f32> = Srgb::new(
        color[0] as f32 / 255.0,
        color[1] as f32 / 255.0,
        color[2] as f32 / 255.0,
    );
    let lin: LinSrgb<f32> = srgb.into_linear();
    let lab: Lab = Lab::from_color(lin);
    [lab.l, lab.a, lab.b]
}

/// Convert a CIELAB point back to 8-bit sRGB, clamping out-of-gamut values.
#[inline]
pub fn lab_to_rgb(point: [f32; 3]) -> Rgb {
    let lab = Lab::new(point[0], point[1], point[2]);
    let lin: LinSrgb<f32> = lab.into_color();
    let srgb: Srgb<f32> = Srgb::from_linear(lin);
    [
        (srgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (srgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (srgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficients_sum_to_one() {
        let sum = LUMINANCE_R + LUMINANCE_G + LUMINANCE_B;
        assert!((sum - 1.0).abs() < 1e-6, "Coefficients should sum to 1.0");
    }

    #[test]
    fn test_luminance_gray_preserves_value() {
        for v in [0u8, 64, 128, 192, 255] {
            let lum = luminance([v, v, v]);
            assert!((lum - v as f32).abs() < 0.01, "gray {} gave {}", v, lum);
        }
    }

    #[test]
    fn test_luminance_primaries() {
        assert!((luminance([255, 0, 0]) - 54.21).abs() < 0.1);
        assert!((luminance([0, 255, 0]) - 182.38).abs() < 0.1);
        assert!((luminance([0, 0, 255]) - 18.41).abs() < 0.1);
    }

    #[test]
    fn test_lab_white_and_black() {
        let white = rgb_to_lab([255, 255, 255]);
        assert!((white[0] - 100.0).abs() < 0.5);
        assert!(white[1].abs() < 0.5 && white[2].abs() < 0.5);

        let black = rgb_to_lab([0, 0, 0]);
        assert!(black[0].abs() < 0.5);
    }

    #[test]
    fn test_lab_round_trip_is_close() {
        for color in [[12u8, 200, 99], [255, 0, 0], [30, 30, 30], [250, 240, 10]] {
            let back = lab_to_rgb(rgb_to_lab(color));
            for c in 0..3 {
                assert!(
                    (back[c] as i32 - color[c] as i32).abs() <= 1,
                    "{:?} came back as {:?}",
                    color,
                    back
                );
            }
        }
    }

    #[test]
    fn test_rgb_metric_distance() {
        let d = ColorMetric::Rgb.distance([0, 0, 0], [3, 4, 0]);
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_metric_distance_zero_for_same_color() {
        for metric in [ColorMetric::Lab, ColorMetric::Rgb] {
            assert_eq!(metric.distance([10, 20, 30], [10, 20, 30]), 0.0);
        }
    }

    #[test]
    fn test_metric_space_round_trip() {
        let color = [40u8, 80, 160];
        for metric in [ColorMetric::Lab, ColorMetric::Rgb] {
            let back = metric.from_space(metric.to_space(color));
            for c in 0..3 {
                assert!((back[c] as i32 - color[c] as i32).abs() <= 1);
            }
        }
    }
}
