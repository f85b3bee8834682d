//! Noise suppression and edge straightening.
//!
//! The filter family is chosen by [`FilterKind`]:
//! - `low-pass`: sigma filter, smooths inside blocks without crossing edges
//! - `high-pass`: majority filter, snaps wavy block edges back into line
//! - `band-pass`: FFT band selection, keeps long periods and strong harmonics,
//!   then clamps each pixel into the range of its similar neighbours
//!
//! Every filter returns a new image of the same dimensions.

mod frequency;
mod spatial;

pub use frequency::band_pass;
pub use spatial::{clamp_to_similar, majority_filter, sigma_filter};

use crate::config::{DenoiseConfig, FilterKind};
use crate::decode::Image;
use crate::error::{RegridError, Stage};

/// Apply the configured filter to `image`.
///
/// # Errors
///
/// Returns `RegridError::InvalidConfig` (stage `denoise`) when the options
/// are out of range or the kernel is larger than the image, and
/// `RegridError::DegenerateInput` for a zero-area image or a pixel buffer
/// that does not match the dimensions.
pub fn denoise(image: &Image, config: &DenoiseConfig) -> Result<Image, RegridError> {
    config.validate()?;

    if !config.enabled {
        log::debug!("denoise: disabled");
        return Ok(image.clone());
    }

    image.ensure_usable(Stage::Denoise)?;

    if config.kernel_size > image.width || config.kernel_size > image.height {
        return Err(RegridError::invalid_config(
            Stage::Denoise,
            format!(
                "kernel_size {} exceeds image dimensions {}x{}",
                config.kernel_size, image.width, image.height
            ),
        ));
    }

    let radius = (config.kernel_size / 2) as usize;
    let threshold = config.strength * 255.0;

    log::debug!(
        "denoise: {:?} filter, kernel {} px, strength {:.3}",
        config.filter_kind,
        config.kernel_size,
        config.strength
    );

    let out = match config.filter_kind {
        FilterKind::LowPass => sigma_filter(image, radius, threshold),
        FilterKind::HighPass => majority_filter(image, radius, threshold),
        FilterKind::BandPass => {
            let filtered = band_pass(image, config.kernel_size as usize, config.strength);
            clamp_to_similar(image, &filtered, radius, threshold)
        }
    };

    Ok(out)
}
