//! Per-cell sampling at the recovered resolution.
//!
//! Each grid cell of the source image is reduced to one color by the
//! configured [`SampleStrategy`]. With [`EdgePolicy::Crop`] cells start at
//! the image origin and pixels past the last whole cell are dropped. With
//! [`EdgePolicy::Partial`] cells follow the grid's phase and the partial
//! cells on every edge are reduced over the area they cover.

pub mod reducers;
pub mod rng;

use crate::color::Rgb;
use crate::config::{EdgePolicy, SampleConfig, SampleStrategy, StochasticReducer};
use crate::decode::Image;
use crate::error::{RegridError, Stage};
use crate::grid::GridEstimate;
use crate::reduced::ReducedImage;
use crate::rows::collect_rows;

use rng::SplitMix64;

/// Output size in cells for an image and grid under `policy`.
pub fn reduced_dimensions(
    width: u32,
    height: u32,
    grid: &GridEstimate,
    policy: EdgePolicy,
) -> (u32, u32) {
    match policy {
        EdgePolicy::Crop => grid.cell_counts(width, height),
        EdgePolicy::Partial => grid.covering_cell_counts(width, height),
    }
}

/// Reduce `image` to one raw color per grid cell.
///
/// # Errors
///
/// - `InvalidConfig` for out-of-range sampler options
/// - `DegenerateInput` (stage `sample`) for a zero cell size, an unusable
///   image, or when no cell fits in the image
pub fn reduce(
    image: &Image,
    grid: &GridEstimate,
    config: &SampleConfig,
) -> Result<ReducedImage<Rgb>, RegridError> {
    config.validate()?;
    image.ensure_usable(Stage::Sample)?;
    if grid.cell_width == 0 || grid.cell_height == 0 {
        return Err(RegridError::degenerate(
            Stage::Sample,
            format!(
                "cell size must be positive, got {}x{}",
                grid.cell_width, grid.cell_height
            ),
        ));
    }

    let (out_w, out_h) = reduced_dimensions(image.width, image.height, grid, config.edge_policy);
    if out_w == 0 || out_h == 0 {
        return Err(RegridError::degenerate(
            Stage::Sample,
            format!(
                "{}x{} image holds no whole {}x{} cell",
                image.width, image.height, grid.cell_width, grid.cell_height
            ),
        ));
    }

    let cw = grid.cell_width as usize;
    let ch = grid.cell_height as usize;
    let w = image.width as usize;
    let h = image.height as usize;
    let (ox, oy) = match config.edge_policy {
        EdgePolicy::Crop => (0, 0),
        EdgePolicy::Partial => (
            (grid.offset_x % grid.cell_width) as usize,
            (grid.offset_y % grid.cell_height) as usize,
        ),
    };

    let cells = collect_rows(out_h as usize, |cy| {
        let (y0, y1) = cell_span(cy, ch, oy, h);
        let mut buf: Vec<Rgb> = Vec::with_capacity(cw * ch);
        (0..out_w as usize)
            .map(|cx| {
                let (x0, x1) = cell_span(cx, cw, ox, w);
                let index = (cy * out_w as usize + cx) as u64;
                reduce_cell(image, (x0, x1, y0, y1), index, config, &mut buf)
            })
            .collect()
    });

    log::info!(
        "sample: {}x{} image -> {}x{} cells ({:?})",
        image.width,
        image.height,
        out_w,
        out_h,
        config.strategy
    );

    Ok(ReducedImage::new(out_w, out_h, cells))
}

/// Pixel range `[start, end)` of cell `k` along an axis of `dim` pixels.
///
/// With a non-zero `offset`, cell 0 is the leading partial cell `[0, offset)`.
fn cell_span(k: usize, cell: usize, offset: usize, dim: usize) -> (usize, usize) {
    let (start, end) = match offset {
        0 => (k * cell, (k + 1) * cell),
        _ if k == 0 => (0, offset),
        _ => (offset + (k - 1) * cell, offset + k * cell),
    };
    (start.min(dim), end.min(dim))
}

fn reduce_cell(
    image: &Image,
    (x0, x1, y0, y1): (usize, usize, usize, usize),
    index: u64,
    config: &SampleConfig,
    buf: &mut Vec<Rgb>,
) -> Rgb {
    buf.clear();
    match config.strategy {
        SampleStrategy::Stochastic => {
            let mut rng = SplitMix64::for_cell(config.seed, index);
            for _ in 0..config.samples_per_cell {
                let x = x0 + rng.below(x1 - x0);
                let y = y0 + rng.below(y1 - y0);
                buf.push(image.pixel(x as u32, y as u32));
            }
            match config.stochastic_reducer {
                StochasticReducer::Median => reducers::median(buf),
                StochasticReducer::Mode => reducers::mode(buf),
            }
        }
        strategy => {
            for y in y0..y1 {
                for x in x0..x1 {
                    buf.push(image.pixel(x as u32, y as u32));
                }
            }
            match strategy {
                SampleStrategy::Median => reducers::median(buf),
                SampleStrategy::Mode => reducers::mode(buf),
                _ => reducers::mean(buf),
            }
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
