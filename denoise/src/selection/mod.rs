//! Signal-like sample selection and region-of-interest masks.
//!
//! Each channel is thresholded independently against its morphological
//! baseline. The threshold is `threshold_factor * rms(morphed - median)`,
//! and a sample is flagged when `|morphed|` exceeds it. Every flagged tick
//! ORs a `±window` run into the ROI mask, clipped to the row.

#[cfg(test)]
mod tests;

use rayon::prelude::*;

use crate::common::{BitGrid, BitRowMut, Grid};
use crate::error::{Result, ShapeError};
use crate::math;
use crate::sample::Sample;

/// Output of [`extract_selection`].
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// `true` where a sample is signal-like and protected from subtraction.
    pub select_vals: BitGrid,
    /// `true` within `window` ticks of any selected sample.
    pub roi: BitGrid,
    /// Per-channel threshold that was applied to `|morphed|`.
    pub thresholds: Vec<f32>,
}

/// Classify samples as signal-like using the morphological baseline.
///
/// `waveforms` fixes the expected shape; the thresholding itself only reads
/// `morphed`.
pub fn extract_selection<T: Sample>(
    waveforms: &Grid<T>,
    morphed: &Grid<T>,
    window: usize,
    threshold_factor: f32,
) -> Result<Selection> {
    let (channels, ticks) = waveforms.shape();
    if channels == 0 || ticks == 0 {
        return Err(ShapeError::Empty { channels, ticks }.into());
    }
    if morphed.shape() != waveforms.shape() {
        return Err(ShapeError::Mismatch {
            what: "Morphed",
            expected: waveforms.shape(),
            actual: morphed.shape(),
        }
        .into());
    }

    let mut select_vals = BitGrid::new_default(channels, ticks);
    let mut roi = BitGrid::new_default(channels, ticks);

    let thresholds: Vec<f32> = morphed
        .par_rows()
        .zip(select_vals.par_rows_mut())
        .zip(roi.par_rows_mut())
        .map(|((row, mut select_row), mut roi_row)| {
            let threshold = channel_threshold(row, threshold_factor);
            flag_channel(row, threshold, window, &mut select_row, &mut roi_row);
            threshold
        })
        .collect();

    for (channel, threshold) in thresholds.iter().enumerate() {
        tracing::trace!(channel, threshold, "selection threshold");
    }
    tracing::debug!(
        channels,
        ticks,
        window,
        selected = select_vals.count_ones(),
        roi = roi.count_ones(),
        "Extracted signal selection"
    );

    Ok(Selection {
        select_vals,
        roi,
        thresholds,
    })
}

/// `threshold_factor * rms(row - median(row))`.
///
/// The residual is formed in the sample type before squaring, and the RMS is
/// narrowed to `f32` like the threshold factor.
fn channel_threshold<T: Sample>(row: &[T], threshold_factor: f32) -> f32 {
    let mut scratch = row.to_vec();
    let median = math::median_mut(&mut scratch);

    for (residual, &value) in scratch.iter_mut().zip(row) {
        *residual = value.residual(median);
    }
    let rms = math::rms(&scratch) as f32;

    threshold_factor * rms
}

fn flag_channel<T: Sample>(
    row: &[T],
    threshold: f32,
    window: usize,
    select_row: &mut BitRowMut<'_>,
    roi_row: &mut BitRowMut<'_>,
) {
    let ticks = row.len();
    let threshold = threshold as f64;

    for (tick, value) in row.iter().enumerate() {
        if value.abs_f64() > threshold {
            select_row.set(tick, true);
            let start = tick.saturating_sub(window);
            let end = tick.saturating_add(window).saturating_add(1).min(ticks);
            roi_row.set_range(start..end);
        }
    }
}
