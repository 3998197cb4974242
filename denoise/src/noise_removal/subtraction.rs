//! Group-median subtraction and intrinsic RMS.

use rayon::prelude::*;

use crate::common::{BitGrid, Grid};
use crate::math;
use crate::sample::Sample;

/// Precision the intrinsic RMS passes through before it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RmsPrecision {
    /// Full `f64`, converted straight to the sample type.
    Full,
    /// Rounded to `f32` first, so `f64` grids carry single precision.
    Single,
}

impl RmsPrecision {
    #[inline]
    fn narrow(self, rms: f64) -> f64 {
        match self {
            RmsPrecision::Full => rms,
            RmsPrecision::Single => rms as f32 as f64,
        }
    }
}

/// Grids produced by [`subtract_group_medians`].
pub(crate) struct Subtracted<T> {
    pub denoised: Grid<T>,
    pub corrected_medians: Grid<T>,
    pub intrinsic_rms: Grid<T>,
}

/// Remove the per-tick median of unprotected samples from every group.
///
/// Groups are contiguous blocks of `grouping` channels; the
/// `channels % grouping` trailing channels belong to no group and keep a
/// zero value in `denoised`. A tick where every channel of a group is
/// protected gets a median of zero and leaves the group unchanged.
///
/// Intrinsic RMS is taken over all channels of the group after
/// subtraction, protected ones included, and rounded through `precision`.
pub(crate) fn subtract_group_medians<T: Sample>(
    filtered: &Grid<T>,
    select_vals: &BitGrid,
    grouping: usize,
    precision: RmsPrecision,
) -> Subtracted<T> {
    debug_assert!(grouping > 0);
    debug_assert_eq!(filtered.shape(), select_vals.shape());

    let (channels, ticks) = filtered.shape();
    let num_groups = channels / grouping;

    let mut denoised = Grid::new_default(channels, ticks);
    let mut corrected_medians = Grid::new_default(num_groups, ticks);
    let mut intrinsic_rms = Grid::new_default(num_groups, ticks);

    // Zip stops at `num_groups`, so a trailing partial block is never visited.
    denoised
        .par_row_blocks_mut(grouping)
        .zip(corrected_medians.par_rows_mut())
        .zip(intrinsic_rms.par_rows_mut())
        .enumerate()
        .for_each(|(group, ((block, median_row), rms_row))| {
            let first = group * grouping;
            let input = filtered.channel_block(first, grouping);

            let mut unprotected = Vec::with_capacity(grouping);
            let mut column = Vec::with_capacity(grouping);

            for tick in 0..ticks {
                unprotected.clear();
                unprotected.extend(
                    (0..grouping)
                        .filter(|&k| !select_vals.get(first + k, tick))
                        .map(|k| input[k * ticks + tick]),
                );

                let median = if unprotected.is_empty() {
                    T::default()
                } else {
                    math::median_mut(&mut unprotected)
                };
                median_row[tick] = median;

                column.clear();
                for k in 0..grouping {
                    let value = input[k * ticks + tick];
                    let out = if select_vals.get(first + k, tick) {
                        value
                    } else {
                        value.residual(median)
                    };
                    block[k * ticks + tick] = out;
                    column.push(out);
                }

                rms_row[tick] = T::from_f64(precision.narrow(math::rms(&column)));
            }
        });

    Subtracted {
        denoised,
        corrected_medians,
        intrinsic_rms,
    }
}
