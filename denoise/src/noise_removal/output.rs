use crate::common::{BitGrid, Grid};

/// Everything produced by one denoising call.
///
/// Per-channel grids are `channels x ticks`; per-group grids are
/// `groups x ticks` with `groups = channels / grouping`.
#[derive(Debug, Clone, PartialEq)]
pub struct DenoiseOutput<T> {
    /// Input with the group median removed from unprotected samples.
    pub denoised: Grid<T>,
    /// Morphological baseline used for selection.
    pub morphed: Grid<T>,
    /// Samples protected from subtraction.
    pub select_vals: BitGrid,
    /// Diagnostic windows around protected samples.
    pub roi: BitGrid,
    /// Subtracted noise level per group and tick.
    pub corrected_medians: Grid<T>,
    /// Residual RMS per group and tick after subtraction.
    pub intrinsic_rms: Grid<T>,
}

impl<T> DenoiseOutput<T> {
    #[inline]
    pub fn num_groups(&self) -> usize {
        self.corrected_medians.channels()
    }

    /// Number of samples protected from subtraction.
    #[inline]
    pub fn protected_count(&self) -> usize {
        self.select_vals.count_ones()
    }
}
