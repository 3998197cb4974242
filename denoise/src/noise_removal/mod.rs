//! Coherent-noise removal pipelines.
//!
//! Both pipelines share every step except the baseline:
//!
//! 1. build the morphological baseline (`morphed`),
//! 2. select signal-like samples from it ([`extract_selection`]),
//! 3. subtract the per-group, per-tick median of unprotected samples,
//! 4. measure the residual RMS of each group.
//!
//! [`remove_coherent_noise_1d`] filters every channel on its own, while
//! [`remove_coherent_noise_2d`] filters a channel x tick neighbourhood, so
//! neighbouring channels can shape each other's baseline.

mod config;
mod output;
mod subtraction;


pub use config::{BaselineMode, Config};
pub use output::DenoiseOutput;

use rayon::prelude::*;

use crate::common::Grid;
use crate::error::{Result, ShapeError};
use crate::morphology::{FlatMorphology, GridMorphology, MorphOperator, RowMorphology};
use crate::sample::Sample;
use crate::selection::{extract_selection, Selection};

use config::validate_grouping;
use subtraction::{subtract_group_medians, RmsPrecision, Subtracted};

/// Source of the morphological baseline.
trait Baseline {
    fn default_operator(&self) -> MorphOperator;

    fn compute<T: Sample>(&self, filtered: &Grid<T>, operator: MorphOperator) -> Grid<T>;

    /// Precision of the stored intrinsic RMS.
    fn rms_precision(&self) -> RmsPrecision {
        RmsPrecision::Full
    }
}

/// Each channel row filtered independently.
struct PerChannel<'a, M> {
    morphology: &'a M,
    structuring_element: usize,
}

impl<M: RowMorphology> Baseline for PerChannel<'_, M> {
    fn default_operator(&self) -> MorphOperator {
        MorphOperator::Dilation
    }

    fn compute<T: Sample>(&self, filtered: &Grid<T>, operator: MorphOperator) -> Grid<T> {
        let mut morphed = Grid::new_default(filtered.channels(), filtered.ticks());
        morphed
            .par_rows_mut()
            .zip(filtered.par_rows())
            .for_each(|(out, row)| {
                self.morphology
                    .apply(operator, row, self.structuring_element, out);
            });
        morphed
    }
}

/// All four variants computed jointly, one kept.
struct Neighborhood<'a, M> {
    morphology: &'a M,
    channels: usize,
    ticks: usize,
}

impl<M: GridMorphology> Baseline for Neighborhood<'_, M> {
    fn default_operator(&self) -> MorphOperator {
        MorphOperator::Gradient
    }

    fn compute<T: Sample>(&self, filtered: &Grid<T>, operator: MorphOperator) -> Grid<T> {
        self.morphology
            .apply_all(filtered, self.channels, self.ticks)
            .take(operator)
    }

    fn rms_precision(&self) -> RmsPrecision {
        RmsPrecision::Single
    }
}

/// Remove coherent noise using a per-channel morphological baseline.
///
/// `operator` of `None` falls back to dilation.
pub fn remove_coherent_noise_1d<T: Sample, M: RowMorphology>(
    filtered: &Grid<T>,
    morphology: &M,
    structuring_element: usize,
    operator: Option<MorphOperator>,
    grouping: usize,
    window: usize,
    threshold_factor: f32,
) -> Result<DenoiseOutput<T>> {
    let baseline = PerChannel {
        morphology,
        structuring_element,
    };
    remove_coherent_noise(
        filtered,
        &baseline,
        operator,
        grouping,
        window,
        threshold_factor,
    )
}

/// Remove coherent noise using a joint channel x tick morphological baseline.
///
/// `structuring_element_x` spans channels and `structuring_element_y` spans
/// ticks. `operator` of `None` falls back to gradient. The intrinsic RMS is
/// rounded to `f32` before it is stored, also for `f64` grids.
#[allow(clippy::too_many_arguments)]
pub fn remove_coherent_noise_2d<T: Sample, M: GridMorphology>(
    filtered: &Grid<T>,
    morphology: &M,
    structuring_element_x: usize,
    structuring_element_y: usize,
    operator: Option<MorphOperator>,
    grouping: usize,
    window: usize,
    threshold_factor: f32,
) -> Result<DenoiseOutput<T>> {
    let baseline = Neighborhood {
        morphology,
        channels: structuring_element_x,
        ticks: structuring_element_y,
    };
    remove_coherent_noise(
        filtered,
        &baseline,
        operator,
        grouping,
        window,
        threshold_factor,
    )
}

fn remove_coherent_noise<T: Sample, B: Baseline>(
    filtered: &Grid<T>,
    baseline: &B,
    operator: Option<MorphOperator>,
    grouping: usize,
    window: usize,
    threshold_factor: f32,
) -> Result<DenoiseOutput<T>> {
    let (channels, ticks) = filtered.shape();
    if channels == 0 || ticks == 0 {
        return Err(ShapeError::Empty { channels, ticks }.into());
    }
    validate_grouping(grouping, channels)?;

    let operator = operator.unwrap_or_else(|| baseline.default_operator());
    let num_groups = channels / grouping;

    tracing::debug!(
        channels,
        ticks,
        grouping,
        num_groups,
        %operator,
        window,
        threshold_factor,
        "Removing coherent noise"
    );
    let excluded = channels - num_groups * grouping;
    if excluded > 0 {
        tracing::debug!(
            excluded,
            first_excluded = num_groups * grouping,
            "Trailing channels do not fill a group and are left out"
        );
    }

    let morphed = baseline.compute(filtered, operator);
    if morphed.shape() != filtered.shape() {
        return Err(ShapeError::Mismatch {
            what: "Morphed",
            expected: filtered.shape(),
            actual: morphed.shape(),
        }
        .into());
    }

    let Selection {
        select_vals, roi, ..
    } = extract_selection(filtered, &morphed, window, threshold_factor)?;

    let Subtracted {
        denoised,
        corrected_medians,
        intrinsic_rms,
    } = subtract_group_medians(filtered, &select_vals, grouping, baseline.rms_precision());

    tracing::debug!(
        protected = select_vals.count_ones(),
        total = channels * ticks,
        "Coherent noise removed"
    );

    Ok(DenoiseOutput {
        denoised,
        morphed,
        select_vals,
        roi,
        corrected_medians,
        intrinsic_rms,
    })
}

/// Configured coherent-noise remover.
///
/// Dispatches to the 1D or 2D pipeline according to
/// [`Config::baseline`].
#[derive(Debug, Clone)]
pub struct Denoiser<M = FlatMorphology> {
    config: Config,
    morphology: M,
}

impl Denoiser<FlatMorphology> {
    /// Denoiser with the flat structuring-element baseline.
    pub fn new(config: Config) -> Self {
        Self::with_morphology(config, FlatMorphology)
    }
}

impl Default for Denoiser<FlatMorphology> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<M> Denoiser<M> {
    pub fn with_morphology(config: Config, morphology: M) -> Self {
        Self { config, morphology }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl<M: RowMorphology + GridMorphology> Denoiser<M> {
    pub fn run<T: Sample>(&self, filtered: &Grid<T>) -> Result<DenoiseOutput<T>> {
        let Config {
            baseline,
            operator,
            window,
            threshold_factor,
            grouping,
        } = self.config;

        match baseline {
            BaselineMode::PerChannel {
                structuring_element,
            } => remove_coherent_noise_1d(
                filtered,
                &self.morphology,
                structuring_element,
                operator,
                grouping,
                window,
                threshold_factor,
            ),
            BaselineMode::Neighborhood { channels, ticks } => remove_coherent_noise_2d(
                filtered,
                &self.morphology,
                channels,
                ticks,
                operator,
                grouping,
                window,
                threshold_factor,
            ),
        }
    }
}
