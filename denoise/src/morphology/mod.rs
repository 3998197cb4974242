//! Morphological baseline estimators.
//!
//! The denoising pipelines consume a baseline through two seams:
//! [`RowMorphology`] filters one channel row at a time, and [`GridMorphology`]
//! computes all four operator variants jointly over a channel x tick
//! neighbourhood. [`FlatMorphology`] implements both with a flat (box)
//! structuring element.

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::common::Grid;
use crate::sample::Sample;

/// Grey-scale morphological operator used to build the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MorphOperator {
    /// Local maximum.
    Dilation,
    /// Local minimum.
    Erosion,
    /// Local mean.
    Average,
    /// Dilation minus erosion.
    Gradient,
}

impl MorphOperator {
    pub const ALL: [MorphOperator; 4] = [
        MorphOperator::Dilation,
        MorphOperator::Erosion,
        MorphOperator::Average,
        MorphOperator::Gradient,
    ];

    /// Parse a single-letter selector (`'d'`, `'e'`, `'a'`, `'g'`).
    ///
    /// Returns `None` for anything else; the pipelines then use their own
    /// default operator instead of failing.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'd' => Some(MorphOperator::Dilation),
            'e' => Some(MorphOperator::Erosion),
            'a' => Some(MorphOperator::Average),
            'g' => Some(MorphOperator::Gradient),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            MorphOperator::Dilation => 'd',
            MorphOperator::Erosion => 'e',
            MorphOperator::Average => 'a',
            MorphOperator::Gradient => 'g',
        }
    }
}

impl std::fmt::Display for MorphOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MorphOperator::Dilation => "dilation",
            MorphOperator::Erosion => "erosion",
            MorphOperator::Average => "average",
            MorphOperator::Gradient => "gradient",
        };
        f.write_str(name)
    }
}

/// Per-row morphological filter.
pub trait RowMorphology: Sync {
    /// Filter `row` with `operator` into `output` (same length).
    fn apply<T: Sample>(
        &self,
        operator: MorphOperator,
        row: &[T],
        structuring_element: usize,
        output: &mut [T],
    );
}

/// Joint channel x tick morphological filter.
pub trait GridMorphology: Sync {
    /// Compute all four operator variants over `grid`.
    ///
    /// `channels` and `ticks` are the structuring-element extents along each
    /// axis. Every grid in the returned set has the shape of `grid`.
    fn apply_all<T: Sample>(&self, grid: &Grid<T>, channels: usize, ticks: usize) -> MorphSet<T>;
}

/// The four operator variants produced by one [`GridMorphology`] pass.
#[derive(Debug, Clone, PartialEq)]
pub struct MorphSet<T> {
    pub dilation: Grid<T>,
    pub erosion: Grid<T>,
    pub average: Grid<T>,
    pub gradient: Grid<T>,
}

impl<T> MorphSet<T> {
    /// Keep the variant selected by `operator`, dropping the others.
    pub fn take(self, operator: MorphOperator) -> Grid<T> {
        match operator {
            MorphOperator::Dilation => self.dilation,
            MorphOperator::Erosion => self.erosion,
            MorphOperator::Average => self.average,
            MorphOperator::Gradient => self.gradient,
        }
    }

    pub fn get(&self, operator: MorphOperator) -> &Grid<T> {
        match operator {
            MorphOperator::Dilation => &self.dilation,
            MorphOperator::Erosion => &self.erosion,
            MorphOperator::Average => &self.average,
            MorphOperator::Gradient => &self.gradient,
        }
    }
}

/// Flat structuring element with clamped borders.
///
/// An extent `n` covers `n / 2` samples on each side of the centre, so even
/// extents behave like the next odd one and `0` or `1` is the identity.
/// Windows are truncated at the grid edges rather than padded.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatMorphology;

/// Running statistics of one window.
#[derive(Debug, Clone, Copy)]
struct WindowStats<T> {
    max: T,
    min: T,
    sum: f64,
    count: usize,
}

impl<T: Sample> WindowStats<T> {
    fn new(first: T) -> Self {
        Self {
            max: first,
            min: first,
            sum: 0.0,
            count: 0,
        }
    }

    #[inline]
    fn push(&mut self, value: T) {
        if value > self.max {
            self.max = value;
        }
        if value < self.min {
            self.min = value;
        }
        self.sum += value.to_f64();
        self.count += 1;
    }

    #[inline]
    fn value(&self, operator: MorphOperator) -> T {
        match operator {
            MorphOperator::Dilation => self.max,
            MorphOperator::Erosion => self.min,
            MorphOperator::Average => T::from_f64(self.sum / self.count as f64),
            MorphOperator::Gradient => self.max.residual(self.min),
        }
    }
}

#[inline]
fn window(center: usize, half: usize, len: usize) -> std::ops::Range<usize> {
    center.saturating_sub(half)..(center + half + 1).min(len)
}

impl RowMorphology for FlatMorphology {
    fn apply<T: Sample>(
        &self,
        operator: MorphOperator,
        row: &[T],
        structuring_element: usize,
        output: &mut [T],
    ) {
        assert_eq!(row.len(), output.len(), "row length mismatch");

        let half = structuring_element / 2;
        for (i, out) in output.iter_mut().enumerate() {
            let span = &row[window(i, half, row.len())];
            let mut stats = WindowStats::new(span[0]);
            span.iter().for_each(|&v| stats.push(v));
            *out = stats.value(operator);
        }
    }
}

impl GridMorphology for FlatMorphology {
    fn apply_all<T: Sample>(&self, grid: &Grid<T>, channels: usize, ticks: usize) -> MorphSet<T> {
        use rayon::prelude::*;

        let (num_channels, num_ticks) = grid.shape();
        let half_c = channels / 2;
        let half_t = ticks / 2;

        // One pass per output row collects every variant at once.
        let rows: Vec<[Vec<T>; 4]> = (0..num_channels)
            .into_par_iter()
            .map(|c| {
                let mut out: [Vec<T>; 4] = Default::default();
                out.iter_mut().for_each(|v| v.reserve_exact(num_ticks));

                for t in 0..num_ticks {
                    let mut stats = WindowStats::new(grid[(c, t)]);
                    for nc in window(c, half_c, num_channels) {
                        grid.row(nc)[window(t, half_t, num_ticks)]
                            .iter()
                            .for_each(|&v| stats.push(v));
                    }
                    for (variant, operator) in out.iter_mut().zip(MorphOperator::ALL) {
                        variant.push(stats.value(operator));
                    }
                }
                out
            })
            .collect();

        let mut flat: [Vec<T>; 4] = Default::default();
        flat.iter_mut()
            .for_each(|v| v.reserve_exact(num_channels * num_ticks));
        for row in rows {
            for (dst, src) in flat.iter_mut().zip(row) {
                dst.extend(src);
            }
        }

        let [dilation, erosion, average, gradient] =
            flat.map(|samples| Grid::new(num_channels, num_ticks, samples));
        MorphSet {
            dilation,
            erosion,
            average,
            gradient,
        }
    }
}
