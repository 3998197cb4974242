//! Denoise - coherent-noise removal for multi-channel detector waveforms.
//!
//! Readout channels that share electronics pick up a common noise component.
//! This crate estimates that component per group of channels and per tick,
//! and removes it while protecting signal-like samples:
//! - Morphological baseline (per channel or over a channel x tick neighbourhood)
//! - Signal selection and region-of-interest masks
//! - Group-median subtraction and residual RMS
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use denoise::{Config, Denoiser, Grid, MorphOperator};
//!
//! let waveforms = Grid::from_rows(rows)?;
//!
//! let config = Config::per_channel(7)
//!     .with_operator(MorphOperator::Gradient)
//!     .with_grouping(64);
//! let output = Denoiser::new(config).run(&waveforms)?;
//!
//! println!("{} protected samples", output.protected_count());
//! ```

pub(crate) mod common;
mod error;
pub mod math;
pub mod morphology;
mod noise_removal;
mod sample;
mod selection;

// ============================================================================
// Containers
// ============================================================================

pub use crate::common::{BitGrid, BitRow, BitRowMut, Grid, GridError};

// ============================================================================
// Errors
// ============================================================================

pub use error::{ConfigError, Error, Result, ShapeError};

// ============================================================================
// Samples and baselines
// ============================================================================

pub use morphology::{FlatMorphology, GridMorphology, MorphOperator, MorphSet, RowMorphology};
pub use sample::Sample;

// ============================================================================
// Selection
// ============================================================================

pub use selection::{extract_selection, Selection};

// ============================================================================
// Noise removal
// ============================================================================

pub use noise_removal::{
    remove_coherent_noise_1d, remove_coherent_noise_2d, BaselineMode, Config, DenoiseOutput,
    Denoiser,
};
