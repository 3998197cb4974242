//! Error types for coherent-noise removal.

use thiserror::Error;

use crate::common::GridError;

/// Errors returned by the denoising entry points.
///
/// Either the full set of outputs is produced or one of these is returned;
/// there is no partial result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Input grids that cannot be processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("Waveform grid is empty: {channels} channels x {ticks} ticks")]
    Empty { channels: usize, ticks: usize },

    #[error("Waveform row {row} has {actual} ticks, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("{what} grid is {actual:?} (channels, ticks), expected {expected:?}")]
    Mismatch {
        what: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },
}

/// Invalid pipeline parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Channel grouping must be non-zero")]
    ZeroGrouping,

    #[error("Channel grouping {grouping} exceeds channel count {channels}")]
    GroupingExceedsChannels { grouping: usize, channels: usize },
}

impl From<GridError> for ShapeError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::Empty { channels, ticks } => ShapeError::Empty { channels, ticks },
            GridError::Ragged {
                row,
                expected,
                actual,
            } => ShapeError::Ragged {
                row,
                expected,
                actual,
            },
        }
    }
}

impl From<GridError> for Error {
    fn from(err: GridError) -> Self {
        Error::Shape(err.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
