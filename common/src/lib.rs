//! Containers shared by the signal-processing crates of the workspace.

pub mod bit_grid;
pub mod grid;

pub use bit_grid::{BitGrid, BitRow, BitRowMut};
pub use grid::{Grid, GridError};
