//! Shared containers re-exported from the workspace `common` crate.

pub use common::bit_grid::{BitGrid, BitRow, BitRowMut};
pub use common::grid::{Grid, GridError};
