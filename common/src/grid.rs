use std::ops::{Index, IndexMut};
use std::slice;

use rayon::prelude::*;

/// Errors produced when building a [`Grid`] from caller-owned rows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("grid must have at least one channel and one tick, got {channels}x{ticks}")]
    Empty { channels: usize, ticks: usize },
    #[error("row {row} has {actual} ticks, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// Dense row-major channel x tick grid.
///
/// Channels are the outer (row) dimension and ticks the inner one, so
/// `samples[channel * ticks + tick]` is the sample at `(channel, tick)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    samples: Vec<T>,
    channels: usize,
    ticks: usize,
}

impl<T> Grid<T> {
    pub fn new(channels: usize, ticks: usize, samples: Vec<T>) -> Self {
        assert_eq!(
            samples.len(),
            channels * ticks,
            "samples length must equal channels * ticks"
        );
        Self {
            samples,
            channels,
            ticks,
        }
    }

    /// Build a grid from one `Vec` per channel.
    ///
    /// Every row must have the same, non-zero length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, GridError> {
        let channels = rows.len();
        let ticks = rows.first().map_or(0, Vec::len);
        if channels == 0 || ticks == 0 {
            return Err(GridError::Empty { channels, ticks });
        }

        let mut samples = Vec::with_capacity(channels * ticks);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != ticks {
                return Err(GridError::Ragged {
                    row,
                    expected: ticks,
                    actual: values.len(),
                });
            }
            samples.extend(values);
        }

        Ok(Self::new(channels, ticks, samples))
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// `(channels, ticks)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.channels, self.ticks)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn samples(&self) -> &[T] {
        &self.samples
    }

    #[inline]
    pub fn samples_mut(&mut self) -> &mut [T] {
        &mut self.samples
    }

    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.samples
    }

    #[inline]
    pub fn get(&self, channel: usize, tick: usize) -> &T {
        debug_assert!(channel < self.channels && tick < self.ticks);
        &self.samples[channel * self.ticks + tick]
    }

    #[inline]
    pub fn get_mut(&mut self, channel: usize, tick: usize) -> &mut T {
        debug_assert!(channel < self.channels && tick < self.ticks);
        &mut self.samples[channel * self.ticks + tick]
    }

    #[inline]
    pub fn row(&self, channel: usize) -> &[T] {
        let start = channel * self.ticks;
        &self.samples[start..start + self.ticks]
    }

    #[inline]
    pub fn row_mut(&mut self, channel: usize) -> &mut [T] {
        let start = channel * self.ticks;
        &mut self.samples[start..start + self.ticks]
    }

    /// Iterate channel rows in order.
    #[inline]
    pub fn rows(&self) -> slice::Chunks<'_, T> {
        // `max(1)` keeps `chunks` valid for a zero-tick grid.
        self.samples.chunks(self.ticks.max(1))
    }

    #[inline]
    pub fn rows_mut(&mut self) -> slice::ChunksMut<'_, T> {
        self.samples.chunks_mut(self.ticks.max(1))
    }

    /// Contiguous block of `count` channel rows starting at `first`.
    #[inline]
    pub fn channel_block(&self, first: usize, count: usize) -> &[T] {
        &self.samples[first * self.ticks..(first + count) * self.ticks]
    }

    pub fn to_rows(&self) -> Vec<Vec<T>>
    where
        T: Clone,
    {
        self.rows().map(<[T]>::to_vec).collect()
    }
}

impl<T: Sync> Grid<T> {
    #[inline]
    pub fn par_rows(&self) -> rayon::slice::Chunks<'_, T> {
        self.samples.par_chunks(self.ticks.max(1))
    }
}

impl<T: Send> Grid<T> {
    #[inline]
    pub fn par_rows_mut(&mut self) -> rayon::slice::ChunksMut<'_, T> {
        self.samples.par_chunks_mut(self.ticks.max(1))
    }

    /// Parallel iterator over blocks of `rows_per_block` channel rows.
    ///
    /// The last block is shorter when `channels` is not a multiple of
    /// `rows_per_block`.
    #[inline]
    pub fn par_row_blocks_mut(&mut self, rows_per_block: usize) -> rayon::slice::ChunksMut<'_, T> {
        assert!(rows_per_block > 0, "rows_per_block must be > 0");
        self.samples
            .par_chunks_mut((rows_per_block * self.ticks).max(1))
    }
}

impl<T: Default + Clone> Grid<T> {
    pub fn new_default(channels: usize, ticks: usize) -> Self {
        Self::new_filled(channels, ticks, T::default())
    }
}

impl<T: Clone> Grid<T> {
    pub fn new_filled(channels: usize, ticks: usize, value: T) -> Self {
        Self {
            samples: vec![value; channels * ticks],
            channels,
            ticks,
        }
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    #[inline]
    fn index(&self, (channel, tick): (usize, usize)) -> &Self::Output {
        &self.samples[channel * self.ticks + tick]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    #[inline]
    fn index_mut(&mut self, (channel, tick): (usize, usize)) -> &mut Self::Output {
        &mut self.samples[channel * self.ticks + tick]
    }
}

impl<T> From<Grid<T>> for Vec<T> {
    #[inline]
    fn from(grid: Grid<T>) -> Self {
        grid.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stores_shape() {
        let grid = Grid::new(2, 3, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(grid.channels(), 2);
        assert_eq!(grid.ticks(), 3);
        assert_eq!(grid.shape(), (2, 3));
        assert_eq!(grid.len(), 6);
    }

    #[test]
    #[should_panic(expected = "samples length must equal channels * ticks")]
    fn test_new_panics_on_size_mismatch() {
        Grid::new(2, 3, vec![1, 2, 3]);
    }

    #[test]
    fn test_row_major_layout() {
        // channel 0 = [1, 2, 3], channel 1 = [4, 5, 6]
        let grid = Grid::new(2, 3, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(grid[(0, 2)], 3);
        assert_eq!(grid[(1, 0)], 4);
        assert_eq!(*grid.get(1, 2), 6);
        assert_eq!(grid.row(1), &[4, 5, 6]);
    }

    #[test]
    fn test_from_rows_roundtrip() {
        let rows = vec![vec![1.0f32, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
        let grid = Grid::from_rows(rows.clone()).unwrap();
        assert_eq!(grid.shape(), (3, 2));
        assert_eq!(grid.to_rows(), rows);
    }

    #[test]
    fn test_from_rows_rejects_empty() {
        let err = Grid::<i16>::from_rows(vec![]).unwrap_err();
        assert_eq!(
            err,
            GridError::Empty {
                channels: 0,
                ticks: 0
            }
        );

        let err = Grid::<i16>::from_rows(vec![vec![], vec![]]).unwrap_err();
        assert_eq!(
            err,
            GridError::Empty {
                channels: 2,
                ticks: 0
            }
        );
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = Grid::from_rows(vec![vec![1, 2, 3], vec![4, 5]]).unwrap_err();
        assert_eq!(
            err,
            GridError::Ragged {
                row: 1,
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_row_mut_and_index_mut() {
        let mut grid = Grid::<i32>::new_default(2, 2);
        grid.row_mut(1)[0] = 7;
        grid[(0, 1)] = 3;
        assert_eq!(grid.samples(), &[0, 3, 7, 0]);
    }

    #[test]
    fn test_channel_block() {
        let grid = Grid::new(3, 2, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(grid.channel_block(1, 2), &[3, 4, 5, 6]);
    }

    #[test]
    fn test_par_row_blocks_cover_all_rows() {
        let mut grid = Grid::<usize>::new_default(5, 3);
        let blocks = grid.par_row_blocks_mut(2);
        blocks
            .enumerate()
            .for_each(|(block, values)| values.fill(block));
        assert_eq!(grid.row(0), &[0, 0, 0]);
        assert_eq!(grid.row(3), &[1, 1, 1]);
        // trailing partial block
        assert_eq!(grid.row(4), &[2, 2, 2]);
    }

    #[test]
    fn test_par_rows_matches_rows() {
        let grid = Grid::new(3, 2, vec![1, 2, 3, 4, 5, 6]);
        let sums: Vec<i32> = grid.par_rows().map(|row| row.iter().sum()).collect();
        assert_eq!(sums, vec![3, 7, 11]);
    }
}
