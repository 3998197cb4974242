//! Bit-packed channel x tick boolean mask.
//!
//! Storage is row-aligned: every channel row starts on a fresh `u64` word,
//! so rows never share a word and can be written from separate threads.

use std::ops::Range;

use rayon::prelude::*;

const BITS_PER_WORD: usize = 64;

/// Mask of `channels x ticks` booleans, 1 bit per sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitGrid {
    /// Packed bits in LSB order, `words_per_row` words per channel.
    words: Vec<u64>,
    channels: usize,
    ticks: usize,
    words_per_row: usize,
}

impl BitGrid {
    pub fn new_filled(channels: usize, ticks: usize, value: bool) -> Self {
        let words_per_row = ticks.div_ceil(BITS_PER_WORD);
        let mut grid = Self {
            words: vec![0u64; channels * words_per_row],
            channels,
            ticks,
            words_per_row,
        };
        if value {
            grid.fill(true);
        }
        grid
    }

    /// All bits cleared.
    #[inline]
    pub fn new_default(channels: usize, ticks: usize) -> Self {
        Self::new_filled(channels, ticks, false)
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.channels, self.ticks)
    }

    #[inline]
    pub fn words_per_row(&self) -> usize {
        self.words_per_row
    }

    #[inline]
    pub fn get(&self, channel: usize, tick: usize) -> bool {
        debug_assert!(channel < self.channels && tick < self.ticks);
        let word = self.words[channel * self.words_per_row + tick / BITS_PER_WORD];
        (word >> (tick % BITS_PER_WORD)) & 1 != 0
    }

    #[inline]
    pub fn set(&mut self, channel: usize, tick: usize, value: bool) {
        debug_assert!(channel < self.channels);
        self.row_mut(channel).set(tick, value);
    }

    /// Set every valid bit to `value`; padding bits stay cleared.
    pub fn fill(&mut self, value: bool) {
        self.rows_mut().for_each(|mut row| row.fill(value));
    }

    #[inline]
    pub fn row(&self, channel: usize) -> BitRow<'_> {
        let start = channel * self.words_per_row;
        BitRow {
            words: &self.words[start..start + self.words_per_row],
            len: self.ticks,
        }
    }

    #[inline]
    pub fn row_mut(&mut self, channel: usize) -> BitRowMut<'_> {
        let start = channel * self.words_per_row;
        BitRowMut {
            words: &mut self.words[start..start + self.words_per_row],
            len: self.ticks,
        }
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = BitRowMut<'_>> {
        let len = self.ticks;
        self.words
            .chunks_mut(self.words_per_row.max(1))
            .map(move |words| BitRowMut { words, len })
    }

    /// Parallel iterator over mutable channel rows, in channel order.
    pub fn par_rows_mut(&mut self) -> impl IndexedParallelIterator<Item = BitRowMut<'_>> {
        let len = self.ticks;
        self.words
            .par_chunks_mut(self.words_per_row.max(1))
            .map(move |words| BitRowMut { words, len })
    }

    /// Number of set bits.
    #[inline]
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    #[inline]
    pub fn row_count_ones(&self, channel: usize) -> usize {
        self.row(channel).count_ones()
    }

    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        (0..self.channels)
            .map(|channel| self.row(channel).iter().collect())
            .collect()
    }
}

/// Read-only view of one channel row.
#[derive(Debug, Clone, Copy)]
pub struct BitRow<'a> {
    words: &'a [u64],
    len: usize,
}

impl<'a> BitRow<'a> {
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn get(&self, tick: usize) -> bool {
        debug_assert!(tick < self.len);
        bit(self.words, tick)
    }

    #[inline]
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + 'a {
        let words = self.words;
        (0..self.len).map(move |tick| bit(words, tick))
    }
}

/// Mutable view of one channel row.
#[derive(Debug)]
pub struct BitRowMut<'a> {
    words: &'a mut [u64],
    len: usize,
}

impl BitRowMut<'_> {
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn get(&self, tick: usize) -> bool {
        debug_assert!(tick < self.len);
        bit(self.words, tick)
    }

    #[inline]
    pub fn set(&mut self, tick: usize, value: bool) {
        debug_assert!(tick < self.len);
        let bit = 1u64 << (tick % BITS_PER_WORD);
        let word = &mut self.words[tick / BITS_PER_WORD];
        if value {
            *word |= bit;
        } else {
            *word &= !bit;
        }
    }

    /// OR a run of set bits into the row. Bits outside `range` are kept.
    pub fn set_range(&mut self, range: Range<usize>) {
        debug_assert!(range.end <= self.len);
        if range.start >= range.end {
            return;
        }

        let first_word = range.start / BITS_PER_WORD;
        let last_word = (range.end - 1) / BITS_PER_WORD;

        for word_idx in first_word..=last_word {
            let lo = if word_idx == first_word {
                range.start % BITS_PER_WORD
            } else {
                0
            };
            let hi = if word_idx == last_word {
                (range.end - 1) % BITS_PER_WORD + 1
            } else {
                BITS_PER_WORD
            };
            self.words[word_idx] |= span_mask(lo, hi);
        }
    }

    pub fn fill(&mut self, value: bool) {
        self.words.fill(0);
        if value {
            self.set_range(0..self.len);
        }
    }

    #[inline]
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

#[inline]
fn bit(words: &[u64], tick: usize) -> bool {
    (words[tick / BITS_PER_WORD] >> (tick % BITS_PER_WORD)) & 1 != 0
}

/// Bits `lo..hi` set, `hi <= 64`.
#[inline]
fn span_mask(lo: usize, hi: usize) -> u64 {
    debug_assert!(lo < hi && hi <= BITS_PER_WORD);
    let upper = if hi == BITS_PER_WORD {
        !0u64
    } else {
        (1u64 << hi) - 1
    };
    upper & !((1u64 << lo) - 1)
}
