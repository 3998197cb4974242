//! Tests for selection and ROI extraction.

use super::*;
use crate::error::Error;

fn single_spike(ticks: usize, at: usize, height: f32) -> Grid<f32> {
    let mut grid = Grid::new_default(1, ticks);
    grid[(0, at)] = height;
    grid
}

fn true_ticks(mask: &BitGrid, channel: usize) -> Vec<usize> {
    mask.row(channel)
        .iter()
        .enumerate()
        .filter_map(|(tick, v)| v.then_some(tick))
        .collect()
}

#[test]
fn test_zero_baseline_selects_nothing() {
    let waveforms = Grid::new_filled(3, 20, 7.0f32);
    let morphed = Grid::new_default(3, 20);
    let sel = extract_selection(&waveforms, &morphed, 4, 2.0).unwrap();
    assert_eq!(sel.select_vals.count_ones(), 0);
    assert_eq!(sel.roi.count_ones(), 0);
    assert!(sel.thresholds.iter().all(|&t| t == 0.0));
}

#[test]
fn test_constant_nonzero_baseline_is_flagged() {
    // rms(morphed - median) is 0, so any nonzero |morphed| clears the threshold.
    let waveforms = Grid::new_filled(1, 10, 3i16);
    let morphed = Grid::new_filled(1, 10, 3i16);
    let sel = extract_selection(&waveforms, &morphed, 0, 5.0).unwrap();
    assert_eq!(sel.select_vals.count_ones(), 10);
    assert_eq!(sel.roi.count_ones(), 10);
}

#[test]
fn test_single_spike_roi_window() {
    let ticks = 30;
    let at = 12;
    let window = 4;
    let morphed = single_spike(ticks, at, 50.0);
    let waveforms = morphed.clone();

    let sel = extract_selection(&waveforms, &morphed, window, 1.0).unwrap();

    assert_eq!(true_ticks(&sel.select_vals, 0), vec![at]);
    assert_eq!(
        true_ticks(&sel.roi, 0),
        ((at - window)..=(at + window)).collect::<Vec<_>>()
    );
}

#[test]
fn test_threshold_value() {
    // median 0, rms = sqrt(50^2 / 25) = 10
    let morphed = single_spike(25, 3, 50.0);
    let sel = extract_selection(&morphed, &morphed, 0, 2.5).unwrap();
    assert!((sel.thresholds[0] - 25.0).abs() < 1e-5);
}

#[test]
fn test_roi_clipped_at_row_start() {
    let morphed = single_spike(20, 1, 40.0);
    let sel = extract_selection(&morphed, &morphed, 5, 1.0).unwrap();
    assert_eq!(true_ticks(&sel.roi, 0), (0..=6).collect::<Vec<_>>());
}

#[test]
fn test_roi_clipped_at_row_end() {
    let morphed = single_spike(20, 18, 40.0);
    let sel = extract_selection(&morphed, &morphed, 5, 1.0).unwrap();
    assert_eq!(true_ticks(&sel.roi, 0), (13..20).collect::<Vec<_>>());
}

#[test]
fn test_overlapping_windows_merge() {
    let mut morphed = Grid::<f64>::new_default(1, 40);
    morphed[(0, 10)] = 100.0;
    morphed[(0, 14)] = 100.0;
    let sel = extract_selection(&morphed, &morphed, 3, 1.0).unwrap();

    assert_eq!(true_ticks(&sel.select_vals, 0), vec![10, 14]);
    assert_eq!(true_ticks(&sel.roi, 0), (7..=17).collect::<Vec<_>>());
}

#[test]
fn test_negative_excursion_is_flagged() {
    let morphed = single_spike(16, 8, -30.0);
    let sel = extract_selection(&morphed, &morphed, 0, 1.0).unwrap();
    assert_eq!(true_ticks(&sel.select_vals, 0), vec![8]);
}

#[test]
fn test_channels_are_independent() {
    let mut morphed = Grid::<f32>::new_default(3, 16);
    morphed[(1, 5)] = 20.0;
    let sel = extract_selection(&morphed, &morphed, 1, 1.0).unwrap();

    assert!(true_ticks(&sel.select_vals, 0).is_empty());
    assert_eq!(true_ticks(&sel.select_vals, 1), vec![5]);
    assert!(true_ticks(&sel.select_vals, 2).is_empty());
    assert_eq!(true_ticks(&sel.roi, 1), vec![4, 5, 6]);
}

#[test]
fn test_thresholding_reads_morphed_not_waveforms() {
    let waveforms = single_spike(16, 4, 1000.0);
    let morphed = Grid::new_default(1, 16);
    let sel = extract_selection(&waveforms, &morphed, 2, 1.0).unwrap();
    assert_eq!(sel.select_vals.count_ones(), 0);
}

#[test]
fn test_window_spans_word_boundary() {
    let morphed = single_spike(200, 64, 500.0);
    let sel = extract_selection(&morphed, &morphed, 10, 1.0).unwrap();
    assert_eq!(true_ticks(&sel.roi, 0), (54..=74).collect::<Vec<_>>());
}

#[test]
fn test_shape_mismatch_rejected() {
    let waveforms = Grid::<f32>::new_default(2, 10);
    let morphed = Grid::<f32>::new_default(2, 9);
    let err = extract_selection(&waveforms, &morphed, 1, 1.0).unwrap_err();
    assert_eq!(
        err,
        Error::Shape(ShapeError::Mismatch {
            what: "Morphed",
            expected: (2, 10),
            actual: (2, 9),
        })
    );
}

#[test]
fn test_empty_grid_rejected() {
    let grid = Grid::<i16>::new_default(0, 10);
    let err = extract_selection(&grid, &grid, 1, 1.0).unwrap_err();
    assert_eq!(
        err,
        Error::Shape(ShapeError::Empty {
            channels: 0,
            ticks: 10
        })
    );
}
