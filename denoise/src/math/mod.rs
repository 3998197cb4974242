//! Robust statistics: order-statistic median and quadratic mean.

use std::cmp::Ordering;

use crate::sample::Sample;


#[inline]
fn cmp_samples<T: Sample>(a: &T, b: &T) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

/// Median of `data` in-place using quickselect (O(n) average).
///
/// Mutates the input buffer (partial sort). For even lengths the two central
/// order statistics are averaged in `f64` and converted back with
/// [`Sample::from_f64`], so integer samples truncate toward zero.
///
/// `data` must be non-empty.
#[inline]
pub fn median_mut<T: Sample>(data: &mut [T]) -> T {
    debug_assert!(!data.is_empty());

    let len = data.len();
    let mid = len / 2;

    if len & 1 == 1 {
        let (_, median, _) = data.select_nth_unstable_by(mid, cmp_samples);
        *median
    } else {
        let (left_part, right_median, _) = data.select_nth_unstable_by(mid, cmp_samples);
        let right = *right_median;
        // Lower central value is the max of the left partition.
        let left = left_part
            .iter()
            .copied()
            .reduce(|a, b| if cmp_samples(&a, &b) == Ordering::Less { b } else { a })
            .unwrap_or(right);
        T::from_f64((left.to_f64() + right.to_f64()) / 2.0)
    }
}

/// Median of `values` without touching the input. `None` when empty.
pub fn median<T: Sample>(values: &[T]) -> Option<T> {
    if values.is_empty() {
        return None;
    }
    let mut scratch = values.to_vec();
    Some(median_mut(&mut scratch))
}

/// Sum of squares accumulated in `f64`. Each square is formed by
/// [`Sample::square_f64`].
#[inline]
pub fn sum_of_squares<T: Sample>(values: &[T]) -> f64 {
    values.iter().map(|v| v.square_f64()).sum()
}

/// Root mean square, `sqrt(sum(v^2) / n)`, in `f64`.
///
/// `values` must be non-empty.
#[inline]
pub fn rms<T: Sample>(values: &[T]) -> f64 {
    debug_assert!(!values.is_empty());
    (sum_of_squares(values) / values.len() as f64).sqrt()
}
