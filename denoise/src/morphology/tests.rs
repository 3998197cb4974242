use super::*;

fn apply_row<T: Sample>(operator: MorphOperator, row: &[T], se: usize) -> Vec<T> {
    let mut out = vec![T::default(); row.len()];
    FlatMorphology.apply(operator, row, se, &mut out);
    out
}

#[test]
fn test_operator_codes() {
    for op in MorphOperator::ALL {
        assert_eq!(MorphOperator::from_code(op.code()), Some(op));
    }
    assert_eq!(MorphOperator::from_code('x'), None);
    assert_eq!(MorphOperator::from_code('D'), None);
}

#[test]
fn test_operator_display() {
    assert_eq!(MorphOperator::Gradient.to_string(), "gradient");
    assert_eq!(MorphOperator::Dilation.to_string(), "dilation");
}

#[test]
fn test_operator_deserialize_lowercase() {
    let op: MorphOperator = serde_json::from_str("\"erosion\"").unwrap();
    assert_eq!(op, MorphOperator::Erosion);
}

#[test]
fn test_row_dilation_and_erosion() {
    let row = [0i16, 0, 5, 0, 0, -3, 0];
    // extent 3 -> one sample each side
    assert_eq!(
        apply_row(MorphOperator::Dilation, &row, 3),
        vec![0, 5, 5, 5, 0, 0, 0]
    );
    assert_eq!(
        apply_row(MorphOperator::Erosion, &row, 3),
        vec![0, 0, 0, 0, -3, -3, -3]
    );
}

#[test]
fn test_row_gradient_is_dilation_minus_erosion() {
    let row = [1.0f32, 4.0, 2.0, 8.0, 3.0];
    let dil = apply_row(MorphOperator::Dilation, &row, 3);
    let ero = apply_row(MorphOperator::Erosion, &row, 3);
    let grad = apply_row(MorphOperator::Gradient, &row, 3);
    for i in 0..row.len() {
        assert!((grad[i] - (dil[i] - ero[i])).abs() < f32::EPSILON);
    }
}

#[test]
fn test_row_average_clamps_at_edges() {
    let row = [3.0f64, 6.0, 9.0];
    let avg = apply_row(MorphOperator::Average, &row, 3);
    assert!((avg[0] - 4.5).abs() < 1e-12); // (3 + 6) / 2
    assert!((avg[1] - 6.0).abs() < 1e-12);
    assert!((avg[2] - 7.5).abs() < 1e-12);
}

#[test]
fn test_row_average_i16_truncates() {
    let row = [1i16, 2];
    // (1 + 2) / 2 = 1.5 -> 1
    assert_eq!(apply_row(MorphOperator::Average, &row, 3), vec![1, 1]);
}

#[test]
fn test_row_unit_extent_is_identity() {
    let row = [4i16, -2, 7];
    for se in [0, 1] {
        assert_eq!(apply_row(MorphOperator::Dilation, &row, se), row.to_vec());
        assert_eq!(apply_row(MorphOperator::Average, &row, se), row.to_vec());
        assert_eq!(apply_row(MorphOperator::Gradient, &row, se), vec![0, 0, 0]);
    }
}

#[test]
fn test_constant_row_gradient_is_zero() {
    let row = vec![10.0f32; 16];
    let grad = apply_row(MorphOperator::Gradient, &row, 5);
    assert!(grad.iter().all(|&v| v == 0.0));
}

#[test]
fn test_grid_matches_row_filter_with_single_channel_extent() {
    let grid = Grid::from_rows(vec![
        vec![0i16, 3, 1, 7, 2, 2],
        vec![5, 5, 0, 0, 9, 1],
        vec![-1, 4, 4, 2, 0, 8],
    ])
    .unwrap();

    let set = FlatMorphology.apply_all(&grid, 1, 3);
    for op in MorphOperator::ALL {
        for c in 0..grid.channels() {
            let expected = apply_row(op, grid.row(c), 3);
            assert_eq!(set.get(op).row(c), expected.as_slice(), "{op} channel {c}");
        }
    }
}

#[test]
fn test_grid_couples_neighbouring_channels() {
    let mut grid = Grid::<f32>::new_default(5, 4);
    grid[(2, 1)] = 10.0;

    let set = FlatMorphology.apply_all(&grid, 3, 1);
    // extent 3 along channels reaches channels 1..=3 at tick 1
    for c in 0..5 {
        let expected = if (1..=3).contains(&c) { 10.0 } else { 0.0 };
        assert_eq!(set.dilation[(c, 1)], expected, "channel {c}");
    }
    assert_eq!(set.dilation[(2, 0)], 0.0);
    assert_eq!(set.gradient[(1, 1)], 10.0);
}

#[test]
fn test_grid_shapes_and_take() {
    let grid = Grid::new_filled(3, 7, 2.0f64);
    let set = FlatMorphology.apply_all(&grid, 3, 5);
    for op in MorphOperator::ALL {
        assert_eq!(set.get(op).shape(), (3, 7));
    }
    assert!(set.average.samples().iter().all(|&v| (v - 2.0).abs() < 1e-12));

    let gradient = set.take(MorphOperator::Gradient);
    assert!(gradient.samples().iter().all(|&v| v == 0.0));
}
