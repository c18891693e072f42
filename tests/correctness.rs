//! Correctness tests comparing the reference and vectorized evaluators

use std::sync::Arc;

use approx::assert_relative_eq;
use interp1d_batch::{BinarySearch, Interp1d, InterpError, InterpOptions, ShapeError, Strategy};
use ndarray::{arr1, arr2, s, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn engine(strategy: Strategy) -> Interp1d {
    Interp1d::with_search(
        InterpOptions::default().with_strategy(strategy),
        Arc::new(BinarySearch),
    )
}

/// `rows` strictly increasing knot rows of length `n`, with random ordinates
fn random_knots(rng: &mut StdRng, rows: usize, n: usize) -> (Array2<f64>, Array2<f64>) {
    let mut x = Array2::<f64>::zeros((rows, n));
    for mut row in x.rows_mut() {
        let mut acc = rng.gen_range(-50.0..50.0);
        for v in row.iter_mut() {
            *v = acc;
            acc += rng.gen_range(0.1..2.0);
        }
    }
    let y = Array2::from_shape_fn((rows, n), |_| rng.gen_range(-100.0..100.0));
    (x, y)
}

/// Queries spread over and beyond the knot range of each row
fn random_queries(rng: &mut StdRng, x: &Array2<f64>, rows: usize, p: usize) -> Array2<f64> {
    Array2::from_shape_fn((rows, p), |(d, _)| {
        let row = x.row(if x.nrows() == 1 { 0 } else { d });
        let (lo, hi) = (row[0], row[row.len() - 1]);
        let span = hi - lo;
        rng.gen_range(lo - 0.25 * span..hi + 0.25 * span)
    })
}

fn assert_close(a: &Array2<f64>, b: &Array2<f64>) {
    assert_eq!(a.dim(), b.dim());
    for (&va, &vb) in a.iter().zip(b.iter()) {
        assert_relative_eq!(va, vb, max_relative = 1e-5, epsilon = 1e-9);
    }
}

#[test]
fn test_reference_matches_vectorized() {
    let mut rng = StdRng::seed_from_u64(42);
    let (x, y) = random_knots(&mut rng, 200, 50);
    let xnew = random_queries(&mut rng, &x, 200, 30);

    let reference = engine(Strategy::Reference)
        .interpolate(x.view(), y.view(), xnew.view())
        .unwrap();
    let vectorized = engine(Strategy::Vectorized)
        .interpolate(x.view(), y.view(), xnew.view())
        .unwrap();

    assert_eq!(reference.dim(), (200, 30));
    assert_close(&reference, &vectorized);
}

#[test]
fn test_reference_matches_vectorized_mixed_broadcast() {
    let mut rng = StdRng::seed_from_u64(7);
    let (x, _) = random_knots(&mut rng, 1, 12);
    let (_, y) = random_knots(&mut rng, 40, 12);
    let xnew = random_queries(&mut rng, &x, 1, 25);

    let reference = engine(Strategy::Reference)
        .interpolate(x.view(), y.view(), xnew.view())
        .unwrap();
    let vectorized = engine(Strategy::Vectorized)
        .interpolate(x.view(), y.view(), xnew.view())
        .unwrap();

    assert_eq!(reference.dim(), (40, 25));
    assert_close(&reference, &vectorized);
}

#[test]
fn test_knots_are_reproduced() {
    let mut rng = StdRng::seed_from_u64(3);
    let (x, y) = random_knots(&mut rng, 16, 10);

    for strategy in [Strategy::Reference, Strategy::Vectorized] {
        let out = engine(strategy)
            .interpolate(x.view(), y.view(), x.view())
            .unwrap();
        for (&o, &expected) in out.iter().zip(y.iter()) {
            assert_relative_eq!(o, expected, max_relative = 1e-9, epsilon = 1e-9);
        }
        // The first knot never goes through a slope
        assert_eq!(out.column(0), y.column(0));
    }
}

#[test]
fn test_shared_knots_equal_stacked_single_calls() {
    let mut rng = StdRng::seed_from_u64(11);
    let (x, y) = random_knots(&mut rng, 1, 20);
    let xnew = random_queries(&mut rng, &x, 6, 9);

    for strategy in [Strategy::Reference, Strategy::Vectorized] {
        let engine = engine(strategy);
        let batched = engine.interpolate(x.view(), y.view(), xnew.view()).unwrap();
        assert_eq!(batched.dim(), (6, 9));

        for k in 0..6 {
            let single = engine
                .interpolate(x.view(), y.view(), xnew.slice(s![k..k + 1, ..]))
                .unwrap();
            assert_eq!(single.row(0), batched.row(k));
        }
    }
}

#[test]
fn test_extrapolation_extends_end_segments() {
    let x = arr1(&[1.0, 2.0, 4.0, 5.0]);
    let y = arr1(&[3.0, 1.0, 2.0, 6.0]);
    let xnew = arr1(&[-3.0, 0.0, 5.5, 10.0]);

    let slope_lo = (y[1] - y[0]) / (x[1] - x[0]);
    let slope_hi = (y[3] - y[2]) / (x[3] - x[2]);
    let expected = [
        y[0] + slope_lo * (-3.0 - x[0]),
        y[0] + slope_lo * (0.0 - x[0]),
        y[2] + slope_hi * (5.5 - x[2]),
        y[2] + slope_hi * (10.0 - x[2]),
    ];

    for strategy in [Strategy::Reference, Strategy::Vectorized] {
        let out = engine(strategy)
            .interpolate(x.view(), y.view(), xnew.view())
            .unwrap();
        for (o, e) in out.row(0).iter().zip(expected.iter()) {
            assert_relative_eq!(*o, *e, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_repeated_calls_are_identical() {
    let mut rng = StdRng::seed_from_u64(5);
    let (x, y) = random_knots(&mut rng, 8, 6);
    let xnew = random_queries(&mut rng, &x, 8, 4);
    let engine = engine(Strategy::Vectorized);

    let first = engine.interpolate(x.view(), y.view(), xnew.view()).unwrap();
    let second = engine.interpolate(x.view(), y.view(), xnew.view()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_concrete_scenarios() {
    for strategy in [Strategy::Reference, Strategy::Vectorized] {
        let out = engine(strategy)
            .interpolate(
                arr1(&[0.0, 1.0, 2.0]).view(),
                arr1(&[0.0, 10.0, 20.0]).view(),
                arr1(&[0.5, 1.5, -1.0, 3.0]).view(),
            )
            .unwrap();
        assert_eq!(out, arr2(&[[5.0, 15.0, -10.0, 30.0]]));

        let out = engine(strategy)
            .interpolate(
                arr2(&[[0.0, 1.0, 2.0]]).view(),
                arr2(&[[0.0, 10.0, 20.0]]).view(),
                arr2(&[[0.5], [1.5]]).view(),
            )
            .unwrap();
        assert_eq!(out, arr2(&[[5.0], [15.0]]));
    }
}

#[test]
fn test_row_mismatch_is_shape_error() {
    let x = Array2::<f64>::zeros((2, 5));
    let y = Array2::<f64>::zeros((3, 5));
    let xnew = Array2::<f64>::zeros((2, 4));
    let mut out = vec![f64::NAN; 8];

    for strategy in [Strategy::Reference, Strategy::Vectorized] {
        let err = engine(strategy)
            .interpolate_into(x.view(), y.view(), xnew.view(), &mut out)
            .unwrap_err();
        assert!(matches!(err, InterpError::Shape(ShapeError::RowMismatch { .. })));
    }
    assert!(out.iter().all(|v| v.is_nan()));
}

#[test]
fn test_large_batch_shared_queries() {
    let mut rng = StdRng::seed_from_u64(17);
    let (x, y) = random_knots(&mut rng, 20_000, 8);
    let xnew = arr1(&[-60.0, -10.0, 0.0, 3.5, 12.0, 80.0]);

    let reference = engine(Strategy::Reference)
        .interpolate(x.view(), y.view(), xnew.view())
        .unwrap();
    let vectorized = engine(Strategy::Vectorized)
        .interpolate(x.view(), y.view(), xnew.view())
        .unwrap();

    assert_eq!(vectorized.dim(), (20_000, 6));
    assert_close(&reference, &vectorized);
}

#[test]
fn test_f32_reference_matches_vectorized() {
    let mut rng = StdRng::seed_from_u64(23);
    let (x, y) = random_knots(&mut rng, 32, 16);
    let xnew = random_queries(&mut rng, &x, 32, 10);
    let (x, y, xnew) = (
        x.mapv(|v| v as f32),
        y.mapv(|v| v as f32),
        xnew.mapv(|v| v as f32),
    );

    let reference = engine(Strategy::Reference)
        .interpolate(x.view(), y.view(), xnew.view())
        .unwrap();
    let vectorized = engine(Strategy::Vectorized)
        .interpolate(x.view(), y.view(), xnew.view())
        .unwrap();
    assert_eq!(reference, vectorized);
}

#[test]
fn test_unsorted_and_repeated_knots_stay_in_bounds() {
    // Values are unspecified here; both strategies must still return a full result
    let x = arr2(&[[5.0, 1.0, 3.0, -2.0], [0.0, 0.0, 0.0, 0.0]]);
    let y = arr2(&[[1.0, 2.0, 3.0, 4.0], [-1.0, 0.0, 1.0, 2.0]]);
    let xnew = arr1(&[
        -10.0,
        0.0,
        2.0,
        4.0,
        10.0,
        f64::NAN,
        f64::INFINITY,
        f64::NEG_INFINITY,
    ]);

    for strategy in [Strategy::Reference, Strategy::Vectorized] {
        let out = engine(strategy)
            .interpolate(x.view(), y.view(), xnew.view())
            .unwrap();
        assert_eq!(out.dim(), (2, 8));
    }

    let mut buffer = vec![0.0f64; 16];
    for strategy in [Strategy::Reference, Strategy::Vectorized] {
        let view = engine(strategy)
            .interpolate_into(x.view(), y.view(), xnew.view(), &mut buffer)
            .unwrap();
        assert_eq!(view.dim(), (2, 8));
    }
}
