//! Time the reference and vectorized strategies on the same random problems
//!
//! Usage: compare_strategies [D] [N] [P] [DNEW]
//! DNEW is the number of query rows: 1 (shared) or D.

use std::sync::Arc;
use std::time::Instant;

use interp1d_batch::{BinarySearch, Interp1d, InterpOptions, Strategy};
use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let arg = |i: usize, default: usize| args.get(i).and_then(|s| s.parse().ok()).unwrap_or(default);
    let d = arg(1, 1000);
    let n = arg(2, 100);
    let p = arg(3, 30);
    let dnew = arg(4, 1);
    let ntests = 2;

    let reference = Interp1d::with_search(
        InterpOptions::default().with_strategy(Strategy::Reference),
        Arc::new(BinarySearch),
    );
    let vectorized = reference.with_strategy(Strategy::Vectorized);
    let mut rng = StdRng::seed_from_u64(0);

    for _ in 0..ntests {
        // Sorted random abscissas, ramp ordinates starting at zero per row
        let mut x = Array2::from_shape_fn((d, n), |_| rng.gen_range(0.0..10_000.0));
        for mut row in x.axis_iter_mut(Axis(0)) {
            row.as_slice_mut()
                .expect("freshly allocated rows are contiguous")
                .sort_by(f64::total_cmp);
        }
        let step = 1000.0 / (d * n) as f64;
        let y = Array2::from_shape_fn((d, n), |(_, c)| c as f64 * step);
        let xnew = Array2::from_shape_fn((dnew, p), |_| rng.gen_range(0.0..10_000.0));

        println!(
            "Solving {} interpolation problems: each with {} observations and {} desired values",
            d, n, p
        );

        let start = Instant::now();
        let yq_vec = vectorized
            .interpolate(x.view(), y.view(), xnew.view())
            .expect("vectorized interpolation");
        let t_vec = start.elapsed();

        let start = Instant::now();
        let yq_ref = reference
            .interpolate(x.view(), y.view(), xnew.view())
            .expect("reference interpolation");
        let t_ref = start.elapsed();

        let diff = (&yq_ref - &yq_vec).mapv(|v| v * v).sum().sqrt();
        let norm = yq_ref.mapv(|v| v * v).sum().sqrt();
        let error = if norm > 0.0 { diff / norm * 100.0 } else { diff };

        println!(
            "Reference: {:.3}ms, vectorized: {:.3}ms, error: {:e}%",
            t_ref.as_secs_f64() * 1e3,
            t_vec.as_secs_f64() * 1e3,
            error
        );
    }
}
