//! Scalar reference evaluator
//!
//! Builds one classic piecewise-linear interpolant per problem row and
//! evaluates it query by query. This is the baseline the vectorized path is
//! checked against.

use ndarray::{ArrayView1, ArrayViewMut1, ArrayViewMut2, Zip};

use crate::batch::Batch;
use crate::search::insertion_index;
use crate::Interpolate;

/// Piecewise-linear interpolant over one row of knots, with linear
/// extrapolation past both ends.
///
/// `x` must be non-decreasing. A single knot gives a constant function.
///
/// A query equal to an interior knot `x[k]` is evaluated on the segment
/// ending at `x[k]`, so it returns `y[k]` up to rounding, not bit for bit.
#[derive(Debug, Clone, Copy)]
pub struct LinearInterpolant<'a> {
    x: ArrayView1<'a, f64>,
    y: ArrayView1<'a, f64>,
}

impl<'a> LinearInterpolant<'a> {
    #[inline]
    pub fn new(x: ArrayView1<'a, f64>, y: ArrayView1<'a, f64>) -> Self {
        debug_assert_eq!(x.len(), y.len());
        debug_assert!(!x.is_empty());
        Self { x, y }
    }

    /// Evaluate at a single query value
    #[inline]
    pub fn eval(&self, q: f64) -> f64 {
        let n = self.x.len();
        if n == 1 {
            return self.y[0];
        }

        // Bracketing segment [lo, hi]; the end segments extrapolate
        let hi = insertion_index(self.x, q).clamp(1, n - 1);
        let lo = hi - 1;

        let slope = (self.y[hi] - self.y[lo]) / (self.x[hi] - self.x[lo]);
        self.y[lo] + slope * (q - self.x[lo])
    }
}

/// Evaluate every problem row of `batch` into `out`.
///
/// `out` must have the batch's evaluation shape.
pub fn evaluate<T: Interpolate>(batch: &Batch, mut out: ArrayViewMut2<'_, T>) {
    debug_assert_eq!(out.dim(), batch.layout.eval_shape());

    let eval_row = |d: usize, mut out_row: ArrayViewMut1<'_, T>| {
        let interp = LinearInterpolant::new(batch.x.row(d), batch.y.row(d));
        for (o, &q) in out_row.iter_mut().zip(batch.xnew.row(d).iter()) {
            *o = T::from_f64(interp.eval(q));
        }
    };

    #[cfg(feature = "parallel")]
    {
        Zip::indexed(out.rows_mut()).par_for_each(eval_row);
    }

    #[cfg(not(feature = "parallel"))]
    {
        Zip::indexed(out.rows_mut()).for_each(eval_row);
    }
}
