//! Vectorized evaluator based on batched index lookup
//!
//! Instead of scanning each row for its bracketing interval, all queries of
//! the batch are located with one [`SortedSearch`] pass. The result is then
//! computed elementwise from precomputed segment slopes:
//!
//! ```text
//! seg  = clamp(searchsorted(x, xnew) - 1, 0, N - 2)
//! ynew = y[seg] + slope[seg] * (xnew - x[seg])
//! ```
//!
//! Clamping to the first and last segment gives linear extrapolation
//! without a per-element branch.

use ndarray::{Array2, ArrayViewMut1, ArrayViewMut2, Zip};

use crate::batch::{Batch, RowTable};
use crate::search::SortedSearch;
use crate::shape::Input;
use crate::Interpolate;

/// Per-segment slopes `(y[i+1] - y[i]) / (x[i+1] - x[i])`.
///
/// `x` and `y` broadcast against each other; the table has a single shared
/// row only when both do. Fewer than two knots give a table with no columns.
///
/// # Panics
///
/// If `x` and `y` differ in width, or have row counts that neither match
/// nor include a single shared row.
pub fn segment_slopes(x: &RowTable, y: &RowTable) -> RowTable {
    assert_eq!(x.width(), y.width(), "segment_slopes: x and y widths differ");
    assert!(
        x.rows() == y.rows() || x.is_flat() || y.is_flat(),
        "segment_slopes: x has {} rows and y has {}",
        x.rows(),
        y.rows()
    );

    let rows = x.rows().max(y.rows());
    let mut slopes = Array2::<f64>::zeros((rows, x.width().saturating_sub(1)));

    let slope_row = |d: usize, mut row: ArrayViewMut1<'_, f64>| {
        let xr = x.row(d);
        let yr = y.row(d);
        for (s, slope) in row.iter_mut().enumerate() {
            *slope = (yr[s + 1] - yr[s]) / (xr[s + 1] - xr[s]);
        }
    };

    #[cfg(feature = "parallel")]
    {
        Zip::indexed(slopes.rows_mut()).par_for_each(slope_row);
    }

    #[cfg(not(feature = "parallel"))]
    {
        Zip::indexed(slopes.rows_mut()).for_each(slope_row);
    }

    RowTable::from_array(slopes)
}

/// Evaluate every problem row of `batch` into `out`, locating segments
/// through `search`.
///
/// `out` must have the batch's evaluation shape.
pub fn evaluate<T: Interpolate>(batch: &Batch, search: &dyn SortedSearch, mut out: ArrayViewMut2<'_, T>) {
    debug_assert_eq!(out.dim(), batch.layout.eval_shape());

    let n = batch.layout.knots;
    if n == 1 {
        // No segment to extend: constant function
        for (d, mut out_row) in out.rows_mut().into_iter().enumerate() {
            out_row.fill(T::from_f64(batch.y.row(d)[0]));
        }
        return;
    }

    let slopes = segment_slopes(&batch.x, &batch.y);

    // Insertion index -> index of the segment starting at the preceding knot
    let last = n - 2;
    let mut segments = search.searchsorted(batch.x.view(), batch.xnew.view());
    segments.mapv_inplace(|i| i.saturating_sub(1).min(last));

    // Shared tables are read through row 0 by every problem
    let layout = &batch.layout;
    let shared_slopes = layout.is_flat(Input::Slopes);
    let shared_segments = layout.is_flat(Input::X) && (layout.collapsed || layout.is_flat(Input::XNew));
    debug_assert_eq!(shared_slopes, slopes.is_flat());
    debug_assert_eq!(shared_segments, segments.nrows() == 1);
    let slopes = slopes.view();

    let gather_row = |d: usize, out_row: ArrayViewMut1<'_, T>| {
        let xr = batch.x.row(d);
        let yr = batch.y.row(d);
        let sr = slopes.row(if shared_slopes { 0 } else { d });
        let seg = segments.row(if shared_segments { 0 } else { d });

        Zip::from(out_row)
            .and(batch.xnew.row(d))
            .and(seg)
            .for_each(|o, &q, &s| {
                *o = T::from_f64(yr[s] + sr[s] * (q - xr[s]));
            });
    };

    #[cfg(feature = "parallel")]
    {
        Zip::indexed(out.rows_mut()).par_for_each(gather_row);
    }

    #[cfg(not(feature = "parallel"))]
    {
        Zip::indexed(out.rows_mut()).for_each(gather_row);
    }
}
