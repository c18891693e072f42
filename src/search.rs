//! Batched sorted search
//!
//! The vectorized evaluator locates each query's segment through a
//! [`SortedSearch`] backend. [`BinarySearch`] is the reference backend: an
//! independent binary search per row, parallel over rows.

use std::sync::Arc;

use ndarray::{Array2, ArrayView1, ArrayView2, Zip};

/// Batched insertion-index lookup.
///
/// For every query value, returns the smallest index `i` such that
/// `sorted_row[i] >= q`, i.e. the insertion point that keeps the row in
/// ascending order. Indices lie in `0..=N`.
///
/// `sorted` and `queries` each have either a single row, shared by every
/// output row, or `R` rows. The result has `max(rows)` rows and as many
/// columns as `queries`.
///
/// # Panics
///
/// Implementations may panic when the row counts of `sorted` and `queries`
/// neither match nor broadcast. The engine only calls them on validated
/// batches.
pub trait SortedSearch: Send + Sync {
    fn name(&self) -> &'static str;

    fn searchsorted(&self, sorted: ArrayView2<'_, f64>, queries: ArrayView2<'_, f64>) -> Array2<usize>;
}

/// Insertion index of `q` into the ascending `row` (left side).
///
/// NaN compares false, so a NaN query lands at index 0.
#[inline]
pub fn insertion_index(row: ArrayView1<'_, f64>, q: f64) -> usize {
    let mut lo = 0;
    let mut hi = row.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if row[mid] < q {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

#[inline]
fn broadcast_row<'v>(view: &'v ArrayView2<'_, f64>, d: usize) -> ArrayView1<'v, f64> {
    if view.nrows() == 1 {
        view.row(0)
    } else {
        view.row(d)
    }
}

/// Per-row binary search over the whole batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinarySearch;

impl SortedSearch for BinarySearch {
    fn name(&self) -> &'static str {
        "binary"
    }

    fn searchsorted(&self, sorted: ArrayView2<'_, f64>, queries: ArrayView2<'_, f64>) -> Array2<usize> {
        assert!(
            sorted.nrows() == queries.nrows() || sorted.nrows() == 1 || queries.nrows() == 1,
            "searchsorted: {} sorted rows do not broadcast against {} query rows",
            sorted.nrows(),
            queries.nrows()
        );
        let rows = sorted.nrows().max(queries.nrows());
        let mut indices = Array2::<usize>::zeros((rows, queries.ncols()));

        let search_row = |d: usize, mut out_row: ndarray::ArrayViewMut1<'_, usize>| {
            let s = broadcast_row(&sorted, d);
            let q = broadcast_row(&queries, d);
            for (idx, &v) in out_row.iter_mut().zip(q.iter()) {
                *idx = insertion_index(s, v);
            }
        };

        #[cfg(feature = "parallel")]
        {
            Zip::indexed(indices.rows_mut()).par_for_each(search_row);
        }

        #[cfg(not(feature = "parallel"))]
        {
            Zip::indexed(indices.rows_mut()).for_each(search_row);
        }

        indices
    }
}

/// Sorted-search backend available in this build, if any.
///
/// Called once per engine; the answer does not change at runtime.
pub fn detect() -> Option<Arc<dyn SortedSearch>> {
    #[cfg(feature = "searchsorted")]
    {
        let backend: Arc<dyn SortedSearch> = Arc::new(BinarySearch);
        log::info!("interp1d: sorted-search backend '{}' available", backend.name());
        Some(backend)
    }

    #[cfg(not(feature = "searchsorted"))]
    {
        log::info!("interp1d: built without a sorted-search backend");
        None
    }
}
