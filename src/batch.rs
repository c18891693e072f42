//! Canonical f64 row tables for one interpolation call

use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewD};

use crate::error::ShapeError;
use crate::shape::{reconcile, BatchLayout};
use crate::Interpolate;

/// A 2-D table whose single row, if it has only one, is shared by every
/// problem.
#[derive(Debug, Clone)]
pub struct RowTable {
    data: Array2<f64>,
}

impl RowTable {
    /// Copy `view` in logical order into a `(rows, width)` table.
    pub fn from_view<T: Interpolate>(
        view: &ArrayViewD<'_, T>,
        shape: (usize, usize),
    ) -> Result<Self, ShapeError> {
        let flat: Vec<f64> = view.iter().map(|v| v.to_f64()).collect();
        Ok(Self {
            data: Array2::from_shape_vec(shape, flat)?,
        })
    }

    #[inline]
    pub fn from_array(data: Array2<f64>) -> Self {
        Self { data }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    #[inline]
    pub fn is_flat(&self) -> bool {
        self.rows() == 1
    }

    /// Row used by problem `d`: the shared row when flat, row `d` otherwise.
    #[inline]
    pub fn row(&self, d: usize) -> ArrayView1<'_, f64> {
        let r = if self.is_flat() { 0 } else { d };
        self.data.row(r)
    }

    #[inline]
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }
}

/// Validated inputs of one call, laid out for evaluation.
///
/// A collapsed query set is stored as a single row of `D2 * P` values.
#[derive(Debug, Clone)]
pub struct Batch {
    pub layout: BatchLayout,
    pub x: RowTable,
    pub y: RowTable,
    pub xnew: RowTable,
}

impl Batch {
    pub fn new<T: Interpolate>(
        x: &ArrayViewD<'_, T>,
        y: &ArrayViewD<'_, T>,
        xnew: &ArrayViewD<'_, T>,
    ) -> Result<Self, ShapeError> {
        let layout = reconcile(x.shape(), y.shape(), xnew.shape())?;
        Ok(Self {
            x: RowTable::from_view(x, (layout.x_rows, layout.knots))?,
            y: RowTable::from_view(y, (layout.y_rows, layout.knots))?,
            xnew: RowTable::from_view(xnew, layout.query_shape())?,
            layout,
        })
    }
}
