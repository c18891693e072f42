//! Shape reconciliation for batched 1D interpolation
//!
//! Inputs are 1-D or 2-D. A 1-D input is treated as a single row. A single
//! row broadcasts against any number of rows in the other inputs:
//!
//! ```text
//! x: (D1x, N)   y: (D1y, N)   xnew: (D2, P)   ->   out: (D, P)
//!
//! D1 = max(D1x, D1y)      (D1x == D1y, or one of them is 1)
//! D  = max(D1, D2)        (D1 == D2, or one of them is 1)
//! ```
//!
//! When both `x` and `y` have a single row and `xnew` has several, every
//! query row faces the same interpolant. Those rows are evaluated as one
//! wide row of `D2 * P` queries and the result is reshaped to `(D2, P)`.

use std::fmt;

use crate::error::ShapeError;

/// Names the inputs of an interpolation call, for flatness lookups and error
/// messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    X,
    Y,
    XNew,
    Slopes,
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Input::X => "x",
            Input::Y => "y",
            Input::XNew => "xnew",
            Input::Slopes => "slopes",
        };
        f.write_str(name)
    }
}

/// Canonical row/column counts of one interpolation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLayout {
    pub x_rows: usize,
    pub y_rows: usize,
    pub query_rows: usize,
    /// Knots per row (N)
    pub knots: usize,
    /// Queries per row (P)
    pub queries: usize,
    /// Query rows are evaluated as a single wide row
    pub collapsed: bool,
}

impl BatchLayout {
    /// Rows of the effective knot set, after x/y broadcasting
    #[inline]
    pub fn knot_rows(&self) -> usize {
        self.x_rows.max(self.y_rows)
    }

    /// Whether an input has a single row shared by every problem.
    ///
    /// `XNew` reports the caller's row count, before any collapse.
    #[inline]
    pub fn is_flat(&self, input: Input) -> bool {
        match input {
            Input::X => self.x_rows == 1,
            Input::Y => self.y_rows == 1,
            Input::XNew => self.query_rows == 1,
            Input::Slopes => self.knot_rows() == 1,
        }
    }

    /// Number of independent problems (D)
    #[inline]
    pub fn rows(&self) -> usize {
        self.knot_rows().max(self.query_rows)
    }

    /// Shape the evaluators fill: `(1, D2 * P)` when collapsed, `(D, P)` otherwise
    #[inline]
    pub fn eval_shape(&self) -> (usize, usize) {
        if self.collapsed {
            (1, self.query_rows * self.queries)
        } else {
            (self.rows(), self.queries)
        }
    }

    /// Shape of the query table: one wide row when collapsed, the caller's
    /// rows otherwise
    #[inline]
    pub fn query_shape(&self) -> (usize, usize) {
        if self.collapsed {
            (1, self.query_rows * self.queries)
        } else {
            (self.query_rows, self.queries)
        }
    }

    /// Shape returned to the caller
    #[inline]
    pub fn output_shape(&self) -> (usize, usize) {
        (self.rows(), self.queries)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows() * self.queries
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate the element count of a caller-provided output buffer.
    pub fn check_output_len(&self, len: usize) -> Result<(), ShapeError> {
        if len != self.len() {
            return Err(ShapeError::OutputLength {
                expected: self.len(),
                actual: len,
            });
        }
        Ok(())
    }
}

/// Lift a 1-D or 2-D shape to `(rows, columns)`.
fn as_rows(input: Input, shape: &[usize]) -> Result<(usize, usize), ShapeError> {
    match *shape {
        [n] => Ok((1, n)),
        [rows, cols] => Ok((rows, cols)),
        _ => Err(ShapeError::Rank {
            input,
            ndim: shape.len(),
        }),
    }
}

fn broadcast_rows(
    left: Input,
    left_rows: usize,
    right: Input,
    right_rows: usize,
) -> Result<usize, ShapeError> {
    if left_rows == right_rows || left_rows == 1 || right_rows == 1 {
        Ok(left_rows.max(right_rows))
    } else {
        Err(ShapeError::RowMismatch {
            left,
            left_rows,
            right,
            right_rows,
        })
    }
}

/// Validate the shapes of `x`, `y` and `xnew` and compute the batch layout.
pub fn reconcile(
    x_shape: &[usize],
    y_shape: &[usize],
    xnew_shape: &[usize],
) -> Result<BatchLayout, ShapeError> {
    let (x_rows, x_cols) = as_rows(Input::X, x_shape)?;
    let (y_rows, y_cols) = as_rows(Input::Y, y_shape)?;
    let (query_rows, queries) = as_rows(Input::XNew, xnew_shape)?;

    if x_cols != y_cols {
        return Err(ShapeError::KnotLength {
            x: x_cols,
            y: y_cols,
        });
    }

    for (input, rows) in [(Input::X, x_rows), (Input::Y, y_rows), (Input::XNew, query_rows)] {
        if rows == 0 {
            return Err(ShapeError::Empty { input, axis: "rows" });
        }
    }
    if x_cols == 0 {
        return Err(ShapeError::Empty {
            input: Input::X,
            axis: "columns",
        });
    }

    let knot_rows = broadcast_rows(Input::X, x_rows, Input::Y, y_rows)?;
    let knot_input = if y_rows > x_rows { Input::Y } else { Input::X };
    broadcast_rows(knot_input, knot_rows, Input::XNew, query_rows)?;

    let layout = BatchLayout {
        x_rows,
        y_rows,
        query_rows,
        knots: x_cols,
        queries,
        collapsed: knot_rows == 1 && query_rows > 1,
    };
    log::trace!(
        "interp1d layout: x {:?}, y {:?}, xnew {:?} -> D = {}, collapsed = {}",
        x_shape,
        y_shape,
        xnew_shape,
        layout.rows(),
        layout.collapsed
    );
    Ok(layout)
}
