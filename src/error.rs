//! Error types for batched interpolation

use thiserror::Error;

use crate::shape::Input;
use crate::Strategy;

/// Shape validation failures, reported before any computation runs.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("interp1d: `{input}` must be 1-D or 2-D, got {ndim}-D")]
    Rank { input: Input, ndim: usize },

    #[error("interp1d: x and y must have the same number of columns, got {x} and {y}")]
    KnotLength { x: usize, y: usize },

    #[error(
        "interp1d: `{left}` has {left_rows} rows and `{right}` has {right_rows}; \
         row counts must match or one of them must have a single row"
    )]
    RowMismatch {
        left: Input,
        left_rows: usize,
        right: Input,
        right_rows: usize,
    },

    #[error("interp1d: `{input}` is empty along {axis}")]
    Empty { input: Input, axis: &'static str },

    #[error("interp1d: output buffer holds {actual} elements, expected {expected}")]
    OutputLength { expected: usize, actual: usize },

    #[error("interp1d: {0}")]
    Layout(#[from] ndarray::ShapeError),
}

#[derive(Debug, Error)]
pub enum InterpError {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error("interp1d: {strategy} evaluation needs a sorted-search backend, none is available")]
    DependencyUnavailable { strategy: Strategy },
}

impl From<ndarray::ShapeError> for InterpError {
    fn from(e: ndarray::ShapeError) -> Self {
        InterpError::Shape(ShapeError::Layout(e))
    }
}

/// Unrecognized strategy name in configuration
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown interpolation strategy '{0}', expected one of: reference, vectorized, auto")]
pub struct ParseStrategyError(pub String);

pub type Result<T> = std::result::Result<T, InterpError>;
