//! Python bindings using PyO3

use numpy::{IntoPyArray, PyArrayDyn, PyArrayMethods, PyReadonlyArrayDyn};
use pyo3::exceptions::{PyRuntimeError, PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::{shared, InterpError};

impl From<InterpError> for PyErr {
    fn from(err: InterpError) -> PyErr {
        let message = err.to_string();
        match err {
            InterpError::Shape(_) => PyValueError::new_err(message),
            InterpError::DependencyUnavailable { .. } => PyRuntimeError::new_err(message),
        }
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Convert any numpy array (or sequence) to a C-contiguous float64 array
fn to_float64_array<'py>(
    py: Python<'py>,
    array: &Bound<'py, PyAny>,
    name: &str,
) -> PyResult<PyReadonlyArrayDyn<'py, f64>> {
    let numpy = py.import("numpy")?;
    let float64_dtype = numpy.getattr("float64")?;

    // No-op if already float64 and contiguous
    let kwargs = PyDict::new(py);
    kwargs.set_item("dtype", float64_dtype)?;
    kwargs.set_item("order", "C")?;

    let converted = numpy.call_method("asarray", (array,), Some(&kwargs))?;
    converted.extract().map_err(|e| {
        PyTypeError::new_err(format!("Failed to convert `{}` to a float64 array: {}", name, e))
    })
}

// =============================================================================
// Build Info
// =============================================================================

/// Get build and runtime information
///
/// Returns a dictionary with:
/// - version: Package version
/// - parallel: Whether row-parallel evaluation is enabled
/// - num_threads: Worker threads used for row-parallel evaluation
/// - searchsorted: Name of the sorted-search backend, or None
/// - strategy: Default strategy of the shared engine
#[pyfunction]
fn build_info(py: Python<'_>) -> PyResult<Bound<'_, PyDict>> {
    let info = PyDict::new(py);
    let engine = shared();

    info.set_item("version", env!("CARGO_PKG_VERSION"))?;

    #[cfg(feature = "parallel")]
    {
        info.set_item("parallel", true)?;
        info.set_item("num_threads", rayon::current_num_threads())?;
    }
    #[cfg(not(feature = "parallel"))]
    {
        info.set_item("parallel", false)?;
        info.set_item("num_threads", 1)?;
    }

    info.set_item("searchsorted", engine.search_backend().map(|s| s.name()))?;
    info.set_item("strategy", engine.options().strategy.to_string())?;

    Ok(info)
}

// =============================================================================
// Interpolation
// =============================================================================

/// Batched linear 1D interpolation
///
/// Args:
///     x: (N,) or (D, N) knot abscissas, non-decreasing along the last axis
///     y: (N,) or (D, N) knot ordinates
///     xnew: (P,) or (D, P) query abscissas
///     out: Optional pre-allocated float64 array with D * P elements. If
///         provided, results are written into it and a (D, P) view of it is
///         returned.
///     vectorized: Use the batched sorted-search path (default True). If
///         False, each row is interpolated on its own.
///
/// Inputs of any numeric dtype are converted to float64. Queries outside
/// the knot range are linearly extrapolated.
///
/// Returns:
///     (D, P) float64 array
#[pyfunction]
#[pyo3(signature = (x, y, xnew, out=None, vectorized=true))]
fn interp1d<'py>(
    py: Python<'py>,
    x: &Bound<'py, PyAny>,
    y: &Bound<'py, PyAny>,
    xnew: &Bound<'py, PyAny>,
    out: Option<&Bound<'py, PyAny>>,
    vectorized: bool,
) -> PyResult<Py<PyAny>> {
    let x = to_float64_array(py, x, "x")?;
    let y = to_float64_array(py, y, "y")?;
    let xnew = to_float64_array(py, xnew, "xnew")?;

    let x_array = x.as_array();
    let y_array = y.as_array();
    let xnew_array = xnew.as_array();

    if let Some(out) = out {
        let out_array: &Bound<'py, PyArrayDyn<f64>> = out.downcast().map_err(|_| {
            PyTypeError::new_err("Output must be a contiguous float64 numpy array")
        })?;

        let mut out_rw = out_array.readwrite();
        let out_slice = out_rw
            .as_slice_mut()
            .map_err(|_| PyValueError::new_err("Output must be C-contiguous"))?;
        let (d, p) = crate::interp1d_into(x_array, y_array, xnew_array, out_slice, vectorized)?.dim();
        drop(out_rw);

        Ok(out_array.reshape([d, p])?.into_any().unbind())
    } else {
        let result = crate::interp1d(x_array, y_array, xnew_array, vectorized)?;
        Ok(result.into_pyarray(py).into_any().unbind())
    }
}

// =============================================================================
// Module registration
// =============================================================================

/// Batched linear 1D interpolation with broadcasting
///
/// - interp1d(): Interpolate D problems at once, reference or vectorized
/// - build_info(): Features and backends of this build
#[pymodule]
fn interp1d_batch(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(interp1d, m)?)?;
    m.add_function(wrap_pyfunction!(build_info, m)?)?;
    Ok(())
}
