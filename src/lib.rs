//! Batched 1D linear interpolation
//!
//! Evaluates many independent piecewise-linear interpolation problems in a
//! single call. Inputs are 1-D or 2-D arrays:
//!
//! - `x`, `y`: knots, `(N,)` or `(D, N)`. Either may have a single row shared
//!   by every problem.
//! - `xnew`: queries, `(P,)` or `(D, P)`.
//!
//! The result has shape `(D, P)`. Queries outside `[x[0], x[N-1]]` are
//! linearly extrapolated from the nearest end segment.
//!
//! # Strategies
//!
//! - **Reference**: one interpolant per row, one binary search per query.
//! - **Vectorized**: one batched sorted search over every query, then an
//!   elementwise `y + slope * (xnew - x)` from precomputed slopes.
//!
//! Both give the same values on the same input. With the `parallel` feature
//! they run row-parallel on the rayon pool.
//!
//! `x` must be non-decreasing within each row. This is not checked. Results
//! on unsorted rows are unspecified.
//!
//! # Example
//!
//! ```rust
//! use interp1d_batch::interp1d;
//! use ndarray::{arr1, arr2};
//!
//! let x = arr1(&[0.0, 1.0, 2.0]);
//! let y = arr1(&[0.0, 10.0, 20.0]);
//! let xnew = arr1(&[0.5, 1.5, -1.0, 3.0]);
//!
//! let ynew = interp1d(x.view(), y.view(), xnew.view(), true).unwrap();
//! assert_eq!(ynew, arr2(&[[5.0, 15.0, -10.0, 30.0]]));
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod scalar;
pub mod search;
pub mod shape;
pub mod vectorized;

#[cfg(feature = "python")]
mod python;

use std::fmt;
use std::sync::{Arc, OnceLock};

pub use config::{InterpOptions, Strategy};
pub use error::{InterpError, Result, ShapeError};
pub use half::f16;
pub use search::{BinarySearch, SortedSearch};
pub use shape::{BatchLayout, Input};

use batch::Batch;
use ndarray::{Array2, ArrayView, ArrayViewMut2, Dimension};

/// Element types accepted by the interpolator.
///
/// Arithmetic is carried out in f64 and converted back on store.
pub trait Interpolate: Copy + Send + Sync + Default + 'static {
    fn from_f64(v: f64) -> Self;
    fn to_f64(self) -> f64;
}

impl Interpolate for f32 {
    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Interpolate for f64 {
    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }
    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
}

impl Interpolate for f16 {
    #[inline]
    fn from_f64(v: f64) -> Self {
        f16::from_f64(v)
    }
    #[inline]
    fn to_f64(self) -> f64 {
        f16::to_f64(self)
    }
}

/// Interpolation engine
///
/// Holds the options and the sorted-search backend. The backend is
/// detected once, when the engine is built.
#[derive(Clone)]
pub struct Interp1d {
    options: InterpOptions,
    search: Option<Arc<dyn SortedSearch>>,
}

impl fmt::Debug for Interp1d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interp1d")
            .field("options", &self.options)
            .field("search", &self.search.as_ref().map(|s| s.name()))
            .finish()
    }
}

impl Default for Interp1d {
    fn default() -> Self {
        Self::new(InterpOptions::default())
    }
}

impl Interp1d {
    /// Engine using the sorted-search backend available in this build
    pub fn new(options: InterpOptions) -> Self {
        #[cfg(feature = "parallel")]
        {
            log::debug!("interp1d: row-parallel evaluation on {} threads", rayon::current_num_threads());
        }

        Self {
            options,
            search: search::detect(),
        }
    }

    /// Engine using a caller-supplied sorted-search backend
    pub fn with_search(options: InterpOptions, search: Arc<dyn SortedSearch>) -> Self {
        Self {
            options,
            search: Some(search),
        }
    }

    /// Engine with no sorted-search backend; only the reference path can run
    pub fn without_search(options: InterpOptions) -> Self {
        Self {
            options,
            search: None,
        }
    }

    #[inline]
    pub fn options(&self) -> &InterpOptions {
        &self.options
    }

    #[inline]
    pub fn search_backend(&self) -> Option<&dyn SortedSearch> {
        self.search.as_deref()
    }

    /// Same backend, different strategy
    pub fn with_strategy(&self, strategy: Strategy) -> Self {
        Self {
            options: self.options.clone().with_strategy(strategy),
            search: self.search.clone(),
        }
    }

    /// Strategy that will actually run for `layout`: `Reference` or `Vectorized`.
    pub fn resolve_strategy(&self, layout: &BatchLayout) -> Result<Strategy> {
        Ok(match self.select(layout)? {
            Some(_) => Strategy::Vectorized,
            None => Strategy::Reference,
        })
    }

    /// Pick the backend for one call; `None` selects the reference path.
    fn select(&self, layout: &BatchLayout) -> Result<Option<&dyn SortedSearch>> {
        let search = self.search.as_deref();
        match self.options.strategy {
            Strategy::Reference => Ok(None),
            Strategy::Vectorized => match search {
                Some(backend) => Ok(Some(backend)),
                None if self.options.allow_fallback => {
                    log::warn!(
                        "interp1d: vectorized path requested without a sorted-search backend, \
                         falling back to reference evaluation"
                    );
                    Ok(None)
                }
                None => Err(InterpError::DependencyUnavailable {
                    strategy: Strategy::Vectorized,
                }),
            },
            Strategy::Auto => Ok(search.filter(|_| layout.rows() >= self.options.auto_min_rows)),
        }
    }

    /// Validate `out`, pick a strategy and fill `out` in evaluation shape.
    fn evaluate<T: Interpolate>(&self, batch: &Batch, out: &mut [T]) -> Result<()> {
        let layout = &batch.layout;
        layout.check_output_len(out.len())?;
        let backend = self.select(layout)?;

        log::debug!(
            "interp1d: {} problems, {} knots, {} queries per row, {} evaluation{}",
            layout.rows(),
            layout.knots,
            layout.queries,
            if backend.is_some() { "vectorized" } else { "reference" },
            if layout.collapsed { " (query rows collapsed)" } else { "" },
        );

        if layout.is_empty() {
            return Ok(());
        }

        let view = ArrayViewMut2::from_shape(layout.eval_shape(), out)?;
        match backend {
            Some(search) => vectorized::evaluate(batch, search, view),
            None => scalar::evaluate(batch, view),
        }
        Ok(())
    }

    /// Interpolate into a newly allocated `(D, P)` array.
    pub fn interpolate<T, Dx, Dy, Dn>(
        &self,
        x: ArrayView<'_, T, Dx>,
        y: ArrayView<'_, T, Dy>,
        xnew: ArrayView<'_, T, Dn>,
    ) -> Result<Array2<T>>
    where
        T: Interpolate,
        Dx: Dimension,
        Dy: Dimension,
        Dn: Dimension,
    {
        let batch = Batch::new(&x.into_dyn(), &y.into_dyn(), &xnew.into_dyn())?;
        let mut data = vec![T::default(); batch.layout.len()];
        self.evaluate(&batch, &mut data)?;
        Ok(Array2::from_shape_vec(batch.layout.output_shape(), data)?)
    }

    /// Interpolate into a caller buffer of exactly `D * P` elements.
    ///
    /// Returns the buffer viewed as `(D, P)`. On error the buffer is left
    /// untouched.
    pub fn interpolate_into<'o, T, Dx, Dy, Dn>(
        &self,
        x: ArrayView<'_, T, Dx>,
        y: ArrayView<'_, T, Dy>,
        xnew: ArrayView<'_, T, Dn>,
        out: &'o mut [T],
    ) -> Result<ArrayViewMut2<'o, T>>
    where
        T: Interpolate,
        Dx: Dimension,
        Dy: Dimension,
        Dn: Dimension,
    {
        let batch = Batch::new(&x.into_dyn(), &y.into_dyn(), &xnew.into_dyn())?;
        self.evaluate(&batch, &mut *out)?;
        Ok(ArrayViewMut2::from_shape(batch.layout.output_shape(), out)?)
    }
}

static SHARED: OnceLock<Interp1d> = OnceLock::new();

/// Process-wide engine configured from the environment
/// (see [`InterpOptions::from_env`]).
pub fn shared() -> &'static Interp1d {
    SHARED.get_or_init(|| Interp1d::new(InterpOptions::from_env()))
}

/// Interpolate `xnew` on the knots `(x, y)`.
///
/// `vectorized` selects the index-lookup path over the per-row reference
/// path. The shared engine's fallback policy applies when no sorted-search
/// backend is available.
pub fn interp1d<T, Dx, Dy, Dn>(
    x: ArrayView<'_, T, Dx>,
    y: ArrayView<'_, T, Dy>,
    xnew: ArrayView<'_, T, Dn>,
    vectorized: bool,
) -> Result<Array2<T>>
where
    T: Interpolate,
    Dx: Dimension,
    Dy: Dimension,
    Dn: Dimension,
{
    shared()
        .with_strategy(Strategy::from(vectorized))
        .interpolate(x, y, xnew)
}

/// Like [`interp1d`], writing into `out` and returning it viewed as `(D, P)`.
pub fn interp1d_into<'o, T, Dx, Dy, Dn>(
    x: ArrayView<'_, T, Dx>,
    y: ArrayView<'_, T, Dy>,
    xnew: ArrayView<'_, T, Dn>,
    out: &'o mut [T],
    vectorized: bool,
) -> Result<ArrayViewMut2<'o, T>>
where
    T: Interpolate,
    Dx: Dimension,
    Dy: Dimension,
    Dn: Dimension,
{
    shared()
        .with_strategy(Strategy::from(vectorized))
        .interpolate_into(x, y, xnew, out)
}
