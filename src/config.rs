//! Runtime configuration: strategy selection and fallback policy

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::ParseStrategyError;

/// Problems needed before `Auto` switches to the vectorized path
pub const DEFAULT_AUTO_MIN_ROWS: usize = 64;

pub const ENV_STRATEGY: &str = "INTERP1D_STRATEGY";
pub const ENV_AUTO_MIN_ROWS: &str = "INTERP1D_AUTO_MIN_ROWS";
pub const ENV_ALLOW_FALLBACK: &str = "INTERP1D_ALLOW_FALLBACK";

/// Evaluation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Per-row interpolant, one binary search per query
    Reference,
    /// Batched sorted search plus precomputed slopes
    Vectorized,
    /// Vectorized for large batches when a search backend exists, reference otherwise
    #[default]
    Auto,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Reference => "reference",
            Strategy::Vectorized => "vectorized",
            Strategy::Auto => "auto",
        };
        f.write_str(name)
    }
}

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reference" | "scalar" | "cpu" => Ok(Strategy::Reference),
            "vectorized" | "vectorised" | "gpu" => Ok(Strategy::Vectorized),
            "auto" => Ok(Strategy::Auto),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}

impl From<bool> for Strategy {
    /// `true` requests the vectorized path, `false` the reference path.
    fn from(vectorized: bool) -> Self {
        if vectorized {
            Strategy::Vectorized
        } else {
            Strategy::Reference
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Options of an [`Interp1d`](crate::Interp1d) engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpOptions {
    pub strategy: Strategy,
    /// Minimum number of problems (D) for `Auto` to pick the vectorized path
    pub auto_min_rows: usize,
    /// Run the reference path when the vectorized one is requested but no
    /// sorted-search backend exists. When false, such calls fail.
    pub allow_fallback: bool,
}

impl Default for InterpOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::Auto,
            auto_min_rows: DEFAULT_AUTO_MIN_ROWS,
            allow_fallback: true,
        }
    }
}

impl InterpOptions {
    /// Defaults overridden by `INTERP1D_STRATEGY`, `INTERP1D_AUTO_MIN_ROWS`
    /// and `INTERP1D_ALLOW_FALLBACK`.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from `lookup`; unparsable values are logged and ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_STRATEGY) {
            match raw.parse() {
                Ok(strategy) => self.strategy = strategy,
                Err(e) => log::warn!("interp1d: ignoring {ENV_STRATEGY}: {e}"),
            }
        }
        if let Some(raw) = lookup(ENV_AUTO_MIN_ROWS) {
            match raw.trim().parse() {
                Ok(rows) => self.auto_min_rows = rows,
                Err(e) => log::warn!("interp1d: ignoring {ENV_AUTO_MIN_ROWS}='{raw}': {e}"),
            }
        }
        if let Some(raw) = lookup(ENV_ALLOW_FALLBACK) {
            match parse_bool(&raw) {
                Some(allow) => self.allow_fallback = allow,
                None => log::warn!("interp1d: ignoring {ENV_ALLOW_FALLBACK}='{raw}': not a boolean"),
            }
        }
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }
}
