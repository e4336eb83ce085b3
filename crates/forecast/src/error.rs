use serde::Serialize;
use thiserror::Error;

use stockcast_core::DataError;

/// Why a single item's model could not be fitted.
///
/// Reported per item; the engine keeps forecasting the remaining items.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelFitError {
    #[error("history too short: need at least {required} observations, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },

    /// Missing or non-numeric observation.
    #[error("observation {index} is not a finite number")]
    NonFinite { index: usize },

    #[error("series is constant at {value}")]
    Constant { value: f64 },

    /// Every observation feeding this lag is zero (e.g. a single recent sale
    /// after a run of zero-demand periods), so its coefficient has no data.
    #[error("no non-zero observations feed lag {lag}")]
    NoLaggedSignal { lag: usize },

    /// Lagged regressors are linearly dependent; coefficients are not identifiable.
    #[error("lagged design matrix is singular")]
    Singular,

    #[error("forecast diverged at step {step}")]
    Diverged { step: usize },
}

/// Failure of a whole forecast call (before any item is fitted).
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("invalid forecast configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Data(#[from] DataError),
}
