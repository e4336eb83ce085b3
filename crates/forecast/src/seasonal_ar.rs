//! Seasonal autoregressive model.
//!
//! The model is the multiplicative seasonal AR
//!
//! ```text
//! (1 - φ1·B - … - φp·B^p)(1 - Φ1·B^s - … - ΦP·B^(P·s)) y_t = e_t
//! ```
//!
//! without intercept. The product polynomial is expanded into its lag set and the
//! lag coefficients are estimated by conditional least squares with no stationarity
//! constraint, so noisy or trending series are fitted rather than rejected.

use crate::config::ForecastConfig;
use crate::error::{ForecastError, ModelFitError};
use crate::linalg;
use crate::model::{FittedModel, ForecastModel};

/// Seasonal AR model definition (unfitted).
#[derive(Debug, Clone)]
pub struct SeasonalAr {
    config: ForecastConfig,
    lags: Vec<usize>,
}

impl SeasonalAr {
    pub fn new(config: ForecastConfig) -> Result<Self, ForecastError> {
        config.validate()?;
        Ok(Self {
            lags: config.lags(),
            config,
        })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }
}

impl ForecastModel for SeasonalAr {
    type Fitted = FittedSeasonalAr;

    fn fit(&self, series: &[f64]) -> Result<Self::Fitted, ModelFitError> {
        if let Some(index) = series.iter().position(|v| !v.is_finite()) {
            return Err(ModelFitError::NonFinite { index });
        }

        let required = self.config.min_history();
        if series.len() < required {
            return Err(ModelFitError::InsufficientHistory {
                required,
                actual: series.len(),
            });
        }

        if is_constant(series) {
            return Err(ModelFitError::Constant { value: series[0] });
        }

        let lags = &self.lags;
        let k = lags.len();
        let max_lag = lags.last().copied().unwrap_or(0);

        // Normal equations X'X b = X'y over rows t = max_lag..n.
        let mut xtx = vec![0.0; k * k];
        let mut xty = vec![0.0; k];
        for t in max_lag..series.len() {
            for (i, &li) in lags.iter().enumerate() {
                let xi = series[t - li];
                xty[i] += xi * series[t];
                for (j, &lj) in lags.iter().enumerate() {
                    xtx[i * k + j] += xi * series[t - lj];
                }
            }
        }

        if let Some(i) = (0..k).find(|&i| xtx[i * k + i] == 0.0) {
            return Err(ModelFitError::NoLaggedSignal { lag: lags[i] });
        }

        let coefficients = linalg::solve(xtx, xty).ok_or(ModelFitError::Singular)?;
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelFitError::Singular);
        }

        let rows = series.len() - max_lag;
        let sse: f64 = (max_lag..series.len())
            .map(|t| {
                let predicted: f64 = lags
                    .iter()
                    .zip(&coefficients)
                    .map(|(&lag, c)| c * series[t - lag])
                    .sum();
                let residual = series[t] - predicted;
                residual * residual
            })
            .sum();
        let sigma2 = sse / (rows - k) as f64;

        tracing::debug!(
            observations = series.len(),
            lags = ?lags,
            coefficients = ?coefficients,
            sigma2,
            "seasonal AR fitted"
        );

        Ok(FittedSeasonalAr {
            lags: lags.clone(),
            coefficients,
            sigma2,
            tail: series[series.len() - max_lag..].to_vec(),
        })
    }
}

/// A seasonal AR model fitted to one series.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedSeasonalAr {
    lags: Vec<usize>,
    coefficients: Vec<f64>,
    sigma2: f64,
    /// Last `max_lag` observations, the state the forecast recursion starts from.
    tail: Vec<f64>,
}

impl FittedSeasonalAr {
    /// Estimated coefficient for `lag`, if the lag is part of the model.
    pub fn coefficient(&self, lag: usize) -> Option<f64> {
        self.lags
            .iter()
            .position(|&l| l == lag)
            .map(|i| self.coefficients[i])
    }

    /// `(lag, coefficient)` pairs, ascending by lag.
    pub fn coefficients(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.lags.iter().copied().zip(self.coefficients.iter().copied())
    }

    /// Residual variance of the conditional least-squares fit.
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }
}

impl FittedModel for FittedSeasonalAr {
    fn forecast(&self, steps: usize) -> Vec<f64> {
        let mut history = self.tail.clone();
        history.reserve(steps);
        for _ in 0..steps {
            let next: f64 = self
                .coefficients()
                .map(|(lag, c)| c * history[history.len() - lag])
                .sum();
            history.push(next);
        }
        history.split_off(self.tail.len())
    }
}

fn is_constant(series: &[f64]) -> bool {
    let (min, max) = series
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    max - min <= f64::EPSILON * max.abs().max(1.0)
}
