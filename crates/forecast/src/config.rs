use serde::{Deserialize, Serialize};

use crate::error::ForecastError;

/// Model configuration shared by every item of a forecast run.
///
/// Defaults reproduce the production model: non-seasonal AR order 2 on weekly
/// data with an annual (52 period) seasonal cycle and no seasonal lags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Non-seasonal autoregressive order (p).
    pub order: usize,
    /// Periods per seasonal cycle (s).
    pub seasonal_period: usize,
    /// Seasonal autoregressive order (P); 0 disables seasonal lags.
    pub seasonal_order: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            order: 2,
            seasonal_period: 52,
            seasonal_order: 0,
        }
    }
}

impl ForecastConfig {
    pub fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    pub fn with_seasonal_period(mut self, seasonal_period: usize) -> Self {
        self.seasonal_period = seasonal_period;
        self
    }

    pub fn with_seasonal_order(mut self, seasonal_order: usize) -> Self {
        self.seasonal_order = seasonal_order;
        self
    }

    pub fn validate(&self) -> Result<(), ForecastError> {
        if self.order == 0 {
            return Err(ForecastError::InvalidConfig(
                "autoregressive order must be >= 1".to_string(),
            ));
        }
        if self.seasonal_period < 2 {
            return Err(ForecastError::InvalidConfig(
                "seasonal period must be >= 2".to_string(),
            ));
        }
        if self.seasonal_order > 0 && self.seasonal_period <= self.order {
            return Err(ForecastError::InvalidConfig(format!(
                "seasonal period ({}) must exceed the autoregressive order ({})",
                self.seasonal_period, self.order
            )));
        }
        Ok(())
    }

    /// Lags of the expanded multiplicative polynomial
    /// `(1 - φ(B)) (1 - Φ(B^s))`, ascending.
    pub fn lags(&self) -> Vec<usize> {
        let mut lags: Vec<usize> = (1..=self.order).collect();
        for j in 1..=self.seasonal_order {
            let base = j * self.seasonal_period;
            lags.extend((0..=self.order).map(|i| base + i));
        }
        lags
    }

    /// Shortest history the model accepts: every lag observable, plus at least
    /// one residual degree of freedom.
    pub fn min_history(&self) -> usize {
        let lags = self.lags();
        let max_lag = lags.last().copied().unwrap_or(0);
        max_lag + lags.len() + 1
    }
}
