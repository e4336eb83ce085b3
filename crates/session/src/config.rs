//! Session configuration.
//!
//! Read from the process environment with per-key fallback to defaults:
//!
//! | variable                    | meaning                          | default |
//! |-----------------------------|----------------------------------|---------|
//! | `STOCKCAST_HORIZON`         | forecast periods (2..=8)         | 4       |
//! | `STOCKCAST_AR_ORDER`        | non-seasonal AR order            | 2       |
//! | `STOCKCAST_SEASONAL_PERIOD` | periods per seasonal cycle       | 52      |
//! | `STOCKCAST_SEASONAL_ORDER`  | seasonal AR order                | 0       |
//! | `STOCKCAST_ALERT_SENDER`    | alert sender address             | unset   |
//! | `STOCKCAST_ALERT_RECIPIENT` | alert recipient address          | unset   |
//!
//! Alerts are only dispatched when both addresses are set and valid.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use stockcast_core::Horizon;
use stockcast_forecast::ForecastConfig;
use stockcast_notify::MailIdentity;

use crate::error::SessionError;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionConfig {
    pub forecast: ForecastConfig,
    pub horizon: Horizon,
    pub identity: Option<MailIdentity>,
}

impl SessionConfig {
    pub fn with_forecast(mut self, forecast: ForecastConfig) -> Self {
        self.forecast = forecast;
        self
    }

    pub fn with_horizon(mut self, horizon: Horizon) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_identity(mut self, identity: MailIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ForecastConfig::default();
        let forecast = ForecastConfig::default()
            .with_order(parse_or(&lookup, "STOCKCAST_AR_ORDER", defaults.order))
            .with_seasonal_period(parse_or(
                &lookup,
                "STOCKCAST_SEASONAL_PERIOD",
                defaults.seasonal_period,
            ))
            .with_seasonal_order(parse_or(
                &lookup,
                "STOCKCAST_SEASONAL_ORDER",
                defaults.seasonal_order,
            ));

        let horizon = match lookup("STOCKCAST_HORIZON") {
            None => Horizon::default(),
            Some(raw) => match raw.trim().parse::<usize>().map(Horizon::new) {
                Ok(Ok(h)) => h,
                _ => {
                    warn!(value = %raw, "STOCKCAST_HORIZON invalid; using default");
                    Horizon::default()
                }
            },
        };

        let identity = match (
            lookup("STOCKCAST_ALERT_SENDER"),
            lookup("STOCKCAST_ALERT_RECIPIENT"),
        ) {
            (Some(sender), Some(recipient)) => match MailIdentity::new(sender, recipient) {
                Ok(identity) => Some(identity),
                Err(e) => {
                    warn!(error = %e, "alert identity invalid; alerts will not be sent");
                    None
                }
            },
            _ => {
                warn!("STOCKCAST_ALERT_SENDER/STOCKCAST_ALERT_RECIPIENT not set; alerts will not be sent");
                None
            }
        };

        Self {
            forecast,
            horizon,
            identity,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + core::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, default = %default, "invalid value; using default");
            default
        }),
    }
}

/// Stock parameters for one item's check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockParams {
    /// Units currently on hand; 0 means "not entered yet".
    pub initial_stock: f64,
    /// Reorder point; must be at least [`StockParams::MIN_THRESHOLD`].
    pub threshold: f64,
}

impl StockParams {
    pub const MIN_THRESHOLD: f64 = 10.0;
    pub const DEFAULT_THRESHOLD: f64 = 50.0;

    pub fn new(initial_stock: f64, threshold: f64) -> Self {
        Self {
            initial_stock,
            threshold,
        }
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        if !(self.initial_stock.is_finite() && self.initial_stock >= 0.0) {
            return Err(SessionError::InvalidParams(format!(
                "initial stock must be >= 0, got {}",
                self.initial_stock
            )));
        }
        if !(self.threshold.is_finite() && self.threshold >= Self::MIN_THRESHOLD) {
            return Err(SessionError::InvalidParams(format!(
                "threshold must be >= {}, got {}",
                Self::MIN_THRESHOLD,
                self.threshold
            )));
        }
        Ok(())
    }
}

impl Default for StockParams {
    fn default() -> Self {
        Self {
            initial_stock: 0.0,
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }
}
