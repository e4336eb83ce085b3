//! Week-by-week stock depletion against a forecast.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockcast_core::ItemName;

use crate::alert::AlertEvent;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("invalid simulation input: {0}")]
    InvalidInput(String),
}

impl SimulationError {
    fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// How a displayed stock level relates to the low-stock threshold.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockBand {
    /// Above the threshold.
    Comfortable,
    /// At or below the threshold, but not empty.
    Low,
    Depleted,
}

impl StockBand {
    pub fn classify(level: f64, threshold: f64) -> Self {
        if level > threshold {
            StockBand::Comfortable
        } else if level > 0.0 {
            StockBand::Low
        } else {
            StockBand::Depleted
        }
    }
}

/// Projected stock levels, period 0 (current stock) through the forecast horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepletionTrace {
    levels: Vec<f64>,
    raw: Vec<f64>,
}

impl DepletionTrace {
    /// Displayed levels, floored at zero. `levels()[0]` is the initial stock.
    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// Per-period level before flooring: previous displayed level minus demand.
    /// Same indexing as [`levels`](Self::levels).
    pub fn raw_levels(&self) -> &[f64] {
        &self.raw
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn bands(&self, threshold: f64) -> Vec<StockBand> {
        self.levels
            .iter()
            .map(|&level| StockBand::classify(level, threshold))
            .collect()
    }
}

/// Outcome of one depletion run for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    pub item: ItemName,
    pub threshold: f64,
    pub trace: DepletionTrace,
    /// Present iff some period crossed below the threshold; always the first one.
    pub alert: Option<AlertEvent>,
}

impl Simulation {
    pub fn crossing_week(&self) -> Option<usize> {
        self.alert.as_ref().map(|a| a.week)
    }

    /// Number of simulated periods (excluding period 0).
    pub fn horizon(&self) -> usize {
        self.trace.len().saturating_sub(1)
    }

    /// One-line outlook for display.
    pub fn outlook(&self) -> String {
        match self.crossing_week() {
            Some(week) => format!("{} needs restocking by Week {week}!", self.item),
            None => format!(
                "Stock for {} is sufficient for the next {} weeks!",
                self.item,
                self.horizon()
            ),
        }
    }

    pub fn bands(&self) -> Vec<StockBand> {
        self.trace.bands(self.threshold)
    }
}

/// Project `initial_stock` forward by subtracting each period's forecast demand.
///
/// Each period's raw level is the previous displayed level minus that period's
/// demand; the displayed level is the raw level floored at zero. The threshold
/// test runs on the raw level: a period whose displayed level is 0 can still be
/// the crossing.
/// Only the first crossing produces an [`AlertEvent`].
///
/// Callers skip this for zero stock; with nothing on hand there is nothing to deplete.
pub fn simulate(
    item: &ItemName,
    forecast: &[f64],
    initial_stock: f64,
    threshold: f64,
) -> Result<Simulation, SimulationError> {
    if forecast.is_empty() {
        return Err(SimulationError::invalid("forecast series is empty"));
    }
    if !initial_stock.is_finite() || initial_stock < 0.0 {
        return Err(SimulationError::invalid(format!(
            "initial stock must be a non-negative number, got {initial_stock}"
        )));
    }
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(SimulationError::invalid(format!(
            "threshold must be a non-negative number, got {threshold}"
        )));
    }
    if let Some(period) = forecast.iter().position(|v| !v.is_finite()) {
        return Err(SimulationError::invalid(format!(
            "forecast for period {} is not a finite number",
            period + 1
        )));
    }

    // Each period starts from the previous displayed (floored) level.
    let mut raw = Vec::with_capacity(forecast.len() + 1);
    let mut levels = Vec::with_capacity(forecast.len() + 1);
    raw.push(initial_stock);
    levels.push(initial_stock);
    for demand in forecast {
        let level = levels[levels.len() - 1] - demand;
        raw.push(level);
        levels.push(level.max(0.0));
    }

    let alert = raw
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, level)| **level < threshold)
        .map(|(week, level)| AlertEvent::new(item.clone(), week, *level, threshold));

    Ok(Simulation {
        item: item.clone(),
        threshold,
        trace: DepletionTrace { levels, raw },
        alert,
    })
}
