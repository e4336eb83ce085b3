//! Forecasting session context.
//!
//! The session is the only owner of mutable state: the loaded history, the
//! horizon, and the derived forecast. Every input change recomputes the
//! forecast and swaps it in as a whole; a failed recompute leaves the previous
//! state untouched.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use stockcast_core::{ForecastTable, Horizon, ItemName, SessionId, TimeSeriesTable};
use stockcast_forecast::{FitFailure, ForecastEngine, ForecastRun};
use stockcast_inventory::{simulate, Simulation};
use stockcast_notify::{AlertDispatcher, DeliveryOutcome, MailTransport};

use crate::config::{SessionConfig, StockParams};
use crate::error::SessionError;

/// Number of items pre-selected for the forecast view.
const DEFAULT_SELECTION: usize = 3;

/// Result of a stock check for one item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StockCheck {
    /// No stock entered; nothing was simulated.
    InsufficientInput { item: ItemName },
    Simulated {
        simulation: Simulation,
        /// `None` when there was no crossing, or when alerts are not configured.
        delivery: Option<DeliveryOutcome>,
    },
}

impl StockCheck {
    pub fn simulation(&self) -> Option<&Simulation> {
        match self {
            StockCheck::Simulated { simulation, .. } => Some(simulation),
            StockCheck::InsufficientInput { .. } => None,
        }
    }

    /// One-line status for display.
    pub fn status(&self) -> String {
        match self {
            StockCheck::InsufficientInput { item } => {
                format!("Please enter the current stock for {item} to check for alerts.")
            }
            StockCheck::Simulated { simulation, .. } => simulation.outlook(),
        }
    }
}

/// One user's forecasting session.
pub struct ForecastSession<T: MailTransport> {
    id: SessionId,
    engine: ForecastEngine,
    horizon: Horizon,
    history: Option<TimeSeriesTable>,
    forecast: Option<ForecastRun>,
    dispatcher: Option<AlertDispatcher<T>>,
}

impl<T: MailTransport> ForecastSession<T> {
    pub fn new(config: SessionConfig, transport: Arc<T>) -> Result<Self, SessionError> {
        let engine = ForecastEngine::new(config.forecast)?;
        let dispatcher = config
            .identity
            .map(|identity| AlertDispatcher::new(identity, transport));

        let id = SessionId::new();
        info!(
            session = %id,
            horizon = config.horizon.get(),
            alerts = dispatcher.is_some(),
            "session started"
        );

        Ok(Self {
            id,
            engine,
            horizon: config.horizon,
            history: None,
            forecast: None,
            dispatcher,
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn horizon(&self) -> Horizon {
        self.horizon
    }

    pub fn history(&self) -> Option<&TimeSeriesTable> {
        self.history.as_ref()
    }

    pub fn forecast(&self) -> Option<&ForecastRun> {
        self.forecast.as_ref()
    }

    pub fn forecast_table(&self) -> Option<&ForecastTable> {
        self.forecast.as_ref().map(|run| &run.table)
    }

    pub fn fit_failures(&self) -> &[FitFailure] {
        self.forecast
            .as_ref()
            .map(|run| run.failures.as_slice())
            .unwrap_or_default()
    }

    /// Items with a forecast, in table order.
    pub fn items(&self) -> Vec<&ItemName> {
        self.forecast_table()
            .map(|t| t.item_names().collect())
            .unwrap_or_default()
    }

    /// Replace the loaded history and recompute the forecast.
    pub fn load(&mut self, history: TimeSeriesTable) -> Result<&ForecastRun, SessionError> {
        let run = self.engine.forecast(&history, self.horizon)?;
        info!(
            session = %self.id,
            rows = history.len(),
            items = history.columns().len(),
            failed = run.failures.len(),
            "history loaded"
        );
        self.history = Some(history);
        Ok(&*self.forecast.insert(run))
    }

    /// Change the horizon; recomputes the forecast if history is loaded.
    pub fn set_horizon(&mut self, horizon: Horizon) -> Result<(), SessionError> {
        if horizon == self.horizon {
            return Ok(());
        }
        if let Some(history) = &self.history {
            let run = self.engine.forecast(history, horizon)?;
            self.forecast = Some(run);
        }
        info!(
            session = %self.id,
            from = self.horizon.get(),
            to = horizon.get(),
            "horizon changed"
        );
        self.horizon = horizon;
        Ok(())
    }

    /// Drop the loaded history and its forecast.
    pub fn clear(&mut self) {
        self.history = None;
        self.forecast = None;
    }

    /// Default forecast view: the first few items.
    pub fn default_selection(&self) -> Vec<ItemName> {
        self.items()
            .into_iter()
            .take(DEFAULT_SELECTION)
            .cloned()
            .collect()
    }

    /// Forecast restricted to `items`. Every requested item must have a forecast.
    pub fn select(&self, items: &[ItemName]) -> Result<ForecastTable, SessionError> {
        let run = self.forecast.as_ref().ok_or(SessionError::NoData)?;
        for item in items {
            self.forecast_series(run, item)?;
        }
        Ok(run.table.select(items))
    }

    /// Simulate depletion of `item` and dispatch the low-stock alert, if any.
    ///
    /// Zero stock short-circuits to [`StockCheck::InsufficientInput`]. A crossing
    /// results in exactly one dispatch; delivery failures are reported in the
    /// outcome and do not fail the check.
    pub fn check_stock(
        &self,
        item: &ItemName,
        params: StockParams,
    ) -> Result<StockCheck, SessionError> {
        params.validate()?;
        let run = self.forecast.as_ref().ok_or(SessionError::NoData)?;
        let series = self.forecast_series(run, item)?;

        if params.initial_stock == 0.0 {
            return Ok(StockCheck::InsufficientInput { item: item.clone() });
        }

        let simulation = simulate(item, series, params.initial_stock, params.threshold)?;

        let delivery = match (&simulation.alert, &self.dispatcher) {
            (Some(alert), Some(dispatcher)) => Some(dispatcher.dispatch(alert)),
            (Some(alert), None) => {
                warn!(
                    session = %self.id,
                    item = %item,
                    week = alert.week,
                    "low stock projected but alerts are not configured"
                );
                None
            }
            (None, _) => None,
        };

        info!(
            session = %self.id,
            item = %item,
            initial_stock = params.initial_stock,
            threshold = params.threshold,
            crossing_week = ?simulation.crossing_week(),
            "stock check complete"
        );

        Ok(StockCheck::Simulated {
            simulation,
            delivery,
        })
    }

    fn forecast_series<'a>(
        &self,
        run: &'a ForecastRun,
        item: &ItemName,
    ) -> Result<&'a [f64], SessionError> {
        if let Some(series) = run.table.series(item) {
            return Ok(series);
        }
        match run.failure(item) {
            Some(reason) => Err(SessionError::NoForecast {
                item: item.clone(),
                reason: reason.clone(),
            }),
            None => Err(SessionError::UnknownItem(item.clone())),
        }
    }
}
