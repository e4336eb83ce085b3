use thiserror::Error;

use stockcast_core::{DataError, ItemName};
use stockcast_forecast::{ForecastError, ModelFitError};
use stockcast_inventory::SimulationError;

/// Session-level failure. None of these end the session; the caller shows the
/// error and the session keeps its previous state.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no data loaded")]
    NoData,

    #[error("unknown item `{0}`")]
    UnknownItem(ItemName),

    /// The item exists in the history but its model failed to fit.
    #[error("no forecast for `{item}`: {reason}")]
    NoForecast { item: ItemName, reason: ModelFitError },

    #[error("invalid stock parameters: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error(transparent)]
    Data(#[from] DataError),
}
