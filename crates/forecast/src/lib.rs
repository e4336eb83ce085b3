//! `stockcast-forecast`
//!
//! **Responsibility:** per-item demand forecasting.
//!
//! - Each tracked item is fitted independently; there is no cross-item modelling.
//! - A failed fit is reported against its item and never aborts the other items.
//! - The engine is stateless: every call fits fresh models from the table it is given.

pub mod config;
pub mod engine;
pub mod error;
mod linalg;
pub mod model;
pub mod seasonal_ar;

pub use config::ForecastConfig;
pub use engine::{FitFailure, ForecastEngine, ForecastRun};
pub use error::{ForecastError, ModelFitError};
pub use model::{FittedModel, ForecastModel};
pub use seasonal_ar::{FittedSeasonalAr, SeasonalAr};
