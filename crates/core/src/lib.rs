//! `stockcast-core` — shared domain primitives.
//!
//! This crate contains **pure data** types (no IO, no model fitting): item
//! names, identifiers, the period calendar, and the time-series tables that
//! flow between the forecast engine and the depletion simulator.

pub mod error;
pub mod horizon;
pub mod id;
pub mod item;
pub mod period;
pub mod table;

pub use error::{DataError, DataResult};
pub use horizon::Horizon;
pub use id::{AlertId, SessionId};
pub use item::ItemName;
pub use period::Periodicity;
pub use table::{Column, ForecastTable, TimeSeriesTable};
