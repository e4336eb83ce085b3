//! Inventory depletion module.
//!
//! Projects stock levels forward against an item's demand forecast and dates
//! the first low-stock crossing. Pure logic: no IO, and alerts are returned to
//! the caller rather than sent.

pub mod alert;
pub mod depletion;

pub use alert::AlertEvent;
pub use depletion::{simulate, DepletionTrace, Simulation, SimulationError, StockBand};
