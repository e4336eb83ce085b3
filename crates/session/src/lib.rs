//! `stockcast-session` — one user's forecasting session.
//!
//! Owns the loaded history and the forecast derived from it, recomputes the
//! forecast whenever either input changes, and runs stock checks that connect
//! the depletion simulator to alert delivery.

pub mod config;
pub mod error;
pub mod session;

pub use config::{SessionConfig, StockParams};
pub use error::SessionError;
pub use session::{ForecastSession, StockCheck};
