//! Data error model.

use chrono::NaiveDate;
use thiserror::Error;

use crate::period::Periodicity;

/// Result type used for table and value construction.
pub type DataResult<T> = Result<T, DataError>;

/// Malformed or missing input data.
///
/// Raised while building tables and value objects; the loader that produced
/// the data is responsible for surfacing it to the user.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DataError {
    /// A value failed validation (e.g. blank item name, horizon out of range).
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("table index is empty")]
    EmptyIndex,

    #[error("table has no item columns")]
    NoColumns,

    /// Two consecutive timestamps are not exactly one period apart.
    #[error("timestamp {current} does not follow {previous} at {periodicity} periodicity")]
    IrregularIndex {
        previous: NaiveDate,
        current: NaiveDate,
        periodicity: Periodicity,
    },

    #[error("column `{column}` has {actual} values, index has {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate column `{0}`")]
    DuplicateColumn(String),

    #[error("column `{column}` has negative quantity {value} at row {row}")]
    NegativeValue {
        column: String,
        row: usize,
        value: f64,
    },

    /// Extending the calendar ran past the representable date range.
    #[error("date overflow extending {from} by {steps} period(s)")]
    DateOverflow { from: NaiveDate, steps: usize },
}

impl DataError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
