//! Time-series tables: one named column per tracked item over a shared date index.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DataError, DataResult};
use crate::item::ItemName;
use crate::period::Periodicity;

/// One tracked item's values over the table index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: ItemName,
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(name: ItemName, values: Vec<f64>) -> Self {
        Self { name, values }
    }
}

/// Historical per-item quantities (e.g. weekly sales volume).
///
/// Invariants (checked on construction):
/// - the index is non-empty and each timestamp is exactly one period after the previous one;
/// - every column has one value per timestamp and a unique name;
/// - no value is negative.
///
/// Non-finite cells (missing observations) are accepted here; the forecast engine
/// rejects the affected column on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct TimeSeriesTable {
    periodicity: Periodicity,
    index: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl TimeSeriesTable {
    pub fn new(
        periodicity: Periodicity,
        index: Vec<NaiveDate>,
        columns: Vec<Column>,
    ) -> DataResult<Self> {
        if index.is_empty() {
            return Err(DataError::EmptyIndex);
        }
        if columns.is_empty() {
            return Err(DataError::NoColumns);
        }

        for pair in index.windows(2) {
            if !periodicity.follows(pair[0], pair[1]) {
                return Err(DataError::IrregularIndex {
                    previous: pair[0],
                    current: pair[1],
                    periodicity,
                });
            }
        }

        check_columns(&columns, index.len())?;

        for column in &columns {
            if let Some((row, value)) = column
                .values
                .iter()
                .enumerate()
                .find(|(_, v)| **v < 0.0)
            {
                return Err(DataError::NegativeValue {
                    column: column.name.to_string(),
                    row,
                    value: *value,
                });
            }
        }

        Ok(Self {
            periodicity,
            index,
            columns,
        })
    }

    pub fn periodicity(&self) -> Periodicity {
        self.periodicity
    }

    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &ItemName) -> Option<&Column> {
        self.columns.iter().find(|c| &c.name == name)
    }

    pub fn item_names(&self) -> impl Iterator<Item = &ItemName> {
        self.columns.iter().map(|c| &c.name)
    }

    /// Number of observed periods.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn last_timestamp(&self) -> NaiveDate {
        // Construction guarantees a non-empty index.
        self.index[self.index.len() - 1]
    }
}

/// Future per-item point forecasts.
///
/// Same shape as [`TimeSeriesTable`], covering the periods right after the source
/// table's last timestamp. Values are raw model output and may be negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastTable {
    periodicity: Periodicity,
    index: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl ForecastTable {
    pub fn new(
        periodicity: Periodicity,
        index: Vec<NaiveDate>,
        columns: Vec<Column>,
    ) -> DataResult<Self> {
        check_columns(&columns, index.len())?;
        Ok(Self {
            periodicity,
            index,
            columns,
        })
    }

    pub fn periodicity(&self) -> Periodicity {
        self.periodicity
    }

    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of forecast periods.
    pub fn horizon(&self) -> usize {
        self.index.len()
    }

    pub fn item_names(&self) -> impl Iterator<Item = &ItemName> {
        self.columns.iter().map(|c| &c.name)
    }

    pub fn series(&self, name: &ItemName) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| &c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Restrict the table to `names`, keeping the table's own column order.
    ///
    /// Unknown names are ignored.
    pub fn select(&self, names: &[ItemName]) -> ForecastTable {
        ForecastTable {
            periodicity: self.periodicity,
            index: self.index.clone(),
            columns: self
                .columns
                .iter()
                .filter(|c| names.contains(&c.name))
                .cloned()
                .collect(),
        }
    }
}

fn check_columns(columns: &[Column], rows: usize) -> DataResult<()> {
    let mut seen: HashSet<&ItemName> = HashSet::with_capacity(columns.len());
    for column in columns {
        if !seen.insert(&column.name) {
            return Err(DataError::DuplicateColumn(column.name.to_string()));
        }
        if column.values.len() != rows {
            return Err(DataError::RaggedColumn {
                column: column.name.to_string(),
                expected: rows,
                actual: column.values.len(),
            });
        }
    }
    Ok(())
}

/// Wire shape of a [`TimeSeriesTable`]; `null` cells become missing observations.
#[derive(Debug, Deserialize)]
struct RawTable {
    #[serde(default)]
    periodicity: Periodicity,
    index: Vec<NaiveDate>,
    columns: Vec<RawColumn>,
}

#[derive(Debug, Deserialize)]
struct RawColumn {
    name: ItemName,
    values: Vec<Option<f64>>,
}

impl TryFrom<RawTable> for TimeSeriesTable {
    type Error = DataError;

    fn try_from(raw: RawTable) -> Result<Self, Self::Error> {
        let columns = raw
            .columns
            .into_iter()
            .map(|c| Column {
                name: c.name,
                values: c.values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect(),
            })
            .collect();
        TimeSeriesTable::new(raw.periodicity, raw.index, columns)
    }
}
