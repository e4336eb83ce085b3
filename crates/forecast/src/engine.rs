//! Forecast engine: fan-out of independent per-item fits, fan-in into one table.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use stockcast_core::{Column, ForecastTable, Horizon, ItemName, TimeSeriesTable};

use crate::config::ForecastConfig;
use crate::error::{ForecastError, ModelFitError};
use crate::model::{FittedModel, ForecastModel};
use crate::seasonal_ar::SeasonalAr;

/// An item whose model could not be fitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitFailure {
    pub item: ItemName,
    pub error: ModelFitError,
}

/// Result of one forecast call: the items that fitted, and the ones that did not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRun {
    pub table: ForecastTable,
    pub failures: Vec<FitFailure>,
}

impl ForecastRun {
    pub fn failure(&self, item: &ItemName) -> Option<&ModelFitError> {
        self.failures
            .iter()
            .find(|f| &f.item == item)
            .map(|f| &f.error)
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Stateless per-item forecaster.
#[derive(Debug, Clone)]
pub struct ForecastEngine<M = SeasonalAr> {
    model: M,
}

impl ForecastEngine<SeasonalAr> {
    pub fn new(config: ForecastConfig) -> Result<Self, ForecastError> {
        Ok(Self::with_model(SeasonalAr::new(config)?))
    }
}

impl<M: ForecastModel> ForecastEngine<M> {
    pub fn with_model(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Forecast `horizon` periods past the end of `table`, one model per column.
    ///
    /// Columns are fitted in parallel. A column that fails to fit is listed in
    /// [`ForecastRun::failures`] and left out of the forecast table; the other
    /// columns keep their source order.
    pub fn forecast(
        &self,
        table: &TimeSeriesTable,
        horizon: Horizon,
    ) -> Result<ForecastRun, ForecastError> {
        let steps = horizon.get();
        let index = table.periodicity().extend(table.last_timestamp(), steps)?;

        let outcomes: Vec<(ItemName, Result<Vec<f64>, ModelFitError>)> = table
            .columns()
            .par_iter()
            .map(|column| {
                let outcome = fit_and_forecast(&self.model, &column.values, steps);
                (column.name.clone(), outcome)
            })
            .collect();

        let mut columns = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for (item, outcome) in outcomes {
            match outcome {
                Ok(values) => columns.push(Column::new(item, values)),
                Err(error) => {
                    warn!(item = %item, error = %error, "model fit failed; item skipped");
                    failures.push(FitFailure { item, error });
                }
            }
        }

        let forecast = ForecastTable::new(table.periodicity(), index, columns)?;
        info!(
            items = table.columns().len(),
            fitted = forecast.columns().len(),
            failed = failures.len(),
            horizon = steps,
            "forecast complete"
        );

        Ok(ForecastRun {
            table: forecast,
            failures,
        })
    }
}

fn fit_and_forecast<M: ForecastModel>(
    model: &M,
    series: &[f64],
    steps: usize,
) -> Result<Vec<f64>, ModelFitError> {
    let forecast = model.fit(series)?.forecast(steps);
    if let Some(step) = forecast.iter().position(|v| !v.is_finite()) {
        return Err(ModelFitError::Diverged { step: step + 1 });
    }
    Ok(forecast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use stockcast_core::Periodicity;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn item(name: &str) -> ItemName {
        ItemName::new(name).unwrap()
    }

    /// Weekly table whose last timestamp is 2024-01-07.
    fn table_ending_jan_7(columns: Vec<(&str, Vec<f64>)>) -> TimeSeriesTable {
        let n = columns[0].1.len();
        let first = date(2024, 1, 7) - chrono::Duration::weeks(n as i64 - 1);
        let index = Periodicity::Weekly.extend(first, n - 1).unwrap();
        let index = std::iter::once(first).chain(index).collect();
        TimeSeriesTable::new(
            Periodicity::Weekly,
            index,
            columns
                .into_iter()
                .map(|(name, values)| Column::new(item(name), values))
                .collect(),
        )
        .unwrap()
    }

    fn seasonal_sales() -> Vec<f64> {
        vec![
            12.0, 15.0, 11.0, 14.0, 13.0, 16.0, 12.0, 15.0, 14.0, 17.0, 13.0, 16.0,
        ]
    }

    #[test]
    fn forecast_index_starts_one_period_after_last_observation() {
        let table = table_ending_jan_7(vec![("Paracetamol", seasonal_sales())]);
        let engine = ForecastEngine::new(ForecastConfig::default()).unwrap();

        let run = engine.forecast(&table, Horizon::new(4).unwrap()).unwrap();

        assert_eq!(
            run.table.index(),
            &[
                date(2024, 1, 14),
                date(2024, 1, 21),
                date(2024, 1, 28),
                date(2024, 2, 4)
            ]
        );
        assert_eq!(run.table.horizon(), 4);
        assert!(run.is_complete());
    }

    #[test]
    fn failing_items_are_reported_without_dropping_healthy_ones() {
        let mut missing = seasonal_sales();
        missing[3] = f64::NAN;

        let table = table_ending_jan_7(vec![
            ("Flat", vec![5.0; 12]),
            ("Paracetamol", seasonal_sales()),
            ("Gappy", missing),
            ("Ibuprofen", seasonal_sales().iter().map(|v| v * 2.0).collect()),
        ]);
        let engine = ForecastEngine::new(ForecastConfig::default()).unwrap();

        let run = engine.forecast(&table, Horizon::new(3).unwrap()).unwrap();

        let fitted: Vec<&str> = run.table.item_names().map(|n| n.as_str()).collect();
        assert_eq!(fitted, vec!["Paracetamol", "Ibuprofen"]);
        assert_eq!(
            run.failure(&item("Flat")),
            Some(&ModelFitError::Constant { value: 5.0 })
        );
        assert_eq!(
            run.failure(&item("Gappy")),
            Some(&ModelFitError::NonFinite { index: 3 })
        );
        assert_eq!(run.failures.len(), 2);
    }

    #[test]
    fn items_are_fitted_independently() {
        let alone = table_ending_jan_7(vec![("Paracetamol", seasonal_sales())]);
        let together = table_ending_jan_7(vec![
            ("Paracetamol", seasonal_sales()),
            ("Other", vec![1.0, 9.0, 2.0, 8.0, 3.0, 7.0, 4.0, 6.0, 5.0, 5.0, 6.0, 4.0]),
        ]);
        let engine = ForecastEngine::new(ForecastConfig::default()).unwrap();
        let horizon = Horizon::new(6).unwrap();

        let a = engine.forecast(&alone, horizon).unwrap();
        let b = engine.forecast(&together, horizon).unwrap();

        assert_eq!(
            a.table.series(&item("Paracetamol")),
            b.table.series(&item("Paracetamol"))
        );
    }

    /// Fails every series whose first value is zero; forecasts the last value otherwise.
    struct NaiveModel;

    struct LastValue(f64);

    impl FittedModel for LastValue {
        fn forecast(&self, steps: usize) -> Vec<f64> {
            vec![self.0; steps]
        }
    }

    impl ForecastModel for NaiveModel {
        type Fitted = LastValue;

        fn fit(&self, series: &[f64]) -> Result<LastValue, ModelFitError> {
            match series {
                [first, ..] if *first == 0.0 => Err(ModelFitError::Singular),
                [.., last] => Ok(LastValue(*last)),
                [] => Err(ModelFitError::InsufficientHistory {
                    required: 1,
                    actual: 0,
                }),
            }
        }
    }

    #[test]
    fn engine_accepts_any_model() {
        let table = table_ending_jan_7(vec![
            ("A", vec![1.0, 2.0, 3.0]),
            ("B", vec![0.0, 2.0, 3.0]),
        ]);
        let run = ForecastEngine::with_model(NaiveModel)
            .forecast(&table, Horizon::new(2).unwrap())
            .unwrap();

        assert_eq!(run.table.series(&item("A")), Some(&[3.0, 3.0][..]));
        assert_eq!(run.failure(&item("B")), Some(&ModelFitError::Singular));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        /// Every input column ends up either in the forecast table or in the failures,
        /// and the table always has exactly `horizon` rows.
        #[test]
        fn every_item_is_accounted_for(
            columns in prop::collection::vec(prop::collection::vec(0.0f64..500.0, 12), 1..6),
            horizon in Horizon::MIN..=Horizon::MAX,
        ) {
            let named: Vec<(String, Vec<f64>)> = columns
                .into_iter()
                .enumerate()
                .map(|(i, values)| (format!("item-{i}"), values))
                .collect();
            let n = named.len();
            let table = table_ending_jan_7(
                named.iter().map(|(name, v)| (name.as_str(), v.clone())).collect(),
            );
            let engine = ForecastEngine::new(ForecastConfig::default()).unwrap();

            let run = engine.forecast(&table, Horizon::new(horizon).unwrap()).unwrap();

            prop_assert_eq!(run.table.horizon(), horizon);
            prop_assert_eq!(run.table.columns().len() + run.failures.len(), n);
            for column in run.table.columns() {
                prop_assert_eq!(column.values.len(), horizon);
            }
        }
    }
}
