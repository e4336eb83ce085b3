//! Period calendar: fixed-step date arithmetic for table indices.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{DataError, DataResult};

/// Fixed periodicity of a table index.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Periodicity {
    Daily,
    #[default]
    Weekly,
}

impl Periodicity {
    /// Length of one period.
    pub fn step(&self) -> Duration {
        match self {
            Periodicity::Daily => Duration::days(1),
            Periodicity::Weekly => Duration::weeks(1),
        }
    }

    /// `from` moved forward by `steps` periods, or `None` past the calendar's end.
    pub fn advance(&self, from: NaiveDate, steps: usize) -> Option<NaiveDate> {
        let steps = i32::try_from(steps).ok()?;
        from.checked_add_signed(self.step().checked_mul(steps)?)
    }

    /// True when `current` is exactly one period after `previous`.
    pub fn follows(&self, previous: NaiveDate, current: NaiveDate) -> bool {
        self.advance(previous, 1) == Some(current)
    }

    /// The `count` dates immediately following `last`, one period apart.
    pub fn extend(&self, last: NaiveDate, count: usize) -> DataResult<Vec<NaiveDate>> {
        (1..=count)
            .map(|k| {
                self.advance(last, k)
                    .ok_or(DataError::DateOverflow { from: last, steps: k })
            })
            .collect()
    }
}

impl core::fmt::Display for Periodicity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Periodicity::Daily => f.write_str("daily"),
            Periodicity::Weekly => f.write_str("weekly"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekly_extension_starts_one_period_after_last() {
        let dates = Periodicity::Weekly.extend(date(2024, 1, 7), 4).unwrap();
        assert_eq!(
            dates,
            vec![
                date(2024, 1, 14),
                date(2024, 1, 21),
                date(2024, 1, 28),
                date(2024, 2, 4)
            ]
        );
    }

    #[test]
    fn daily_follows_is_exact() {
        assert!(Periodicity::Daily.follows(date(2024, 2, 28), date(2024, 2, 29)));
        assert!(!Periodicity::Daily.follows(date(2024, 2, 28), date(2024, 3, 1)));
        assert!(!Periodicity::Weekly.follows(date(2024, 1, 7), date(2024, 1, 13)));
    }

    #[test]
    fn extension_past_calendar_end_is_an_error() {
        let err = Periodicity::Weekly.extend(NaiveDate::MAX, 2).unwrap_err();
        assert_eq!(
            err,
            DataError::DateOverflow {
                from: NaiveDate::MAX,
                steps: 1
            }
        );
    }

    proptest! {
        #[test]
        fn extended_index_is_contiguous(offset in 0i64..20_000, count in 1usize..16) {
            let last = date(1990, 1, 1) + Duration::days(offset);
            let dates = Periodicity::Weekly.extend(last, count).unwrap();

            prop_assert_eq!(dates.len(), count);
            prop_assert!(Periodicity::Weekly.follows(last, dates[0]));
            for pair in dates.windows(2) {
                prop_assert!(Periodicity::Weekly.follows(pair[0], pair[1]));
            }
        }
    }
}
