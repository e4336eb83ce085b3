use serde::{Deserialize, Serialize};

use crate::error::{DataError, DataResult};

/// Number of future periods to forecast.
///
/// Bounded to `MIN..=MAX`; the default of 4 matches a one-month view on weekly data.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Horizon(usize);

impl Horizon {
    pub const MIN: usize = 2;
    pub const MAX: usize = 8;

    pub fn new(periods: usize) -> DataResult<Self> {
        if !(Self::MIN..=Self::MAX).contains(&periods) {
            return Err(DataError::validation(format!(
                "horizon must be between {} and {} periods, got {periods}",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(periods))
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Self(4)
    }
}

impl core::fmt::Display for Horizon {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<usize> for Horizon {
    type Error = DataError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Horizon> for usize {
    fn from(value: Horizon) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_supported_range_only() {
        assert!(Horizon::new(1).is_err());
        assert_eq!(Horizon::new(2).unwrap().get(), 2);
        assert_eq!(Horizon::new(8).unwrap().get(), 8);
        assert!(Horizon::new(9).is_err());
    }

    #[test]
    fn deserialization_is_validated() {
        assert_eq!(serde_json::from_str::<Horizon>("6").unwrap().get(), 6);
        assert!(serde_json::from_str::<Horizon>("12").is_err());
    }
}
