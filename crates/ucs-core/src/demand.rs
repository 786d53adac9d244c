//! Hourly demand.

use crate::{UcsError, UcsResult};
use serde::{Deserialize, Serialize};

/// Demand (MW) for hours `1..=T`, stored 0-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DemandSeries(Vec<f64>);

impl DemandSeries {
    /// Build a validated series. Rejects an empty series and any negative or
    /// non-finite value, naming the 1-based hour.
    pub fn new(values: Vec<f64>) -> UcsResult<Self> {
        if values.is_empty() {
            return Err(UcsError::validation(
                "demand",
                "demand series must contain at least one hour",
            ));
        }
        for (t, value) in values.iter().enumerate() {
            if !value.is_finite() || *value < 0.0 {
                return Err(UcsError::validation(
                    format!("demand[{}]", t + 1),
                    format!("must be finite and non-negative, got {value}"),
                ));
            }
        }
        Ok(Self(values))
    }

    /// Number of hours T.
    pub fn hours(&self) -> usize {
        self.0.len()
    }

    /// Demand at 0-based index `t`.
    pub fn at(&self, t: usize) -> f64 {
        self.0[t]
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    pub fn peak(&self) -> f64 {
        self.0.iter().copied().fold(0.0, f64::max)
    }

    pub fn total_energy(&self) -> f64 {
        self.0.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demand_stats() {
        let d = DemandSeries::new(vec![400.0, 650.0, 500.0]).unwrap();
        assert_eq!(d.hours(), 3);
        assert_eq!(d.peak(), 650.0);
        assert_eq!(d.total_energy(), 1550.0);
        assert_eq!(d.at(1), 650.0);
    }

    #[test]
    fn test_demand_rejects_empty() {
        let err = DemandSeries::new(vec![]).unwrap_err();
        assert_eq!(err.field(), Some("demand"));
    }

    #[test]
    fn test_demand_rejects_negative_hour() {
        let err = DemandSeries::new(vec![10.0, 20.0, -1.0]).unwrap_err();
        assert_eq!(err.field(), Some("demand[3]"));
    }
}
