//! # ucs-core: Unit Commitment Data Model
//!
//! Plain data structures for one day of single-node generator commitment and
//! dispatch with pumped-hydro storage. Everything here is immutable input to a
//! solve; the optimization model itself lives in `ucs-algo`.
//!
//! ## Entities
//!
//! - [`Generator`] - a dispatchable unit with output bounds, variable cost and
//!   optional commitment parameters (startup cost, minimum up/down time)
//! - [`StorageUnit`] - a pumped-hydro unit with a 4-hour energy rating and
//!   symmetric one-way efficiency
//! - [`DemandSeries`] - hourly demand for hours `1..=T`
//!
//! Every entity has a `validate` method returning a [`UcsError::Validation`]
//! that names the offending field, so malformed input is rejected before any
//! constraint is built.
//!
//! ## Quick Start
//!
//! ```
//! use ucs_core::*;
//!
//! let coal = Generator::new("coal", 100.0, 600.0, 22.0).with_startup_cost(4_000.0);
//! let hydro = StorageUnit::new("pumped_hydro", 100.0);
//! let demand = DemandSeries::new(vec![450.0; 24]).unwrap();
//!
//! assert!(coal.validate().is_ok());
//! assert_eq!(hydro.energy_capacity, MegawattHours(400.0));
//! assert_eq!(hydro.start_charge, MegawattHours(200.0));
//! assert_eq!(demand.hours(), 24);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod demand;
pub mod error;
pub mod storage;
pub mod units;

pub use demand::DemandSeries;
pub use error::{UcsError, UcsResult};
pub use storage::{
    StorageUnit, DEFAULT_STORAGE_EFFICIENCY, ENERGY_TO_POWER_RATIO, START_CHARGE_FRACTION,
};
pub use units::{MegawattHours, Megawatts};

/// Identifier shared by generators and storage units.
///
/// Ids come straight from the input tables (e.g. `"natural_gas_ct_1"`) and
/// must be unique across both kinds of unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneratorId(String);

impl GeneratorId {
    #[inline]
    pub fn new(value: impl Into<String>) -> Self {
        GeneratorId(value.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeneratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GeneratorId {
    fn from(value: &str) -> Self {
        GeneratorId::new(value)
    }
}

/// A dispatchable (non-storage) generating unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generator {
    pub id: GeneratorId,
    /// Location label; the commitment model is single-node so this is informational
    pub bus: Option<String>,
    /// Minimum stable output when committed
    pub p_min: Megawatts,
    /// Maximum output
    pub p_max: Megawatts,
    /// Variable cost ($/MWh)
    pub variable_cost: f64,
    /// Cost per startup ($)
    pub startup_cost: f64,
    /// Minimum number of hours the unit stays on after a startup
    pub min_up_hours: usize,
    /// Minimum number of hours the unit stays off after a shutdown
    pub min_down_hours: usize,
    /// Whether the unit gets on/off decisions. Non-committable units dispatch
    /// continuously between `p_min` and `p_max`.
    pub committable: bool,
    /// Commitment state before hour 1, if known
    pub initial_status: Option<bool>,
}

impl Generator {
    /// Create a committable generator with no startup cost and one-hour
    /// minimum up/down times.
    pub fn new(id: impl Into<String>, p_min: f64, p_max: f64, variable_cost: f64) -> Self {
        Self {
            id: GeneratorId::new(id),
            bus: None,
            p_min: Megawatts(p_min),
            p_max: Megawatts(p_max),
            variable_cost,
            startup_cost: 0.0,
            min_up_hours: 1,
            min_down_hours: 1,
            committable: true,
            initial_status: None,
        }
    }

    pub fn with_bus(mut self, bus: impl Into<String>) -> Self {
        self.bus = Some(bus.into());
        self
    }

    pub fn with_startup_cost(mut self, cost: f64) -> Self {
        self.startup_cost = cost;
        self
    }

    pub fn with_min_up_down(mut self, min_up_hours: usize, min_down_hours: usize) -> Self {
        self.min_up_hours = min_up_hours;
        self.min_down_hours = min_down_hours;
        self
    }

    pub fn with_initial_status(mut self, on: bool) -> Self {
        self.initial_status = Some(on);
        self
    }

    /// Dispatch continuously without commitment binaries.
    pub fn non_committable(mut self) -> Self {
        self.committable = false;
        self
    }

    /// Check bounds and costs, naming the offending field on failure.
    pub fn validate(&self) -> UcsResult<()> {
        let field = |name: &str| format!("generators[{}].{}", self.id, name);

        if self.id.as_str().trim().is_empty() {
            return Err(UcsError::validation("generators[].id", "id must not be empty"));
        }
        if !self.p_min.is_finite() || self.p_min.is_sign_negative() {
            return Err(UcsError::validation(
                field("p_min"),
                format!("must be finite and non-negative, got {}", self.p_min.value()),
            ));
        }
        if !self.p_max.is_finite() || self.p_max.is_sign_negative() {
            return Err(UcsError::validation(
                field("p_max"),
                format!("must be finite and non-negative, got {}", self.p_max.value()),
            ));
        }
        if self.p_min > self.p_max {
            return Err(UcsError::validation(
                field("p_min"),
                format!(
                    "p_min ({}) exceeds p_max ({})",
                    self.p_min.value(),
                    self.p_max.value()
                ),
            ));
        }
        if !self.variable_cost.is_finite() {
            return Err(UcsError::validation(field("variable_cost"), "must be finite"));
        }
        if !self.startup_cost.is_finite() || self.startup_cost < 0.0 {
            return Err(UcsError::validation(
                field("startup_cost"),
                format!("must be finite and non-negative, got {}", self.startup_cost),
            ));
        }
        if self.min_up_hours == 0 {
            return Err(UcsError::validation(field("min_up"), "must be at least 1 hour"));
        }
        if self.min_down_hours == 0 {
            return Err(UcsError::validation(field("min_down"), "must be at least 1 hour"));
        }
        Ok(())
    }
}
