//! Pumped-hydro storage parameters.
//!
//! Storage units are described by their power rating. The energy rating, the
//! efficiencies and the starting charge follow fixed conventions unless the
//! input overrides them:
//!
//! | Parameter | Default |
//! |-----------|---------|
//! | energy capacity | [`ENERGY_TO_POWER_RATIO`] × power capacity |
//! | charge / discharge efficiency | [`DEFAULT_STORAGE_EFFICIENCY`] each way (≈ 0.7 round trip) |
//! | starting charge | [`START_CHARGE_FRACTION`] × energy capacity |
//!
//! The starting charge is also the charge the unit must hold at the end of
//! the horizon.

use crate::{GeneratorId, MegawattHours, Megawatts, UcsError, UcsResult};
use serde::{Deserialize, Serialize};

/// Hours of storage at full power.
pub const ENERGY_TO_POWER_RATIO: f64 = 4.0;

/// One-way efficiency applied to both charging and discharging.
pub const DEFAULT_STORAGE_EFFICIENCY: f64 = 0.84;

/// Starting (and required ending) charge as a fraction of energy capacity.
pub const START_CHARGE_FRACTION: f64 = 0.5;

/// A storage unit such as a pumped-hydro plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageUnit {
    pub id: GeneratorId,
    pub bus: Option<String>,
    /// Maximum charge and discharge rate
    pub power_capacity: Megawatts,
    pub energy_capacity: MegawattHours,
    pub charge_efficiency: f64,
    pub discharge_efficiency: f64,
    /// State of charge before hour 1 and required after hour T
    pub start_charge: MegawattHours,
}

impl StorageUnit {
    /// Create a storage unit from its power rating using the default
    /// conventions for everything else.
    pub fn new(id: impl Into<String>, power_capacity_mw: f64) -> Self {
        let power_capacity = Megawatts(power_capacity_mw);
        let energy_capacity = power_capacity.over_hours(ENERGY_TO_POWER_RATIO);
        Self {
            id: GeneratorId::new(id),
            bus: None,
            power_capacity,
            energy_capacity,
            charge_efficiency: DEFAULT_STORAGE_EFFICIENCY,
            discharge_efficiency: DEFAULT_STORAGE_EFFICIENCY,
            start_charge: energy_capacity * START_CHARGE_FRACTION,
        }
    }

    pub fn with_bus(mut self, bus: impl Into<String>) -> Self {
        self.bus = Some(bus.into());
        self
    }

    /// Set the same one-way efficiency for charging and discharging.
    pub fn with_efficiency(mut self, efficiency: f64) -> Self {
        self.charge_efficiency = efficiency;
        self.discharge_efficiency = efficiency;
        self
    }

    pub fn with_start_charge(mut self, start_charge_mwh: f64) -> Self {
        self.start_charge = MegawattHours(start_charge_mwh);
        self
    }

    /// Fraction of charged energy recovered after a full cycle.
    pub fn round_trip_efficiency(&self) -> f64 {
        self.charge_efficiency * self.discharge_efficiency
    }

    pub fn validate(&self) -> UcsResult<()> {
        let field = |name: &str| format!("storage[{}].{}", self.id, name);

        if self.id.as_str().trim().is_empty() {
            return Err(UcsError::validation("storage[].id", "id must not be empty"));
        }
        if !self.power_capacity.is_finite() || self.power_capacity.value() <= 0.0 {
            return Err(UcsError::validation(
                field("existing_cap_mw"),
                format!("must be positive, got {}", self.power_capacity.value()),
            ));
        }
        if !self.energy_capacity.is_finite() || self.energy_capacity.value() <= 0.0 {
            return Err(UcsError::validation(
                field("energy_cap_mwh"),
                format!("must be positive, got {}", self.energy_capacity.value()),
            ));
        }
        for (name, eff) in [
            ("charge_eff", self.charge_efficiency),
            ("discharge_eff", self.discharge_efficiency),
        ] {
            if !(eff > 0.0 && eff <= 1.0) {
                return Err(UcsError::validation(
                    field(name),
                    format!("must be in (0, 1], got {eff}"),
                ));
            }
        }
        if !self.start_charge.is_finite()
            || self.start_charge.is_sign_negative()
            || self.start_charge > self.energy_capacity
        {
            return Err(UcsError::validation(
                field("start_charge"),
                format!(
                    "must lie within [0, {}], got {}",
                    self.energy_capacity.value(),
                    self.start_charge.value()
                ),
            ));
        }
        Ok(())
    }
}
