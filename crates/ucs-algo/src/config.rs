//! Solver configuration.

use serde::{Deserialize, Serialize};
use ucs_core::{UcsError, UcsResult};

/// Default relative MIP gap (1%).
pub const DEFAULT_MIP_GAP: f64 = 0.01;

/// Options passed to the MILP backend for one solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UcSolverConfig {
    /// Relative optimality gap at which branch-and-bound may stop
    pub mip_gap: f64,
    /// Wall-clock limit; the best incumbent is returned when it is reached
    pub time_limit_seconds: Option<f64>,
    /// Backend thread count (backend default when unset)
    pub threads: Option<u32>,
    /// Echo solver progress to the console
    pub verbose: bool,
    /// Forbid charging and discharging the same storage unit in the same hour
    /// with one binary per unit and hour
    pub exclusive_storage: bool,
}

impl Default for UcSolverConfig {
    fn default() -> Self {
        Self {
            mip_gap: DEFAULT_MIP_GAP,
            time_limit_seconds: None,
            threads: None,
            verbose: false,
            exclusive_storage: false,
        }
    }
}

impl UcSolverConfig {
    pub fn with_mip_gap(mut self, mip_gap: f64) -> Self {
        self.mip_gap = mip_gap;
        self
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit_seconds = Some(seconds);
        self
    }

    pub fn with_exclusive_storage(mut self, exclusive: bool) -> Self {
        self.exclusive_storage = exclusive;
        self
    }

    pub fn validate(&self) -> UcsResult<()> {
        if !(0.0..1.0).contains(&self.mip_gap) {
            return Err(UcsError::Config(format!(
                "mip_gap must lie in [0, 1), got {}",
                self.mip_gap
            )));
        }
        if let Some(limit) = self.time_limit_seconds {
            if !(limit.is_finite() && limit > 0.0) {
                return Err(UcsError::Config(format!(
                    "time_limit_seconds must be positive, got {limit}"
                )));
            }
        }
        if let Some(threads) = self.threads {
            if threads == 0 || i32::try_from(threads).is_err() {
                return Err(UcsError::Config(format!(
                    "threads must lie in [1, {}], got {threads}",
                    i32::MAX
                )));
            }
        }
        Ok(())
    }
}
