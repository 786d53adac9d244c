//! Solve results
//!
//! Every solve produces a [`UcSolution`], including infeasible and unbounded
//! ones, so callers branch on [`UcSolution::status`] instead of on an error.

use serde::{Deserialize, Serialize};
use std::fmt;
use ucs_core::GeneratorId;

/// Values closer to zero than this are reported as zero.
pub(crate) const ZERO_TOLERANCE: f64 = 1e-6;

/// Outcome of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// Optimal within the configured gap
    Optimal,
    Infeasible,
    Unbounded,
    /// Stopped by the time limit with a feasible schedule
    LimitReached,
}

impl SolveStatus {
    /// Whether decision values are available.
    pub fn has_schedule(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::LimitReached)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::LimitReached => "limit_reached",
        };
        f.write_str(label)
    }
}

/// On/off decisions of a committable generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitCommitment {
    pub on: Vec<bool>,
    pub startup: Vec<bool>,
    pub shutdown: Vec<bool>,
}

impl UnitCommitment {
    pub fn startups(&self) -> usize {
        self.startup.iter().filter(|&&s| s).count()
    }

    pub fn hours_on(&self) -> usize {
        self.on.iter().filter(|&&on| on).count()
    }
}

/// Hourly dispatch of one generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorSchedule {
    pub id: GeneratorId,
    /// MW per hour
    pub generation: Vec<f64>,
    /// `None` for non-committable units
    pub commitment: Option<UnitCommitment>,
}

impl GeneratorSchedule {
    /// Online status in hour `t` (0-based). Non-committable units are always
    /// online.
    pub fn is_on(&self, t: usize) -> bool {
        match &self.commitment {
            Some(c) => c.on.get(t).copied().unwrap_or(false),
            None => true,
        }
    }

    /// MW in hour `t` (0-based); zero past the end of the schedule.
    pub fn output(&self, t: usize) -> f64 {
        self.generation.get(t).copied().unwrap_or(0.0)
    }

    pub fn energy(&self) -> f64 {
        self.generation.iter().sum()
    }
}

/// Hourly operation of one storage unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSchedule {
    pub id: GeneratorId,
    pub charge: Vec<f64>,
    pub discharge: Vec<f64>,
    /// MWh at the end of each hour
    pub state_of_charge: Vec<f64>,
}

impl StorageSchedule {
    /// Discharge minus charge in hour `t`; negative while pumping.
    pub fn net_output(&self, t: usize) -> f64 {
        self.discharge.get(t).copied().unwrap_or(0.0) - self.charge.get(t).copied().unwrap_or(0.0)
    }

    /// State of charge at the end of hour `t` (0-based), if recorded.
    pub fn soc_at(&self, t: usize) -> Option<f64> {
        self.state_of_charge.get(t).copied()
    }

    /// Hours (0-based) in which the unit charges and discharges at once.
    ///
    /// Without exclusive storage modes the model may do this to burn surplus
    /// energy through conversion losses.
    pub fn simultaneous_hours(&self) -> Vec<usize> {
        self.charge
            .iter()
            .zip(&self.discharge)
            .enumerate()
            .filter(|(_, (&c, &d))| c > ZERO_TOLERANCE && d > ZERO_TOLERANCE)
            .map(|(t, _)| t)
            .collect()
    }

    pub fn energy_charged(&self) -> f64 {
        self.charge.iter().sum()
    }

    pub fn energy_discharged(&self) -> f64 {
        self.discharge.iter().sum()
    }
}

/// Result of a commitment solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UcSolution {
    pub status: SolveStatus,
    /// Total cost; `None` without a schedule
    pub objective: Option<f64>,
    pub energy_cost: f64,
    pub startup_cost: f64,
    /// Relative gap bound of the reported schedule
    pub mip_gap: Option<f64>,
    pub hours: usize,
    pub generators: Vec<GeneratorSchedule>,
    pub storage: Vec<StorageSchedule>,
    pub solve_time_ms: u64,
    pub status_message: String,
}

impl UcSolution {
    /// A result with no schedule, for infeasible or unbounded models.
    pub fn without_schedule(
        status: SolveStatus,
        hours: usize,
        solve_time_ms: u64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            objective: None,
            energy_cost: 0.0,
            startup_cost: 0.0,
            mip_gap: None,
            hours,
            generators: Vec::new(),
            storage: Vec::new(),
            solve_time_ms,
            status_message: message.into(),
        }
    }

    pub fn cost_breakdown(&self) -> CostBreakdown {
        CostBreakdown {
            energy: self.energy_cost,
            startup: self.startup_cost,
            total: self.objective.unwrap_or(0.0),
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.status.has_schedule()
    }

    pub fn generator(&self, id: &GeneratorId) -> Option<&GeneratorSchedule> {
        self.generators.iter().find(|g| &g.id == id)
    }

    pub fn storage_unit(&self, id: &GeneratorId) -> Option<&StorageSchedule> {
        self.storage.iter().find(|s| &s.id == id)
    }

    /// Total supply in hour `t`: generator output plus net storage output.
    /// Equals demand in every hour of a feasible schedule.
    pub fn total_generation(&self, t: usize) -> f64 {
        let thermal: f64 = self
            .generators
            .iter()
            .map(|g| g.output(t))
            .sum();
        let storage: f64 = self.storage.iter().map(|s| s.net_output(t)).sum();
        thermal + storage
    }

    /// Storage units with any hour of simultaneous charge and discharge.
    pub fn simultaneous_storage(&self) -> Vec<(&GeneratorId, Vec<usize>)> {
        self.storage
            .iter()
            .map(|s| (&s.id, s.simultaneous_hours()))
            .filter(|(_, hours)| !hours.is_empty())
            .collect()
    }

    /// Tidy `(unit, hour, variable, value)` rows with 1-based hours.
    ///
    /// Generators contribute `gen` and, when committable, `commit`. Storage
    /// units contribute `gen` as net output plus `charge`, `discharge` and
    /// `soc`.
    pub fn records(&self) -> Vec<DispatchRecord> {
        let mut rows = Vec::new();
        for g in &self.generators {
            for (t, &p) in g.generation.iter().enumerate() {
                rows.push(DispatchRecord::new(&g.id, t, DispatchVariable::Gen, p));
                if let Some(on) = g.commitment.as_ref().and_then(|c| c.on.get(t)) {
                    let on = if *on { 1.0 } else { 0.0 };
                    rows.push(DispatchRecord::new(&g.id, t, DispatchVariable::Commit, on));
                }
            }
        }
        for s in &self.storage {
            for (t, &charge) in s.charge.iter().enumerate() {
                let discharge = s.discharge.get(t).copied().unwrap_or(0.0);
                rows.push(DispatchRecord::new(&s.id, t, DispatchVariable::Gen, discharge - charge));
                rows.push(DispatchRecord::new(&s.id, t, DispatchVariable::Charge, charge));
                rows.push(DispatchRecord::new(&s.id, t, DispatchVariable::Discharge, discharge));
                if let Some(soc) = s.soc_at(t) {
                    rows.push(DispatchRecord::new(&s.id, t, DispatchVariable::Soc, soc));
                }
            }
        }
        rows
    }

    /// Short human-readable report.
    pub fn summary(&self) -> String {
        let mut out = format!("status: {}\n", self.status);
        match self.objective {
            Some(objective) => {
                out.push_str(&format!("objective: {objective:.2}\n"));
                out.push_str(&format!(
                    "  energy cost: {:.2}\n  startup cost: {:.2}\n",
                    self.energy_cost, self.startup_cost
                ));
            }
            None => out.push_str(&format!("message: {}\n", self.status_message)),
        }
        if let Some(gap) = self.mip_gap {
            out.push_str(&format!("mip gap: {:.4}%\n", gap * 100.0));
        }
        if self.is_feasible() {
            let startups: usize = self
                .generators
                .iter()
                .filter_map(|g| g.commitment.as_ref())
                .map(UnitCommitment::startups)
                .sum();
            out.push_str(&format!(
                "hours: {}, generators: {}, storage units: {}, startups: {}\n",
                self.hours,
                self.generators.len(),
                self.storage.len(),
                startups
            ));
        }
        out.push_str(&format!("solve time: {} ms\n", self.solve_time_ms));
        out
    }
}

/// Split of the objective into its two cost terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub energy: f64,
    pub startup: f64,
    pub total: f64,
}

/// Quantity named in a [`DispatchRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchVariable {
    Gen,
    Commit,
    Charge,
    Discharge,
    Soc,
}

impl fmt::Display for DispatchVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DispatchVariable::Gen => "gen",
            DispatchVariable::Commit => "commit",
            DispatchVariable::Charge => "charge",
            DispatchVariable::Discharge => "discharge",
            DispatchVariable::Soc => "soc",
        };
        f.write_str(label)
    }
}

/// One row of the tidy dispatch table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchRecord {
    pub unit: String,
    /// 1-based hour
    pub hour: usize,
    pub variable: DispatchVariable,
    pub value: f64,
}

impl DispatchRecord {
    fn new(unit: &GeneratorId, t: usize, variable: DispatchVariable, value: f64) -> Self {
        Self {
            unit: unit.as_str().to_string(),
            hour: t + 1,
            variable,
            value,
        }
    }
}
