//! Hourly marginal energy prices
//!
//! A MILP has no duals. Prices come from re-solving the model as an LP with
//! every commitment and storage-mode decision fixed at its value in a solved
//! schedule, then reading the duals of the energy balance rows.

use crate::formulation::{build_model, CommitmentMode, CommitmentSchedule, FixedCommitment};
use crate::solution::{UcSolution, ZERO_TOLERANCE};
use crate::{UcProblem, UcSolverConfig};
use good_lp::solvers::{DualValues, SolutionWithDual};
use good_lp::{ResolutionError, Solution, SolverModel};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ucs_core::{UcsError, UcsResult};

/// Marginal price of energy per hour, $/MWh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginalPrices {
    pub hourly: Vec<f64>,
    /// Cost of the fixed-commitment LP
    pub objective: f64,
}

impl MarginalPrices {
    /// Price in hour `t` (0-based).
    pub fn at(&self, t: usize) -> Option<f64> {
        self.hourly.get(t).copied()
    }

    pub fn max(&self) -> f64 {
        self.hourly.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn min(&self) -> f64 {
        self.hourly.iter().copied().fold(f64::INFINITY, f64::min)
    }
}

fn as_flag(on: bool) -> f64 {
    if on {
        1.0
    } else {
        0.0
    }
}

fn fixed_schedule(
    problem: &UcProblem,
    solution: &UcSolution,
    config: &UcSolverConfig,
) -> UcsResult<CommitmentSchedule> {
    if solution.generators.len() != problem.generators().len()
        || solution.storage.len() != problem.storage().len()
        || solution.hours != problem.hours()
    {
        return Err(UcsError::validation(
            "solution",
            "solution does not belong to this problem",
        ));
    }

    let generators = problem
        .generators()
        .iter()
        .zip(&solution.generators)
        .map(|(unit, sched)| {
            if !unit.committable {
                return None;
            }
            sched.commitment.as_ref().map(|c| FixedCommitment {
                commit: c.on.iter().map(|&b| as_flag(b)).collect(),
                startup: c.startup.iter().map(|&b| as_flag(b)).collect(),
                shutdown: c.shutdown.iter().map(|&b| as_flag(b)).collect(),
            })
        })
        .collect();

    let storage_modes = if config.exclusive_storage {
        solution
            .storage
            .iter()
            .map(|s| {
                s.charge
                    .iter()
                    .map(|&c| as_flag(c > ZERO_TOLERANCE))
                    .collect()
            })
            .collect()
    } else {
        Vec::new()
    };

    Ok(CommitmentSchedule {
        generators,
        storage_modes,
    })
}

/// Hourly marginal prices for a solved schedule.
///
/// `solution` must come from solving `problem` with `config`. Prices are the
/// balance row duals of the fixed-commitment LP, expressed as the change in
/// total cost per extra MWh of demand: positive when serving more load costs
/// more, negative when extra load relieves a surplus.
pub fn marginal_prices(
    problem: &UcProblem,
    solution: &UcSolution,
    config: &UcSolverConfig,
) -> UcsResult<MarginalPrices> {
    if !solution.is_feasible() {
        return Err(UcsError::validation(
            "solution",
            format!("cannot price a {} solution", solution.status),
        ));
    }
    config.validate()?;

    let schedule = fixed_schedule(problem, solution, config)?;
    let built = build_model(problem, CommitmentMode::Fixed(&schedule), config);
    debug!(
        "Pricing LP: {} variables, {} constraints",
        built.num_variables, built.num_constraints
    );

    let mut solved = built.model.solve().map_err(|e| match e {
        ResolutionError::Infeasible => {
            UcsError::Solver("fixed-commitment LP is infeasible".to_string())
        }
        other => UcsError::Solver(format!("HiGHS failed on pricing LP: {other}")),
    })?;
    let objective = solved.eval(built.energy_cost + built.startup_cost);

    let duals = solved.compute_dual();
    // Balance rows hold demand on the right-hand side of a minimisation, so
    // HiGHS row duals are d(cost)/d(demand) as they stand.
    let hourly: Vec<f64> = built.balance.iter().map(|row| duals.dual(row.clone())).collect();

    info!(
        "Marginal prices: {} hours, range {:.2}..{:.2} $/MWh",
        hourly.len(),
        hourly.iter().copied().fold(f64::INFINITY, f64::min),
        hourly.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    );

    Ok(MarginalPrices { hourly, objective })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::{GeneratorSchedule, SolveStatus, UnitCommitment};
    use crate::UcProblemBuilder;
    use ucs_core::{Generator, GeneratorId};

    fn problem() -> UcProblem {
        UcProblemBuilder::new()
            .generator(Generator::new("coal", 50.0, 200.0, 20.0))
            .demand(vec![100.0, 150.0])
            .build()
            .unwrap()
    }

    fn solved_schedule() -> UcSolution {
        UcSolution {
            status: SolveStatus::Optimal,
            objective: Some(5000.0),
            energy_cost: 5000.0,
            startup_cost: 0.0,
            mip_gap: Some(0.0),
            hours: 2,
            generators: vec![GeneratorSchedule {
                id: GeneratorId::new("coal"),
                generation: vec![100.0, 150.0],
                commitment: Some(UnitCommitment {
                    on: vec![true, true],
                    startup: vec![false, false],
                    shutdown: vec![false, false],
                }),
            }],
            storage: Vec::new(),
            solve_time_ms: 0,
            status_message: String::new(),
        }
    }

    #[test]
    fn test_fixed_schedule_from_solution() {
        let schedule =
            fixed_schedule(&problem(), &solved_schedule(), &UcSolverConfig::default()).unwrap();
        let coal = schedule.generators[0].as_ref().unwrap();
        assert_eq!(coal.commit, vec![1.0, 1.0]);
        assert!(schedule.storage_modes.is_empty());
    }

    #[test]
    fn test_rejects_mismatched_solution() {
        let mut sol = solved_schedule();
        sol.hours = 3;
        let err = fixed_schedule(&problem(), &sol, &UcSolverConfig::default()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_rejects_infeasible_solution() {
        let sol = UcSolution::without_schedule(SolveStatus::Infeasible, 2, 0, "");
        let err = marginal_prices(&problem(), &sol, &UcSolverConfig::default()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_price_range() {
        let prices = MarginalPrices {
            hourly: vec![20.0, 35.0, 25.0],
            objective: 0.0,
        };
        assert_eq!(prices.max(), 35.0);
        assert_eq!(prices.min(), 20.0);
        assert_eq!(prices.at(1), Some(35.0));
        assert_eq!(prices.at(3), None);
    }
}
