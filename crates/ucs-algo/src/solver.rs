//! Commitment solve driver

use crate::formulation::{build_model, CommitmentMode, GeneratorVars, StorageVars};
use crate::solution::{
    GeneratorSchedule, SolveStatus, StorageSchedule, UcSolution, UnitCommitment, ZERO_TOLERANCE,
};
use crate::{UcProblem, UcSolverConfig};
use good_lp::solvers::SolutionStatus;
use good_lp::{ResolutionError, Solution, SolverModel};
use std::time::Instant;
use tracing::{debug, info, warn};
use ucs_core::{DemandSeries, Generator, StorageUnit, UcsError, UcsResult};

/// Solve the unit commitment problem.
///
/// Infeasible and unbounded models are reported through
/// [`UcSolution::status`]; only solver malfunctions and invalid configuration
/// return `Err`.
///
/// When the time limit stops the search, a second LP (the relaxation used to
/// bound the gap) runs with a quarter of the configured limit, so the call
/// can take up to 1.25 times `time_limit_seconds`.
///
/// # Example
///
/// ```no_run
/// use ucs_algo::{solve, UcProblemBuilder, UcSolverConfig};
/// use ucs_core::Generator;
///
/// let problem = UcProblemBuilder::new()
///     .generator(Generator::new("nuclear", 0.0, 1000.0, 50.0))
///     .demand(vec![600.0; 24])
///     .build()?;
/// let solution = solve(&problem, &UcSolverConfig::default())?;
/// println!("{}", solution.summary());
/// # Ok::<(), ucs_core::UcsError>(())
/// ```
pub fn solve(problem: &UcProblem, config: &UcSolverConfig) -> UcsResult<UcSolution> {
    config.validate()?;
    let start = Instant::now();

    let built = build_model(problem, CommitmentMode::Integer, config);
    info!(
        "Unit commitment: {} hours, {} generators, {} storage units ({} variables, {} constraints)",
        problem.hours(),
        problem.generators().len(),
        problem.storage().len(),
        built.num_variables,
        built.num_constraints
    );
    debug!(
        "mip_gap={}, time_limit={:?}, exclusive_storage={}",
        config.mip_gap, config.time_limit_seconds, config.exclusive_storage
    );

    let solved = match built.model.solve() {
        Ok(solved) => solved,
        Err(ResolutionError::Infeasible) => {
            let elapsed = start.elapsed().as_millis() as u64;
            warn!("Unit commitment infeasible after {}ms", elapsed);
            return Ok(UcSolution::without_schedule(
                SolveStatus::Infeasible,
                problem.hours(),
                elapsed,
                infeasibility_hint(problem),
            ));
        }
        Err(ResolutionError::Unbounded) => {
            let elapsed = start.elapsed().as_millis() as u64;
            warn!("Unit commitment unbounded after {}ms", elapsed);
            return Ok(UcSolution::without_schedule(
                SolveStatus::Unbounded,
                problem.hours(),
                elapsed,
                "objective is unbounded below",
            ));
        }
        Err(e) => return Err(UcsError::Solver(format!("HiGHS failed: {e}"))),
    };

    let status = match solved.status() {
        SolutionStatus::TimeLimit => SolveStatus::LimitReached,
        _ => SolveStatus::Optimal,
    };

    let generators = extract_generators(problem, &built.generators, &solved);
    let storage = extract_storage(problem, &built.storage, &solved);
    let energy_cost = solved.eval(built.energy_cost.clone());
    let startup_cost = solved.eval(built.startup_cost.clone());
    let objective = energy_cost + startup_cost;

    let mip_gap = match status {
        SolveStatus::Optimal if !problem.has_integer_decisions(config.exclusive_storage) => {
            Some(0.0)
        }
        SolveStatus::Optimal => Some(config.mip_gap),
        _ => relaxation_bound(problem, config).map(|bound| relative_gap(objective, bound)),
    };

    let solve_time_ms = start.elapsed().as_millis() as u64;
    let status_message = match status {
        SolveStatus::LimitReached => "time limit reached with a feasible schedule".to_string(),
        _ => "optimal within the configured gap".to_string(),
    };
    info!(
        "Unit commitment finished: status={}, objective={:.4}, time={}ms",
        status, objective, solve_time_ms
    );

    let solution = UcSolution {
        status,
        objective: Some(objective),
        energy_cost,
        startup_cost,
        mip_gap,
        hours: problem.hours(),
        generators,
        storage,
        solve_time_ms,
        status_message,
    };

    for (id, hours) in solution.simultaneous_storage() {
        debug!("{} charges and discharges together in {} hours", id, hours.len());
    }

    Ok(solution)
}

/// Validate the units and demand, then solve with default settings and the
/// given relative gap.
pub fn solve_units(
    generators: Vec<Generator>,
    storage: Vec<StorageUnit>,
    demand: DemandSeries,
    mip_gap: f64,
) -> UcsResult<UcSolution> {
    let problem = UcProblem::new(generators, storage, demand)?;
    solve(&problem, &UcSolverConfig::default().with_mip_gap(mip_gap))
}

/// Share of the MILP time limit given to the relaxation.
const RELAXATION_TIME_SHARE: f64 = 0.25;

/// Objective of the LP relaxation, a lower bound on the optimal cost.
fn relaxation_bound(problem: &UcProblem, config: &UcSolverConfig) -> Option<f64> {
    let mut relaxed_config = config.clone();
    relaxed_config.time_limit_seconds = config
        .time_limit_seconds
        .map(|limit| limit * RELAXATION_TIME_SHARE);
    let relaxed = build_model(problem, CommitmentMode::Relaxed, &relaxed_config);
    match relaxed.model.solve() {
        Ok(solved) => {
            let objective = relaxed.energy_cost + relaxed.startup_cost;
            proven_bound(solved.status(), solved.eval(objective))
        }
        Err(e) => {
            warn!("LP relaxation failed, gap unavailable: {}", e);
            None
        }
    }
}

/// Only a relaxation solved to optimality bounds the MILP from below.
fn proven_bound(status: SolutionStatus, objective: f64) -> Option<f64> {
    match status {
        SolutionStatus::Optimal => Some(objective),
        _ => {
            warn!("LP relaxation stopped early, gap unavailable");
            None
        }
    }
}

fn relative_gap(objective: f64, bound: f64) -> f64 {
    if objective.abs() < ZERO_TOLERANCE {
        return 0.0;
    }
    ((objective - bound) / objective.abs()).max(0.0)
}

fn infeasibility_hint(problem: &UcProblem) -> String {
    let capacity = problem.installed_capacity()
        + problem
            .storage()
            .iter()
            .map(|s| s.power_capacity.value())
            .sum::<f64>();
    let peak = problem.demand().peak();
    if peak > capacity + ZERO_TOLERANCE {
        format!("peak demand {peak:.2} MW exceeds installed capacity {capacity:.2} MW")
    } else {
        "no schedule satisfies every constraint".to_string()
    }
}

fn snap(value: f64) -> f64 {
    if value.abs() < ZERO_TOLERANCE {
        0.0
    } else {
        value
    }
}

fn extract_generators(
    problem: &UcProblem,
    vars: &[GeneratorVars],
    solved: &impl Solution,
) -> Vec<GeneratorSchedule> {
    problem
        .generators()
        .iter()
        .zip(vars)
        .map(|(unit, gv)| {
            let generation = gv.gen.iter().map(|&v| snap(solved.value(v))).collect();
            let commitment = gv.commitment.as_ref().map(|c| {
                let flags = |exprs: &[good_lp::Expression]| -> Vec<bool> {
                    exprs.iter().map(|e| solved.eval(e.clone()) > 0.5).collect()
                };
                UnitCommitment {
                    on: flags(&c.commit[..]),
                    startup: flags(&c.startup[..]),
                    shutdown: flags(&c.shutdown[..]),
                }
            });
            GeneratorSchedule {
                id: unit.id.clone(),
                generation,
                commitment,
            }
        })
        .collect()
}

fn extract_storage(
    problem: &UcProblem,
    vars: &[StorageVars],
    solved: &impl Solution,
) -> Vec<StorageSchedule> {
    let values = |vs: &[good_lp::Variable]| -> Vec<f64> {
        vs.iter().map(|&v| snap(solved.value(v))).collect()
    };
    problem
        .storage()
        .iter()
        .zip(vars)
        .map(|(unit, sv)| StorageSchedule {
            id: unit.id.clone(),
            charge: values(&sv.charge[..]),
            discharge: values(&sv.discharge[..]),
            state_of_charge: values(&sv.soc[..]),
        })
        .collect()
}
