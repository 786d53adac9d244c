//! MILP formulation
//!
//! One builder serves three models that differ only in how the commitment
//! decisions enter:
//!
//! | Mode | Decisions | Used by |
//! |------|-----------|---------|
//! | [`CommitmentMode::Integer`] | binary | [`crate::solve`] |
//! | [`CommitmentMode::Relaxed`] | continuous in `[0, 1]` | gap bound when a limit is hit |
//! | [`CommitmentMode::Fixed`] | constants from a solved model | [`crate::marginal_prices`] |
//!
//! ```text
//! minimise   Σ_g Σ_t c_g · gen[g,t]  +  Σ_g Σ_t SU_g · startup[g,t]
//!
//! s.t.  Σ_g gen[g,t] + Σ_s (discharge[s,t] − charge[s,t]) = demand[t]         ∀t
//!       p_min_g · commit[g,t] ≤ gen[g,t] ≤ p_max_g · commit[g,t]              ∀g committable, t
//!       commit[g,t] − commit[g,t−1] = startup[g,t] − shutdown[g,t]            ∀g, t ≥ 2
//!       Σ_{τ=t−UT+1..t} startup[g,τ] ≤ commit[g,t]                            (min up)
//!       Σ_{τ=t−DT+1..t} shutdown[g,τ] ≤ 1 − commit[g,t]                       (min down)
//!       soc[s,t] = soc[s,t−1] + η_c · charge[s,t] − discharge[s,t] / η_d      (soc[s,0] = start)
//!       soc[s,T] = start_charge[s]
//!       0 ≤ charge, discharge ≤ P_s      0 ≤ soc ≤ E_s
//! ```
//!
//! When the unit's initial status is known the transition equation also
//! applies at t = 1 against that status.

use crate::{UcProblem, UcSolverConfig};
use good_lp::solvers::highs::{highs, HighsProblem};
use good_lp::constraint::ConstraintReference;
use good_lp::{
    constraint, variable, variables, Expression, ProblemVariables,
    SolverModel, Variable,
};

/// How commitment and storage-mode decisions enter the model.
#[derive(Debug, Clone, Copy)]
pub(crate) enum CommitmentMode<'a> {
    Integer,
    Relaxed,
    Fixed(&'a CommitmentSchedule),
}

/// Commitment decisions for one unit, as 0/1 values per hour.
#[derive(Debug, Clone)]
pub(crate) struct FixedCommitment {
    pub commit: Vec<f64>,
    pub startup: Vec<f64>,
    pub shutdown: Vec<f64>,
}

/// Decisions taken from a solved model.
#[derive(Debug, Clone, Default)]
pub(crate) struct CommitmentSchedule {
    /// One entry per generator; `None` for non-committable units
    pub generators: Vec<Option<FixedCommitment>>,
    /// One entry per storage unit; 1.0 where charging is allowed
    pub storage_modes: Vec<Vec<f64>>,
}

pub(crate) struct CommitmentVars {
    pub commit: Vec<Expression>,
    pub startup: Vec<Expression>,
    pub shutdown: Vec<Expression>,
}

pub(crate) struct GeneratorVars {
    pub gen: Vec<Variable>,
    pub commitment: Option<CommitmentVars>,
}

pub(crate) struct StorageVars {
    pub charge: Vec<Variable>,
    pub discharge: Vec<Variable>,
    pub soc: Vec<Variable>,
    pub mode: Option<Vec<Expression>>,
}

/// A built model ready to solve, with handles for reading the result back.
pub(crate) struct UcModel {
    pub model: HighsProblem,
    pub generators: Vec<GeneratorVars>,
    pub storage: Vec<StorageVars>,
    /// Energy balance rows, one per hour
    pub balance: Vec<ConstraintReference>,
    pub energy_cost: Expression,
    pub startup_cost: Expression,
    pub num_variables: usize,
    pub num_constraints: usize,
}

fn decision(
    vars: &mut ProblemVariables,
    mode: CommitmentMode<'_>,
    count: &mut usize,
    fixed: impl FnOnce(&CommitmentSchedule) -> f64,
) -> Expression {
    match mode {
        CommitmentMode::Integer => {
            *count += 1;
            Expression::from(vars.add(variable().binary()))
        }
        CommitmentMode::Relaxed => {
            *count += 1;
            Expression::from(vars.add(variable().min(0.0).max(1.0)))
        }
        CommitmentMode::Fixed(schedule) => Expression::from(fixed(schedule)),
    }
}

fn fixed_value(values: Option<&Vec<f64>>, t: usize) -> f64 {
    values.and_then(|v| v.get(t)).copied().unwrap_or(0.0)
}

fn fixed_commitment(schedule: &CommitmentSchedule, g: usize) -> Option<&FixedCommitment> {
    schedule.generators.get(g).and_then(Option::as_ref)
}

/// Build the commitment model for `problem`.
pub(crate) fn build_model(
    problem: &UcProblem,
    mode: CommitmentMode<'_>,
    config: &UcSolverConfig,
) -> UcModel {
    let hours = problem.hours();
    let mut vars = variables!();
    let mut num_variables = 0;

    // === Generator variables ===
    let mut generators = Vec::with_capacity(problem.generators().len());
    for (g, unit) in problem.generators().iter().enumerate() {
        let gen: Vec<Variable> = (0..hours)
            .map(|_| {
                let bounds = if unit.committable {
                    variable().min(0.0).max(unit.p_max.value())
                } else {
                    variable().min(unit.p_min.value()).max(unit.p_max.value())
                };
                vars.add(bounds)
            })
            .collect();
        num_variables += hours;

        let commitment = unit.committable.then(|| {
            let mut commit = Vec::with_capacity(hours);
            let mut startup = Vec::with_capacity(hours);
            let mut shutdown = Vec::with_capacity(hours);
            for t in 0..hours {
                commit.push(decision(&mut vars, mode, &mut num_variables, |s| {
                    fixed_value(fixed_commitment(s, g).map(|f| &f.commit), t)
                }));
                startup.push(decision(&mut vars, mode, &mut num_variables, |s| {
                    fixed_value(fixed_commitment(s, g).map(|f| &f.startup), t)
                }));
                shutdown.push(decision(&mut vars, mode, &mut num_variables, |s| {
                    fixed_value(fixed_commitment(s, g).map(|f| &f.shutdown), t)
                }));
            }
            CommitmentVars {
                commit,
                startup,
                shutdown,
            }
        });

        generators.push(GeneratorVars { gen, commitment });
    }

    // === Storage variables ===
    let mut storage = Vec::with_capacity(problem.storage().len());
    for (s, unit) in problem.storage().iter().enumerate() {
        let power = unit.power_capacity.value();
        let energy = unit.energy_capacity.value();
        let charge = vars.add_vector(variable().min(0.0).max(power), hours);
        let discharge = vars.add_vector(variable().min(0.0).max(power), hours);
        let soc = vars.add_vector(variable().min(0.0).max(energy), hours);
        num_variables += 3 * hours;

        let mode_vars = config.exclusive_storage.then(|| {
            (0..hours)
                .map(|t| {
                    decision(&mut vars, mode, &mut num_variables, |sched| {
                        fixed_value(sched.storage_modes.get(s), t)
                    })
                })
                .collect::<Vec<_>>()
        });

        storage.push(StorageVars {
            charge,
            discharge,
            soc,
            mode: mode_vars,
        });
    }

    // === Objective ===
    let mut energy_cost = Expression::from(0.0);
    let mut startup_cost = Expression::from(0.0);
    for (unit, gv) in problem.generators().iter().zip(&generators) {
        for &gen in &gv.gen {
            energy_cost += unit.variable_cost * gen;
        }
        if let Some(c) = &gv.commitment {
            if unit.startup_cost > 0.0 {
                for su in &c.startup {
                    startup_cost += unit.startup_cost * su.clone();
                }
            }
        }
    }

    let mut model = vars
        .minimise(energy_cost.clone() + startup_cost.clone())
        .using(highs);
    model.set_verbose(config.verbose);
    if matches!(mode, CommitmentMode::Integer) {
        model = model.set_option("mip_rel_gap", config.mip_gap);
    }
    if let Some(limit) = config.time_limit_seconds {
        model = model.set_option("time_limit", limit);
    }
    if let Some(threads) = config.threads.and_then(|t| i32::try_from(t).ok()) {
        model = model.set_option("threads", threads);
    }

    let mut num_constraints = 0;
    let decisions_free = !matches!(mode, CommitmentMode::Fixed(_));

    // === Commitment coupling, transitions, min up/down ===
    for (unit, gv) in problem.generators().iter().zip(&generators) {
        let Some(c) = &gv.commitment else {
            continue;
        };
        let p_min = unit.p_min.value();
        let p_max = unit.p_max.value();

        for t in 0..hours {
            let gen = gv.gen[t];
            let upper = p_max * c.commit[t].clone();
            let lower = p_min * c.commit[t].clone();
            model = model.with(constraint!(gen <= upper));
            model = model.with(constraint!(gen >= lower));
            num_constraints += 2;
        }

        // Transitions only link decision variables; with fixed decisions they
        // would be constant rows.
        if !decisions_free {
            continue;
        }

        for t in 0..hours {
            let change = if t == 0 {
                match unit.initial_status {
                    Some(on) => c.commit[0].clone() - if on { 1.0 } else { 0.0 },
                    None => continue,
                }
            } else {
                c.commit[t].clone() - c.commit[t - 1].clone()
            };
            let switch = c.startup[t].clone() - c.shutdown[t].clone();
            model = model.with(constraint!(change == switch));
            num_constraints += 1;
        }

        // A unit cannot start and stop in the same hour.
        for t in 0..hours {
            let switches = c.startup[t].clone() + c.shutdown[t].clone();
            model = model.with(constraint!(switches <= 1.0));
            num_constraints += 1;
        }

        if unit.min_up_hours > 1 {
            for t in 0..hours {
                let first = (t + 1).saturating_sub(unit.min_up_hours);
                let recent_starts: Expression =
                    (first..=t).map(|tau| c.startup[tau].clone()).sum();
                let on = c.commit[t].clone();
                model = model.with(constraint!(recent_starts <= on));
                num_constraints += 1;
            }
        }

        if unit.min_down_hours > 1 {
            for t in 0..hours {
                let first = (t + 1).saturating_sub(unit.min_down_hours);
                let recent_stops: Expression =
                    (first..=t).map(|tau| c.shutdown[tau].clone()).sum();
                let off = 1.0 - c.commit[t].clone();
                model = model.with(constraint!(recent_stops <= off));
                num_constraints += 1;
            }
        }
    }

    // === Storage state of charge ===
    for (unit, sv) in problem.storage().iter().zip(&storage) {
        let eta_c = unit.charge_efficiency;
        let eta_d = unit.discharge_efficiency;
        let start = unit.start_charge.value();

        for t in 0..hours {
            let previous = if t == 0 {
                Expression::from(start)
            } else {
                Expression::from(sv.soc[t - 1])
            };
            let soc = sv.soc[t];
            let next = previous + eta_c * sv.charge[t] - (1.0 / eta_d) * sv.discharge[t];
            model = model.with(constraint!(soc == next));
            num_constraints += 1;
        }

        let terminal = sv.soc[hours - 1];
        model = model.with(constraint!(terminal == start));
        num_constraints += 1;

        if let Some(modes) = &sv.mode {
            let power = unit.power_capacity.value();
            for t in 0..hours {
                let charge = sv.charge[t];
                let discharge = sv.discharge[t];
                let charge_cap = power * modes[t].clone();
                let discharge_cap = power - power * modes[t].clone();
                model = model.with(constraint!(charge <= charge_cap));
                model = model.with(constraint!(discharge <= discharge_cap));
                num_constraints += 2;
            }
        }
    }

    // === Energy balance ===
    let mut balance = Vec::with_capacity(hours);
    for t in 0..hours {
        let mut supply = Expression::from(0.0);
        for gv in &generators {
            supply += gv.gen[t];
        }
        for sv in &storage {
            supply += sv.discharge[t];
            supply -= sv.charge[t];
        }
        let demand = problem.demand().at(t);
        balance.push(model.add_constraint(constraint!(supply == demand)));
        num_constraints += 1;
    }

    UcModel {
        model,
        generators,
        storage,
        balance,
        energy_cost,
        startup_cost,
        num_variables,
        num_constraints,
    }
}
