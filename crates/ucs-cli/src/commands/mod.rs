pub mod prices;
pub mod solve;
pub mod validate;

use anyhow::{Context, Result};
use tracing::info;
use ucs_algo::UcProblem;
use ucs_cli::InputArgs;
use ucs_io::{load_demand, load_generators};

/// Load both input tables and build a validated problem.
pub fn load_problem(input: &InputArgs) -> Result<UcProblem> {
    let table = load_generators(&input.generators)
        .with_context(|| format!("loading generators from {}", input.generators.display()))?;
    let demand = load_demand(&input.demand)
        .with_context(|| format!("loading demand from {}", input.demand.display()))?;
    let problem = UcProblem::new(table.generators, table.storage, demand)
        .context("validating commitment problem")?;
    info!(
        "Loaded {} generators, {} storage units, {} hours",
        problem.generators().len(),
        problem.storage().len(),
        problem.hours()
    );
    Ok(problem)
}
