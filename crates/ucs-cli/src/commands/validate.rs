use anyhow::Result;
use tracing::warn;
use ucs_cli::InputArgs;

use super::load_problem;

pub fn handle(input: &InputArgs) -> Result<()> {
    let problem = load_problem(input)?;

    let storage_power: f64 = problem
        .storage()
        .iter()
        .map(|s| s.power_capacity.value())
        .sum();
    let capacity = problem.installed_capacity();
    let peak = problem.demand().peak();

    println!("generators: {}", problem.generators().len());
    println!("storage units: {}", problem.storage().len());
    println!("hours: {}", problem.hours());
    println!("installed capacity: {capacity:.2} MW (+{storage_power:.2} MW storage)");
    println!("peak demand: {peak:.2} MW");
    println!("total demand: {:.2} MWh", problem.demand().total_energy());

    if peak > capacity + storage_power {
        warn!(
            "Peak demand {:.2} MW exceeds total capacity {:.2} MW; the model will be infeasible",
            peak,
            capacity + storage_power
        );
    }
    println!("inputs are valid");
    Ok(())
}
