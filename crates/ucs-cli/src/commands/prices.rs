use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use tabwriter::TabWriter;
use tracing::info;
use ucs_algo::{marginal_prices, solve, MarginalPrices, SolveStatus, UcProblem};
use ucs_cli::{resolve_solver_config, InputArgs, OutputFormat, SolverArgs};

use super::load_problem;
use super::solve::print_status;

#[derive(Debug, Serialize)]
struct PricesOutput<'a> {
    status: SolveStatus,
    objective: Option<f64>,
    prices: Option<&'a [f64]>,
}

pub fn handle(
    input: &InputArgs,
    solver: &SolverArgs,
    out: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let problem = load_problem(input)?;
    let config = resolve_solver_config(solver)?;
    let solution = solve(&problem, &config).context("solving unit commitment")?;

    if !solution.is_feasible() {
        match format {
            OutputFormat::Json => {
                let output = PricesOutput {
                    status: solution.status,
                    objective: None,
                    prices: None,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            _ => print_status(&solution),
        }
        return Ok(());
    }

    let prices = marginal_prices(&problem, &solution, &config)
        .context("computing marginal prices")?;

    match format {
        OutputFormat::Table => print_price_table(&problem, &prices)?,
        OutputFormat::Json => {
            let output = PricesOutput {
                status: solution.status,
                objective: solution.objective,
                prices: Some(prices.hourly.as_slice()),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Csv => prices.write_csv(io::stdout().lock())?,
    }

    if let Some(path) = out {
        prices.to_csv(path)?;
        info!("Prices written to {}", path.display());
    }
    Ok(())
}

fn print_price_table(problem: &UcProblem, prices: &MarginalPrices) -> Result<()> {
    println!("Marginal prices with commitment fixed ($/MWh)");
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "HOUR\tDEMAND\tPRICE")?;
    for (t, price) in prices.hourly.iter().enumerate() {
        writeln!(
            writer,
            "{}\t{:.2}\t{:.2}",
            t + 1,
            problem.demand().at(t),
            price
        )?;
    }
    writer.flush()?;
    Ok(())
}
