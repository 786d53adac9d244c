use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;
use tabwriter::TabWriter;
use tracing::{info, warn};
use ucs_algo::{solve, SolveStatus, UcProblem, UcSolution};
use ucs_cli::{resolve_solver_config, InputArgs, OutputFormat, SolverArgs};

use super::load_problem;

pub fn handle(
    input: &InputArgs,
    solver: &SolverArgs,
    out: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let problem = load_problem(input)?;
    let config = resolve_solver_config(solver)?;
    let solution = solve(&problem, &config).context("solving unit commitment")?;

    if solution.status == SolveStatus::LimitReached {
        warn!(
            "Time limit reached; schedule is feasible but may be suboptimal (gap <= {:?})",
            solution.mip_gap
        );
    }
    for (id, hours) in solution.simultaneous_storage() {
        warn!(
            "{} charges and discharges in the same hour ({} hours); use --exclusive-storage to forbid",
            id,
            hours.len()
        );
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&solution.to_json_value()?)?);
        }
        _ if !solution.is_feasible() => print_status(&solution),
        OutputFormat::Table => {
            print!("{}", solution.summary());
            print_dispatch_table(&problem, &solution)?;
        }
        OutputFormat::Csv => solution.write_csv(io::stdout().lock())?,
    }

    if let Some(path) = out {
        write_results(&solution, path)?;
    }
    Ok(())
}

pub fn print_status(solution: &UcSolution) {
    println!("status: {}", solution.status);
    if !solution.status_message.is_empty() {
        println!("{}", solution.status_message);
    }
}

fn write_results(solution: &UcSolution, path: &Path) -> Result<()> {
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        solution.to_json(path)?;
    } else {
        solution.to_csv(path)?;
    }
    info!("Results written to {}", path.display());
    Ok(())
}

/// Hour by unit table of output, storage shown as net output.
fn print_dispatch_table(problem: &UcProblem, solution: &UcSolution) -> Result<()> {
    let mut writer = TabWriter::new(io::stdout());
    let mut header = String::from("HOUR\tDEMAND");
    for g in &solution.generators {
        header.push('\t');
        header.push_str(g.id.as_str());
    }
    for s in &solution.storage {
        header.push_str(&format!("\t{}\tSOC {}", s.id, s.id));
    }
    writeln!(writer, "{header}")?;

    for t in 0..solution.hours {
        let mut row = format!("{}\t{:.2}", t + 1, problem.demand().at(t));
        for g in &solution.generators {
            let marker = if g.is_on(t) { "" } else { " (off)" };
            row.push_str(&format!("\t{:.2}{}", g.output(t), marker));
        }
        for s in &solution.storage {
            let soc = s
                .soc_at(t)
                .map(|soc| format!("{soc:.2}"))
                .unwrap_or_else(|| "-".to_string());
            row.push_str(&format!("\t{:.2}\t{}", s.net_output(t), soc));
        }
        writeln!(writer, "{row}")?;
    }
    writer.flush()?;
    Ok(())
}
