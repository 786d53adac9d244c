use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ucs",
    author,
    version,
    about = "Unit commitment with pumped-hydro storage",
    long_about = None
)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Solve the commitment problem and report the schedule
    Solve {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        solver: SolverArgs,
        /// Also write results to this file (.json for JSON, anything else for tidy CSV)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
        /// Format printed to stdout
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Load and validate the input tables without solving
    Validate {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Solve, then report hourly marginal prices with the commitment held fixed
    Prices {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        solver: SolverArgs,
        /// Also write `hour,price` rows to this file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
        /// Format printed to stdout
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Generator table (CSV, storage rows flagged with is_storage)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub generators: PathBuf,
    /// Demand table (CSV with hour,demand)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub demand: PathBuf,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SolverArgs {
    /// Solver settings file (TOML, `[solver]` table)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// Relative MIP gap; overrides the config file
    #[arg(long)]
    pub mip_gap: Option<f64>,
    /// Solver time limit in seconds; overrides the config file
    #[arg(long)]
    pub time_limit: Option<f64>,
    /// Forbid charging and discharging a storage unit in the same hour
    #[arg(long)]
    pub exclusive_storage: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned text table
    #[default]
    Table,
    Json,
    /// Tidy CSV
    Csv,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_solver_flags_parse() {
        let cli = Cli::parse_from([
            "ucs",
            "solve",
            "--generators",
            "g.csv",
            "--demand",
            "d.csv",
            "--mip-gap",
            "0.05",
            "--exclusive-storage",
            "--format",
            "json",
        ]);
        match cli.command {
            Commands::Solve { solver, format, .. } => {
                assert_eq!(solver.mip_gap, Some(0.05));
                assert!(solver.exclusive_storage);
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
