use clap::Parser;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::FmtSubscriber;
use ucs_cli::{Cli, Commands};

mod commands;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: a global tracing subscriber was already installed");
    }

    let result = match &cli.command {
        Commands::Solve {
            input,
            solver,
            out,
            format,
        } => commands::solve::handle(input, solver, out.as_deref(), *format),
        Commands::Validate { input } => commands::validate::handle(input),
        Commands::Prices {
            input,
            solver,
            out,
            format,
        } => commands::prices::handle(input, solver, out.as_deref(), *format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
