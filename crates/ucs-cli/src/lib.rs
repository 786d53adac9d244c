pub mod cli;
pub mod config;

pub use cli::{Cli, Commands, InputArgs, OutputFormat, SolverArgs};
pub use config::{load_config_file, resolve_solver_config, UcsConfigFile};
