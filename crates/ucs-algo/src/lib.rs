//! Unit commitment with pumped-hydro storage.
//!
//! The model chooses hourly on/off status and output for each generator and
//! charge/discharge for each storage unit so that demand is met at minimum
//! energy plus startup cost. It is built with `good_lp` and solved by HiGHS.
//!
//! ## Quick start
//!
//! ```no_run
//! use ucs_algo::{marginal_prices, solve, UcProblemBuilder, UcSolverConfig};
//! use ucs_core::{Generator, StorageUnit};
//!
//! let problem = UcProblemBuilder::new()
//!     .generator(Generator::new("gas", 50.0, 400.0, 45.0).with_startup_cost(2000.0))
//!     .storage(StorageUnit::new("phs", 100.0))
//!     .demand(vec![250.0, 380.0, 300.0])
//!     .build()?;
//!
//! let config = UcSolverConfig::default();
//! let solution = solve(&problem, &config)?;
//! let prices = marginal_prices(&problem, &solution, &config)?;
//! # Ok::<(), ucs_core::UcsError>(())
//! ```

pub mod config;
mod export;
mod formulation;
pub mod pricing;
pub mod problem;
pub mod solution;
pub mod solver;

pub use config::{UcSolverConfig, DEFAULT_MIP_GAP};
pub use pricing::{marginal_prices, MarginalPrices};
pub use problem::{UcProblem, UcProblemBuilder, UnitIndex};
pub use solution::{
    CostBreakdown, DispatchRecord, DispatchVariable, GeneratorSchedule, SolveStatus,
    StorageSchedule, UcSolution, UnitCommitment,
};
pub use solver::{solve, solve_units};
