//! # ucs-io: Input Tables
//!
//! Loads the two delimited-text tables a commitment run needs:
//!
//! - **generators** - one row per unit, storage units flagged with
//!   `is_storage` (see [`generators`] for the column list)
//! - **demand** - `hour,demand` for hours `1..=T`
//!
//! Header names are trimmed and lowercased on load, so `P_Max` and `p_max`
//! are the same column. Missing required columns and bad values are reported
//! as [`ucs_core::UcsError::Validation`] naming the column or the row.
//!
//! ```rust,no_run
//! use ucs_io::{load_demand, load_generators};
//!
//! fn main() -> ucs_core::UcsResult<()> {
//!     let table = load_generators("generators.csv")?;
//!     let demand = load_demand("demand.csv")?;
//!     println!(
//!         "{} generators, {} storage units, {} hours",
//!         table.generators.len(),
//!         table.storage.len(),
//!         demand.hours()
//!     );
//!     Ok(())
//! }
//! ```

pub mod demand;
pub mod generators;
mod headers;

pub use demand::{load_demand, read_demand};
pub use generators::{load_generators, read_generators, GeneratorTable};
