//! Solver settings from a TOML file plus command-line overrides
//!
//! ```toml
//! [solver]
//! mip_gap = 0.005
//! time_limit_seconds = 60.0
//! exclusive_storage = true
//! ```

use crate::cli::SolverArgs;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use ucs_algo::UcSolverConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UcsConfigFile {
    #[serde(default)]
    pub solver: UcSolverConfig,
}

pub fn load_config_file(path: &Path) -> Result<UcsConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let config: UcsConfigFile = toml::from_str(&contents)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    Ok(config)
}

/// File settings (or defaults) with flags applied on top, validated.
pub fn resolve_solver_config(args: &SolverArgs) -> Result<UcSolverConfig> {
    let mut config = match &args.config {
        Some(path) => load_config_file(path)?.solver,
        None => UcSolverConfig::default(),
    };
    if let Some(gap) = args.mip_gap {
        config.mip_gap = gap;
    }
    if let Some(limit) = args.time_limit {
        config.time_limit_seconds = Some(limit);
    }
    if args.exclusive_storage {
        config.exclusive_storage = true;
    }
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_without_file() {
        let config = resolve_solver_config(&SolverArgs::default()).unwrap();
        assert_eq!(config.mip_gap, ucs_algo::DEFAULT_MIP_GAP);
        assert!(!config.exclusive_storage);
    }

    #[test]
    fn test_flags_override_file() {
        let file = config_file("[solver]\nmip_gap = 0.02\ntime_limit_seconds = 30.0\n");
        let args = SolverArgs {
            config: Some(file.path().to_path_buf()),
            mip_gap: Some(0.001),
            ..SolverArgs::default()
        };
        let config = resolve_solver_config(&args).unwrap();
        assert_eq!(config.mip_gap, 0.001);
        assert_eq!(config.time_limit_seconds, Some(30.0));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let file = config_file("[solver]\ngap = 0.02\n");
        let args = SolverArgs {
            config: Some(file.path().to_path_buf()),
            ..SolverArgs::default()
        };
        assert!(resolve_solver_config(&args).is_err());
    }

    #[test]
    fn test_invalid_gap_rejected() {
        let args = SolverArgs {
            mip_gap: Some(1.5),
            ..SolverArgs::default()
        };
        let err = resolve_solver_config(&args).unwrap_err();
        assert!(err.to_string().contains("gap"));
    }
}
