// ABOUTME: Configuration types and parsing for ctrscope.yml.
// ABOUTME: Handles YAML parsing, file discovery, and defaults for query settings.

use crate::error::{Error, Result};
use crate::ps::{PsOptions, SortKey};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "ctrscope.yml";
pub const CONFIG_FILENAME_ALT: &str = "ctrscope.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".ctrscope/config.yml";

const WORKERS_PER_CPU: usize = 3;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ps: PsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults for listing queries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PsConfig {
    /// Maximum concurrent batch reads. Derived from the CPU count when unset.
    #[serde(default)]
    pub workers: Option<usize>,

    /// procfs mount used for namespace lookups.
    #[serde(default)]
    pub proc_root: Option<PathBuf>,

    #[serde(default)]
    pub no_trunc: bool,

    #[serde(default)]
    pub sort: Option<SortKey>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub verbose: bool,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!("loading configuration from {}", path.display());
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    fn validate(&self) -> Result<()> {
        if self.ps.workers == Some(0) {
            return Err(Error::InvalidConfig(
                "ps.workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl PsConfig {
    /// Worker budget for batch reads.
    pub fn workers(&self) -> usize {
        self.workers.unwrap_or_else(default_workers)
    }

    /// Query options seeded from this config.
    pub fn options(&self) -> PsOptions {
        PsOptions {
            no_trunc: self.no_trunc,
            sort: self.sort,
            proc_root: self.proc_root.clone(),
            ..Default::default()
        }
    }
}

/// Three workers per available CPU, or three if the count is unknown.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        * WORKERS_PER_CPU
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert!(config.ps.workers.is_none());
        assert!(config.ps.workers() >= WORKERS_PER_CPU);
        assert!(!config.logging.verbose);
    }

    #[test]
    fn zero_workers_is_invalid() {
        let err = Config::from_yaml("ps:\n  workers: 0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn options_carry_display_defaults() {
        let config = Config::from_yaml(
            "ps:\n  no_trunc: true\n  sort: names\n  proc_root: /host/proc\n",
        )
        .unwrap();
        let opts = config.ps.options();
        assert!(opts.no_trunc);
        assert_eq!(opts.sort, Some(SortKey::Names));
        assert_eq!(opts.proc_root, Some(PathBuf::from("/host/proc")));
        assert!(!opts.all);
    }
}
