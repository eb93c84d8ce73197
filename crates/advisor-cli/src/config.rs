//! # CLI Configuration
//!
//! `AdvisorConfig` is read from a YAML file passed with `--config`. It only
//! names locations and dataset identity. Hyperparameters, the split seed and
//! the Policy Boundary Table are fixed and cannot be configured.
//!
//! ```yaml
//! artifact_dir: artifacts
//! dataset: data/claims.jsonl
//! dataset_type: synthetic
//! audit_log: logs/advisories.jsonl
//! ```
//!
//! Every field has a default, so no config file is required. Command-line
//! flags override the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use advisor_service::DEFAULT_DATASET_TYPE;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdvisorConfig {
    /// Directory holding model, codec, metadata and evaluation report.
    pub artifact_dir: PathBuf,
    /// Training dataset (JSON array or JSON Lines).
    pub dataset: PathBuf,
    /// Recorded as the dataset source in metadata. Defaults to the file stem.
    pub dataset_name: Option<String>,
    /// Recorded as `dataset_type` in metadata.
    pub dataset_type: String,
    /// JSON Lines file that predictions are appended to, if set.
    pub audit_log: Option<PathBuf>,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from("artifacts"),
            dataset: PathBuf::from("data/claims.jsonl"),
            dataset_name: None,
            dataset_type: DEFAULT_DATASET_TYPE.to_string(),
            audit_log: None,
        }
    }
}

impl AdvisorConfig {
    /// Read `path`, or return the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;
        tracing::debug!(config = ?config, "configuration loaded");
        Ok(config)
    }

    /// Artifact directory, with a command-line override.
    pub fn artifact_dir_or(&self, flag: Option<&PathBuf>) -> PathBuf {
        flag.cloned().unwrap_or_else(|| self.artifact_dir.clone())
    }

    /// Dataset path, with a command-line override.
    pub fn dataset_or(&self, flag: Option<&PathBuf>) -> PathBuf {
        flag.cloned().unwrap_or_else(|| self.dataset.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_file_means_defaults() {
        let config = AdvisorConfig::load(None).unwrap();
        assert_eq!(config, AdvisorConfig::default());
        assert_eq!(config.dataset_type, "synthetic");
        assert!(config.audit_log.is_none());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("advisor.yaml");
        std::fs::write(&path, "artifact_dir: /tmp/models\naudit_log: audit.jsonl\n").unwrap();
        let config = AdvisorConfig::load(Some(&path)).unwrap();
        assert_eq!(config.artifact_dir, PathBuf::from("/tmp/models"));
        assert_eq!(config.audit_log, Some(PathBuf::from("audit.jsonl")));
        assert_eq!(config.dataset, PathBuf::from("data/claims.jsonl"));
    }

    #[test]
    fn hyperparameters_are_not_configurable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("advisor.yaml");
        std::fs::write(&path, "max_depth: 12\n").unwrap();
        let err = AdvisorConfig::load(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("max_depth"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = AdvisorConfig::load(Some(Path::new("/nonexistent/advisor.yaml"))).unwrap_err();
        assert!(format!("{err}").contains("failed to read config"));
    }

    #[test]
    fn flags_override_config() {
        let config = AdvisorConfig::default();
        let flag = PathBuf::from("elsewhere");
        assert_eq!(config.artifact_dir_or(Some(&flag)), flag);
        assert_eq!(config.artifact_dir_or(None), PathBuf::from("artifacts"));
        assert_eq!(config.dataset_or(None), PathBuf::from("data/claims.jsonl"));
    }
}
