//! # advisor-cli — Command Line for the Claims Severity Advisor
//!
//! Provides the `advisor` command-line interface over the library crates.
//!
//! ## Subcommands
//!
//! - `advisor synth` — Write a seeded synthetic claims dataset.
//! - `advisor train` — Governed training run; artifacts are written only
//!   when the compliance checklist passes.
//! - `advisor evaluate` — Re-evaluate saved artifacts and write the
//!   evaluation report.
//! - `advisor predict` — One advisory suggestion for a claim.
//! - `advisor demo` — The three reference claims, end to end.
//! - `advisor verify` — Run the compliance checklist on saved metadata.
//!
//! ```bash
//! advisor synth --rows 1000 --out data/claims.jsonl
//! advisor train --dataset data/claims.jsonl
//! advisor predict --claim-type Auto --damage-amount 2500 --risk-factor low
//! advisor evaluate --json
//! ```
//!
//! ## Exit Status
//!
//! | Code | Meaning |
//! |---|---|
//! | 0 | success |
//! | 1 | governance violation or failed checklist |
//! | 2 | any other error (bad input, missing or corrupt artifacts) |

pub mod audit_log;
pub mod config;
pub mod demo;
pub mod evaluate;
pub mod predict;
pub mod render;
pub mod synth;
pub mod train;
pub mod verify;

use std::path::PathBuf;
use std::sync::Arc;

use advisor_core::{GovernanceViolationError, PolicyBoundaryTable};
use advisor_service::{ArtifactStore, Dataset, ServiceError};
use anyhow::Context;

use crate::config::AdvisorConfig;

pub const EXIT_OK: u8 = 0;
pub const EXIT_GOVERNANCE: u8 = 1;
pub const EXIT_ERROR: u8 = 2;

/// State shared by every subcommand.
#[derive(Debug, Clone)]
pub struct CliContext {
    pub config: AdvisorConfig,
    pub boundaries: Arc<PolicyBoundaryTable>,
}

impl CliContext {
    pub fn new(config: AdvisorConfig) -> Self {
        Self {
            config,
            boundaries: Arc::new(PolicyBoundaryTable::frozen()),
        }
    }

    /// Artifact store at the configured directory, or at `flag` if given.
    pub fn store(&self, flag: Option<&PathBuf>) -> ArtifactStore {
        ArtifactStore::new(self.config.artifact_dir_or(flag))
    }

    /// Load the configured dataset, or `flag` if given, applying the
    /// configured source name.
    pub fn dataset(&self, flag: Option<&PathBuf>) -> anyhow::Result<Dataset> {
        let path = self.config.dataset_or(flag);
        let dataset = Dataset::load(&path)
            .with_context(|| format!("failed to load dataset: {}", path.display()))?;
        Ok(match &self.config.dataset_name {
            Some(name) => dataset.with_name(name),
            None => dataset,
        })
    }
}

/// Map a failed command to its exit status.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    let governance = err.chain().any(|cause| {
        cause.downcast_ref::<GovernanceViolationError>().is_some()
            || cause
                .downcast_ref::<ServiceError>()
                .is_some_and(ServiceError::is_governance)
    });
    if governance {
        EXIT_GOVERNANCE
    } else {
        EXIT_ERROR
    }
}

/// Print `value` as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
