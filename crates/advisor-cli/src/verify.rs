//! # Verify — Compliance checklist on saved metadata.
//!
//! Reads `model_metadata.json` only. Exits 1 when any check fails.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use advisor_governance::verify;

use crate::{print_json, render, CliContext, EXIT_GOVERNANCE, EXIT_OK};

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Directory holding the saved artifacts.
    #[arg(long)]
    pub artifact_dir: Option<PathBuf>,

    /// Print the compliance report as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run_verify(args: &VerifyArgs, ctx: &CliContext) -> Result<u8> {
    let store = ctx.store(args.artifact_dir.as_ref());
    let metadata = store
        .load_metadata()
        .with_context(|| format!("failed to read metadata from {}", store.dir().display()))?;
    let report = verify(&metadata);

    if args.json {
        print_json(&report)?;
    } else {
        println!("{}", render::compliance(&report));
    }
    Ok(if report.passed { EXIT_OK } else { EXIT_GOVERNANCE })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdvisorConfig;
    use advisor_governance::MetadataRecord;
    use advisor_service::ArtifactStore;

    fn write_metadata(dir: &std::path::Path, metadata: &MetadataRecord) {
        let store = ArtifactStore::new(dir);
        std::fs::write(store.metadata_path(), serde_json::to_vec(metadata).unwrap()).unwrap();
    }

    #[test]
    fn empty_metadata_fails_checklist() {
        let dir = tempfile::tempdir().unwrap();
        write_metadata(dir.path(), &MetadataRecord::default());
        let args = VerifyArgs {
            artifact_dir: Some(dir.path().to_path_buf()),
            json: true,
        };
        let code = run_verify(&args, &CliContext::new(AdvisorConfig::default())).unwrap();
        assert_eq!(code, EXIT_GOVERNANCE);
    }

    #[test]
    fn foreign_report_fields_still_verify() {
        let dir = tempfile::tempdir().unwrap();
        let json = serde_json::json!({
            "is_classical": true,
            "governance_status": advisor_governance::GOVERNANCE_STATUS,
            "human_review_required": true,
            "features": advisor_core::FEATURE_NAMES,
            "decision_boundaries": advisor_core::PolicyBoundaryTable::frozen(),
            "metrics": {"accuracy": 0.91},
            "training_date": "2024-05-01T10:00:00.123456"
        });
        let store = ArtifactStore::new(dir.path());
        std::fs::write(store.metadata_path(), serde_json::to_vec(&json).unwrap()).unwrap();
        let args = VerifyArgs {
            artifact_dir: Some(dir.path().to_path_buf()),
            json: true,
        };
        let code = run_verify(&args, &CliContext::new(AdvisorConfig::default())).unwrap();
        assert_eq!(code, crate::EXIT_OK);
    }

    #[test]
    fn missing_metadata_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = VerifyArgs {
            artifact_dir: Some(dir.path().to_path_buf()),
            json: false,
        };
        let err = run_verify(&args, &CliContext::new(AdvisorConfig::default())).unwrap_err();
        assert_eq!(crate::exit_code_for(&err), crate::EXIT_ERROR);
    }
}
