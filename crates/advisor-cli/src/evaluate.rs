//! # Evaluate — Re-evaluate saved artifacts.
//!
//! Loads the saved model and codec, re-creates the held-out split from the
//! dataset, and writes `evaluation_report.json` next to the artifacts. The
//! report includes the compliance checklist; a failing checklist exits 1
//! after the report is written.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use advisor_service::evaluate_saved;

use crate::{print_json, render, CliContext, EXIT_GOVERNANCE, EXIT_OK};

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Dataset the model was trained on.
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Directory holding the saved artifacts.
    #[arg(long)]
    pub artifact_dir: Option<PathBuf>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run_evaluate(args: &EvaluateArgs, ctx: &CliContext) -> Result<u8> {
    let dataset = ctx.dataset(args.dataset.as_ref())?;
    let store = ctx.store(args.artifact_dir.as_ref());

    let report = evaluate_saved(&store, &dataset, &ctx.boundaries).context("evaluation failed")?;
    let path = store.save_report(&report).context("failed to save evaluation report")?;

    if args.json {
        print_json(&report)?;
    } else {
        println!("{}", render::evaluation(&report));
        println!();
        println!("Report saved to {}", path.display());
    }

    if report.governance_compliance.passed {
        Ok(EXIT_OK)
    } else {
        tracing::error!(
            failed = ?report.governance_compliance.failed_checks(),
            "saved model fails the governance checklist"
        );
        Ok(EXIT_GOVERNANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdvisorConfig;
    use crate::train::{run_train, TrainArgs};
    use advisor_governance::MetadataRecord;
    use advisor_service::{write_jsonl, ArtifactStore, SyntheticClaims};

    fn trained(dir: &std::path::Path) -> (PathBuf, PathBuf) {
        let data = dir.join("claims.jsonl");
        write_jsonl(&data, &SyntheticClaims::new(300, 7).generate().unwrap()).unwrap();
        let artifacts = dir.join("artifacts");
        let args = TrainArgs {
            dataset: Some(data.clone()),
            artifact_dir: Some(artifacts.clone()),
            json: true,
        };
        run_train(&args, &CliContext::new(AdvisorConfig::default())).unwrap();
        (data, artifacts)
    }

    #[test]
    fn writes_report_for_compliant_model() {
        let dir = tempfile::tempdir().unwrap();
        let (data, artifacts) = trained(dir.path());
        let args = EvaluateArgs {
            dataset: Some(data),
            artifact_dir: Some(artifacts.clone()),
            json: true,
        };
        let code = run_evaluate(&args, &CliContext::new(AdvisorConfig::default())).unwrap();
        assert_eq!(code, EXIT_OK);
        let store = ArtifactStore::new(&artifacts);
        let report = store.load_report().unwrap();
        let split = store.load_metadata().unwrap().metrics.unwrap().split;
        assert_eq!(report.test_samples, split.test);
        assert!(report.governance_compliance.passed);
    }

    #[test]
    fn non_compliant_metadata_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let (data, artifacts) = trained(dir.path());
        let store = ArtifactStore::new(&artifacts);
        let mut metadata: MetadataRecord = store.load_metadata().unwrap();
        metadata.human_review_required = Some(false);
        std::fs::write(
            store.metadata_path(),
            serde_json::to_vec_pretty(&metadata).unwrap(),
        )
        .unwrap();

        let args = EvaluateArgs {
            dataset: Some(data),
            artifact_dir: Some(artifacts),
            json: false,
        };
        let code = run_evaluate(&args, &CliContext::new(AdvisorConfig::default())).unwrap();
        assert_eq!(code, EXIT_GOVERNANCE);
        assert!(store.report_path().exists());
    }

    #[test]
    fn missing_artifacts_fail() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("claims.jsonl");
        write_jsonl(&data, &SyntheticClaims::new(50, 7).generate().unwrap()).unwrap();
        let args = EvaluateArgs {
            dataset: Some(data),
            artifact_dir: Some(dir.path().join("nothing-here")),
            json: false,
        };
        let err = run_evaluate(&args, &CliContext::new(AdvisorConfig::default())).unwrap_err();
        assert_eq!(crate::exit_code_for(&err), crate::EXIT_ERROR);
    }
}
