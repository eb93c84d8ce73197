//! # Train — Governed training run.
//!
//! Fits the classifier on the dataset, evaluates it on the held-out split,
//! and runs the compliance checklist. Artifacts are written only when every
//! check passes; otherwise the checklist is printed and nothing is saved.
//!
//! ```bash
//! advisor train --dataset data/claims.jsonl --artifact-dir artifacts
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use advisor_governance::verify;
use advisor_service::TrainingPipeline;

use crate::{print_json, render, CliContext, EXIT_GOVERNANCE, EXIT_OK};

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Training dataset (JSON array or JSON Lines).
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Directory to write model, codec and metadata into.
    #[arg(long)]
    pub artifact_dir: Option<PathBuf>,

    /// Print the saved metadata record as JSON instead of the summary.
    #[arg(long)]
    pub json: bool,
}

pub fn run_train(args: &TrainArgs, ctx: &CliContext) -> Result<u8> {
    let dataset = ctx.dataset(args.dataset.as_ref())?;
    let store = ctx.store(args.artifact_dir.as_ref());
    let pipeline = TrainingPipeline::new(ctx.boundaries.clone())
        .with_dataset_type(ctx.config.dataset_type.clone());

    let trained = pipeline.fit(&dataset).context("training failed")?;
    let compliance = verify(&trained.metadata);
    if !compliance.passed {
        tracing::error!(failed = ?compliance.failed_checks(), "training halted; no artifacts written");
        println!("{}", render::compliance(&compliance));
        return Ok(EXIT_GOVERNANCE);
    }

    let certified = trained.certify().context("certification failed")?;
    store
        .save(&certified)
        .with_context(|| format!("failed to save artifacts to {}", store.dir().display()))?;

    if args.json {
        print_json(&certified.trained().metadata)?;
    } else {
        println!(
            "{}",
            render::training(&certified, &store.dir().display().to_string())
        );
    }
    Ok(EXIT_OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdvisorConfig;
    use advisor_service::{write_jsonl, ArtifactStore, SyntheticClaims};

    #[test]
    fn trains_and_saves_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("claims.jsonl");
        write_jsonl(&data, &SyntheticClaims::new(300, 7).generate().unwrap()).unwrap();
        let artifacts = dir.path().join("artifacts");

        let args = TrainArgs {
            dataset: Some(data),
            artifact_dir: Some(artifacts.clone()),
            json: true,
        };
        let code = run_train(&args, &CliContext::new(AdvisorConfig::default())).unwrap();
        assert_eq!(code, EXIT_OK);

        let store = ArtifactStore::new(&artifacts);
        assert!(store.model_path().exists());
        assert!(store.codec_path().exists());
        let metadata = store.load_metadata().unwrap();
        assert_eq!(metadata.dataset.as_deref(), Some("claims"));
        assert_eq!(metadata.dataset_type.as_deref(), Some("synthetic"));
    }

    #[test]
    fn unauthorized_column_halts_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("claims.jsonl");
        std::fs::write(
            &data,
            r#"{"claim_type":"Auto","damage_amount":2500.0,"injury_involved":false,"risk_factor":"low","policyholder_age":41,"severity":"Low"}"#,
        )
        .unwrap();
        let artifacts = dir.path().join("artifacts");
        let args = TrainArgs {
            dataset: Some(data),
            artifact_dir: Some(artifacts.clone()),
            json: false,
        };
        let err = run_train(&args, &CliContext::new(AdvisorConfig::default())).unwrap_err();
        assert_eq!(crate::exit_code_for(&err), EXIT_GOVERNANCE);
        assert!(!artifacts.exists());
    }

    #[test]
    fn missing_dataset_is_an_operational_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = TrainArgs {
            dataset: Some(dir.path().join("absent.jsonl")),
            artifact_dir: Some(dir.path().join("artifacts")),
            json: false,
        };
        let err = run_train(&args, &CliContext::new(AdvisorConfig::default())).unwrap_err();
        assert_eq!(crate::exit_code_for(&err), crate::EXIT_ERROR);
    }
}
