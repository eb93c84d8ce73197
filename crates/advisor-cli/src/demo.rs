//! # Demo — The three reference claims.
//!
//! Runs a low-damage auto claim, a high-damage liability claim with injury
//! and a medium-damage property claim through the saved model and prints
//! each advisory in full.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use advisor_core::ClaimInput;
use advisor_service::{AdvisoryService, AuditEntry};

use crate::audit_log::AuditLog;
use crate::{print_json, render, CliContext, EXIT_OK};

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Directory holding the saved artifacts.
    #[arg(long)]
    pub artifact_dir: Option<PathBuf>,

    /// Print the advisory records as a JSON array.
    #[arg(long)]
    pub json: bool,
}

/// `(title, claim)` for each demonstration example.
pub fn examples() -> [(&'static str, ClaimInput); 3] {
    [
        (
            "Low Damage Auto Claim",
            ClaimInput::new("Auto", 2_500.0, false, "low"),
        ),
        (
            "High Damage Liability Claim with Injury",
            ClaimInput::new("Liability", 75_000.0, true, "high"),
        ),
        (
            "Medium Damage Property Claim",
            ClaimInput::new("Property", 12_000.0, false, "medium"),
        ),
    ]
}

pub fn run_demo(args: &DemoArgs, ctx: &CliContext) -> Result<u8> {
    let store = ctx.store(args.artifact_dir.as_ref());
    let service = AdvisoryService::load(&store, ctx.boundaries.clone())
        .with_context(|| format!("failed to load model from {}", store.dir().display()))?;
    let mut audit = AuditLog::new(ctx.config.audit_log.clone());

    let mut outputs = Vec::new();
    for (title, claim) in examples() {
        let output = service
            .predict(&claim)
            .with_context(|| format!("demonstration claim failed: {title}"))?;
        audit.record(AuditEntry::issued(&output))?;
        outputs.push((title, output));
    }

    if args.json {
        let records: Vec<_> = outputs.iter().map(|(_, o)| o).collect();
        print_json(&records)?;
        return Ok(EXIT_OK);
    }

    println!("{}", render::banner("ADVISORY PREDICTION SYSTEM - DEMONSTRATION"));
    for (i, (title, output)) in outputs.iter().enumerate() {
        println!();
        println!("EXAMPLE {}: {title}", i + 1);
        println!("{}", render::advisory(output));
    }
    println!();
    println!("{}", render::banner("DEMONSTRATION COMPLETE"));
    println!("Audit entries recorded: {}", audit.trail().len());
    Ok(EXIT_OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdvisorConfig;
    use crate::train::{run_train, TrainArgs};
    use advisor_service::{write_jsonl, SyntheticClaims};

    #[test]
    fn examples_are_valid_claims() {
        for (title, claim) in examples() {
            assert!(claim.validate().is_ok(), "{title}");
        }
    }

    #[test]
    fn runs_against_saved_model() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("claims.jsonl");
        write_jsonl(&data, &SyntheticClaims::new(300, 7).generate().unwrap()).unwrap();
        let ctx = CliContext::new(AdvisorConfig {
            artifact_dir: dir.path().join("artifacts"),
            dataset: data,
            ..AdvisorConfig::default()
        });
        run_train(
            &TrainArgs {
                dataset: None,
                artifact_dir: None,
                json: true,
            },
            &ctx,
        )
        .unwrap();
        let code = run_demo(
            &DemoArgs {
                artifact_dir: None,
                json: false,
            },
            &ctx,
        )
        .unwrap();
        assert_eq!(code, EXIT_OK);
    }

    #[test]
    fn missing_model_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = DemoArgs {
            artifact_dir: Some(dir.path().to_path_buf()),
            json: false,
        };
        let err = run_demo(&args, &CliContext::new(AdvisorConfig::default())).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load model"));
    }
}
