//! # Predict — One advisory suggestion.
//!
//! ```bash
//! advisor predict --claim-type Liability --damage-amount 75000 --injury --risk-factor high
//! ```
//!
//! Invalid input is refused before the model is consulted. Both outcomes
//! are recorded in the audit log when one is configured.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use advisor_core::ClaimInput;
use advisor_service::{AdvisoryService, AuditEntry};

use crate::audit_log::AuditLog;
use crate::{print_json, render, CliContext, EXIT_OK};

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Auto, Property, Health or Liability.
    #[arg(long)]
    pub claim_type: String,

    /// Damage amount in currency units.
    #[arg(long, allow_hyphen_values = true)]
    pub damage_amount: f64,

    /// An injury was involved.
    #[arg(long)]
    pub injury: bool,

    /// low, medium or high.
    #[arg(long)]
    pub risk_factor: String,

    /// Directory holding the saved artifacts.
    #[arg(long)]
    pub artifact_dir: Option<PathBuf>,

    /// Print the advisory record as JSON.
    #[arg(long)]
    pub json: bool,
}

impl PredictArgs {
    fn claim(&self) -> ClaimInput {
        ClaimInput::new(
            self.claim_type.clone(),
            self.damage_amount,
            self.injury,
            self.risk_factor.clone(),
        )
    }
}

pub fn run_predict(args: &PredictArgs, ctx: &CliContext) -> Result<u8> {
    let store = ctx.store(args.artifact_dir.as_ref());
    let service = AdvisoryService::load(&store, ctx.boundaries.clone())
        .with_context(|| format!("failed to load model from {}", store.dir().display()))?;
    let mut audit = AuditLog::new(ctx.config.audit_log.clone());

    let output = match service.predict(&args.claim()) {
        Ok(output) => output,
        Err(e) => {
            audit.record(AuditEntry::rejected(e.to_string()))?;
            return Err(e).context("claim rejected");
        }
    };
    audit.record(AuditEntry::issued(&output))?;

    if args.json {
        print_json(&output)?;
    } else {
        println!("{}", render::advisory(&output));
    }
    Ok(EXIT_OK)
}
