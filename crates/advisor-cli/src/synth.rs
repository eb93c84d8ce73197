//! # Synth — Write a synthetic claims dataset.
//!
//! ```bash
//! advisor synth --rows 1000 --seed 7 --out data/claims.jsonl
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use advisor_service::synth::{DEFAULT_ROWS, DEFAULT_SEED};
use advisor_service::{target_distribution, write_jsonl, SyntheticClaims};

use crate::{CliContext, EXIT_OK};

#[derive(Args, Debug)]
pub struct SynthArgs {
    /// Number of claims to generate.
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    pub rows: usize,

    /// Random seed. Same seed, same rows.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Output JSON Lines file. Defaults to the configured dataset path.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run_synth(args: &SynthArgs, ctx: &CliContext) -> Result<u8> {
    let out = ctx.config.dataset_or(args.out.as_ref());
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let rows = SyntheticClaims::new(args.rows, args.seed)
        .generate()
        .context("synthetic generator produced an invalid claim")?;
    write_jsonl(&out, &rows)
        .with_context(|| format!("failed to write dataset: {}", out.display()))?;
    tracing::info!(rows = rows.len(), seed = args.seed, path = %out.display(), "synthetic dataset written");

    println!("Wrote {} synthetic claims to {}", rows.len(), out.display());
    for (label, count) in target_distribution(&rows) {
        println!("  {label:<8}{count:>6}");
    }
    Ok(EXIT_OK)
}
