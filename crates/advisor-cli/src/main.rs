//! # advisor CLI entry point
//!
//! Parses command-line arguments, initializes logging, loads the optional
//! configuration file and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use advisor_cli::config::AdvisorConfig;
use advisor_cli::demo::{run_demo, DemoArgs};
use advisor_cli::evaluate::{run_evaluate, EvaluateArgs};
use advisor_cli::predict::{run_predict, PredictArgs};
use advisor_cli::synth::{run_synth, SynthArgs};
use advisor_cli::train::{run_train, TrainArgs};
use advisor_cli::verify::{run_verify, VerifyArgs};
use advisor_cli::{exit_code_for, CliContext, EXIT_ERROR};

/// Claims severity advisor
///
/// Trains and serves a classical severity classifier whose every output is
/// a non-binding suggestion for a human reviewer, with rule signals,
/// feature importance and an uncertainty assessment attached.
#[derive(Parser, Debug)]
#[command(name = "advisor", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a seeded synthetic claims dataset.
    Synth(SynthArgs),

    /// Train, verify and save a model. Nothing is saved if governance fails.
    Train(TrainArgs),

    /// Evaluate saved artifacts and write the evaluation report.
    Evaluate(EvaluateArgs),

    /// Produce one advisory suggestion for a claim.
    Predict(PredictArgs),

    /// Run the three demonstration claims.
    Demo(DemoArgs),

    /// Run the governance checklist on saved metadata.
    Verify(VerifyArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "advisor CLI starting");

    let config = match AdvisorConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let ctx = CliContext::new(config);

    let result = match cli.command {
        Commands::Synth(args) => run_synth(&args, &ctx),
        Commands::Train(args) => run_train(&args, &ctx),
        Commands::Evaluate(args) => run_evaluate(&args, &ctx),
        Commands::Predict(args) => run_predict(&args, &ctx),
        Commands::Demo(args) => run_demo(&args, &ctx),
        Commands::Verify(args) => run_verify(&args, &ctx),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(exit_code_for(&e))
        }
    }
}
