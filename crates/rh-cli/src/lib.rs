//! # rh-cli
//!
//! Command-line front end: load a history (and optionally a rock library),
//! run one or more seeded passes and print them as JSON.
//!
//! ```bash
//! rh-sample --history basin.json --rocks rocks.json --seed 42 --passes 10 --check
//! ```
//!
//! Without `--seed`, `RH_SEED` is used if set, otherwise a fresh seed is
//! drawn and logged.

use std::path::PathBuf;

use clap::Parser;
use rh_core::{ConfigError, History, HistorySampleChecker, PropertyChecker, RockLibrary};
use rh_sampler::{BatchConfig, BatchSampler, SamplingError};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Command-line arguments of `rh-sample`.
#[derive(Parser, Debug, Clone)]
#[command(name = "rh-sample")]
#[command(about = "Sample realisations of a stochastic geological event history")]
pub struct Args {
    /// History file (JSON list of events, or an object with `events`)
    #[arg(long)]
    pub history: PathBuf,

    /// Rock library file (JSON list of rocks with a `name`)
    #[arg(long)]
    pub rocks: Option<PathBuf>,

    /// Master seed; falls back to RH_SEED, then to a random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of independent passes
    #[arg(long, default_value_t = 1)]
    pub passes: u64,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(long)]
    pub workers: Option<u64>,

    /// Verify every pass against the sample invariants
    #[arg(long)]
    pub check: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Errors reported by the command line.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sampling(#[from] SamplingError),

    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("pass {pass_index} (RH_SEED={seed}) violates sample invariants:\n{report}")]
    PropertyViolated {
        pass_index: usize,
        seed: u64,
        report: String,
    },
}

/// Initialize logging to stderr.
///
/// `RUST_LOG` overrides the default filter (`info` for the sampler crates,
/// `warn` for everything else).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,rh_cli=info,rh_sampler=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Run the sampler as described by `args` and return the JSON output.
pub fn run(args: &Args) -> Result<String, CliError> {
    let history = History::from_path(&args.history)?;
    let library = args.rocks.as_ref().map(RockLibrary::from_path).transpose()?;
    if library.as_ref().is_some_and(RockLibrary::is_empty) {
        warn!("rock library is empty; no lithologies will be drawn");
    }

    let mut config = BatchConfig::default().with_passes(args.passes);
    if let Some(workers) = args.workers {
        config = config.with_workers(workers);
    }

    let seed = args.seed.or_else(rh_rng::seed_from_env);
    let batch = BatchSampler::new(config).run(&history, library.as_ref(), seed)?;
    info!(
        "RH_SEED={} passes={} events={}",
        batch.seed,
        batch.passes.len(),
        history.len()
    );

    if args.check {
        for (pass_index, pass) in batch.passes.iter().enumerate() {
            let mut checker = HistorySampleChecker::new(&history, pass);
            if let Some(library) = library.as_ref() {
                checker = checker.with_library(library);
            }
            let summary = checker.summary();
            if summary.failed > 0 {
                return Err(CliError::PropertyViolated {
                    pass_index,
                    seed: pass.seed,
                    report: summary.format_report(),
                });
            }
        }
        info!("all {} passes satisfy the sample invariants", batch.passes.len());
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&batch.passes)?
    } else {
        serde_json::to_string(&batch.passes)?
    };
    Ok(json)
}
