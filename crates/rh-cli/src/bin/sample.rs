//! Sample a stochastic event history from the command line.
//!
//! # Usage
//!
//! ```bash
//! # One pass, random seed (logged as RH_SEED=...)
//! cargo run -p rh-cli --bin rh-sample -- --history basin.json
//!
//! # Reproducible ensemble with lithologies, checked against the invariants
//! cargo run -p rh-cli --bin rh-sample -- --history basin.json --rocks rocks.json \
//!     --seed 42 --passes 100 --check --pretty
//! ```

use std::process::ExitCode;

use clap::Parser;
use rh_cli::{init_logging, run, Args};
use tracing::error;

fn main() -> ExitCode {
    init_logging();

    let args = Args::parse();

    match run(&args) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
