//! # rh-rng
//!
//! Deterministic randomness for stochastic event histories.
//!
//! Every sampling pass owns one [`SamplingContext`]; all draws of the pass
//! come from its seeded stream. Given the same seed, a pass is bitwise
//! reproducible.
//!
//! ## Usage
//!
//! ```rust
//! use rh_rng::SamplingContext;
//!
//! let mut ctx = SamplingContext::new(12345);
//! let value: u64 = ctx.rng().gen();
//! let choice = ctx.rng().gen_range(0..10);
//! assert!(choice < 10);
//! # let _ = value;
//! ```
//!
//! ## Reproducibility
//!
//! To reproduce a pass, re-run it with the seed reported as `RH_SEED=<seed>`:
//! ```bash
//! RH_SEED=12345 cargo test
//! ```

pub mod context;
pub mod random;

pub use context::{ContextStats, SamplingContext};
pub use random::DeterministicRng;

/// Get a seed from the `RH_SEED` environment variable, if set and valid.
#[must_use]
pub fn seed_from_env() -> Option<u64> {
    std::env::var("RH_SEED").ok().and_then(|s| s.parse().ok())
}
