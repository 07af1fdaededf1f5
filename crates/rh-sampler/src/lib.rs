//! # rh-sampler
//!
//! Seeded stochastic sampling of geological event histories.
//!
//! One pass walks the history in order. For every event it decides how many
//! instances occur ([`EventFamilyExpander`]), resolves each instance's
//! parameters ([`ParameterSampler`]) and, for layered events with an
//! uncertain layer count, draws the layer structure
//! ([`StratigraphySampler`]).
//!
//! ## Determinism
//!
//! All draws of a pass come from one seeded stream. Family members draw from
//! sub-streams forked off it in order. The same history, rock library and
//! seed always produce the same [`PassOutput`](rh_core::PassOutput).
//!
//! ```rust
//! use rh_core::History;
//! use rh_sampler::sample_history;
//!
//! let history = History::from_json(
//!     r#"[{"type": "fold", "parameters": {
//!         "X": {"value": 10}, "Y": {"value": 20}, "Z": {"value": 5},
//!         "amplitude": {"value": 50}}}]"#,
//! ).unwrap();
//!
//! let output = sample_history(&history, None, Some(42)).unwrap();
//! assert_eq!(output.samples[0].event_type, "fold");
//! assert!(output.samples[0].values.contains_key("pos"));
//! ```
//!
//! ## Failures
//!
//! Malformed histories fail the whole pass before any draw
//! ([`SamplingError::Config`]). A parameter whose distribution cannot be
//! built falls back to its fixed value and is reported as a
//! [`Diagnostic`](rh_core::Diagnostic).

pub mod batch;
pub mod distribution;
pub mod error;
pub mod family;
pub mod history;
pub mod parameters;
pub mod state;
pub mod stratigraphy;

pub use batch::{BatchConfig, BatchOutput, BatchSampler};
pub use distribution::{DistributionError, DistributionFactory, ParameterDistribution};
pub use error::SamplingError;
pub use family::{EventFamilyExpander, Expansion};
pub use history::{sample_history, HistorySampler};
pub use parameters::{merge_position, ParameterSampler};
pub use state::PassState;
pub use stratigraphy::{layer_names, LayerSample, StratigraphySampler};
