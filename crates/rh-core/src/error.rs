//! Configuration errors.
//!
//! Every variant is fatal for the call that hit it: a history with a
//! malformed event never yields a partial sample.

use std::path::PathBuf;

use thiserror::Error;

/// Malformed input: a history, event record or rock library that cannot be
/// sampled as written.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("event {event_index} ({event_type}): missing `parameters` mapping")]
    MissingParameters {
        event_index: usize,
        event_type: &'static str,
    },

    #[error("event {event_index}: probability {probability} is outside [0, 1]")]
    ProbabilityOutOfRange { event_index: usize, probability: f64 },

    #[error("event {event_index}: `event_family` is set but `nEvents` is missing")]
    MissingFamilyBounds { event_index: usize },

    #[error("event {event_index}: invalid `nEvents` bounds [{min}, {max})")]
    InvalidFamilyBounds { event_index: usize, min: u64, max: u64 },

    #[error("event {event_index}: family of up to {largest} instances exceeds the limit of {limit}")]
    FamilyTooLarge {
        event_index: usize,
        largest: u64,
        limit: u64,
    },

    #[error("event {event_index}: uncertain `num_layers` requires a `layer_thickness` parameter")]
    MissingLayerThickness { event_index: usize },

    #[error("event {event_index}: parameter `{parameter}` must be numeric")]
    NonNumericValue {
        event_index: usize,
        parameter: String,
    },
}
