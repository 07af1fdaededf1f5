//! Sampled output of a pass.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::diagnostic::Diagnostic;
use crate::value::Value;

/// Resolved parameter values of one event instance.
pub type ParameterValues = BTreeMap<String, Value>;

/// One sampled event instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Index of the source event in its history
    pub event_index: usize,
    /// Event type, as named in the history
    pub event_type: String,
    /// Resolved parameters
    pub values: ParameterValues,
    /// Sub-seed of this instance, for members of an event family
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_seed: Option<u64>,
}

impl Sample {
    /// Look up a resolved value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

/// Ordered samples of one pass.
pub type HistorySample = Vec<Sample>;

/// Lithology draws of one pass, across all layered events, in draw order.
pub type RockSampleAccumulator = Vec<String>;

/// Everything one sampling pass produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassOutput {
    /// Seed the pass stream was created with
    pub seed: u64,
    /// Sampled events, in history order
    pub samples: HistorySample,
    /// Lithology draws
    pub rock_samples: RockSampleAccumulator,
    /// Fallbacks and clamps recorded while sampling
    pub diagnostics: Vec<Diagnostic>,
}

impl PassOutput {
    /// Split into the sample sequence and the lithology draws.
    #[must_use]
    pub fn into_parts(self) -> (HistorySample, RockSampleAccumulator) {
        (self.samples, self.rock_samples)
    }

    /// `(event_type, values)` pairs, in order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &ParameterValues)> {
        self.samples
            .iter()
            .map(|sample| (sample.event_type.as_str(), &sample.values))
    }

    /// Samples drawn from the event at `event_index`.
    pub fn samples_of(&self, event_index: usize) -> impl Iterator<Item = &Sample> {
        self.samples
            .iter()
            .filter(move |sample| sample.event_index == event_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(event_index: usize, event_type: &str) -> Sample {
        Sample {
            event_index,
            event_type: event_type.to_string(),
            values: BTreeMap::from([("amplitude".to_string(), Value::Integer(50))]),
            family_seed: None,
        }
    }

    #[test]
    fn test_serialization_omits_absent_seed() {
        let json = serde_json::to_string(&sample(0, "fold")).unwrap();
        assert_eq!(
            json,
            r#"{"event_index":0,"event_type":"fold","values":{"amplitude":50}}"#
        );
    }

    #[test]
    fn test_pass_output_views() {
        let output = PassOutput {
            seed: 1,
            samples: vec![sample(0, "fold"), sample(1, "fault"), sample(1, "fault")],
            rock_samples: vec!["shale".to_string()],
            diagnostics: Vec::new(),
        };

        let types: Vec<&str> = output.pairs().map(|(t, _)| t).collect();
        assert_eq!(types, vec!["fold", "fault", "fault"]);
        assert_eq!(output.samples_of(1).count(), 2);

        let (samples, rocks) = output.into_parts();
        assert_eq!(samples.len(), 3);
        assert_eq!(rocks, vec!["shale".to_string()]);
    }
}
