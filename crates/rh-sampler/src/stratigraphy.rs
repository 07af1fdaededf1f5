//! Layer structure sampling for stratigraphy and unconformity events.
//!
//! Draw order within one instance is fixed:
//!
//! 1. `num_layers`, floored; a non-positive or non-finite draw means no layers,
//!    and a draw above [`LAYERS_COUNT_MAX`] is clamped to it
//! 2. all layer thicknesses, in one batched draw
//! 3. one lithology per layer, when a rock library is set
//!
//! Layer names are derived, never drawn.

use rh_core::{
    ConfigError, DiagnosticKind, EventPlan, LayerParameter, ParameterSpec, ParameterValues,
    RockLibrary, Value, LAYERS_COUNT_MAX,
};
use rh_rng::DeterministicRng;

use crate::parameters::distribution_or_warn;
use crate::state::PassState;

/// Names of `count` layers: `Layer 1` .. `Layer count`.
#[must_use]
pub fn layer_names(count: u64) -> Vec<String> {
    (1..=count).map(|i| format!("Layer {}", i)).collect()
}

/// The drawn layer structure of one instance.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSample {
    /// Number of layers
    pub layers_count: u64,
    /// One thickness per layer
    pub thicknesses: Vec<f64>,
    /// One name per layer
    pub names: Vec<String>,
}

impl LayerSample {
    /// A structure with no layers.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            layers_count: 0,
            thicknesses: Vec::new(),
            names: Vec::new(),
        }
    }

    /// Insert `num_layers`, `layer_thickness` and `layer_names` into `values`.
    pub fn write_to(self, values: &mut ParameterValues) {
        debug_assert_eq!(self.thicknesses.len() as u64, self.layers_count);
        debug_assert_eq!(self.names.len() as u64, self.layers_count);

        values.insert(
            LayerParameter::NumLayers.name().to_string(),
            Value::Integer(i64::try_from(self.layers_count).unwrap_or(i64::MAX)),
        );
        values.insert(
            LayerParameter::LayerThickness.name().to_string(),
            Value::List(self.thicknesses.into_iter().map(Value::Number).collect()),
        );
        values.insert(
            LayerParameter::LayerNames.name().to_string(),
            Value::List(self.names.into_iter().map(Value::Text).collect()),
        );
    }
}

/// Draws the layer structure of layered events.
#[derive(Debug, Clone, Copy, Default)]
pub struct StratigraphySampler<'a> {
    /// Non-empty rock library, if any
    library: Option<&'a RockLibrary>,
}

impl<'a> StratigraphySampler<'a> {
    /// Create a sampler. An empty library is treated as no library.
    #[must_use]
    pub fn new(library: Option<&'a RockLibrary>) -> Self {
        Self {
            library: library.filter(|library| !library.is_empty()),
        }
    }

    /// Draw the layer structure of one instance of `plan`.
    ///
    /// Lithology draws are appended to `state.rock_samples`.
    pub fn sample(
        &self,
        plan: &EventPlan,
        rng: &mut DeterministicRng,
        state: &mut PassState,
    ) -> Result<LayerSample, ConfigError> {
        debug_assert!(plan.samples_layers(), "Layer structure is only drawn for layered events");

        let event_index = plan.event_index;
        let Some(count_spec) = plan.layers.num_layers.as_ref() else {
            return Ok(LayerSample::empty());
        };
        let thickness_spec = plan
            .layers
            .layer_thickness
            .as_ref()
            .ok_or(ConfigError::MissingLayerThickness { event_index })?;

        let layers_count = Self::draw_count(count_spec, event_index, rng, state)?;
        let thicknesses =
            Self::draw_thicknesses(thickness_spec, layers_count, event_index, rng, state)?;

        if let Some(library) = self.library {
            for _ in 0..layers_count {
                if let Some(rock) = rng.choose(library.rocks()) {
                    state.rock_samples.push(rock.name.clone());
                }
            }
        }

        Ok(LayerSample {
            layers_count,
            thicknesses,
            names: layer_names(layers_count),
        })
    }

    fn draw_count(
        spec: &ParameterSpec,
        event_index: usize,
        rng: &mut DeterministicRng,
        state: &mut PassState,
    ) -> Result<u64, ConfigError> {
        let name = LayerParameter::NumLayers.name();
        let drawn = match distribution_or_warn(spec, event_index, name, state) {
            Some(distribution) => distribution.sample(rng),
            None => spec.value.as_f64().ok_or(ConfigError::NonNumericValue {
                event_index,
                parameter: name.to_string(),
            })?,
        };

        let floored = drawn.floor();
        if !floored.is_finite() || floored <= 0.0 {
            return Ok(0);
        }
        // Float-to-int casts saturate.
        let layers_count = floored as u64;
        if layers_count > LAYERS_COUNT_MAX {
            state.warn(
                event_index,
                name,
                DiagnosticKind::LayerCountClamped,
                format!("drew {} layers, clamped to {}", floored, LAYERS_COUNT_MAX),
            );
            return Ok(LAYERS_COUNT_MAX);
        }
        Ok(layers_count)
    }

    fn draw_thicknesses(
        spec: &ParameterSpec,
        layers_count: u64,
        event_index: usize,
        rng: &mut DeterministicRng,
        state: &mut PassState,
    ) -> Result<Vec<f64>, ConfigError> {
        let name = LayerParameter::LayerThickness.name();
        let distribution = if spec.uncertain {
            distribution_or_warn(spec, event_index, name, state)
        } else {
            None
        };

        match distribution {
            Some(distribution) => Ok(distribution.sample_n(rng, layers_count)),
            None => {
                let thickness = spec.value.as_f64().ok_or(ConfigError::NonNumericValue {
                    event_index,
                    parameter: name.to_string(),
                })?;
                Ok(vec![thickness; layers_count as usize])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rh_core::{DistributionKind, Event, EventKind};

    fn layered(count: ParameterSpec, thickness: ParameterSpec) -> EventPlan {
        Event::new(EventKind::Stratigraphy)
            .with_parameter("num_layers", count)
            .with_parameter("layer_thickness", thickness)
            .plan(0)
            .unwrap()
    }

    #[test]
    fn test_layer_names() {
        assert_eq!(layer_names(3), vec!["Layer 1", "Layer 2", "Layer 3"]);
        assert!(layer_names(0).is_empty());
    }

    #[test]
    fn test_arrays_match_layer_count() {
        let plan = layered(ParameterSpec::uniform(2.0, 6.0), ParameterSpec::norm(300.0, 50.0));
        let library = RockLibrary::from_names(["sandstone", "shale"]);
        let sampler = StratigraphySampler::new(Some(&library));

        for seed in 0..50 {
            let mut rng = DeterministicRng::new(seed);
            let mut state = PassState::new();
            let sample = sampler.sample(&plan, &mut rng, &mut state).unwrap();

            assert!((2..6).contains(&sample.layers_count));
            assert_eq!(sample.thicknesses.len() as u64, sample.layers_count);
            assert_eq!(sample.names, layer_names(sample.layers_count));
            assert_eq!(state.rock_samples.len() as u64, sample.layers_count);
            assert!(state.rock_samples.iter().all(|rock| library.contains(rock)));
        }
    }

    #[test]
    fn test_thickness_is_one_batched_draw() {
        let plan = layered(ParameterSpec::uniform(4.0, 5.0), ParameterSpec::norm(10.0, 1.0));
        let mut rng = DeterministicRng::new(8);
        let mut state = PassState::new();

        StratigraphySampler::new(None)
            .sample(&plan, &mut rng, &mut state)
            .unwrap();

        // count draw + thickness batch
        assert_eq!(rng.calls_count(), 2);
    }

    #[test]
    fn test_non_positive_count_yields_no_layers() {
        let plan = layered(ParameterSpec::uniform(-5.0, 0.5), ParameterSpec::fixed(10.0));
        let library = RockLibrary::from_names(["granite"]);
        let mut rng = DeterministicRng::new(3);
        let mut state = PassState::new();

        let sample = StratigraphySampler::new(Some(&library))
            .sample(&plan, &mut rng, &mut state)
            .unwrap();

        assert_eq!(sample.layers_count, 0);
        assert!(sample.thicknesses.is_empty());
        assert!(sample.names.is_empty());
        assert!(state.rock_samples.is_empty());
    }

    #[test]
    fn test_huge_count_is_clamped() {
        let plan = layered(ParameterSpec::uniform(4e18, 5e18), ParameterSpec::norm(10.0, 1.0));
        let library = RockLibrary::from_names(["chert"]);
        let mut rng = DeterministicRng::new(12);
        let mut state = PassState::new();

        let sample = StratigraphySampler::new(Some(&library))
            .sample(&plan, &mut rng, &mut state)
            .unwrap();

        assert_eq!(sample.layers_count, LAYERS_COUNT_MAX);
        assert_eq!(sample.thicknesses.len() as u64, LAYERS_COUNT_MAX);
        assert_eq!(state.rock_samples.len() as u64, LAYERS_COUNT_MAX);
        assert_eq!(state.diagnostics.len(), 1);
        assert_eq!(state.diagnostics[0].kind, DiagnosticKind::LayerCountClamped);
        assert_eq!(state.diagnostics[0].parameter, "num_layers");
    }

    #[test]
    fn test_count_at_limit_is_kept() {
        let limit = LAYERS_COUNT_MAX as f64;
        let plan = layered(ParameterSpec::uniform(limit, limit + 0.5), ParameterSpec::fixed(1.0));
        let mut rng = DeterministicRng::new(12);
        let mut state = PassState::new();

        let sample = StratigraphySampler::new(None)
            .sample(&plan, &mut rng, &mut state)
            .unwrap();

        assert_eq!(sample.layers_count, LAYERS_COUNT_MAX);
        assert!(state.diagnostics.is_empty());
    }

    #[test]
    fn test_fixed_thickness_is_repeated() {
        let plan = layered(ParameterSpec::uniform(3.0, 4.0), ParameterSpec::fixed(25.0));
        let mut rng = DeterministicRng::new(3);
        let mut state = PassState::new();

        let sample = StratigraphySampler::new(None)
            .sample(&plan, &mut rng, &mut state)
            .unwrap();

        assert_eq!(sample.thicknesses, vec![25.0; 3]);
    }

    #[test]
    fn test_unusable_thickness_distribution_falls_back() {
        let thickness = ParameterSpec::norm(40.0, 2.0)
            .with_distribution(DistributionKind::Unsupported("gamma".to_string()));
        let plan = layered(ParameterSpec::uniform(2.0, 3.0), thickness);
        let mut rng = DeterministicRng::new(3);
        let mut state = PassState::new();

        let sample = StratigraphySampler::new(None)
            .sample(&plan, &mut rng, &mut state)
            .unwrap();

        assert_eq!(sample.thicknesses, vec![40.0; 2]);
        assert_eq!(state.diagnostics[0].kind, DiagnosticKind::UnsupportedDistribution);
        assert_eq!(state.diagnostics[0].parameter, "layer_thickness");
    }

    #[test]
    fn test_non_numeric_thickness_is_config_error() {
        let plan = layered(ParameterSpec::uniform(2.0, 3.0), ParameterSpec::fixed("thick"));
        let mut rng = DeterministicRng::new(3);
        let mut state = PassState::new();

        let err = StratigraphySampler::new(None)
            .sample(&plan, &mut rng, &mut state)
            .unwrap_err();
        assert!(matches!(err, ConfigError::NonNumericValue { event_index: 0, .. }));
    }

    #[test]
    fn test_empty_library_draws_no_rocks() {
        let plan = layered(ParameterSpec::uniform(2.0, 3.0), ParameterSpec::fixed(1.0));
        let library = RockLibrary::new(Vec::new());
        let mut rng = DeterministicRng::new(3);
        let mut state = PassState::new();

        StratigraphySampler::new(Some(&library))
            .sample(&plan, &mut rng, &mut state)
            .unwrap();

        assert!(state.rock_samples.is_empty());
        assert_eq!(rng.calls_count(), 1);
    }

    #[test]
    fn test_write_to_values() {
        let mut values = ParameterValues::new();
        LayerSample {
            layers_count: 2,
            thicknesses: vec![1.0, 2.0],
            names: layer_names(2),
        }
        .write_to(&mut values);

        assert_eq!(values["num_layers"], Value::Integer(2));
        assert_eq!(
            values["layer_names"],
            Value::List(vec![Value::from("Layer 1"), Value::from("Layer 2")])
        );
    }
}
