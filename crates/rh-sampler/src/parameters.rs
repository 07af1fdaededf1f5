//! Per-instance parameter resolution.
//!
//! Resolves one event instance's parameters into concrete values:
//!
//! 1. Generic parameters: uncertain ones are drawn, fixed ones copied.
//! 2. `X`/`Y`/`Z` are merged into `pos` when all three are present.
//! 3. Reserved stratigraphic parameters are either drawn by the
//!    [`StratigraphySampler`] or passed through verbatim.

use rh_core::{
    ConfigError, EventPlan, ParameterSpec, ParameterValues, RockLibrary, Value, POSITION_KEY,
    POSITION_NAMES,
};
use rh_rng::DeterministicRng;

use crate::distribution::{DistributionFactory, ParameterDistribution};
use crate::state::PassState;
use crate::stratigraphy::StratigraphySampler;

/// Build the distribution of an uncertain parameter.
///
/// On failure a diagnostic is recorded and `None` returned; the caller then
/// uses the parameter's fixed value.
pub(crate) fn distribution_or_warn(
    spec: &ParameterSpec,
    event_index: usize,
    name: &str,
    state: &mut PassState,
) -> Option<ParameterDistribution> {
    match DistributionFactory::build(spec) {
        Ok(distribution) => Some(distribution),
        Err(err) => {
            state.warn(event_index, name, err.diagnostic_kind(), err.to_string());
            None
        }
    }
}

/// Resolves the parameters of event instances.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterSampler<'a> {
    stratigraphy: StratigraphySampler<'a>,
}

impl<'a> ParameterSampler<'a> {
    /// Create a sampler drawing lithologies from `library`, if any.
    #[must_use]
    pub fn new(library: Option<&'a RockLibrary>) -> Self {
        Self {
            stratigraphy: StratigraphySampler::new(library),
        }
    }

    /// Resolve all parameters of one instance of `plan`.
    pub fn sample(
        &self,
        plan: &EventPlan,
        rng: &mut DeterministicRng,
        state: &mut PassState,
    ) -> Result<ParameterValues, ConfigError> {
        let mut values = ParameterValues::new();

        for (name, spec) in &plan.scalars {
            let value = Self::resolve(spec, plan.event_index, name, rng, state);
            values.insert(name.clone(), value);
        }

        merge_position(&mut values);

        if plan.samples_layers() {
            self.stratigraphy
                .sample(plan, rng, state)?
                .write_to(&mut values);
        } else {
            for (parameter, spec) in plan.layers.iter() {
                values.insert(parameter.name().to_string(), spec.value.clone());
            }
        }

        Ok(values)
    }

    /// Resolve a single generic parameter.
    ///
    /// Fixed parameters make no draw.
    fn resolve(
        spec: &ParameterSpec,
        event_index: usize,
        name: &str,
        rng: &mut DeterministicRng,
        state: &mut PassState,
    ) -> Value {
        if !spec.uncertain {
            return spec.value.clone();
        }

        match distribution_or_warn(spec, event_index, name, state) {
            Some(distribution) => Value::Number(distribution.sample(rng)),
            None => spec.value.clone(),
        }
    }
}

/// Replace `X`, `Y`, `Z` with `pos = [X, Y, Z]` when all three are present.
///
/// Partial positions are left as they are.
pub fn merge_position(values: &mut ParameterValues) {
    if !POSITION_NAMES.iter().all(|name| values.contains_key(*name)) {
        return;
    }

    let pos: Vec<Value> = POSITION_NAMES
        .iter()
        .filter_map(|name| values.remove(*name))
        .collect();
    debug_assert_eq!(pos.len(), POSITION_NAMES.len());

    values.insert(POSITION_KEY.to_string(), Value::List(pos));
}
