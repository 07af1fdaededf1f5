//! One sampling pass over a history.

use rh_core::{History, PassOutput, RockLibrary, Sample};
use rh_rng::SamplingContext;
use tracing::debug;

use crate::error::SamplingError;
use crate::family::{EventFamilyExpander, Expansion};
use crate::parameters::ParameterSampler;
use crate::state::PassState;

/// Sample `history` once.
///
/// Without a seed a fresh one is drawn; it is recorded in the output either
/// way.
pub fn sample_history(
    history: &History,
    library: Option<&RockLibrary>,
    seed: Option<u64>,
) -> Result<PassOutput, SamplingError> {
    HistorySampler::new(library).sample(history, seed)
}

/// Drives sampling passes over histories.
///
/// The sampler itself is immutable and shareable; all pass state lives in
/// the [`SamplingContext`] and a fresh accumulator per pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistorySampler<'a> {
    library: Option<&'a RockLibrary>,
}

impl<'a> HistorySampler<'a> {
    /// Create a sampler drawing lithologies from `library`, if any.
    #[must_use]
    pub fn new(library: Option<&'a RockLibrary>) -> Self {
        Self { library }
    }

    /// Run one pass with its own context.
    pub fn sample(&self, history: &History, seed: Option<u64>) -> Result<PassOutput, SamplingError> {
        let mut ctx = SamplingContext::from_seed(seed);
        self.sample_with_context(history, &mut ctx)
    }

    /// Run one pass on a caller-owned context.
    ///
    /// Every event is validated before the first draw, so a configuration
    /// error never leaves a partial result behind.
    pub fn sample_with_context(
        &self,
        history: &History,
        ctx: &mut SamplingContext,
    ) -> Result<PassOutput, SamplingError> {
        let plans = history.plan()?;
        let parameters = ParameterSampler::new(self.library);
        let mut state = PassState::new();
        let mut samples = Vec::with_capacity(plans.len());

        debug!(seed = ctx.seed(), events_count = plans.len(), "sampling pass");

        for plan in &plans {
            let expansion = EventFamilyExpander::expand(&plan.occurrence, ctx);
            debug!(
                event_index = plan.event_index,
                event_type = plan.kind.as_str(),
                instances_count = expansion.instances_count(),
                "expanded event"
            );

            match expansion {
                Expansion::Skipped => {}
                Expansion::Single => {
                    let values = parameters.sample(plan, ctx.rng(), &mut state)?;
                    samples.push(Sample {
                        event_index: plan.event_index,
                        event_type: plan.kind.as_str().to_string(),
                        values,
                        family_seed: None,
                    });
                }
                Expansion::Family(members) => {
                    for mut rng in members {
                        let values = parameters.sample(plan, &mut rng, &mut state)?;
                        samples.push(Sample {
                            event_index: plan.event_index,
                            event_type: plan.kind.as_str().to_string(),
                            values,
                            family_seed: Some(rng.seed()),
                        });
                    }
                }
            }
        }

        debug!(
            stats = %ctx.stats(),
            samples_count = samples.len(),
            diagnostics_count = state.diagnostics_count(),
            "pass complete"
        );

        Ok(PassOutput {
            seed: ctx.seed(),
            samples,
            rock_samples: state.rock_samples,
            diagnostics: state.diagnostics,
        })
    }
}
