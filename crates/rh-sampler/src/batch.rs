//! Monte Carlo batches of independent passes.
//!
//! Pass seeds are derived up front from one master stream, so a batch is
//! reproducible from its seed alone and the result does not depend on how
//! passes are spread across workers.

use rh_core::{History, PassOutput, RockLibrary};
use rh_rng::SamplingContext;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::SamplingError;
use crate::history::HistorySampler;

/// Batch configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of independent passes
    pub passes_count: u64,
    /// Number of worker threads (at least 1)
    pub workers_count: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            passes_count: 1,
            workers_count: num_cpus::get() as u64,
        }
    }
}

impl BatchConfig {
    /// Single pass on the calling thread.
    pub fn single() -> Self {
        Self {
            passes_count: 1,
            workers_count: 1,
        }
    }

    /// Large ensemble across all cores.
    pub fn ensemble() -> Self {
        Self {
            passes_count: 1000,
            ..Default::default()
        }
    }

    /// Set the number of passes.
    #[must_use]
    pub fn with_passes(mut self, passes_count: u64) -> Self {
        self.passes_count = passes_count;
        self
    }

    /// Set the number of workers.
    #[must_use]
    pub fn with_workers(mut self, workers_count: u64) -> Self {
        self.workers_count = workers_count;
        self
    }
}

/// All passes of one batch, in pass order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutput {
    /// Master seed the pass seeds were derived from
    pub seed: u64,
    /// Pass outputs
    pub passes: Vec<PassOutput>,
}

/// Runs independent sampling passes in parallel.
#[derive(Debug, Clone)]
pub struct BatchSampler {
    config: BatchConfig,
}

impl BatchSampler {
    /// Create a batch sampler.
    #[must_use]
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Run the batch.
    ///
    /// The first configuration error aborts the whole batch.
    pub fn run(
        &self,
        history: &History,
        library: Option<&RockLibrary>,
        seed: Option<u64>,
    ) -> Result<BatchOutput, SamplingError> {
        // Fail fast on a malformed history, before any thread starts.
        history.plan()?;

        let mut master = SamplingContext::from_seed(seed);
        let pass_seeds: Vec<u64> = (0..self.config.passes_count)
            .map(|_| master.rng().derive_seed())
            .collect();

        let workers_count = self
            .config
            .workers_count
            .clamp(1, self.config.passes_count.max(1));
        info!(
            seed = master.seed(),
            passes_count = self.config.passes_count,
            workers_count,
            "running batch"
        );

        let sampler = HistorySampler::new(library);
        let passes = if workers_count == 1 {
            pass_seeds
                .iter()
                .map(|seed| sampler.sample(history, Some(*seed)))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            Self::run_parallel(&sampler, history, &pass_seeds, workers_count)?
        };

        debug_assert_eq!(passes.len() as u64, self.config.passes_count);
        Ok(BatchOutput {
            seed: master.seed(),
            passes,
        })
    }

    /// Spread passes over scoped workers in contiguous chunks.
    fn run_parallel(
        sampler: &HistorySampler<'_>,
        history: &History,
        pass_seeds: &[u64],
        workers_count: u64,
    ) -> Result<Vec<PassOutput>, SamplingError> {
        let chunk_size = pass_seeds.len().div_ceil(workers_count as usize);

        let chunks = crossbeam_utils::thread::scope(|scope| {
            let handles: Vec<_> = pass_seeds
                .chunks(chunk_size)
                .enumerate()
                .map(|(worker, seeds)| {
                    let handle = scope.spawn(move |_| {
                        debug!(worker, passes_count = seeds.len(), "worker started");
                        seeds
                            .iter()
                            .map(|seed| sampler.sample(history, Some(*seed)))
                            .collect::<Result<Vec<_>, _>>()
                    });
                    (worker as u64, handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(worker, handle)| {
                    handle
                        .join()
                        .map_err(|_| SamplingError::WorkerPanicked { worker })?
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .map_err(|_| SamplingError::WorkerPanicked { worker: 0 })??;

        Ok(chunks.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rh_core::{Event, EventKind, HistorySampleChecker, ParameterSpec, PropertyChecker};

    fn history() -> History {
        History::new(vec![
            Event::new(EventKind::Stratigraphy)
                .with_parameter("num_layers", ParameterSpec::uniform(1.0, 5.0))
                .with_parameter("layer_thickness", ParameterSpec::norm(100.0, 10.0)),
            Event::new(EventKind::Fault)
                .as_family(0, 3)
                .with_parameter("dip", ParameterSpec::uniform(20.0, 80.0)),
        ])
    }

    #[test]
    fn test_default_config() {
        let config = BatchConfig::default();
        assert_eq!(config.passes_count, 1);
        assert!(config.workers_count >= 1);
        assert_eq!(BatchConfig::ensemble().passes_count, 1000);
    }

    #[test]
    fn test_passes_are_independent_and_ordered() {
        let config = BatchConfig::single().with_passes(5);
        let output = BatchSampler::new(config).run(&history(), None, Some(42)).unwrap();

        assert_eq!(output.seed, 42);
        assert_eq!(output.passes.len(), 5);
        for pass in &output.passes {
            let replay = HistorySampler::new(None).sample(&history(), Some(pass.seed)).unwrap();
            assert_eq!(pass, &replay);
        }
        assert_ne!(output.passes[0].seed, output.passes[1].seed);
    }

    #[test]
    fn test_worker_count_does_not_change_output() {
        let history = history();
        let library = RockLibrary::from_names(["basalt", "tuff"]);
        let run = |workers| {
            BatchSampler::new(BatchConfig::single().with_passes(13).with_workers(workers))
                .run(&history, Some(&library), Some(2024))
                .unwrap()
        };

        let sequential = run(1);
        assert_eq!(sequential, run(3));
        assert_eq!(sequential, run(32));
    }

    #[test]
    fn test_every_pass_satisfies_properties() {
        let history = history();
        let output = BatchSampler::new(BatchConfig::single().with_passes(25).with_workers(4))
            .run(&history, None, Some(11))
            .unwrap();

        for pass in &output.passes {
            assert!(HistorySampleChecker::new(&history, pass).all_hold());
        }
    }

    #[test]
    fn test_zero_passes() {
        let output = BatchSampler::new(BatchConfig::single().with_passes(0))
            .run(&history(), None, Some(1))
            .unwrap();
        assert!(output.passes.is_empty());
    }

    #[test]
    fn test_config_error_fails_batch() {
        let mut history = history();
        history.push(Event::new(EventKind::Tilt).with_probability(-0.1));

        let result = BatchSampler::new(BatchConfig::single().with_passes(3).with_workers(2))
            .run(&history, None, Some(1));
        assert!(matches!(result, Err(SamplingError::Config(_))));
    }
}
