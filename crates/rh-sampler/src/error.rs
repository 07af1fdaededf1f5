//! Sampling errors.

use rh_core::ConfigError;
use thiserror::Error;

/// Fatal errors of a sampling pass or batch.
#[derive(Debug, Error)]
pub enum SamplingError {
    /// The history or rock library is malformed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A batch worker thread panicked
    #[error("batch worker {worker} panicked")]
    WorkerPanicked { worker: u64 },
}
