//! Distribution factory.
//!
//! Turns the distribution settings of an uncertain [`ParameterSpec`] into a
//! samplable [`ParameterDistribution`]. Failures are never fatal: the caller
//! records a diagnostic and falls back to the fixed value.

use rand_distr::{SkewNormal, Uniform};
use rh_core::{DiagnosticKind, DistributionKind, ParameterSpec, Value};
use rh_rng::DeterministicRng;
use thiserror::Error;

/// Scale of a `norm` parameter that names none.
pub const SCALE_DEFAULT: f64 = 1.0;

/// Skew of a `norm` parameter that names none.
pub const SKEW_DEFAULT: f64 = 0.0;

/// Lower bound of a `uniform` parameter that names none.
pub const LOW_DEFAULT: f64 = 0.0;

/// Upper bound of a `uniform` parameter that names none.
pub const HIGH_DEFAULT: f64 = 1.0;

/// Why a parameter spec could not produce a distribution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistributionError {
    #[error("unsupported distribution `{0}`")]
    Unsupported(String),

    #[error("uncertain parameter names no distribution")]
    Missing,

    #[error("skew-normal location must be numeric, got {0:?}")]
    NonNumericLocation(Value),

    #[error("invalid skew-normal: location {location}, scale {scale}, skew {skew}")]
    InvalidSkewNormal { location: f64, scale: f64, skew: f64 },

    #[error("invalid uniform bounds [{low}, {high})")]
    InvalidUniform { low: f64, high: f64 },
}

impl DistributionError {
    /// Diagnostic category for this error.
    #[must_use]
    pub fn diagnostic_kind(&self) -> DiagnosticKind {
        match self {
            DistributionError::Unsupported(_) => DiagnosticKind::UnsupportedDistribution,
            DistributionError::Missing => DiagnosticKind::MissingDistribution,
            DistributionError::NonNumericLocation(_) => DiagnosticKind::NonNumericLocation,
            DistributionError::InvalidSkewNormal { .. } | DistributionError::InvalidUniform { .. } => {
                DiagnosticKind::InvalidDistribution
            }
        }
    }
}

/// A samplable parameter distribution.
#[derive(Debug, Clone)]
pub enum ParameterDistribution {
    /// Skew-normal (plain normal when skew is 0)
    SkewNormal(SkewNormal<f64>),
    /// Continuous uniform on `[low, high)`
    Uniform(Uniform<f64>),
}

impl ParameterDistribution {
    /// Draw a single value.
    pub fn sample(&self, rng: &mut DeterministicRng) -> f64 {
        match self {
            ParameterDistribution::SkewNormal(dist) => rng.sample(dist),
            ParameterDistribution::Uniform(dist) => rng.sample(dist),
        }
    }

    /// Draw `count` i.i.d. values in one call.
    pub fn sample_n(&self, rng: &mut DeterministicRng, count: u64) -> Vec<f64> {
        match self {
            ParameterDistribution::SkewNormal(dist) => rng.sample_n(dist, count),
            ParameterDistribution::Uniform(dist) => rng.sample_n(dist, count),
        }
    }
}

/// Builds distributions from parameter specs, keyed on [`DistributionKind`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DistributionFactory;

impl DistributionFactory {
    /// Build the distribution described by an uncertain parameter spec.
    pub fn build(spec: &ParameterSpec) -> Result<ParameterDistribution, DistributionError> {
        debug_assert!(spec.uncertain, "Only uncertain parameters are sampled");

        match spec.distribution.as_ref().ok_or(DistributionError::Missing)? {
            DistributionKind::Norm => Self::skew_normal(spec),
            DistributionKind::Uniform => Self::uniform(spec),
            DistributionKind::Unsupported(tag) => Err(DistributionError::Unsupported(tag.clone())),
        }
    }

    fn skew_normal(spec: &ParameterSpec) -> Result<ParameterDistribution, DistributionError> {
        let location = spec
            .value
            .as_f64()
            .ok_or_else(|| DistributionError::NonNumericLocation(spec.value.clone()))?;
        let scale = spec.scale.unwrap_or(SCALE_DEFAULT);
        let skew = spec.skew.unwrap_or(SKEW_DEFAULT);

        let invalid = DistributionError::InvalidSkewNormal {
            location,
            scale,
            skew,
        };
        if !location.is_finite() {
            return Err(invalid);
        }
        SkewNormal::new(location, scale, skew)
            .map(ParameterDistribution::SkewNormal)
            .map_err(|_| invalid)
    }

    fn uniform(spec: &ParameterSpec) -> Result<ParameterDistribution, DistributionError> {
        let low = spec.low.unwrap_or(LOW_DEFAULT);
        let high = spec.high.unwrap_or(HIGH_DEFAULT);

        // Uniform::new panics on these, so they are rejected up front.
        if !(high - low).is_finite() || high <= low {
            return Err(DistributionError::InvalidUniform { low, high });
        }
        Ok(ParameterDistribution::Uniform(Uniform::new(low, high)))
    }
}
