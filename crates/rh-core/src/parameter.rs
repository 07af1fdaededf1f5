//! Declarative parameter specifications.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Distribution family named by a parameter spec.
///
/// Closed set of supported families. Any other tag is kept verbatim as
/// [`DistributionKind::Unsupported`] so that a record with an unknown tag
/// still loads and degrades to its fixed value at sampling time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DistributionKind {
    /// Skew-normal around `value` with `scale` and `skew`
    Norm,
    /// Continuous uniform on `[low, high)`
    Uniform,
    /// Unrecognized tag
    Unsupported(String),
}

impl DistributionKind {
    /// Tag as written in configuration.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            DistributionKind::Norm => "norm",
            DistributionKind::Uniform => "uniform",
            DistributionKind::Unsupported(tag) => tag,
        }
    }
}

impl From<String> for DistributionKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "norm" => DistributionKind::Norm,
            "uniform" => DistributionKind::Uniform,
            _ => DistributionKind::Unsupported(tag),
        }
    }
}

impl From<DistributionKind> for String {
    fn from(kind: DistributionKind) -> Self {
        kind.tag().to_string()
    }
}

/// One named parameter of an event.
///
/// A fixed parameter (`uncertain == false`) always resolves to `value`.
/// An uncertain one is drawn from `distribution`, shaped by the optional
/// `scale`/`skew` (norm) or `low`/`high` (uniform) fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Fixed value, and the location of a `norm` distribution
    pub value: Value,
    /// Whether the value is drawn from `distribution`
    #[serde(default)]
    pub uncertain: bool,
    /// Distribution family for uncertain parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<DistributionKind>,
    /// Scale of a `norm` distribution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    /// Skew (shape) of a `norm` distribution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skew: Option<f64>,
    /// Inclusive lower bound of a `uniform` distribution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    /// Exclusive upper bound of a `uniform` distribution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
}

impl ParameterSpec {
    /// Fixed parameter.
    pub fn fixed(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            uncertain: false,
            distribution: None,
            scale: None,
            skew: None,
            low: None,
            high: None,
        }
    }

    /// Skew-normal parameter located at `value`.
    #[must_use]
    pub fn norm(value: f64, scale: f64) -> Self {
        Self {
            uncertain: true,
            distribution: Some(DistributionKind::Norm),
            scale: Some(scale),
            ..Self::fixed(value)
        }
    }

    /// Uniform parameter on `[low, high)`.
    ///
    /// The fixed fallback value is the interval midpoint.
    #[must_use]
    pub fn uniform(low: f64, high: f64) -> Self {
        Self {
            uncertain: true,
            distribution: Some(DistributionKind::Uniform),
            low: Some(low),
            high: Some(high),
            ..Self::fixed((low + high) / 2.0)
        }
    }

    /// Set the skew of a `norm` parameter.
    #[must_use]
    pub fn with_skew(mut self, skew: f64) -> Self {
        self.skew = Some(skew);
        self
    }

    /// Replace the distribution tag.
    #[must_use]
    pub fn with_distribution(mut self, kind: DistributionKind) -> Self {
        self.distribution = Some(kind);
        self
    }
}
