//! Non-fatal sampling diagnostics.
//!
//! A diagnostic records a parameter that could not be drawn as declared and
//! fell back to its fixed value. Diagnostics are returned with every pass.

use serde::Serialize;

/// What went wrong with a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Distribution tag is not one of the supported families
    UnsupportedDistribution,
    /// Parameter is uncertain but names no distribution
    MissingDistribution,
    /// Distribution settings cannot build a distribution
    InvalidDistribution,
    /// A `norm` location is not numeric
    NonNumericLocation,
    /// A drawn layer count exceeded the layer limit and was clamped
    LayerCountClamped,
}

impl DiagnosticKind {
    /// Short rule-like name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DiagnosticKind::UnsupportedDistribution => "unsupported-distribution",
            DiagnosticKind::MissingDistribution => "missing-distribution",
            DiagnosticKind::InvalidDistribution => "invalid-distribution",
            DiagnosticKind::NonNumericLocation => "non-numeric-location",
            DiagnosticKind::LayerCountClamped => "layer-count-clamped",
        }
    }
}

/// A parameter that fell back to its fixed value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Event the parameter belongs to
    pub event_index: usize,
    /// Parameter name
    pub parameter: String,
    /// Category
    pub kind: DiagnosticKind,
    /// Human-readable description
    pub message: String,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(
        event_index: usize,
        parameter: impl Into<String>,
        kind: DiagnosticKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            event_index,
            parameter: parameter.into(),
            kind,
            message: message.into(),
        }
    }

    /// Format for display.
    #[must_use]
    pub fn format(&self) -> String {
        format!(
            "[WARN] event {} `{}` {}: {}",
            self.event_index,
            self.parameter,
            self.kind.name(),
            self.message
        )
    }
}
