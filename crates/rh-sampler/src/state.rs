//! Pass-scoped mutable state.

use rh_core::{Diagnostic, DiagnosticKind, RockSampleAccumulator};
use tracing::warn;

/// State owned by exactly one sampling pass.
///
/// Created fresh for every pass; nothing here outlives it.
#[derive(Debug, Default)]
pub struct PassState {
    /// Lithology draws, in draw order
    pub rock_samples: RockSampleAccumulator,
    /// Parameters that fell back to their fixed value
    pub diagnostics: Vec<Diagnostic>,
}

impl PassState {
    /// Create empty pass state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a non-fatal diagnostic and log it.
    pub fn warn(
        &mut self,
        event_index: usize,
        parameter: &str,
        kind: DiagnosticKind,
        message: impl Into<String>,
    ) {
        let diagnostic = Diagnostic::new(event_index, parameter, kind, message);
        warn!(
            event_index,
            parameter,
            kind = kind.name(),
            "{}; using fixed value",
            diagnostic.message
        );
        self.diagnostics.push(diagnostic);
    }

    /// Number of diagnostics recorded so far.
    #[must_use]
    pub fn diagnostics_count(&self) -> u64 {
        self.diagnostics.len() as u64
    }
}
