//! # rh-core
//!
//! Core types for stochastic geological event histories.
//!
//! A [`History`] is an ordered list of [`Event`]s whose parameters are either
//! fixed or described by a distribution. A sampling pass (see `rh-sampler`)
//! resolves it into a [`PassOutput`]: one [`Sample`] per event instance, plus
//! the lithology draws and any non-fatal [`Diagnostic`]s.
//!
//! ## History file
//!
//! ```json
//! [
//!   {"type": "stratigraphy", "parameters": {
//!       "num_layers": {"value": 4, "uncertain": true, "distribution": "uniform", "low": 2, "high": 6},
//!       "layer_thickness": {"value": 300, "uncertain": true, "distribution": "norm", "scale": 50}}},
//!   {"type": "fault", "event_family": true, "nEvents": [1, 4], "parameters": {
//!       "dip": {"value": 60, "uncertain": true, "distribution": "norm", "scale": 5, "skew": 1.5}}}
//! ]
//! ```
//!
//! ## Invariants
//!
//! [`HistorySampleChecker`] verifies a finished pass against the properties
//! every pass must satisfy (order, fixed values, layer consistency, ...).

pub mod diagnostic;
pub mod error;
pub mod event;
pub mod extent;
pub mod history;
pub mod invariants;
pub mod parameter;
pub mod property;
pub mod rock;
pub mod sample;
pub mod value;

pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::ConfigError;
pub use event::{
    Event, EventKind, EventPlan, FamilyBounds, LayerParameter, LayerParameters, Occurrence,
    FAMILY_SIZE_MAX, LAYERS_COUNT_MAX, POSITION_KEY, POSITION_NAMES,
};
pub use extent::{random_positions, Extent};
pub use history::History;
pub use invariants::HistorySampleChecker;
pub use parameter::{DistributionKind, ParameterSpec};
pub use property::{PropertyChecker, PropertyResult, PropertySummary};
pub use rock::{Rock, RockLibrary};
pub use sample::{HistorySample, ParameterValues, PassOutput, RockSampleAccumulator, Sample};
pub use value::Value;
