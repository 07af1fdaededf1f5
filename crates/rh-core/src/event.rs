//! Geological events and their validated sampling plans.
//!
//! An [`Event`] is the declarative record as it appears in a history file.
//! Before any draw, each event is turned into an [`EventPlan`], which splits
//! its parameters structurally into generic scalars and the reserved
//! stratigraphic parameters, and validates occurrence settings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::extent::{random_positions, Extent};
use crate::parameter::ParameterSpec;

/// Positional parameter names, merged into `pos` after sampling.
pub const POSITION_NAMES: [&str; 3] = ["X", "Y", "Z"];

/// Name of the merged position entry.
pub const POSITION_KEY: &str = "pos";

/// Maximum number of instances of one event family.
pub const FAMILY_SIZE_MAX: u64 = 10_000;

/// Maximum number of layers drawn for one layered event instance.
///
/// Larger draws are clamped and reported as a diagnostic.
pub const LAYERS_COUNT_MAX: u64 = 10_000;

/// Kind of geological event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Stratigraphy,
    Unconformity,
    Fold,
    Fault,
    Tilt,
    Dyke,
    Plug,
    Strain,
    Foliation,
    Lineation,
    ShearZone,
    Domain,
}

impl EventKind {
    /// Name as written in history files and sample output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Stratigraphy => "stratigraphy",
            EventKind::Unconformity => "unconformity",
            EventKind::Fold => "fold",
            EventKind::Fault => "fault",
            EventKind::Tilt => "tilt",
            EventKind::Dyke => "dyke",
            EventKind::Plug => "plug",
            EventKind::Strain => "strain",
            EventKind::Foliation => "foliation",
            EventKind::Lineation => "lineation",
            EventKind::ShearZone => "shear_zone",
            EventKind::Domain => "domain",
        }
    }

    /// Whether the event deposits a variable-length stack of layers.
    #[must_use]
    pub fn is_layered(&self) -> bool {
        matches!(self, EventKind::Stratigraphy | EventKind::Unconformity)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reserved stratigraphic parameter names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerParameter {
    NumLayers,
    LayerThickness,
    LayerNames,
    Lithology,
}

impl LayerParameter {
    /// All reserved parameters, in output order.
    pub const ALL: [LayerParameter; 4] = [
        LayerParameter::NumLayers,
        LayerParameter::LayerThickness,
        LayerParameter::LayerNames,
        LayerParameter::Lithology,
    ];

    /// Parameter name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            LayerParameter::NumLayers => "num_layers",
            LayerParameter::LayerThickness => "layer_thickness",
            LayerParameter::LayerNames => "layer_names",
            LayerParameter::Lithology => "lithology",
        }
    }

    /// Look up a reserved parameter by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// The reserved stratigraphic parameters of one event, each optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerParameters {
    pub num_layers: Option<ParameterSpec>,
    pub layer_thickness: Option<ParameterSpec>,
    pub layer_names: Option<ParameterSpec>,
    pub lithology: Option<ParameterSpec>,
}

impl LayerParameters {
    /// Get a reserved parameter.
    #[must_use]
    pub fn get(&self, parameter: LayerParameter) -> Option<&ParameterSpec> {
        match parameter {
            LayerParameter::NumLayers => self.num_layers.as_ref(),
            LayerParameter::LayerThickness => self.layer_thickness.as_ref(),
            LayerParameter::LayerNames => self.layer_names.as_ref(),
            LayerParameter::Lithology => self.lithology.as_ref(),
        }
    }

    fn slot(&mut self, parameter: LayerParameter) -> &mut Option<ParameterSpec> {
        match parameter {
            LayerParameter::NumLayers => &mut self.num_layers,
            LayerParameter::LayerThickness => &mut self.layer_thickness,
            LayerParameter::LayerNames => &mut self.layer_names,
            LayerParameter::Lithology => &mut self.lithology,
        }
    }

    /// Present parameters, in output order.
    pub fn iter(&self) -> impl Iterator<Item = (LayerParameter, &ParameterSpec)> {
        LayerParameter::ALL
            .into_iter()
            .filter_map(move |p| self.get(p).map(|spec| (p, spec)))
    }

    /// Whether no reserved parameter is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// Half-open bounds `[min, max)` on the instance count of an event family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyBounds {
    pub min: u64,
    pub max: u64,
}

impl FamilyBounds {
    /// Whether `min == max`; such bounds always yield `min` instances.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// Whether `count` is a possible instance count.
    #[must_use]
    pub fn admits(&self, count: u64) -> bool {
        if self.is_degenerate() {
            count == self.min
        } else {
            (self.min..self.max).contains(&count)
        }
    }
}

/// Whether and how many times an event occurs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Occurrence {
    /// Bernoulli gate, set only for uncertain events with a probability
    pub probability: Option<f64>,
    /// Instance-count bounds, set only for event families
    pub family: Option<FamilyBounds>,
}

/// One event of a history, as declared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event kind
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Whether the event occurrence is itself uncertain
    #[serde(default)]
    pub uncertain: bool,
    /// Occurrence probability (used when `uncertain`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    /// Whether the event repeats as a family
    #[serde(default)]
    pub event_family: bool,
    /// Family instance-count bounds `[min, max)`
    #[serde(default, rename = "nEvents", skip_serializing_if = "Option::is_none")]
    pub n_events: Option<[u64; 2]>,
    /// Named parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<BTreeMap<String, ParameterSpec>>,
}

impl Event {
    /// Create an event of `kind` with no parameters yet.
    #[must_use]
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            uncertain: false,
            probability: None,
            event_family: false,
            n_events: None,
            parameters: Some(BTreeMap::new()),
        }
    }

    /// Add or replace a parameter.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, spec: ParameterSpec) -> Self {
        self.parameters
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), spec);
        self
    }

    /// Make the event occur with the given probability.
    #[must_use]
    pub fn with_probability(mut self, probability: f64) -> Self {
        self.uncertain = true;
        self.probability = Some(probability);
        self
    }

    /// Repeat the event a random number of times in `[min, max)`.
    #[must_use]
    pub fn as_family(mut self, min: u64, max: u64) -> Self {
        self.event_family = true;
        self.n_events = Some([min, max]);
        self
    }

    /// Place the event at a uniformly random position inside `extent`.
    #[must_use]
    pub fn with_random_position(self, extent: &Extent, z_offset: f64) -> Self {
        let [x, y, z] = random_positions(extent, z_offset);
        self.with_parameter("X", x)
            .with_parameter("Y", y)
            .with_parameter("Z", z)
    }

    /// Validate the event and split its parameters into a sampling plan.
    ///
    /// `event_index` is the position of the event in its history and is
    /// only used for error reporting and sample provenance.
    pub fn plan(&self, event_index: usize) -> Result<EventPlan, ConfigError> {
        let parameters = self
            .parameters
            .as_ref()
            .ok_or(ConfigError::MissingParameters {
                event_index,
                event_type: self.kind.as_str(),
            })?;

        let probability = match (self.uncertain, self.probability) {
            (true, Some(p)) if !(0.0..=1.0).contains(&p) => {
                return Err(ConfigError::ProbabilityOutOfRange {
                    event_index,
                    probability: p,
                });
            }
            (true, p) => p,
            (false, _) => None,
        };

        let family = if self.event_family {
            let [min, max] = self
                .n_events
                .ok_or(ConfigError::MissingFamilyBounds { event_index })?;
            if min > max {
                return Err(ConfigError::InvalidFamilyBounds {
                    event_index,
                    min,
                    max,
                });
            }
            let largest = if min == max { min } else { max - 1 };
            if largest > FAMILY_SIZE_MAX {
                return Err(ConfigError::FamilyTooLarge {
                    event_index,
                    largest,
                    limit: FAMILY_SIZE_MAX,
                });
            }
            Some(FamilyBounds { min, max })
        } else {
            None
        };

        let mut scalars = BTreeMap::new();
        let mut layers = LayerParameters::default();
        for (name, spec) in parameters {
            match LayerParameter::from_name(name) {
                Some(reserved) => *layers.slot(reserved) = Some(spec.clone()),
                None => {
                    scalars.insert(name.clone(), spec.clone());
                }
            }
        }

        let plan = EventPlan {
            event_index,
            kind: self.kind,
            occurrence: Occurrence {
                probability,
                family,
            },
            scalars,
            layers,
        };

        if plan.samples_layers() && plan.layers.layer_thickness.is_none() {
            return Err(ConfigError::MissingLayerThickness { event_index });
        }

        Ok(plan)
    }
}

/// Validated, structurally split event, ready to sample.
#[derive(Debug, Clone, PartialEq)]
pub struct EventPlan {
    /// Position of the event in its history
    pub event_index: usize,
    /// Event kind
    pub kind: EventKind,
    /// Occurrence gate and family bounds
    pub occurrence: Occurrence,
    /// Generic parameters, including positional `X`/`Y`/`Z`
    pub scalars: BTreeMap<String, ParameterSpec>,
    /// Reserved stratigraphic parameters
    pub layers: LayerParameters,
}

impl EventPlan {
    /// Whether the layer structure is drawn rather than passed through.
    ///
    /// True only for layered kinds whose `num_layers` is uncertain.
    #[must_use]
    pub fn samples_layers(&self) -> bool {
        self.kind.is_layered()
            && self
                .layers
                .num_layers
                .as_ref()
                .is_some_and(|spec| spec.uncertain)
    }
}
