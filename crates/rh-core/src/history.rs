//! Event histories and their loading from JSON.
//!
//! A history may carry the model extent it was authored against. The extent
//! is metadata for downstream model building; sampling never reads it. Event
//! positions come only from each event's own parameters, see
//! [`Event::with_random_position`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::event::{Event, EventPlan};
use crate::extent::Extent;

/// Ordered sequence of events.
///
/// The order is the order of the eventual geological model and is
/// preserved by every sampling pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    /// Model extent the events were laid out in, if known.
    /// Carried through unchanged; not used when sampling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent: Option<Extent>,
    /// Events, oldest first
    pub events: Vec<Event>,
}

impl History {
    /// Create a history from events.
    #[must_use]
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            extent: None,
            events,
        }
    }

    /// Attach the model extent.
    #[must_use]
    pub fn with_extent(mut self, extent: Extent) -> Self {
        self.extent = Some(extent);
        self
    }

    /// Append an event.
    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the history has no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Parse a history from JSON.
    ///
    /// Accepts either a bare array of events or an object with `events`
    /// and an optional `extent`.
    ///
    /// The shape is picked from the first token, so a malformed event is
    /// reported with its own serde error and location.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        if json.trim_start().starts_with('[') {
            let events: Vec<Event> = serde_json::from_str(json)?;
            Ok(Self::new(events))
        } else {
            Ok(serde_json::from_str(json)?)
        }
    }

    /// Load a history from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Validate every event into a sampling plan.
    ///
    /// Fails on the first malformed event; no plan is returned unless all
    /// events are valid.
    pub fn plan(&self) -> Result<Vec<EventPlan>, ConfigError> {
        self.events
            .iter()
            .enumerate()
            .map(|(event_index, event)| event.plan(event_index))
            .collect()
    }
}
