//! Invariants of a sampled history.
//!
//! | Property | Description |
//! |----------|-------------|
//! | OrderPreserved | Samples follow history order; family runs are contiguous |
//! | EventTypeMatches | Each sample carries the type of its source event |
//! | FixedParametersPreserved | Fixed parameters resolve to their declared value |
//! | PositionMerged | `X`/`Y`/`Z` are merged into `pos` exactly when all three exist |
//! | StratigraphicConsistency | Layer arrays have `num_layers` entries |
//! | LayerNaming | Layer names are `Layer 1` .. `Layer n` |
//! | FamilyMultiplicity | Instance counts respect gates and family bounds |
//! | RockSamplesFromLibrary | Lithology draws come from the library, one per layer |

use std::collections::BTreeMap;

use crate::event::{EventPlan, LayerParameter, POSITION_KEY, POSITION_NAMES};
use crate::history::History;
use crate::property::{PropertyChecker, PropertyResult};
use crate::rock::RockLibrary;
use crate::sample::{PassOutput, Sample};
use crate::value::Value;

/// Property checker for one finished sampling pass.
pub struct HistorySampleChecker<'a> {
    history: &'a History,
    output: &'a PassOutput,
    library: Option<&'a RockLibrary>,
}

impl<'a> HistorySampleChecker<'a> {
    /// Create a checker for `output`, sampled from `history`.
    #[must_use]
    pub fn new(history: &'a History, output: &'a PassOutput) -> Self {
        Self {
            history,
            output,
            library: None,
        }
    }

    /// Set the rock library the pass was sampled with.
    #[must_use]
    pub fn with_library(mut self, library: &'a RockLibrary) -> Self {
        self.library = Some(library);
        self
    }

    /// Plan of the event a sample came from, if it exists and is valid.
    fn plan_of(&self, sample: &Sample) -> Option<EventPlan> {
        self.history
            .events
            .get(sample.event_index)
            .and_then(|event| event.plan(sample.event_index).ok())
    }

    fn check_order_preserved(&self) -> PropertyResult {
        let mut violations = Vec::new();
        let mut previous = 0;

        for (position, sample) in self.output.samples.iter().enumerate() {
            if sample.event_index >= self.history.len() {
                violations.push(format!(
                    "sample {} refers to event {} of {}",
                    position,
                    sample.event_index,
                    self.history.len()
                ));
            }
            if sample.event_index < previous {
                violations.push(format!(
                    "sample {} (event {}) follows event {}",
                    position, sample.event_index, previous
                ));
            }
            previous = sample.event_index;
        }

        PropertyResult::from_violations("OrderPreserved", violations)
    }

    fn check_event_type_matches(&self) -> PropertyResult {
        let violations = self
            .output
            .samples
            .iter()
            .enumerate()
            .filter_map(|(position, sample)| {
                let event = self.history.events.get(sample.event_index)?;
                (event.kind.as_str() != sample.event_type).then(|| {
                    format!(
                        "sample {} is `{}`, event {} is `{}`",
                        position, sample.event_type, sample.event_index, event.kind
                    )
                })
            })
            .collect();

        PropertyResult::from_violations("EventTypeMatches", violations)
    }

    fn check_fixed_parameters_preserved(&self) -> PropertyResult {
        let mut violations = Vec::new();

        for (position, sample) in self.output.samples.iter().enumerate() {
            let Some(plan) = self.plan_of(sample) else {
                continue;
            };

            for (name, spec) in &plan.scalars {
                if spec.uncertain || POSITION_NAMES.contains(&name.as_str()) {
                    continue;
                }
                if sample.get(name) != Some(&spec.value) {
                    violations.push(format!(
                        "sample {}: `{}` is {:?}, declared {:?}",
                        position,
                        name,
                        sample.get(name),
                        spec.value
                    ));
                }
            }

            let fixed_position: Option<Vec<Value>> = POSITION_NAMES
                .iter()
                .map(|name| {
                    plan.scalars
                        .get(*name)
                        .filter(|spec| !spec.uncertain)
                        .map(|spec| spec.value.clone())
                })
                .collect();
            if let Some(expected) = fixed_position {
                if sample.get(POSITION_KEY) != Some(&Value::List(expected)) {
                    violations.push(format!("sample {}: `pos` differs from fixed X/Y/Z", position));
                }
            }

            if !plan.samples_layers() {
                for (parameter, spec) in plan.layers.iter() {
                    if sample.get(parameter.name()) != Some(&spec.value) {
                        violations.push(format!(
                            "sample {}: `{}` was not passed through",
                            position,
                            parameter.name()
                        ));
                    }
                }
            }
        }

        PropertyResult::from_violations("FixedParametersPreserved", violations)
    }

    fn check_position_merged(&self) -> PropertyResult {
        let mut violations = Vec::new();

        for (position, sample) in self.output.samples.iter().enumerate() {
            let present = POSITION_NAMES
                .iter()
                .filter(|name| sample.values.contains_key(**name))
                .count();

            if present == POSITION_NAMES.len() {
                violations.push(format!("sample {}: X/Y/Z left unmerged", position));
            }
            if present > 0 && sample.values.contains_key(POSITION_KEY) {
                violations.push(format!("sample {}: residual X/Y/Z next to `pos`", position));
            }
            if let Some(pos) = sample.get(POSITION_KEY) {
                if pos.as_list().map(<[Value]>::len) != Some(POSITION_NAMES.len()) {
                    violations.push(format!("sample {}: `pos` is not a 3-element list", position));
                }
            }
        }

        PropertyResult::from_violations("PositionMerged", violations)
    }

    /// Samples whose layer structure was drawn, with their layer count.
    fn layered_samples(&self) -> Vec<(usize, &'a Sample, Option<i64>)> {
        self.output
            .samples
            .iter()
            .enumerate()
            .filter(|(_, sample)| self.plan_of(sample).is_some_and(|plan| plan.samples_layers()))
            .map(|(position, sample)| {
                let count = sample
                    .get(LayerParameter::NumLayers.name())
                    .and_then(Value::as_i64);
                (position, sample, count)
            })
            .collect()
    }

    fn check_stratigraphic_consistency(&self) -> PropertyResult {
        let mut violations = Vec::new();

        for (position, sample, count) in self.layered_samples() {
            let Some(count) = count.filter(|c| *c >= 0) else {
                violations.push(format!("sample {}: `num_layers` is not a count", position));
                continue;
            };

            for parameter in [LayerParameter::LayerThickness, LayerParameter::LayerNames] {
                let len = sample
                    .get(parameter.name())
                    .and_then(Value::as_list)
                    .map(<[Value]>::len);
                if len != Some(count as usize) {
                    violations.push(format!(
                        "sample {}: `{}` has {:?} entries for {} layers",
                        position,
                        parameter.name(),
                        len,
                        count
                    ));
                }
            }
        }

        PropertyResult::from_violations("StratigraphicConsistency", violations)
    }

    fn check_layer_naming(&self) -> PropertyResult {
        let mut violations = Vec::new();

        for (position, sample, _) in self.layered_samples() {
            let Some(names) = sample
                .get(LayerParameter::LayerNames.name())
                .and_then(Value::as_list)
            else {
                continue;
            };

            for (i, name) in names.iter().enumerate() {
                let expected = format!("Layer {}", i + 1);
                if name.as_str() != Some(expected.as_str()) {
                    violations.push(format!(
                        "sample {}: layer {} is named {:?}",
                        position,
                        i + 1,
                        name
                    ));
                }
            }
        }

        PropertyResult::from_violations("LayerNaming", violations)
    }

    fn check_family_multiplicity(&self) -> PropertyResult {
        let mut counts: BTreeMap<usize, u64> = BTreeMap::new();
        for sample in &self.output.samples {
            *counts.entry(sample.event_index).or_default() += 1;
        }

        let mut violations = Vec::new();
        for (event_index, event) in self.history.events.iter().enumerate() {
            let Ok(plan) = event.plan(event_index) else {
                continue;
            };
            let count = counts.get(&event_index).copied().unwrap_or(0);
            let gated = plan.occurrence.probability.is_some();

            let admitted = match plan.occurrence.family {
                Some(bounds) => bounds.admits(count) || (gated && count == 0),
                None if gated => count <= 1,
                None => count == 1,
            };
            if !admitted {
                violations.push(format!(
                    "event {} ({}): {} instances",
                    event_index, event.kind, count
                ));
            }
        }

        PropertyResult::from_violations("FamilyMultiplicity", violations)
    }

    fn check_rock_samples_from_library(&self) -> PropertyResult {
        let name = "RockSamplesFromLibrary";
        let rocks = &self.output.rock_samples;

        let library = match self.library {
            Some(library) if !library.is_empty() => library,
            _ => {
                return if rocks.is_empty() {
                    PropertyResult::pass(name)
                } else {
                    PropertyResult::fail(
                        name,
                        format!("{} lithology draws without a rock library", rocks.len()),
                    )
                };
            }
        };

        let mut violations: Vec<String> = rocks
            .iter()
            .filter(|rock| !library.contains(rock))
            .map(|rock| format!("`{}` is not in the rock library", rock))
            .collect();

        let layers_total: i64 = self
            .layered_samples()
            .iter()
            .filter_map(|(_, _, count)| *count)
            .map(|count| count.max(0))
            .sum();
        if layers_total != rocks.len() as i64 {
            violations.push(format!(
                "{} lithology draws for {} sampled layers",
                rocks.len(),
                layers_total
            ));
        }

        PropertyResult::from_violations(name, violations)
    }
}

impl PropertyChecker for HistorySampleChecker<'_> {
    fn check_all(&self) -> Vec<PropertyResult> {
        vec![
            self.check_order_preserved(),
            self.check_event_type_matches(),
            self.check_fixed_parameters_preserved(),
            self.check_position_merged(),
            self.check_stratigraphic_consistency(),
            self.check_layer_naming(),
            self.check_family_multiplicity(),
            self.check_rock_samples_from_library(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, EventKind};
    use crate::parameter::ParameterSpec;

    fn fold_history() -> History {
        History::new(vec![Event::new(EventKind::Fold)
            .with_parameter("X", ParameterSpec::fixed(10_i64))
            .with_parameter("Y", ParameterSpec::fixed(20_i64))
            .with_parameter("Z", ParameterSpec::fixed(5_i64))
            .with_parameter("amplitude", ParameterSpec::fixed(50_i64))])
    }

    fn fold_sample(values: Vec<(&str, Value)>) -> Sample {
        Sample {
            event_index: 0,
            event_type: "fold".to_string(),
            values: values
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            family_seed: None,
        }
    }

    fn output(samples: Vec<Sample>, rock_samples: Vec<String>) -> PassOutput {
        PassOutput {
            seed: 42,
            samples,
            rock_samples,
            diagnostics: Vec::new(),
        }
    }

    fn merged_fold() -> Sample {
        fold_sample(vec![
            (
                "pos",
                Value::List(vec![Value::Integer(10), Value::Integer(20), Value::Integer(5)]),
            ),
            ("amplitude", Value::Integer(50)),
        ])
    }

    fn failed(checker: &HistorySampleChecker<'_>) -> Vec<&'static str> {
        checker
            .check_all()
            .into_iter()
            .filter(|r| !r.holds)
            .map(|r| r.name)
            .collect()
    }

    #[test]
    fn test_valid_fold_passes_everything() {
        let history = fold_history();
        let output = output(vec![merged_fold()], Vec::new());
        let checker = HistorySampleChecker::new(&history, &output);

        assert!(checker.all_hold(), "{}", checker.summary().format_report());
    }

    #[test]
    fn test_unmerged_position_is_flagged() {
        let history = fold_history();
        let output = output(
            vec![fold_sample(vec![
                ("X", Value::Integer(10)),
                ("Y", Value::Integer(20)),
                ("Z", Value::Integer(5)),
                ("amplitude", Value::Integer(50)),
            ])],
            Vec::new(),
        );
        let checker = HistorySampleChecker::new(&history, &output);

        let failed = failed(&checker);
        assert!(failed.contains(&"PositionMerged"));
        assert!(failed.contains(&"FixedParametersPreserved"));
    }

    #[test]
    fn test_changed_fixed_value_is_flagged() {
        let history = fold_history();
        let mut sample = merged_fold();
        sample.values.insert("amplitude".to_string(), Value::Integer(51));
        let output = output(vec![sample], Vec::new());
        let checker = HistorySampleChecker::new(&history, &output);

        assert_eq!(failed(&checker), vec!["FixedParametersPreserved"]);
    }

    #[test]
    fn test_missing_instance_is_flagged() {
        let history = fold_history();
        let output = output(Vec::new(), Vec::new());
        let checker = HistorySampleChecker::new(&history, &output);

        assert_eq!(failed(&checker), vec!["FamilyMultiplicity"]);
    }

    #[test]
    fn test_out_of_order_samples_are_flagged() {
        let mut history = fold_history();
        history.push(history.events[0].clone());
        let mut second = merged_fold();
        second.event_index = 1;
        let output = output(vec![second, merged_fold()], Vec::new());
        let checker = HistorySampleChecker::new(&history, &output);

        assert_eq!(failed(&checker), vec!["OrderPreserved"]);
    }

    fn strat_history() -> History {
        History::new(vec![Event::new(EventKind::Stratigraphy)
            .with_parameter("num_layers", ParameterSpec::uniform(1.0, 5.0))
            .with_parameter("layer_thickness", ParameterSpec::norm(100.0, 10.0))])
    }

    fn strat_sample(count: i64, names: Vec<&str>, thickness_count: usize) -> Sample {
        Sample {
            event_index: 0,
            event_type: "stratigraphy".to_string(),
            values: BTreeMap::from([
                ("num_layers".to_string(), Value::Integer(count)),
                (
                    "layer_names".to_string(),
                    Value::List(names.into_iter().map(Value::from).collect()),
                ),
                (
                    "layer_thickness".to_string(),
                    Value::List(vec![Value::Number(100.0); thickness_count]),
                ),
            ]),
            family_seed: None,
        }
    }

    #[test]
    fn test_consistent_layers_pass() {
        let history = strat_history();
        let library = RockLibrary::from_names(["shale", "sandstone"]);
        let output = output(
            vec![strat_sample(2, vec!["Layer 1", "Layer 2"], 2)],
            vec!["shale".to_string(), "shale".to_string()],
        );
        let checker = HistorySampleChecker::new(&history, &output).with_library(&library);

        assert!(checker.all_hold(), "{}", checker.summary().format_report());
    }

    #[test]
    fn test_layer_count_mismatch_is_flagged() {
        let history = strat_history();
        let output = output(vec![strat_sample(3, vec!["Layer 1", "Layer 2"], 3)], Vec::new());
        let checker = HistorySampleChecker::new(&history, &output);

        assert_eq!(failed(&checker), vec!["StratigraphicConsistency"]);
    }

    #[test]
    fn test_bad_layer_names_are_flagged() {
        let history = strat_history();
        let output = output(vec![strat_sample(2, vec!["Layer 0", "Layer 1"], 2)], Vec::new());
        let checker = HistorySampleChecker::new(&history, &output);

        assert_eq!(failed(&checker), vec!["LayerNaming"]);
    }

    #[test]
    fn test_foreign_rock_is_flagged() {
        let history = strat_history();
        let library = RockLibrary::from_names(["shale"]);
        let output = output(
            vec![strat_sample(1, vec!["Layer 1"], 1)],
            vec!["granite".to_string()],
        );
        let checker = HistorySampleChecker::new(&history, &output).with_library(&library);

        assert_eq!(failed(&checker), vec!["RockSamplesFromLibrary"]);
    }

    #[test]
    fn test_rocks_without_library_are_flagged() {
        let history = strat_history();
        let output = output(
            vec![strat_sample(1, vec!["Layer 1"], 1)],
            vec!["shale".to_string()],
        );
        let checker = HistorySampleChecker::new(&history, &output);

        assert_eq!(failed(&checker), vec!["RockSamplesFromLibrary"]);
    }
}
