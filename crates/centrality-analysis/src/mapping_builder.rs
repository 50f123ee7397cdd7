//! Classification of a whole database under every registered configuration
//!
//! Each configuration is processed on its own: the observable is extracted
//! for every event, the valid events are binned, and the result is kept as a
//! [`ConfigurationResult`]. The results are merged once into a
//! [`MappingDocument`]. A configuration that fails (bad dataset pattern) or
//! finds no valid events contributes an empty mapping and never affects the
//! others.
//!
//! Configurations and events are both processed in parallel with rayon.
//! Results are collected in registry and database order, so the produced
//! document is identical from run to run.

use centrality_data::{
    event::EventDatabase,
    mapping::{ClassAssignments, ConfigurationMapping, EventAssignment, MappingDocument},
};
use centrality_stats::binning::{Classification, CutPoints, classify};
use rayon::prelude::*;

use crate::{
    observable::{ExtractError, ExtractionConfig, Extractor},
    registry::Registry,
};

/// The outcome of classifying the database under one configuration.
#[derive(Debug)]
pub struct ConfigurationResult<'a> {
    pub config: &'a ExtractionConfig,
    pub outcome: Result<Classification<String>, ExtractError>,
}

impl ConfigurationResult<'_> {
    /// The class to event table written to the mapping document.
    #[must_use]
    pub fn to_mapping(&self) -> ConfigurationMapping {
        let Ok(classification) = &self.outcome else {
            return ConfigurationMapping::new();
        };
        classification
            .classes
            .iter()
            .map(|class| {
                let centrality_range = class.range.as_fractions();
                let members = class
                    .members
                    .iter()
                    .map(|member| {
                        let assignment = EventAssignment {
                            centrality_range,
                            centrality_value: member.value,
                        };
                        (member.id.clone(), assignment)
                    })
                    .collect::<ClassAssignments>();
                (class.label.clone(), members)
            })
            .collect()
    }
}

/// Computes the observable of every event, keeping only present values.
///
/// The result is in database order.
#[must_use]
pub fn extract_observables(extractor: &Extractor<'_>, database: &EventDatabase) -> Vec<(String, f64)> {
    let events = database.iter().collect::<Vec<_>>();
    events
        .par_iter()
        .filter_map(|&(id, event)| {
            extractor
                .extract(id, event)
                .map(|value| (id.to_owned(), value))
        })
        .collect()
}

/// Extracts and bins the database under a single configuration.
pub fn classify_configuration<'a>(
    config: &'a ExtractionConfig,
    database: &EventDatabase,
    cuts: &CutPoints,
) -> ConfigurationResult<'a> {
    let outcome = config.compile().map(|extractor| {
        let observables = extract_observables(&extractor, database);
        classify(observables, cuts)
    });

    match &outcome {
        Err(err) => tracing::error!(configuration = %config.id, "{err}; mapping left empty"),
        Ok(classification) if classification.is_empty() => tracing::warn!(
            configuration = %config.id,
            events = database.len(),
            "no valid events; mapping left empty"
        ),
        Ok(classification) => {
            tracing::info!(
                configuration = %config.id,
                valid = classification.valid_count,
                events = database.len(),
                "classified events"
            );
            if classification.unclassified > 0 {
                tracing::warn!(
                    configuration = %config.id,
                    unclassified = classification.unclassified,
                    "cut points do not cover every event"
                );
            }
        }
    }

    ConfigurationResult { config, outcome }
}

/// Classifies the database under every configuration of `registry`.
#[must_use]
pub fn classify_all<'a>(
    registry: &'a Registry,
    database: &EventDatabase,
    cuts: &CutPoints,
) -> Vec<ConfigurationResult<'a>> {
    registry
        .configurations()
        .par_iter()
        .map(|config| classify_configuration(config, database, cuts))
        .collect()
}

/// Merges per-configuration results into one document.
#[must_use]
pub fn assemble(physical_organization: &str, results: &[ConfigurationResult<'_>]) -> MappingDocument {
    MappingDocument {
        physical_organization: physical_organization.to_owned(),
        configurations: results
            .iter()
            .map(|result| (result.config.id.clone(), result.config.description.clone()))
            .collect(),
        mappings: results
            .iter()
            .map(|result| (result.config.id.clone(), result.to_mapping()))
            .collect(),
    }
}

/// Classifies the database under every configuration and builds the document.
///
/// ```
/// use centrality_analysis::{mapping_builder::build_mapping, registry::Registry};
/// use centrality_data::event::EventDatabase;
/// use centrality_stats::binning::CutPoints;
///
/// let database: EventDatabase = serde_json::from_str(r#"{
///     "event_0": {"NcollList0.dat": [[0, 0], [0, 0], [0, 0]]},
///     "event_1": {"NcollList1.dat": [[0, 0]]}
/// }"#).unwrap();
/// let cuts = CutPoints::new(vec![0.0, 50.0, 100.0]).unwrap();
/// let document = build_mapping(&database, &Registry::builtin(), "Ncoll", &cuts);
///
/// let ncoll = document.physical().unwrap();
/// assert_eq!(ncoll.get("C0-50").unwrap().keys().collect::<Vec<_>>(), ["event_0"]);
/// assert_eq!(ncoll.get("C50-100").unwrap().keys().collect::<Vec<_>>(), ["event_1"]);
/// // no event carries the dN/dy table
/// assert!(document.mappings.get("central_dNdy").unwrap().is_empty());
/// ```
#[must_use]
pub fn build_mapping(
    database: &EventDatabase,
    registry: &Registry,
    physical_organization: &str,
    cuts: &CutPoints,
) -> MappingDocument {
    let results = classify_all(registry, database, cuts);
    assemble(physical_organization, &results)
}
