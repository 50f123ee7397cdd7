//! Centrality-averaged datasets
//!
//! For every class of a mapping, the datasets of its member events are
//! averaged name by name:
//!
//! - the names considered are the union over all member events found in the
//!   database; a name is averaged over the members that have it
//! - each array is sanitized (NaN and infinities become zero) first
//! - arrays that all share a shape are averaged element by element
//! - otherwise every value of every array is pooled into one scalar mean;
//!   a name with no values at all is left out
//!
//! Member ids missing from the database are skipped.
//!
//! # Examples
//!
//! ```
//! use centrality_analysis::aggregate::aggregate;
//! use centrality_data::{event::EventDatabase, mapping::MappingDocument};
//!
//! let database: EventDatabase = serde_json::from_str(r#"{
//!     "e1": {"A": [1, 2], "B": 10},
//!     "e2": {"B": 20}
//! }"#).unwrap();
//! let document: MappingDocument = serde_json::from_str(r#"{
//!     "physical_organization": "x",
//!     "configurations": {"x": ""},
//!     "mappings": {"x": {"C0-100": {
//!         "e1": {"centrality_range": [0.0, 1.0], "centrality_value": 2.0},
//!         "e2": {"centrality_range": [0.0, 1.0], "centrality_value": 1.0}
//!     }}}
//! }"#).unwrap();
//!
//! let (_, mapping) = document.select(None).unwrap();
//! let averages = aggregate(mapping, &database);
//! let class = averages.get("C0-100").unwrap();
//! assert_eq!(class.get("A").unwrap().values(), [1.0, 2.0]);
//! assert_eq!(class.get("B").unwrap().values(), [15.0]);
//! ```

use std::collections::BTreeSet;

use centrality_data::{
    dataset::Dataset,
    event::EventDatabase,
    keyed::KeyedMap,
    mapping::{ClassAssignments, ConfigurationMapping, MappingDocument},
};
use rayon::prelude::*;

/// Dataset name to averaged dataset, for one class.
pub type ClassAverages = KeyedMap<Dataset>;

/// Class label to averages, for one configuration.
pub type ConfigurationAverages = KeyedMap<ClassAverages>;

/// Averages every class of one configuration. Classes keep mapping order.
#[must_use]
pub fn aggregate(mapping: &ConfigurationMapping, database: &EventDatabase) -> ConfigurationAverages {
    let classes = mapping.iter().collect::<Vec<_>>();
    let averages = classes
        .par_iter()
        .map(|&(label, members)| average_class(label, members, database))
        .collect::<Vec<_>>();
    classes
        .iter()
        .map(|(label, _)| *label)
        .zip(averages)
        .collect()
}

/// Averages every configuration of the document, in document order.
#[must_use]
pub fn aggregate_all(
    document: &MappingDocument,
    database: &EventDatabase,
) -> KeyedMap<ConfigurationAverages> {
    document
        .mappings
        .iter()
        .map(|(id, mapping)| {
            tracing::info!(configuration = id, classes = mapping.len(), "aggregating");
            (id, aggregate(mapping, database))
        })
        .collect()
}

/// Averages the datasets of one class.
#[must_use]
pub fn average_class(
    label: &str,
    members: &ClassAssignments,
    database: &EventDatabase,
) -> ClassAverages {
    let events = members
        .keys()
        .filter_map(|id| {
            let event = database.get(id);
            if event.is_none() {
                tracing::debug!(class = label, event = id, "event not in database, skipped");
            }
            event
        })
        .collect::<Vec<_>>();

    let names = events
        .iter()
        .flat_map(|event| event.names())
        .collect::<BTreeSet<_>>();

    names
        .into_iter()
        .filter_map(|name| {
            let arrays = events
                .iter()
                .filter_map(|event| event.get(name))
                .map(Dataset::sanitized)
                .collect::<Vec<_>>();
            mean_of(label, name, &arrays).map(|mean| (name, mean))
        })
        .collect()
}

#[expect(clippy::cast_precision_loss)]
fn mean_of(label: &str, name: &str, arrays: &[Dataset]) -> Option<Dataset> {
    let (first, rest) = arrays.split_first()?;
    let count = arrays.len() as f64;

    if rest.iter().all(|array| array.shape() == first.shape()) {
        let mut sum = first.values().to_vec();
        for array in rest {
            for (acc, value) in sum.iter_mut().zip(array.values()) {
                *acc += value;
            }
        }
        let mean = sum.into_iter().map(|total| total / count).collect();
        return Dataset::from_shape_vec(first.shape().to_vec(), mean).ok();
    }

    tracing::warn!(
        class = label,
        dataset = name,
        arrays = arrays.len(),
        "shapes differ across events; averaging all values into a scalar"
    );
    let pooled = arrays
        .iter()
        .flat_map(|array| array.values().iter().copied())
        .collect::<Vec<_>>();
    if pooled.is_empty() {
        return None;
    }
    let mean = pooled.iter().sum::<f64>() / pooled.len() as f64;
    Some(Dataset::scalar(mean))
}

#[cfg(test)]
mod tests {
    use centrality_data::{event::EventRecord, mapping::EventAssignment};

    use super::*;

    fn members(ids: &[&str]) -> ClassAssignments {
        ids.iter()
            .map(|id| {
                let assignment = EventAssignment {
                    centrality_range: [0.0, 1.0],
                    centrality_value: 0.0,
                };
                (*id, assignment)
            })
            .collect()
    }

    fn database(json: &str) -> EventDatabase {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_union_of_names() {
        let database = database(r#"{"e1": {"A": 4.0, "B": 1.0}, "e2": {"B": 3.0}}"#);
        let averages = average_class("C0-5", &members(&["e1", "e2"]), &database);
        assert_eq!(averages.keys().collect::<Vec<_>>(), ["A", "B"]);
        assert_eq!(averages.get("A"), Some(&Dataset::scalar(4.0)));
        assert_eq!(averages.get("B"), Some(&Dataset::scalar(2.0)));
    }

    #[test]
    fn test_elementwise_mean_keeps_shape() {
        let database = database(r#"{"e1": {"v": [[1, 2], [3, 4]]}, "e2": {"v": [[3, 4], [5, 6]]}}"#);
        let averages = average_class("C0-5", &members(&["e1", "e2"]), &database);
        let mean = averages.get("v").unwrap();
        assert_eq!(mean.shape(), [2, 2]);
        assert_eq!(mean.values(), [2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_nan_contributes_zero() {
        let database = database(r#"{"e1": {"v": [null, 2]}, "e2": {"v": [4, "inf"]}}"#);
        let averages = average_class("C0-5", &members(&["e1", "e2"]), &database);
        assert_eq!(averages.get("v").unwrap().values(), [2.0, 1.0]);
    }

    #[test]
    fn test_shape_mismatch_falls_back_to_scalar() {
        let database = database(r#"{"e1": {"v": [1, 2, 3]}, "e2": {"v": [[6]]}}"#);
        let averages = average_class("C0-5", &members(&["e1", "e2"]), &database);
        assert_eq!(averages.get("v"), Some(&Dataset::scalar(3.0)));
    }

    #[test]
    fn test_mismatched_empty_arrays_are_omitted() {
        let database = database(r#"{"e1": {"v": [], "w": 1.0}, "e2": {"v": [[]]}}"#);
        let averages = average_class("C0-5", &members(&["e1", "e2"]), &database);
        assert_eq!(averages.get("v"), None);
        assert_eq!(averages.keys().collect::<Vec<_>>(), ["w"]);
    }

    #[test]
    fn test_missing_members_are_skipped() {
        let database = database(r#"{"e1": {"v": 5.0}}"#);
        let averages = average_class("C0-5", &members(&["e1", "ghost"]), &database);
        assert_eq!(averages.get("v"), Some(&Dataset::scalar(5.0)));

        let empty = average_class("C5-10", &members(&["ghost"]), &database);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_classes_keep_mapping_order() {
        let database: EventDatabase = (0..6)
            .map(|i| {
                let record = [("x", Dataset::scalar(f64::from(i)))]
                    .into_iter()
                    .collect::<EventRecord>();
                (format!("e{i}"), record)
            })
            .collect();
        let mut mapping = ConfigurationMapping::new();
        mapping.insert("C0-50", members(&["e5", "e4", "e3"]));
        mapping.insert("C50-100", members(&["e2", "e1", "e0"]));
        mapping.insert("C100-100", members(&[]));

        let averages = aggregate(&mapping, &database);
        assert_eq!(averages.keys().collect::<Vec<_>>(), ["C0-50", "C50-100", "C100-100"]);
        assert_eq!(averages.get("C0-50").unwrap().get("x"), Some(&Dataset::scalar(4.0)));
        assert_eq!(averages.get("C50-100").unwrap().get("x"), Some(&Dataset::scalar(1.0)));
        assert!(averages.get("C100-100").unwrap().is_empty());
    }

    #[test]
    fn test_aggregate_all_configurations() {
        let database = database(r#"{"e1": {"v": 1.0}, "e2": {"v": 3.0}}"#);
        let mut first = ConfigurationMapping::new();
        first.insert("C0-100", members(&["e1", "e2"]));
        let mut second = ConfigurationMapping::new();
        second.insert("C0-50", members(&["e2"]));
        let document = MappingDocument {
            physical_organization: "b".to_owned(),
            configurations: KeyedMap::new(),
            mappings: [("b", first), ("a", second)].into_iter().collect(),
        };

        let all = aggregate_all(&document, &database);
        assert_eq!(all.keys().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(
            all.get("a").unwrap().get("C0-50").unwrap().get("v"),
            Some(&Dataset::scalar(3.0))
        );
    }
}
