//! The centrality mapping document
//!
//! Classification writes one document covering every extraction
//! configuration; aggregation and relocation read it back. The layout is:
//!
//! ```json
//! {
//!   "physical_organization": "central_dNdy",
//!   "configurations": { "central_dNdy": "Charged particle multiplicity in |eta| < 0.5" },
//!   "mappings": {
//!     "central_dNdy": {
//!       "C0-5": {
//!         "event_17": { "centrality_range": [0.0, 0.05], "centrality_value": 1873.2 }
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! Configurations, classes and events keep their document order.

use serde::{Deserialize, Serialize};

use crate::keyed::KeyedMap;

/// Where one event landed for one configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventAssignment {
    /// `[low, high]` as fractions of the event count.
    pub centrality_range: [f64; 2],
    /// The observable that placed the event.
    pub centrality_value: f64,
}

/// Event id to assignment, for the members of one class.
pub type ClassAssignments = KeyedMap<EventAssignment>;

/// Class label to members, for one configuration.
pub type ConfigurationMapping = KeyedMap<ClassAssignments>;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum MappingError {
    #[display("the mapping contains no configurations")]
    Empty,
    #[display(
        "unknown configuration '{requested}' (available: {})",
        available.join(", ")
    )]
    UnknownConfiguration {
        requested: String,
        available: Vec<String>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingDocument {
    /// The configuration used to lay out simulation artifacts on disk.
    pub physical_organization: String,
    /// Configuration id to human-readable description.
    pub configurations: KeyedMap<String>,
    pub mappings: KeyedMap<ConfigurationMapping>,
}

impl MappingDocument {
    /// Configuration ids that have a mapping, in document order.
    pub fn configuration_ids(&self) -> impl Iterator<Item = &str> {
        self.mappings.keys()
    }

    /// Picks a configuration by id, or the first one when `requested` is `None`.
    ///
    /// ```
    /// use centrality_data::mapping::{MappingDocument, MappingError};
    ///
    /// let doc: MappingDocument = serde_json::from_str(r#"{
    ///     "physical_organization": "b",
    ///     "configurations": {"b": "", "a": ""},
    ///     "mappings": {"b": {}, "a": {}}
    /// }"#).unwrap();
    ///
    /// assert_eq!(doc.select(None).unwrap().0, "b");
    /// assert_eq!(doc.select(Some("a")).unwrap().0, "a");
    /// assert!(matches!(
    ///     doc.select(Some("c")),
    ///     Err(MappingError::UnknownConfiguration { .. })
    /// ));
    /// ```
    pub fn select(
        &self,
        requested: Option<&str>,
    ) -> Result<(&str, &ConfigurationMapping), MappingError> {
        match requested {
            None => self.mappings.first().ok_or(MappingError::Empty),
            Some(id) => self
                .mappings
                .iter()
                .find(|(key, _)| *key == id)
                .ok_or_else(|| MappingError::UnknownConfiguration {
                    requested: id.to_owned(),
                    available: self.configuration_ids().map(str::to_owned).collect(),
                }),
        }
    }

    /// The mapping of the physical configuration, if it was produced.
    #[must_use]
    pub fn physical(&self) -> Option<&ConfigurationMapping> {
        self.mappings.get(&self.physical_organization)
    }
}
