//! Event records and the per-event database
//!
//! The raw container of a simulation campaign is a JSON object keyed by event
//! id. Each event holds named datasets:
//!
//! ```json
//! {
//!   "event_0": {
//!     "NcollList0.dat": [[0.1, 0.2], [0.3, 0.4]],
//!     "particle_9999_vndata_eta_-0.5_0.5.dat": [[1.0, 1520.3, 0.0]]
//!   },
//!   "event_1": { "...": "..." }
//! }
//! ```
//!
//! Both levels iterate in lexicographic key order. The database order defines
//! the tie order for classification and the "first match" for dataset name
//! patterns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;

/// The named datasets of one event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventRecord {
    datasets: BTreeMap<String, Dataset>,
}

impl EventRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Dataset> {
        self.datasets.get(name)
    }

    pub fn insert<N>(&mut self, name: N, dataset: Dataset) -> Option<Dataset>
    where
        N: Into<String>,
    {
        self.datasets.insert(name.into(), dataset)
    }

    /// Dataset names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Dataset)> {
        self.datasets.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

impl<N> FromIterator<(N, Dataset)> for EventRecord
where
    N: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, Dataset)>>(iter: I) -> Self {
        Self {
            datasets: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// All events of a campaign, keyed by event id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventDatabase {
    events: BTreeMap<String, EventRecord>,
}

impl EventDatabase {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, event_id: &str) -> Option<&EventRecord> {
        self.events.get(event_id)
    }

    pub fn insert<N>(&mut self, event_id: N, record: EventRecord) -> Option<EventRecord>
    where
        N: Into<String>,
    {
        self.events.insert(event_id.into(), record)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EventRecord)> {
        self.events.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Event ids in database order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.events.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<N> FromIterator<(N, EventRecord)> for EventDatabase
where
    N: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, EventRecord)>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
