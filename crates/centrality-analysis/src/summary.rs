//! Per-event summaries
//!
//! Reduces each event to a handful of quantities that are cheap to store and
//! to average per class:
//!
//! | name           | shape    | source |
//! |----------------|----------|--------|
//! | `vn`           | `[k, 2]` | first row of the differential flow table, `(Re, Im)` of orders `1..=k` |
//! | `meanpT`       | scalar   | `Σ pT·dN / Σ dN` over the flow table (0 if `Σ dN <= 0`) |
//! | `multiplicity` | scalar   | `Σ dN` over the flow table |
//! | `Ncoll`        | scalar   | rows of the collision list |
//! | `Npart`        | scalar   | participant nucleons |
//!
//! Quantities whose source dataset is missing are left out. The summaries
//! form an event database themselves and can be classified or aggregated like
//! the raw container.

use centrality_data::{
    dataset::{Dataset, DatasetError},
    event::{EventDatabase, EventRecord},
};
use rayon::prelude::*;

use crate::{
    observable::{ExtractError, ExtractionConfig, Extractor},
    registry::{ncoll_config, npart_config},
};

/// Differential flow table at mid-rapidity: `pT, dN, Re v1, Im v1, ...`.
pub const FLOW_SOURCE: &str = "particle_9999_vndata_diff_eta_-0.5_0.5.dat";

const MAX_HARMONIC: usize = 10;

/// Kinematic summary of the flow table.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowSummary {
    /// `(Re, Im)` per harmonic, shape `[k, 2]`.
    pub vn: Dataset,
    pub mean_pt: f64,
    pub multiplicity: f64,
}

impl FlowSummary {
    pub fn from_table(data: &Dataset) -> Result<Self, DatasetError> {
        let data = data.sanitized();
        let table = data.as_table()?;

        // columns 2i and 2i + 1 hold harmonic i
        let orders = MAX_HARMONIC
            .min(table.ncols().saturating_sub(1) / 2)
            .saturating_sub(1);
        let vn = (1..=orders)
            .flat_map(|i| [2 * i, 2 * i + 1])
            .map(|column| table.get(0, column).unwrap_or(0.0))
            .collect::<Vec<_>>();
        let vn = Dataset::from_shape_vec(vec![vn.len() / 2, 2], vn)?;

        let (weighted, multiplicity) = table
            .rows()
            .filter(|row| row.len() >= 2)
            .fold((0.0, 0.0), |(weighted, total), row| {
                (weighted + row[0] * row[1], total + row[1])
            });
        let mean_pt = if multiplicity > 0.0 {
            weighted / multiplicity
        } else {
            0.0
        };

        Ok(Self {
            vn,
            mean_pt,
            multiplicity,
        })
    }
}

/// Builds event summaries; the collision and participant extractors are
/// compiled once and shared by every event.
#[derive(Debug)]
pub struct Summarizer {
    ncoll: ExtractionConfig,
    npart: ExtractionConfig,
}

impl Default for Summarizer {
    fn default() -> Self {
        Self {
            ncoll: ncoll_config(),
            npart: npart_config(),
        }
    }
}

impl Summarizer {
    pub fn summarize(&self, database: &EventDatabase) -> Result<EventDatabase, ExtractError> {
        let ncoll = self.ncoll.compile()?;
        let npart = self.npart.compile()?;
        let events = database.iter().collect::<Vec<_>>();
        let summaries = events
            .par_iter()
            .map(|&(id, event)| (id, summarize_event(id, event, &ncoll, &npart)))
            .collect::<Vec<_>>();
        Ok(summaries.into_iter().collect())
    }
}

fn summarize_event(
    event_id: &str,
    event: &EventRecord,
    ncoll: &Extractor<'_>,
    npart: &Extractor<'_>,
) -> EventRecord {
    let mut summary = EventRecord::new();
    if let Some(table) = event.get(FLOW_SOURCE) {
        match FlowSummary::from_table(table) {
            Ok(flow) => {
                summary.insert("vn", flow.vn);
                summary.insert("meanpT", Dataset::scalar(flow.mean_pt));
                summary.insert("multiplicity", Dataset::scalar(flow.multiplicity));
            }
            Err(err) => tracing::warn!(event = event_id, "skipping flow summary: {err}"),
        }
    }
    if let Some(value) = ncoll.extract(event_id, event) {
        summary.insert("Ncoll", Dataset::scalar(value));
    }
    if let Some(value) = npart.extract(event_id, event) {
        summary.insert("Npart", Dataset::scalar(value));
    }
    summary
}
