//! Charged-particle yields and the participant table
//!
//! The table lists, per event, the number of binary collisions, the number of
//! participants, and the charged-particle yield inside the acceptance of
//! three LHC experiments:
//!
//! ```text
//! EventID       Ncoll   Npart   Nch_ALICE   Nch_CMS     Nch_ATLAS
//! event_0       1523    342     2.1043e3    1.4390e3    1.0215e3
//! ```
//!
//! Yields integrate the differential spectrum (`pT`, `dN/(2π pT dpT)`) of the
//! experiment's pseudorapidity window over its `pT` range. A yield whose
//! spectrum is missing or unusable is written as `-1`.

use std::{
    f64::consts::PI,
    io::{self, Write},
};

use centrality_data::{
    dataset::Dataset,
    event::{EventDatabase, EventRecord},
};
use rayon::prelude::*;

use crate::{
    observable::{ExtractError, Extractor},
    registry::{ncoll_config, npart_config},
};

const GRID_POINTS: usize = 50;
const LOG_OFFSET: f64 = 1e-30;
const MISSING_YIELD: f64 = -1.0;

/// Kinematic acceptance of one experiment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Acceptance {
    pub experiment: &'static str,
    pub pt_min: f64,
    pub pt_max: f64,
    /// Differential spectrum for the experiment's pseudorapidity window.
    pub spectrum: &'static str,
}

pub const ACCEPTANCES: [Acceptance; 3] = [
    Acceptance {
        experiment: "ALICE",
        pt_min: 0.2,
        pt_max: 3.0,
        spectrum: "particle_9999_vndata_diff_eta_-0.8_0.8.dat",
    },
    Acceptance {
        experiment: "CMS",
        pt_min: 0.3,
        pt_max: 3.0,
        spectrum: "particle_9999_vndata_diff_eta_-0.5_0.5.dat",
    },
    Acceptance {
        experiment: "ATLAS",
        pt_min: 0.5,
        pt_max: 3.0,
        spectrum: "particle_9999_vndata_diff_eta_-0.5_0.5.dat",
    },
];

/// Integrates a `pT` spectrum over `[pt_min, pt_max]`.
///
/// The spectrum is resampled on a uniform 50-point grid by linear
/// interpolation of `ln(dN)`, then `N = 2π Σ dN(pT) pT ΔpT`. Outside the
/// tabulated range the edge values are used. Returns `None` if the dataset is
/// not a table with at least one row and two columns.
///
/// ```
/// use centrality_analysis::yields::charged_yield;
/// use centrality_data::dataset::Dataset;
///
/// let flat = Dataset::from_rows([vec![0.0, 1.0], vec![10.0, 1.0]]).unwrap();
/// let n = charged_yield(&flat, 0.0, 2.0).unwrap();
/// // 2π ∫ pT dpT over [0, 2] with a 50-point sum
/// assert!((n - 2.0 * std::f64::consts::PI * 2.0 * 50.0 / 49.0).abs() < 1e-9);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn charged_yield(spectrum: &Dataset, pt_min: f64, pt_max: f64) -> Option<f64> {
    let spectrum = spectrum.sanitized();
    let table = spectrum.as_table().ok()?;
    let pt = table.column(0)?;
    let log_dn = table
        .column(1)?
        .into_iter()
        .map(|dn| (dn + LOG_OFFSET).ln())
        .collect::<Vec<_>>();
    if pt.is_empty() {
        return None;
    }

    let step = (pt_max - pt_min) / (GRID_POINTS - 1) as f64;
    let sum = (0..GRID_POINTS)
        .map(|i| {
            let x = pt_min + step * i as f64;
            interpolate(x, &pt, &log_dn).exp() * x
        })
        .sum::<f64>();
    Some(2.0 * PI * sum * step)
}

/// Piecewise-linear interpolation on increasing `xs`, clamped at both ends.
fn interpolate(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    let last = xs.len() - 1;
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[last] {
        return ys[last];
    }
    // first index with xs[i] > x; 1..=last here
    let upper = xs.partition_point(|&v| v <= x);
    let lower = upper - 1;
    let span = xs[upper] - xs[lower];
    if span <= 0.0 {
        return ys[upper];
    }
    let t = (x - xs[lower]) / span;
    ys[lower] + t * (ys[upper] - ys[lower])
}

/// One line of the participant table.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantRow {
    pub event_id: String,
    pub ncoll: f64,
    pub npart: f64,
    /// Charged yields in [`ACCEPTANCES`] order; `-1` when unavailable.
    pub nch: [f64; 3],
}

/// Builds the participant table in database order.
///
/// Events without collision or participant lists are skipped with a warning.
pub fn participant_table(database: &EventDatabase) -> Result<Vec<ParticipantRow>, ExtractError> {
    let ncoll_config = ncoll_config();
    let npart_config = npart_config();
    let ncoll = ncoll_config.compile()?;
    let npart = npart_config.compile()?;

    let events = database.iter().collect::<Vec<_>>();
    let rows = events
        .par_iter()
        .filter_map(|&(id, event)| participant_row(id, event, &ncoll, &npart))
        .collect();
    Ok(rows)
}

fn participant_row(
    event_id: &str,
    event: &EventRecord,
    collisions: &Extractor<'_>,
    participants: &Extractor<'_>,
) -> Option<ParticipantRow> {
    let (Some(ncoll), Some(npart)) = (
        collisions.extract(event_id, event),
        participants.extract(event_id, event),
    ) else {
        tracing::warn!(event = event_id, "missing Ncoll or Npart data, skipped");
        return None;
    };
    let nch = ACCEPTANCES.map(|acceptance| {
        event
            .get(acceptance.spectrum)
            .and_then(|spectrum| charged_yield(spectrum, acceptance.pt_min, acceptance.pt_max))
            .unwrap_or(MISSING_YIELD)
    });
    Some(ParticipantRow {
        event_id: event_id.to_owned(),
        ncoll,
        npart,
        nch,
    })
}

/// Writes the table as whitespace-separated columns with a header line.
pub fn write_table<W>(mut writer: W, rows: &[ParticipantRow]) -> io::Result<()>
where
    W: Write,
{
    write!(writer, "{:<12}  {:<6}  {:<6}", "EventID", "Ncoll", "Npart")?;
    for acceptance in &ACCEPTANCES {
        write!(writer, "  {:<10}", format!("Nch_{}", acceptance.experiment))?;
    }
    writeln!(writer)?;

    for row in rows {
        write!(
            writer,
            "{:<12}  {:<6}  {:<6}",
            row.event_id, row.ncoll, row.npart
        )?;
        for nch in row.nch {
            write!(writer, "  {nch:<10.4e}")?;
        }
        writeln!(writer)?;
    }
    writer.flush()
}
