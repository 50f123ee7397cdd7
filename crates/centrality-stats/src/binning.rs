//! Percentile binning of events into centrality classes
//!
//! Events are ranked by a scalar observable in **descending** order: the
//! highest value (largest multiplicity, transverse energy, ...) is the most
//! central event and sits at the 0% end. A list of cut points such as
//! `[0, 5, 10, 20, ..., 100]` splits the ranking into classes `C0-5`, `C5-10`
//! and so on.
//!
//! # Thresholds
//!
//! For a class spanning `(low%, high%]` the observable thresholds are taken
//! with the nearest-rank rule ([`compute_percentile`]) on the descending
//! sequence:
//!
//! - upper threshold: value at rank `floor(N * low / 100)`
//! - lower threshold: value at rank `floor(N * high / 100)`, or the minimum
//!   value when `high == 100`
//!
//! # Membership
//!
//! An event with value `v` belongs to a class when
//! `lower < v <= upper`. Two extra rules close the tails:
//!
//! - the class ending at 100% is also closed at its lower threshold, so the
//!   least central event is never dropped;
//! - the class starting at 0% always holds the top-ranked event.
//!
//! Each event goes to the first (most central) class that accepts it, so the
//! classes never overlap. Because membership is decided by value, events with
//! equal observables always share a class; the only exception is the
//! top-ranked event, which stays in the 0% class even when its tied peers do
//! not.
//!
//! Adjacent cut points that decrease (e.g. `[0, 10, 5, 20]`) are skipped: no
//! class is produced for that pair.
//!
//! # Examples
//!
//! ```
//! use centrality_stats::binning::{CutPoints, classify};
//!
//! let observables = (1..=10).map(|i| (format!("event_{i}"), f64::from(i * 10)));
//! let cuts = CutPoints::new(vec![0.0, 50.0, 100.0]).unwrap();
//! let classification = classify(observables, &cuts);
//!
//! let central = &classification.classes[0];
//! assert_eq!(central.label, "C0-50");
//! assert_eq!(central.members.len(), 5);
//! assert_eq!(central.members[0].id, "event_10");
//!
//! let peripheral = &classification.classes[1];
//! assert_eq!(peripheral.label, "C50-100");
//! assert_eq!(peripheral.members.len(), 5);
//! ```

use std::fmt;

use crate::percentiles::compute_percentile;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum CutPointsError {
    #[display("at least two cut points are required, got {count}")]
    TooFew { count: usize },
    #[display("cut point {value} is outside the 0-100 percent range")]
    OutOfRange { value: f64 },
}

/// Ordered percentages delimiting centrality classes.
///
/// Values must lie within `0..=100`. Pairs that decrease are kept in the list
/// but produce no class (see [`CutPoints::ranges`]).
#[derive(Debug, Clone, PartialEq)]
pub struct CutPoints(Vec<f64>);

impl CutPoints {
    pub const DEFAULT: [f64; 12] = [
        0.0, 5.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0,
    ];

    pub fn new(points: Vec<f64>) -> Result<Self, CutPointsError> {
        if points.len() < 2 {
            return Err(CutPointsError::TooFew {
                count: points.len(),
            });
        }
        if let Some(&value) = points
            .iter()
            .find(|v| !(0.0..=100.0).contains(*v))
        {
            return Err(CutPointsError::OutOfRange { value });
        }
        Ok(Self(points))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Percent ranges of the classes, most central first.
    ///
    /// ```
    /// use centrality_stats::binning::CutPoints;
    ///
    /// let cuts = CutPoints::new(vec![0.0, 10.0, 5.0, 20.0]).unwrap();
    /// let labels = cuts.ranges().map(|r| r.label()).collect::<Vec<_>>();
    /// assert_eq!(labels, ["C0-10", "C5-20"]);
    /// ```
    pub fn ranges(&self) -> impl Iterator<Item = PercentRange> + '_ {
        self.0
            .windows(2)
            .filter(|pair| pair[1] >= pair[0])
            .map(|pair| PercentRange {
                low: pair[0],
                high: pair[1],
            })
    }
}

impl Default for CutPoints {
    fn default() -> Self {
        Self(Self::DEFAULT.to_vec())
    }
}

/// A centrality range in percent, `(low, high]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentRange {
    pub low: f64,
    pub high: f64,
}

impl PercentRange {
    /// Class label, e.g. `C0-5` or `C2.5-5`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("C{}-{}", self.low, self.high)
    }

    /// The range expressed as fractions of the event count (`0.0..=1.0`).
    #[must_use]
    pub fn as_fractions(&self) -> [f64; 2] {
        [self.low / 100.0, self.high / 100.0]
    }

    #[expect(clippy::float_cmp)]
    #[must_use]
    pub fn is_most_central(&self) -> bool {
        self.low == 0.0
    }

    #[expect(clippy::float_cmp)]
    #[must_use]
    pub fn is_most_peripheral(&self) -> bool {
        self.high == 100.0
    }
}

impl fmt::Display for PercentRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%-{}%", self.low, self.high)
    }
}

/// An event placed in a class, with the observable value that placed it there.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMember<K> {
    pub id: K,
    pub value: f64,
}

/// One centrality class and its members, ordered by decreasing value.
#[derive(Debug, Clone)]
pub struct CentralityClass<K> {
    pub label: String,
    pub range: PercentRange,
    /// Observable value at the upper (central) edge, inclusive.
    pub upper_threshold: f64,
    /// Observable value at the lower (peripheral) edge, exclusive unless this
    /// is the final class.
    pub lower_threshold: f64,
    pub members: Vec<ClassMember<K>>,
}

impl<K> CentralityClass<K> {
    fn accepts(&self, rank: usize, value: f64) -> bool {
        if rank == 0 && self.range.is_most_central() {
            return true;
        }
        if value > self.upper_threshold {
            return false;
        }
        value > self.lower_threshold
            || (self.range.is_most_peripheral() && value >= self.lower_threshold)
    }
}

/// Result of binning one set of observables.
#[derive(Debug, Clone)]
pub struct Classification<K> {
    /// Number of events with a finite observable.
    pub valid_count: usize,
    /// Valid events that no class accepted (only possible when the cut points
    /// do not span 0-100).
    pub unclassified: usize,
    /// Classes in cut-point order. Empty when `valid_count == 0`.
    pub classes: Vec<CentralityClass<K>>,
}

impl<K> Classification<K> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.valid_count == 0
    }
}

/// Partitions events into centrality classes.
///
/// Non-finite observables are ignored. Ties keep their input order, so the
/// result is deterministic for a deterministic input order.
pub fn classify<K, I>(observables: I, cuts: &CutPoints) -> Classification<K>
where
    I: IntoIterator<Item = (K, f64)>,
{
    let mut ranked = observables
        .into_iter()
        .filter(|(_, value)| value.is_finite())
        .collect::<Vec<_>>();
    // stable: equal values keep input order
    ranked.sort_by(|(_, a), (_, b)| b.total_cmp(a));

    let valid_count = ranked.len();
    let Some(&(_, minimum)) = ranked.last() else {
        return Classification {
            valid_count: 0,
            unclassified: 0,
            classes: vec![],
        };
    };

    let values = ranked.iter().map(|(_, v)| *v).collect::<Vec<_>>();
    let mut classes = cuts
        .ranges()
        .map(|range| {
            let upper_threshold = compute_percentile(&values, range.low);
            let lower_threshold = if range.is_most_peripheral() {
                minimum
            } else {
                compute_percentile(&values, range.high)
            };
            CentralityClass {
                label: range.label(),
                range,
                upper_threshold,
                lower_threshold,
                members: vec![],
            }
        })
        .collect::<Vec<_>>();

    let mut unclassified = 0;
    for (rank, (id, value)) in ranked.into_iter().enumerate() {
        match classes.iter_mut().find(|class| class.accepts(rank, value)) {
            Some(class) => class.members.push(ClassMember { id, value }),
            None => unclassified += 1,
        }
    }

    Classification {
        valid_count,
        unclassified,
        classes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids_of(class: &CentralityClass<u32>) -> Vec<u32> {
        class.members.iter().map(|m| m.id).collect()
    }

    fn cuts(points: &[f64]) -> CutPoints {
        CutPoints::new(points.to_vec()).unwrap()
    }

    #[test]
    fn test_empty_input() {
        let classification = classify(Vec::<(u32, f64)>::new(), &CutPoints::default());
        assert!(classification.is_empty());
        assert!(classification.classes.is_empty());
    }

    #[test]
    fn test_ten_descending_events_split_in_half() {
        // event i has value 10 * i
        let observables = (1..=10).map(|i| (i, f64::from(i * 10)));
        let classification = classify(observables, &cuts(&[0.0, 50.0, 100.0]));

        assert_eq!(classification.valid_count, 10);
        assert_eq!(ids_of(&classification.classes[0]), [10, 9, 8, 7, 6]);
        assert_eq!(ids_of(&classification.classes[1]), [5, 4, 3, 2, 1]);
        assert_eq!(classification.classes[0].upper_threshold, 100.0);
        assert_eq!(classification.classes[0].lower_threshold, 50.0);
        assert_eq!(classification.classes[1].lower_threshold, 10.0);
    }

    #[test]
    fn test_value_on_internal_threshold_goes_to_class_it_tops() {
        // 50 is the threshold at rank 5 and is the upper edge of C50-100
        let observables = (1..=10).map(|i| (i, f64::from(i * 10)));
        let classification = classify(observables, &cuts(&[0.0, 50.0, 100.0]));
        assert!(ids_of(&classification.classes[1]).contains(&5));
    }

    #[test]
    fn test_ties_at_threshold_share_a_class() {
        // ranks: 0:9.0 1:8.0 2:5.0 3:5.0 4:5.0 5:1.0
        let observables = [(0, 9.0), (1, 8.0), (2, 5.0), (3, 5.0), (4, 5.0), (5, 1.0)];
        let classification = classify(observables, &cuts(&[0.0, 50.0, 100.0]));
        // threshold at rank 3 is 5.0, so every 5.0 lands in the peripheral class
        assert_eq!(ids_of(&classification.classes[0]), [0, 1]);
        assert_eq!(ids_of(&classification.classes[1]), [2, 3, 4, 5]);
    }

    #[test]
    fn test_top_event_kept_in_central_class_when_tied() {
        let observables = [(0, 7.0), (1, 7.0), (2, 7.0), (3, 1.0)];
        let classification = classify(observables, &cuts(&[0.0, 50.0, 100.0]));
        assert_eq!(ids_of(&classification.classes[0]), [0]);
        assert_eq!(ids_of(&classification.classes[1]), [1, 2, 3]);
    }

    #[test]
    fn test_single_event_is_most_central() {
        let classification = classify([(7, 3.0)], &CutPoints::default());
        assert_eq!(ids_of(&classification.classes[0]), [7]);
        let total: usize = classification.classes.iter().map(|c| c.members.len()).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_non_finite_values_are_excluded() {
        let observables = [(0, f64::NAN), (1, 2.0), (2, f64::INFINITY), (3, 1.0)];
        let classification = classify(observables, &cuts(&[0.0, 100.0]));
        assert_eq!(classification.valid_count, 2);
        assert_eq!(ids_of(&classification.classes[0]), [1, 3]);
    }

    #[test]
    fn test_decreasing_pair_is_skipped() {
        let observables = (0..20).map(|i| (i, f64::from(i)));
        let classification = classify(observables, &cuts(&[0.0, 10.0, 5.0, 100.0]));
        let labels = classification
            .classes
            .iter()
            .map(|c| c.label.as_str())
            .collect::<Vec<_>>();
        assert_eq!(labels, ["C0-10", "C5-100"]);
        // overlapping ranges still produce disjoint classes
        let total: usize = classification.classes.iter().map(|c| c.members.len()).sum();
        assert_eq!(total, 20);
    }

    #[test]
    fn test_partial_coverage_reports_unclassified() {
        let observables = (0..10).map(|i| (i, f64::from(i)));
        let classification = classify(observables, &cuts(&[20.0, 50.0]));
        assert_eq!(classification.classes[0].members.len(), 3);
        assert_eq!(classification.unclassified, 7);
    }

    #[test]
    fn test_fractional_labels_and_ranges() {
        let range = PercentRange {
            low: 2.5,
            high: 5.0,
        };
        assert_eq!(range.label(), "C2.5-5");
        assert_eq!(range.as_fractions(), [0.025, 0.05]);
        assert_eq!(range.to_string(), "2.5%-5%");
    }

    #[test]
    fn test_cut_point_validation() {
        assert_eq!(
            CutPoints::new(vec![0.0]),
            Err(CutPointsError::TooFew { count: 1 })
        );
        assert_eq!(
            CutPoints::new(vec![0.0, 120.0]),
            Err(CutPointsError::OutOfRange { value: 120.0 })
        );
        assert!(CutPoints::new(vec![0.0, f64::NAN]).is_err());
    }
}
