use std::collections::HashMap;

use centrality_stats::binning::{Classification, CutPoints, classify};
use proptest::prelude::*;

/// Observables drawn from a small integer range so that ties are common.
fn arb_observables() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((0u8..40).prop_map(f64::from), 1..200)
}

/// Contiguous cut points from 0 to 100.
fn arb_cuts() -> impl Strategy<Value = CutPoints> {
    prop::collection::btree_set(1u8..100, 0..10).prop_map(|inner| {
        let mut points = vec![0.0];
        points.extend(inner.into_iter().map(f64::from));
        points.push(100.0);
        CutPoints::new(points).unwrap()
    })
}

fn class_of(classification: &Classification<usize>) -> HashMap<usize, usize> {
    let mut class_of = HashMap::new();
    for (index, class) in classification.classes.iter().enumerate() {
        for member in &class.members {
            let previous = class_of.insert(member.id, index);
            assert_eq!(previous, None, "event {} placed twice", member.id);
        }
    }
    class_of
}

proptest! {
    #[test]
    fn every_event_lands_in_exactly_one_class(values in arb_observables(), cuts in arb_cuts()) {
        let classification = classify(values.iter().copied().enumerate(), &cuts);
        let class_of = class_of(&classification);

        prop_assert_eq!(classification.valid_count, values.len());
        prop_assert_eq!(classification.unclassified, 0);
        prop_assert_eq!(class_of.len(), values.len());
    }

    #[test]
    fn higher_observable_is_never_more_peripheral(values in arb_observables(), cuts in arb_cuts()) {
        let classification = classify(values.iter().copied().enumerate(), &cuts);
        let class_of = class_of(&classification);

        for (a, va) in values.iter().enumerate() {
            for (b, vb) in values.iter().enumerate() {
                if va > vb {
                    prop_assert!(class_of[&a] <= class_of[&b], "{va} in {} but {vb} in {}", class_of[&a], class_of[&b]);
                }
            }
        }
    }

    #[test]
    fn extremes_close_the_tails(values in arb_observables(), cuts in arb_cuts()) {
        let classification = classify(values.iter().copied().enumerate(), &cuts);
        let first = classification.classes.first().unwrap();
        let last = classification.classes.last().unwrap();

        // stable descending sort: the first maximal entry is ranked first
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let top = values.iter().position(|v| *v == max).unwrap();
        prop_assert!(first.members.iter().any(|m| m.id == top));

        if values.len() >= 2 {
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let bottom = values.iter().rposition(|v| *v == min).unwrap();
            prop_assert!(last.members.iter().any(|m| m.id == bottom));
        }
    }

    #[test]
    fn ties_share_a_class_below_the_top(values in arb_observables(), cuts in arb_cuts()) {
        let classification = classify(values.iter().copied().enumerate(), &cuts);
        let class_of = class_of(&classification);
        let top = classification.classes[0].members[0].id;

        for (a, va) in values.iter().enumerate() {
            for (b, vb) in values.iter().enumerate() {
                if a != top && b != top && va == vb {
                    prop_assert_eq!(class_of[&a], class_of[&b]);
                }
            }
        }
    }

    #[test]
    fn classification_is_deterministic(values in arb_observables(), cuts in arb_cuts()) {
        let first = classify(values.iter().copied().enumerate(), &cuts);
        let second = classify(values.iter().copied().enumerate(), &cuts);
        for (a, b) in first.classes.iter().zip(&second.classes) {
            prop_assert_eq!(&a.members, &b.members);
        }
    }
}
