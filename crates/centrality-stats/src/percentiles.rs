//! Nearest-rank percentile lookup
//!
//! Centrality thresholds are read straight out of the sorted observable
//! sequence instead of being interpolated. For a dataset with `n` values, the
//! `k`-th percentile lives at position `floor(n * k / 100)`, clamped to the last
//! valid index.
//!
//! The lookup does not care about sort direction: on ascending data it yields
//! the usual "ordinary" percentile, on descending data (the centrality
//! convention, most central first) it yields the value that separates the top
//! `k` percent of events from the rest.

/// Position of the `percentile`-th entry in a sequence of `len` sorted values.
///
/// Returns `None` for an empty sequence.
///
/// # Examples
///
/// ```
/// use centrality_stats::percentiles::rank_index;
///
/// assert_eq!(rank_index(10, 0.0), Some(0));
/// assert_eq!(rank_index(10, 50.0), Some(5));
/// assert_eq!(rank_index(10, 100.0), Some(9)); // clamped
/// assert_eq!(rank_index(0, 50.0), None);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn rank_index(len: usize, percentile: f64) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let idx = ((len as f64 * percentile) / 100.0) as usize;
    Some(idx.min(len - 1))
}

/// Computes a single percentile value from sorted data.
///
/// This function uses the nearest-rank method; see [`rank_index`].
///
/// # Arguments
///
/// * `sorted_values` - Values sorted in either direction
/// * `percentile` - The percentile to compute (0.0 to 100.0)
///
/// # Returns
///
/// The value at the specified percentile. Returns `f64::NAN` if the input is empty.
///
/// # Examples
///
/// ```
/// use centrality_stats::percentiles::compute_percentile;
///
/// let ascending = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(compute_percentile(&ascending, 50.0), 3.0);
/// assert_eq!(compute_percentile(&ascending, 25.0), 2.0);
///
/// let descending = [100.0, 90.0, 80.0, 70.0, 60.0, 50.0, 40.0, 30.0, 20.0, 10.0];
/// assert_eq!(compute_percentile(&descending, 50.0), 50.0);
/// ```
#[must_use]
pub fn compute_percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    rank_index(sorted_values.len(), percentile).map_or(f64::NAN, |idx| sorted_values[idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_index_truncates() {
        // 7 * 30 / 100 = 2.1
        assert_eq!(rank_index(7, 30.0), Some(2));
        // 3 * 50 / 100 = 1.5
        assert_eq!(rank_index(3, 50.0), Some(1));
    }

    #[test]
    fn test_single_value() {
        for p in [0.0, 5.0, 50.0, 99.9, 100.0] {
            assert_eq!(compute_percentile(&[42.0], p), 42.0);
        }
    }

    #[test]
    fn test_empty_is_nan() {
        assert!(compute_percentile(&[], 10.0).is_nan());
    }
}
