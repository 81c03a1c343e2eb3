//! Descriptive statistics used by the cleaning rules and metrics.
//!
//! Percentiles use linear interpolation between closest ranks
//! (`pos = (n - 1) * q`), the same convention as most dataframe libraries'
//! default.

use std::cmp::Ordering;

/// Round to `digits` decimal places, halves to even.
pub fn round_to(value: f64, digits: u32) -> f64 {
    let scale = 10f64.powi(digits as i32);
    (value * scale).round_ties_even() / scale
}

/// Arithmetic mean, `None` when there are no values.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median, averaging the two central values for even counts.
pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Linear-interpolated quantile for `q` in `[0, 1]`.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(quantile_sorted(&sorted, q))
}

fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Sort direction for ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankOrder {
    /// Smallest value gets rank 1.
    Ascending,
    /// Largest value gets rank 1.
    Descending,
}

/// 1-based ranks; tied values share the average of the positions they occupy.
pub fn average_rank(values: &[f64], order: RankOrder) -> Vec<f64> {
    let mut indices: Vec<usize> = (0..values.len()).collect();
    indices.sort_by(|&a, &b| {
        let ord = values[a].total_cmp(&values[b]);
        match order {
            RankOrder::Ascending => ord,
            RankOrder::Descending => ord.reverse(),
        }
    });

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < indices.len() {
        let mut end = start + 1;
        while end < indices.len()
            && values[indices[end]].total_cmp(&values[indices[start]]) == Ordering::Equal
        {
            end += 1;
        }
        // positions start+1 ..= end share their mean
        let shared = (start + 1 + end) as f64 / 2.0;
        for &idx in &indices[start..end] {
            ranks[idx] = shared;
        }
        start = end;
    }
    ranks
}

/// Assign each value to one of `bins` equal-frequency tiers (0-based).
///
/// Edges are the `k / bins` quantiles. The lowest tier is closed on both
/// ends, the others are `(lower, upper]`. If two edges coincide the tiers
/// are assigned by position in the stable sorted order instead, which keeps
/// the tiers as close to equal size as the data allows.
pub fn quantile_tiers(values: &[f64], bins: usize) -> Vec<usize> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let edges: Vec<f64> = (0..=bins)
        .map(|k| quantile_sorted(&sorted, k as f64 / bins as f64))
        .collect();

    let distinct = edges.windows(2).all(|w| w[0] < w[1]);
    if distinct {
        return values
            .iter()
            .map(|&v| {
                edges[1..]
                    .iter()
                    .position(|&upper| v <= upper)
                    .unwrap_or(bins - 1)
            })
            .collect();
    }

    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    let mut tiers = vec![0; values.len()];
    for (position, &idx) in order.iter().enumerate() {
        tiers[idx] = position * bins / values.len();
    }
    tiers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_half_even() {
        assert_eq!(round_to(2.675, 2), 2.67); // 2.675 is stored below the half
        assert_eq!(round_to(0.25, 1), 0.2);
        assert_eq!(round_to(12.0, 2), 12.0);
    }

    #[test]
    fn test_mean_and_median() {
        assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
        assert_eq!(median(&[5.0, 1.0, 3.0]), Some(3.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(mean(&[]), None);
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_quantile_linear() {
        let values = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(quantile(&values, 0.75), Some(32.5));
        assert_eq!(quantile(&values, 0.0), Some(10.0));
        assert_eq!(quantile(&values, 1.0), Some(40.0));
        assert_eq!(quantile(&[7.0], 0.75), Some(7.0));
    }

    #[test]
    fn test_average_rank_ties() {
        let ranks = average_rank(&[10.0, 20.0, 10.0, 30.0], RankOrder::Ascending);
        assert_eq!(ranks, vec![1.5, 3.0, 1.5, 4.0]);

        let ranks = average_rank(&[10.0, 20.0, 10.0, 30.0], RankOrder::Descending);
        assert_eq!(ranks, vec![3.5, 2.0, 3.5, 1.0]);
    }

    #[test]
    fn test_quantile_tiers_uniform() {
        let values: Vec<f64> = (1..=9).map(|v| v as f64).collect();
        let tiers = quantile_tiers(&values, 3);
        assert_eq!(tiers, vec![0, 0, 0, 1, 1, 1, 2, 2, 2]);
    }

    #[test]
    fn test_quantile_tiers_unsorted_input() {
        let tiers = quantile_tiers(&[300.0, 100.0, 200.0], 3);
        assert_eq!(tiers, vec![2, 0, 1]);
    }

    #[test]
    fn test_quantile_tiers_heavy_ties_fall_back_to_positions() {
        let tiers = quantile_tiers(&[5.0, 5.0, 5.0, 5.0, 5.0, 9.0], 3);
        let counts = [0, 1, 2].map(|t| tiers.iter().filter(|&&x| x == t).count());
        assert_eq!(counts, [2, 2, 2]);
        assert_eq!(tiers[5], 2);
    }
}
