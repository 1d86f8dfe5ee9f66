//! Empirical CDF construction
//!
//! The one numeric algorithm with a precise mathematical contract: the
//! fraction at 1-indexed rank k is exactly k/n. Duplicate values are
//! retained, producing the vertical jumps of an empirical CDF with ties.

/// Sorted sample values paired with their cumulative rank fractions.
///
/// Both sequences have equal length; fractions are strictly increasing in
/// index and range over (0, 1].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CdfSeries {
    pub values: Vec<f64>,
    pub fractions: Vec<f64>,
}

impl CdfSeries {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// (value, fraction) points in plotting order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values
            .iter()
            .zip(&self.fractions)
            .map(|(&value, &fraction)| (value, fraction))
    }
}

/// Builds the empirical distribution function of an unordered sample
/// collection. Returns `None` for an empty collection; the caller skips
/// the curve.
pub fn build_cdf(samples: &[f64]) -> Option<CdfSeries> {
    if samples.is_empty() {
        return None;
    }

    let mut values = samples.to_vec();
    values.sort_by(f64::total_cmp);

    let n = values.len() as f64;
    let fractions = (1..=values.len()).map(|rank| rank as f64 / n).collect();

    Some(CdfSeries { values, fractions })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractions_are_rank_over_n() {
        let series = build_cdf(&[10.0, 30.0, 30.0, 50.0]).unwrap();
        assert_eq!(series.values, [10.0, 30.0, 30.0, 50.0]);
        assert_eq!(series.fractions, [0.25, 0.50, 0.75, 1.00]);
    }

    #[test]
    fn input_order_does_not_matter() {
        let series = build_cdf(&[50.0, 10.0, 30.0, 30.0]).unwrap();
        assert_eq!(series.values, [10.0, 30.0, 30.0, 50.0]);
        assert_eq!(series.fractions, [0.25, 0.50, 0.75, 1.00]);
    }

    #[test]
    fn ties_do_not_collapse_ranks() {
        let series = build_cdf(&[5.0, 5.0, 5.0]).unwrap();
        assert_eq!(series.values.len(), 3);
        assert_eq!(series.fractions.len(), 3);
        assert_eq!(series.values, [5.0, 5.0, 5.0]);
        let expected = [1.0 / 3.0, 2.0 / 3.0, 1.0];
        for (fraction, want) in series.fractions.iter().zip(expected) {
            assert!((fraction - want).abs() < 1e-12);
        }
    }

    #[test]
    fn empty_input_yields_none() {
        assert_eq!(build_cdf(&[]), None);
    }

    #[test]
    fn single_sample_reaches_one() {
        let series = build_cdf(&[42.0]).unwrap();
        assert_eq!(series.values, [42.0]);
        assert_eq!(series.fractions, [1.0]);
    }

    #[test]
    fn fractions_strictly_increase() {
        let series = build_cdf(&[3.0, 1.0, 2.0, 2.0, 9.0]).unwrap();
        for pair in series.fractions.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(*series.fractions.last().unwrap(), 1.0);
    }
}
