//! Distribution normalization and stacked-composition building
//!
//! Turns grouped occurrence counts into percentage compositions and lays
//! the percentages out as bottom-up stacked bar segments with correctly
//! tracked baselines.

use super::data_structures::{GroupedCounts, SampleSeries};
use std::collections::BTreeMap;
use thiserror::Error;

/// A group with zero samples across every category.
///
/// Callers skip the affected chart rather than dividing by zero; the error
/// never propagates past the per-chart boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("group has no samples in any category")]
pub struct EmptyGroupError;

/// Converts grouped counts into percentages of the group total, restricted
/// to `key_filter`.
///
/// The total is the sum over **all** keys present in the input, not just
/// the filtered subset: filtering a displayed category out must not inflate
/// the remaining percentages. A key absent from the input contributes 0%.
pub fn normalize(
    counts: &GroupedCounts,
    key_filter: &[String],
) -> Result<BTreeMap<String, f64>, EmptyGroupError> {
    let total: u64 = counts.values().sum();
    if total == 0 {
        return Err(EmptyGroupError);
    }

    Ok(key_filter
        .iter()
        .map(|key| {
            let count = counts.get(key).copied().unwrap_or(0);
            (key.clone(), count as f64 / total as f64 * 100.0)
        })
        .collect())
}

/// Bins raw samples into labeled occurrence counts, e.g. MIMO layer samples
/// into "1 Layer".."4 Layer" keys.
pub fn bin_counts(samples: &SampleSeries, label: impl Fn(f64) -> String) -> GroupedCounts {
    let mut counts = GroupedCounts::new();
    for &value in samples {
        *counts.entry(label(value)).or_insert(0) += 1;
    }
    counts
}

/// One segment of a stacked bar: its category, height, and the cumulative
/// baseline it sits on.
#[derive(Debug, Clone, PartialEq)]
pub struct StackSegment {
    pub key: String,
    pub value: f64,
    pub baseline: f64,
}

/// Lays one percentage map out as stacked segments in the supplied key
/// order. Each segment's baseline is the sum of all previous segments'
/// values, yielding a bottom-up stack with no gaps or overlaps.
pub fn build_stack(
    ordered_keys: &[String],
    percentages: &BTreeMap<String, f64>,
) -> Vec<StackSegment> {
    let mut baseline = 0.0;
    ordered_keys
        .iter()
        .map(|key| {
            let value = percentages.get(key).copied().unwrap_or(0.0);
            let segment = StackSegment {
                key: key.clone(),
                value,
                baseline,
            };
            baseline += value;
            segment
        })
        .collect()
}

/// One category's value and baseline series across all x positions of a
/// composition chart.
#[derive(Debug, Clone, PartialEq)]
pub struct StackSeries {
    pub key: String,
    pub values: Vec<f64>,
    pub baselines: Vec<f64>,
}

impl StackSeries {
    /// Whether the category is visible anywhere on the chart. Categories
    /// that are zero across every group are dropped from the legend but
    /// still occupy zero-height segments.
    pub fn has_visible_value(&self) -> bool {
        self.values.iter().any(|value| *value > 0.0)
    }
}

/// The renderer's input contract for composition charts: x-axis labels plus
/// one stacked series per category, in stacking order.
#[derive(Debug, Clone, Default)]
pub struct StackedComposition {
    pub x_labels: Vec<String>,
    pub series: Vec<StackSeries>,
}

/// Builds the multi-bar stacked composition for a sequence of
/// (x label, percentage map) groups.
///
/// Baselines accumulate independently per x position, so every bar is a
/// complete bottom-up stack regardless of which categories each group
/// contains.
pub fn build_composition(
    ordered_keys: &[String],
    groups: &[(String, BTreeMap<String, f64>)],
) -> StackedComposition {
    let stacks: Vec<Vec<StackSegment>> = groups
        .iter()
        .map(|(_, percentages)| build_stack(ordered_keys, percentages))
        .collect();

    let series = ordered_keys
        .iter()
        .enumerate()
        .map(|(position, key)| StackSeries {
            key: key.clone(),
            values: stacks.iter().map(|stack| stack[position].value).collect(),
            baselines: stacks
                .iter()
                .map(|stack| stack[position].baseline)
                .collect(),
        })
        .collect();

    StackedComposition {
        x_labels: groups.iter().map(|(label, _)| label.clone()).collect(),
        series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(entries: &[(&str, u64)]) -> GroupedCounts {
        entries
            .iter()
            .map(|(key, count)| (key.to_string(), *count))
            .collect()
    }

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn normalize_splits_counts_into_percentages() {
        let counts = counts(&[("NonCA", 3), ("2CA", 1)]);
        let percentages = normalize(&counts, &keys(&["NonCA", "2CA"])).unwrap();
        assert_eq!(percentages["NonCA"], 75.0);
        assert_eq!(percentages["2CA"], 25.0);
    }

    #[test]
    fn normalize_sums_to_100_over_full_key_set() {
        let counts = counts(&[("a", 7), ("b", 11), ("c", 13), ("d", 2)]);
        let all_keys = keys(&["a", "b", "c", "d"]);
        let percentages = normalize(&counts, &all_keys).unwrap();
        let sum: f64 = percentages.values().sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn normalize_total_stays_unfiltered() {
        let counts = counts(&[("NonCA", 3), ("2CA", 1)]);
        // Filtering 2CA out must not inflate NonCA to 100%.
        let percentages = normalize(&counts, &keys(&["NonCA"])).unwrap();
        assert_eq!(percentages["NonCA"], 75.0);
        assert_eq!(percentages.len(), 1);
    }

    #[test]
    fn normalize_treats_absent_key_as_zero() {
        let counts = counts(&[("NonCA", 4)]);
        let percentages = normalize(&counts, &keys(&["NonCA", "8CA"])).unwrap();
        assert_eq!(percentages["8CA"], 0.0);
    }

    #[test]
    fn normalize_rejects_empty_group() {
        assert_eq!(
            normalize(&counts(&[("NonCA", 0), ("2CA", 0)]), &keys(&["NonCA"])),
            Err(EmptyGroupError)
        );
        assert_eq!(
            normalize(&GroupedCounts::new(), &keys(&["NonCA"])),
            Err(EmptyGroupError)
        );
    }

    #[test]
    fn bin_counts_groups_by_label() {
        let samples = vec![1.0, 2.0, 2.0, 4.0];
        let counts = bin_counts(&samples, |value| format!("{} Layer", value as i64));
        assert_eq!(counts["1 Layer"], 1);
        assert_eq!(counts["2 Layer"], 2);
        assert_eq!(counts["4 Layer"], 1);
    }

    #[test]
    fn stack_baselines_accumulate() {
        let percentages: BTreeMap<String, f64> = [("a", 50.0), ("b", 30.0), ("c", 20.0)]
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect();
        let stack = build_stack(&keys(&["a", "b", "c"]), &percentages);

        assert_eq!(stack[0].baseline, 0.0);
        assert_eq!(stack[1].baseline, 50.0);
        assert_eq!(stack[2].baseline, 80.0);
        assert_eq!(stack[2].baseline + stack[2].value, 100.0);
    }

    #[test]
    fn stack_keeps_missing_keys_as_zero_height() {
        let percentages: BTreeMap<String, f64> =
            [("a".to_string(), 60.0), ("c".to_string(), 40.0)].into();
        let stack = build_stack(&keys(&["a", "b", "c"]), &percentages);
        assert_eq!(stack[1].value, 0.0);
        assert_eq!(stack[1].baseline, 60.0);
        assert_eq!(stack[2].baseline, 60.0);
    }

    #[test]
    fn composition_tracks_per_position_baselines() {
        let group = |a: f64, b: f64| {
            [("a".to_string(), a), ("b".to_string(), b)]
                .into_iter()
                .collect::<BTreeMap<String, f64>>()
        };
        let groups = vec![
            ("n71".to_string(), group(70.0, 30.0)),
            ("n41".to_string(), group(20.0, 80.0)),
        ];
        let composition = build_composition(&keys(&["a", "b"]), &groups);

        assert_eq!(composition.x_labels, ["n71", "n41"]);
        assert_eq!(composition.series[0].baselines, [0.0, 0.0]);
        assert_eq!(composition.series[1].baselines, [70.0, 20.0]);
        assert_eq!(composition.series[1].values, [30.0, 80.0]);
    }

    #[test]
    fn all_zero_series_is_invisible() {
        let series = StackSeries {
            key: "x".to_string(),
            values: vec![0.0, 0.0],
            baselines: vec![0.0, 0.0],
        };
        assert!(!series.has_visible_value());
    }
}
