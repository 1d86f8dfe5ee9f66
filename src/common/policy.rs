//! Category ordering and inclusion policy
//!
//! Every chart consults the same declarative tables here to decide which
//! category keys are eligible and in what order they are displayed:
//! - canonical CA-type order (by component count) and the per-operator
//!   mmWave allow-lists
//! - MIMO-layer and mode-key ordering
//! - band-key ordering (class rank, then descending totals, then numeric
//!   band identifier) and the unconditional per-operator band exclusions
//!
//! All functions are pure and deterministic; identical inputs always yield
//! identical ordered sequences.

use super::bands::{self, BandClass};
use super::data_structures::GroupedCounts;
use std::cmp::Reverse;
use std::collections::BTreeSet;

/// Network operator covered by the measurement campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Att,
    TMobile,
    Verizon,
}

impl Operator {
    /// The operator identifier used as a map key in the input structures.
    pub fn key(self) -> &'static str {
        match self {
            Operator::Att => "ATT",
            Operator::TMobile => "TMobile",
            Operator::Verizon => "Verizon",
        }
    }

    /// Resolves an input-structure key back to an operator.
    pub fn from_key(key: &str) -> Option<Operator> {
        match key {
            "ATT" => Some(Operator::Att),
            "TMobile" => Some(Operator::TMobile),
            "Verizon" => Some(Operator::Verizon),
            _ => None,
        }
    }
}

/// Operators with deployments in the given band class.
///
/// TMobile has no mmWave deployment in the source campaign, so mmWave
/// charts cover ATT and Verizon only.
pub fn target_operators(class: BandClass) -> &'static [Operator] {
    match class {
        BandClass::MmWave => &[Operator::Att, Operator::Verizon],
        _ => &[Operator::Att, Operator::TMobile, Operator::Verizon],
    }
}

/// Restricts the CA types a (operator, band class) chart may show.
struct CaAllowRule {
    operator: Operator,
    band_class: BandClass,
    allowed: &'static [&'static str],
}

/// mmWave CA-type allow-lists. Static configuration, not derived data:
/// these are the CA configurations each operator actually deploys on
/// mmWave. A pair without a rule includes every observed CA type.
const CA_ALLOW_RULES: &[CaAllowRule] = &[
    CaAllowRule {
        operator: Operator::Att,
        band_class: BandClass::MmWave,
        allowed: &["NonCA", "4CA", "8CA"],
    },
    CaAllowRule {
        operator: Operator::Verizon,
        band_class: BandClass::MmWave,
        allowed: &["NonCA", "4CA", "6CA", "8CA"],
    },
];

/// Bands an operator's results exclude unconditionally, independent of band
/// class. Business rule: TMobile devices categorically do not use these
/// bands in the source deployment.
struct BandExclusionRule {
    operator: Operator,
    bands: &'static [&'static str],
}

const BAND_EXCLUSIONS: &[BandExclusionRule] = &[BandExclusionRule {
    operator: Operator::TMobile,
    bands: &["n66", "n260"],
}];

/// Whether a band is excluded from the given operator's charts.
pub fn is_band_excluded(operator: Operator, band: &str) -> bool {
    BAND_EXCLUSIONS
        .iter()
        .any(|rule| rule.operator == operator && rule.bands.contains(&band))
}

/// Number of aggregated carrier components a CA-type key denotes.
///
/// `NonCA` is a single component; `"4CA"` is four. A direction-prefixed key
/// ("DL 2CA") resolves through its last token. Returns `None` for keys that
/// denote no component count.
pub fn component_count(key: &str) -> Option<u32> {
    let token = key.split_whitespace().last().unwrap_or(key);
    if token == "NonCA" {
        return Some(1);
    }
    token.strip_suffix("CA")?.parse().ok()
}

/// The x-axis label of a CA-type key: its component count ("4CA" -> "4"),
/// or the raw key when it denotes no count.
pub fn component_label(key: &str) -> String {
    component_count(key).map_or_else(|| key.to_string(), |count| count.to_string())
}

/// Number of spatial layers a MIMO-layer key denotes ("2 Layer" -> 2).
pub fn layer_count(key: &str) -> Option<u32> {
    key.split_whitespace().next()?.parse().ok()
}

/// Orders CA-type keys canonically: known component counts ascending,
/// then unrecognized keys lexicographically.
pub fn order_ca_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let unique: BTreeSet<&str> = keys.into_iter().collect();
    let mut ordered: Vec<&str> = unique.into_iter().collect();
    ordered.sort_by_key(|key| match component_count(key) {
        Some(count) => (0u8, count, key.to_string()),
        None => (1, 0, key.to_string()),
    });
    ordered.into_iter().map(String::from).collect()
}

/// Selects and orders the CA types eligible for a (operator, band class)
/// chart.
///
/// Only the canonical component counts (1..=8) participate; the per-pair
/// allow-list is applied when one exists. An empty result means "skip this
/// chart", never an error.
pub fn select_and_order_ca_types<'a>(
    available: impl IntoIterator<Item = &'a str>,
    operator: Operator,
    band_class: BandClass,
) -> Vec<String> {
    let allow = CA_ALLOW_RULES
        .iter()
        .find(|rule| rule.operator == operator && rule.band_class == band_class)
        .map(|rule| rule.allowed);

    let canonical: Vec<&str> = available
        .into_iter()
        .filter(|key| matches!(component_count(key), Some(1..=8)))
        .filter(|key| allow.map_or(true, |list| list.contains(key)))
        .collect();

    let mut ordered = canonical;
    ordered.sort_by_key(|key| component_count(key).unwrap_or(u32::MAX));
    ordered.dedup();
    ordered.into_iter().map(String::from).collect()
}

/// Orders MIMO-layer keys by increasing layer count; keys without a parsable
/// count sort after the known set, lexicographically.
pub fn order_layer_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let unique: BTreeSet<&str> = keys.into_iter().collect();
    let mut ordered: Vec<&str> = unique.into_iter().collect();
    ordered.sort_by_key(|key| match layer_count(key) {
        Some(count) => (0u8, count, key.to_string()),
        None => (1, 0, key.to_string()),
    });
    ordered.into_iter().map(String::from).collect()
}

/// Orders mode keys (MIMO modes, ratio modes) lexicographically.
pub fn order_mode_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let unique: BTreeSet<&str> = keys.into_iter().collect();
    unique.into_iter().map(String::from).collect()
}

/// Orders band keys for a per-band composition chart.
///
/// Composite sort key: band class rank ascending, total sample count
/// descending, numeric band identifier ascending. The per-operator band
/// exclusions are applied first; unclassifiable band keys are dropped from
/// the ordering with a logged warning.
pub fn order_bands(operator: Option<Operator>, totals: &GroupedCounts) -> Vec<String> {
    let mut entries: Vec<(&String, u64, BandClass)> = Vec::with_capacity(totals.len());
    for (band, &total) in totals {
        if let Some(op) = operator {
            if is_band_excluded(op, band) {
                continue;
            }
        }
        match bands::classify_band_key(band) {
            Ok(class) => entries.push((band, total, class)),
            Err(err) => log::warn!("Dropping band from ordering: {err}"),
        }
    }

    entries.sort_by_key(|(band, total, class)| {
        (*class, Reverse(*total), bands::band_number(band).unwrap_or(0))
    });
    entries.into_iter().map(|(band, _, _)| band.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("NonCA", Some(1))]
    #[case("2CA", Some(2))]
    #[case("8CA", Some(8))]
    #[case("DL NonCA", Some(1))]
    #[case("UL 3CA", Some(3))]
    #[case("Other", None)]
    fn component_counts(#[case] key: &str, #[case] expected: Option<u32>) {
        assert_eq!(component_count(key), expected);
    }

    #[test]
    fn layer_counts() {
        assert_eq!(layer_count("1 Layer"), Some(1));
        assert_eq!(layer_count("4 Layer"), Some(4));
        assert_eq!(layer_count("Layer"), None);
    }

    #[test]
    fn ca_order_is_by_component_count() {
        let ordered = order_ca_keys(["8CA", "NonCA", "3CA", "2CA"]);
        assert_eq!(ordered, ["NonCA", "2CA", "3CA", "8CA"]);
    }

    #[test]
    fn unknown_ca_keys_sort_last() {
        let ordered = order_ca_keys(["Mystery", "2CA", "Aux", "NonCA"]);
        assert_eq!(ordered, ["NonCA", "2CA", "Aux", "Mystery"]);
    }

    #[test]
    fn mmwave_allow_list_filters_att() {
        let ordered = select_and_order_ca_types(
            ["NonCA", "2CA", "4CA", "8CA"],
            Operator::Att,
            BandClass::MmWave,
        );
        assert_eq!(ordered, ["NonCA", "4CA", "8CA"]);
    }

    #[test]
    fn mmwave_allow_list_filters_verizon() {
        let ordered = select_and_order_ca_types(
            ["NonCA", "2CA", "4CA", "5CA", "6CA", "8CA"],
            Operator::Verizon,
            BandClass::MmWave,
        );
        assert_eq!(ordered, ["NonCA", "4CA", "6CA", "8CA"]);
    }

    #[test]
    fn uncovered_pair_includes_all_canonical_types() {
        let ordered = select_and_order_ca_types(
            ["3CA", "NonCA", "2CA"],
            Operator::TMobile,
            BandClass::Mid,
        );
        assert_eq!(ordered, ["NonCA", "2CA", "3CA"]);
    }

    #[test]
    fn selection_is_idempotent() {
        let keys = ["NonCA", "2CA", "4CA", "8CA"];
        let first = select_and_order_ca_types(keys, Operator::Att, BandClass::MmWave);
        let second = select_and_order_ca_types(keys, Operator::Att, BandClass::MmWave);
        assert_eq!(first, second);
    }

    #[test]
    fn layer_keys_order_numerically() {
        let ordered = order_layer_keys(["4 Layer", "1 Layer", "2 Layer"]);
        assert_eq!(ordered, ["1 Layer", "2 Layer", "4 Layer"]);
    }

    #[test]
    fn tmobile_excludes_n66_and_n260() {
        assert!(is_band_excluded(Operator::TMobile, "n66"));
        assert!(is_band_excluded(Operator::TMobile, "n260"));
        assert!(!is_band_excluded(Operator::TMobile, "n71"));
        assert!(!is_band_excluded(Operator::Att, "n66"));
    }

    #[test]
    fn band_order_uses_class_totals_and_number() {
        let totals = GroupedCounts::from([
            ("n260".to_string(), 50u64),
            ("n71".to_string(), 10),
            ("n41".to_string(), 30),
            ("n77".to_string(), 30),
            ("n2".to_string(), 80),
        ]);
        let ordered = order_bands(Some(Operator::Att), &totals);
        // Low first, then Mid by descending totals (tie n41/n77 broken by
        // band number), then mmWave.
        assert_eq!(ordered, ["n71", "n2", "n41", "n77", "n260"]);
    }

    #[test]
    fn band_order_applies_exclusions_and_drops_unclassifiable() {
        let totals = GroupedCounts::from([
            ("n66".to_string(), 90u64),
            ("n71".to_string(), 10),
            ("junk".to_string(), 5),
        ]);
        let ordered = order_bands(Some(Operator::TMobile), &totals);
        assert_eq!(ordered, ["n71"]);
    }

    #[test]
    fn mmwave_targets_skip_tmobile() {
        assert_eq!(
            target_operators(BandClass::MmWave),
            &[Operator::Att, Operator::Verizon]
        );
        assert_eq!(target_operators(BandClass::Low).len(), 3);
    }
}
