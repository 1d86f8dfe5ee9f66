use serde::Deserialize;
use std::collections::BTreeMap;

use super::bands::BandClass;

/// Raw numeric samples for one category.
pub type SampleSeries = Vec<f64>;

/// Category key -> raw sample list. Insertion order carries no meaning;
/// display order is always recomputed by the inclusion policy.
pub type GroupedSamples = BTreeMap<String, SampleSeries>;

/// Category key -> occurrence count, for datasets that arrive pre-counted.
pub type GroupedCounts = BTreeMap<String, u64>;

/// Key under which the undifferentiated sample pool of a CDF dataset lives.
pub const ALL_SAMPLES_KEY: &str = "All";

/// Top level of every band-class-resolved input file.
#[derive(Debug, Default, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct BandClassPartition<T> {
    #[serde(rename = "Low", default)]
    pub low: T,
    #[serde(rename = "Mid", default)]
    pub mid: T,
    #[serde(rename = "mmWave", default)]
    pub mmwave: T,
}

impl<T> BandClassPartition<T> {
    /// The partition for one band class.
    pub fn get(&self, class: BandClass) -> &T {
        match class {
            BandClass::Low => &self.low,
            BandClass::Mid => &self.mid,
            BandClass::MmWave => &self.mmwave,
        }
    }

    /// Iterates the partitions in display order (Low, Mid, mmWave).
    pub fn iter(&self) -> impl Iterator<Item = (BandClass, &T)> + '_ {
        BandClass::ALL.iter().map(move |&class| (class, self.get(class)))
    }
}

/// A sample list wrapped in the `values` envelope the grouped metric
/// datasets use.
#[derive(Debug, Default, Deserialize)]
pub struct MetricSeries {
    pub values: SampleSeries,
}

/// The two named sub-series of the throughput-decomposition datasets:
/// normalized per-carrier-aggregation throughput vs. raw summed throughput.
#[derive(Debug, Default, Deserialize)]
pub struct ThroughputSplit {
    #[serde(rename = "Tca")]
    pub tca: SampleSeries,
    #[serde(rename = "Tt")]
    pub tt: SampleSeries,
}

/// Band class -> operator -> CA type -> metric samples.
pub type CaMetricStats = BandClassPartition<BTreeMap<String, BTreeMap<String, MetricSeries>>>;

/// Band class -> operator -> CA type -> throughput decomposition.
pub type CaThroughputStats = BandClassPartition<BTreeMap<String, BTreeMap<String, ThroughputSplit>>>;

/// Band class -> operator -> MIMO layer -> metric samples.
pub type MimoMetricStats = BandClassPartition<BTreeMap<String, GroupedSamples>>;

/// Band class -> decomposition mode -> operator -> {"All": samples}.
pub type ModeScopedCdfStats = BandClassPartition<BTreeMap<String, BTreeMap<String, GroupedSamples>>>;

/// Band class -> operator -> {"All": samples}.
pub type OperatorCdfStats = BandClassPartition<BTreeMap<String, GroupedSamples>>;

/// Operator -> band -> CA type -> count. Band-resolved, so the top level is
/// the operator rather than a band class.
pub type CaCompositionStats = BTreeMap<String, BTreeMap<String, GroupedCounts>>;

/// Operator -> cell type -> band -> MIMO mode -> count.
pub type MimoCompositionStats = BTreeMap<String, BTreeMap<String, BTreeMap<String, GroupedCounts>>>;
