//! Run configuration
//!
//! One explicit configuration value object is passed into every analysis
//! entry function, enumerating the recognized metrics, link directions,
//! throughput plot modes, decomposition modes, and ratio modes, instead of
//! process-wide toggles.

use std::path::PathBuf;

/// Transfer direction of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDirection {
    Dl,
    Ul,
}

impl LinkDirection {
    /// The lowercase token used in dataset and chart filenames.
    pub fn token(self) -> &'static str {
        match self {
            LinkDirection::Dl => "dl",
            LinkDirection::Ul => "ul",
        }
    }
}

/// Measured quantity of a box-chart dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Throughput,
    Mcs,
    Rsrp,
    Cqi,
    Bandwidth,
    Layers,
}

impl Metric {
    /// Every recognized metric.
    pub const ALL: [Metric; 6] = [
        Metric::Throughput,
        Metric::Mcs,
        Metric::Rsrp,
        Metric::Cqi,
        Metric::Bandwidth,
        Metric::Layers,
    ];

    /// The token identifying the metric in dataset and chart filenames.
    pub fn token(self) -> &'static str {
        match self {
            Metric::Throughput => "tput",
            Metric::Mcs => "mcs",
            Metric::Rsrp => "rsrp",
            Metric::Cqi => "cqi",
            Metric::Bandwidth => "bandwidth",
            Metric::Layers => "layers",
        }
    }

    /// The value-axis label of the metric's charts.
    pub fn y_desc(self) -> &'static str {
        match self {
            Metric::Throughput => "Throughput (Mbps)",
            Metric::Mcs => "MCS",
            Metric::Rsrp => "RSRP (dBm)",
            Metric::Cqi => "CQI",
            Metric::Bandwidth => "Bandwidth (MHz)",
            Metric::Layers => "MIMO Layers",
        }
    }
}

/// Presentation mode of the per-CA-type throughput box charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxTputMode {
    /// Normalized per-carrier-aggregation throughput only.
    Normalized,
    /// Raw summed throughput only.
    RawSum,
    /// Both, as paired boxes per CA type.
    SideBySide,
}

impl BoxTputMode {
    /// Every recognized presentation mode.
    pub const ALL: [BoxTputMode; 3] = [
        BoxTputMode::Normalized,
        BoxTputMode::RawSum,
        BoxTputMode::SideBySide,
    ];

    /// The token identifying the mode in chart filenames.
    pub fn token(self) -> &'static str {
        match self {
            BoxTputMode::Normalized => "Tca",
            BoxTputMode::RawSum => "Tt",
            BoxTputMode::SideBySide => "Tca_vs_Tt",
        }
    }
}

/// Throughput decomposition mode of the CDF datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TputMode {
    Base,
    Ca,
    Mimo,
    Total,
}

impl TputMode {
    pub const ALL: [TputMode; 4] = [TputMode::Base, TputMode::Ca, TputMode::Mimo, TputMode::Total];

    /// Draw/legend order of the overlay chart: baseline first, then the
    /// single-factor gains, then the combined total.
    pub const LEGEND_ORDER: [TputMode; 4] =
        [TputMode::Base, TputMode::Mimo, TputMode::Ca, TputMode::Total];

    /// The key identifying the mode in the input structure.
    pub fn key(self) -> &'static str {
        match self {
            TputMode::Base => "Tput_0",
            TputMode::Ca => "Tput_1",
            TputMode::Mimo => "Tput_2",
            TputMode::Total => "Tput_3",
        }
    }

    /// The legend label of the mode's curve.
    pub fn display_name(self) -> &'static str {
        match self {
            TputMode::Base => "T_BASE",
            TputMode::Ca => "T_CA",
            TputMode::Mimo => "T_MIMO",
            TputMode::Total => "T_TOTAL",
        }
    }
}

/// Throughput-ratio mode of the ratio CDF dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatioMode {
    CaOverBase,
    MimoOverBase,
    TotalOverBase,
}

impl RatioMode {
    pub const ALL: [RatioMode; 3] = [
        RatioMode::CaOverBase,
        RatioMode::MimoOverBase,
        RatioMode::TotalOverBase,
    ];

    /// Draw/legend order of the overlay chart.
    pub const LEGEND_ORDER: [RatioMode; 3] = [
        RatioMode::MimoOverBase,
        RatioMode::CaOverBase,
        RatioMode::TotalOverBase,
    ];

    /// The key identifying the mode in the input structure.
    pub fn key(self) -> &'static str {
        match self {
            RatioMode::CaOverBase => "T_ca_T_base",
            RatioMode::MimoOverBase => "T_mimo_T_base",
            RatioMode::TotalOverBase => "T_total_T_base",
        }
    }

    /// The legend label of the mode's curve.
    pub fn display_name(self) -> &'static str {
        match self {
            RatioMode::CaOverBase => "T_CA/T_BASE",
            RatioMode::MimoOverBase => "T_MIMO/T_BASE",
            RatioMode::TotalOverBase => "T_TOTAL/T_BASE",
        }
    }
}

/// Configuration for one plotting run.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Directory holding the `*.json.zst` dataset files.
    pub stats_dir: PathBuf,
    /// Directory the chart PNGs and summaries are written to.
    pub plots_dir: PathBuf,
    /// Link directions to attempt per dataset; a direction whose file is
    /// absent is skipped with a warning.
    pub directions: Vec<LinkDirection>,
    /// Metrics to process for the per-CA-type box charts.
    pub ca_box_metrics: Vec<Metric>,
    /// Presentation modes for the per-CA-type throughput box charts.
    pub ca_box_tput_modes: Vec<BoxTputMode>,
    /// Metrics to process for the per-MIMO-layer box charts.
    pub mimo_box_metrics: Vec<Metric>,
    /// Decomposition modes overlaid on the throughput CDF charts.
    pub cdf_tput_modes: Vec<TputMode>,
    /// Ratio modes overlaid on the throughput-ratio CDF charts.
    pub ratio_modes: Vec<RatioMode>,
    /// Filename suffix marking integrity-filtered inputs.
    pub integrity_suffix: String,
}

impl PlotConfig {
    /// The default processing set: everything the published chart set
    /// contains.
    pub fn new(stats_dir: PathBuf, plots_dir: PathBuf) -> Self {
        Self {
            stats_dir,
            plots_dir,
            directions: vec![LinkDirection::Dl, LinkDirection::Ul],
            // The layer distribution ships as its own composition chart
            // rather than a box chart.
            ca_box_metrics: Metric::ALL
                .into_iter()
                .filter(|metric| *metric != Metric::Layers)
                .collect(),
            // The published chart set draws the paired comparison only; the
            // single-series modes remain selectable.
            ca_box_tput_modes: BoxTputMode::ALL
                .into_iter()
                .filter(|mode| *mode == BoxTputMode::SideBySide)
                .collect(),
            // The per-MIMO-layer datasets carry no layer metric of their
            // own.
            mimo_box_metrics: Metric::ALL
                .into_iter()
                .filter(|metric| *metric != Metric::Layers)
                .collect(),
            cdf_tput_modes: TputMode::ALL.to_vec(),
            ratio_modes: RatioMode::ALL.to_vec(),
            integrity_suffix: "_with_integrity".to_string(),
        }
    }

    /// Path of one dataset file for the given direction.
    pub fn dataset_path(&self, dataset: &str, direction: LinkDirection) -> PathBuf {
        self.stats_dir
            .join(format!("{}_{}.json.zst", dataset, direction.token()))
    }
}
