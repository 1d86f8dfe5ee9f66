//! Per-CA-type box charts
//!
//! One box chart per (operator, band class, metric, direction): each box is
//! a CA configuration, labeled by component count. Throughput supports
//! three presentation modes (normalized, raw sum, and side-by-side paired
//! boxes); the other metrics plot their sample values directly.

use crate::common::bands::BandClass;
use crate::common::data_structures::{
    CaMetricStats, CaThroughputStats, MetricSeries, ThroughputSplit,
};
use crate::common::plots::{self, BoxGroup, PairedBoxGroup, PlotError};
use crate::common::policy::{self, Operator};
use crate::config::{BoxTputMode, LinkDirection, Metric, PlotConfig};
use crate::parsing::{load_stats, ParsingError};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur while generating a CA box chart
#[derive(Error, Debug)]
pub enum CaMetricsError {
    #[error("Plot generation failed: {0}")]
    Plot(#[from] PlotError),
}

type Result<T> = core::result::Result<T, CaMetricsError>;

/// Generate the per-CA-type box charts for every configured metric and
/// direction. Failures are logged per chart; none aborts the batch.
pub fn generate(config: &PlotConfig) {
    for &direction in &config.directions {
        for &metric in &config.ca_box_metrics {
            log::info!("Plotting {} {} data...", metric.token(), direction.token());
            if metric == Metric::Throughput {
                process_throughput(config, direction);
            } else {
                process_metric(config, direction, metric);
            }
        }
    }
}

fn process_throughput(config: &PlotConfig, direction: LinkDirection) {
    let path = config.dataset_path("box_ca_tput", direction);
    let data: CaThroughputStats = match load_stats(&path) {
        Ok(data) => data,
        Err(ParsingError::MissingInput(path)) => {
            log::warn!("Dataset not found: {}", path.display());
            return;
        }
        Err(err) => {
            log::error!("Failed to load {}: {err}", path.display());
            return;
        }
    };

    for (class, operator_stats) in data.iter() {
        if operator_stats.is_empty() {
            continue;
        }
        for &operator in policy::target_operators(class) {
            let Some(ca_data) = operator_stats.get(operator.key()) else {
                log::warn!("{} has no {class} data, skipping", operator.key());
                continue;
            };
            for &mode in &config.ca_box_tput_modes {
                if let Err(err) =
                    plot_throughput(class, operator, ca_data, mode, direction, config)
                {
                    log::error!(
                        "Throughput box chart for {} {class} failed: {err}",
                        operator.key()
                    );
                }
            }
        }
    }
}

fn plot_throughput(
    class: BandClass,
    operator: Operator,
    ca_data: &BTreeMap<String, ThroughputSplit>,
    mode: BoxTputMode,
    direction: LinkDirection,
    config: &PlotConfig,
) -> Result<()> {
    let available = ca_data
        .iter()
        .filter(|(_, split)| match mode {
            BoxTputMode::Normalized => !split.tca.is_empty(),
            BoxTputMode::RawSum => !split.tt.is_empty(),
            BoxTputMode::SideBySide => !split.tca.is_empty() || !split.tt.is_empty(),
        })
        .map(|(ca_type, _)| ca_type.as_str());
    let ordered = policy::select_and_order_ca_types(available, operator, class);
    if ordered.is_empty() {
        log::warn!(
            "{} has no valid {class} data for {}, skipping",
            operator.key(),
            mode.token()
        );
        return Ok(());
    }

    let filename = format!(
        "box_ca_tput_{}_{}_{}_{}{}.png",
        mode.token(),
        class,
        operator.key(),
        direction.token(),
        config.integrity_suffix
    );
    let output_path = config.plots_dir.join(&filename);

    match mode {
        BoxTputMode::SideBySide => {
            let groups: Vec<PairedBoxGroup> = ordered
                .iter()
                .map(|ca_type| {
                    let split = &ca_data[ca_type.as_str()];
                    PairedBoxGroup {
                        label: policy::component_label(ca_type),
                        left: split.tca.clone(),
                        right: split.tt.clone(),
                    }
                })
                .collect();
            plots::render_paired_box_chart(
                &groups,
                ("T_CA", "T_TOTAL"),
                "Number of CCs",
                "Throughput (Mbps)",
                &output_path,
            )?;
        }
        BoxTputMode::Normalized | BoxTputMode::RawSum => {
            let groups: Vec<BoxGroup> = ordered
                .iter()
                .map(|ca_type| {
                    let split = &ca_data[ca_type.as_str()];
                    let samples = match mode {
                        BoxTputMode::Normalized => split.tca.clone(),
                        _ => split.tt.clone(),
                    };
                    BoxGroup {
                        label: policy::component_label(ca_type),
                        samples,
                    }
                })
                .collect();
            let y_desc = match mode {
                BoxTputMode::Normalized => "Normalized Throughput (Mbps)",
                _ => "Raw Sum Throughput (Mbps)",
            };
            plots::render_box_chart(&groups, "Number of CCs", y_desc, None, &output_path)?;
        }
    }
    log::info!("Saved plot: {filename}");

    Ok(())
}

fn process_metric(config: &PlotConfig, direction: LinkDirection, metric: Metric) {
    let path = config.dataset_path(&format!("box_ca_{}", metric.token()), direction);
    let data: CaMetricStats = match load_stats(&path) {
        Ok(data) => data,
        Err(ParsingError::MissingInput(path)) => {
            log::warn!("Dataset not found: {}", path.display());
            return;
        }
        Err(err) => {
            log::error!("Failed to load {}: {err}", path.display());
            return;
        }
    };

    for (class, operator_stats) in data.iter() {
        if operator_stats.is_empty() {
            continue;
        }
        for &operator in policy::target_operators(class) {
            let Some(ca_data) = operator_stats.get(operator.key()) else {
                log::warn!("{} has no {class} data, skipping", operator.key());
                continue;
            };
            if let Err(err) = plot_metric(class, operator, ca_data, metric, direction, config) {
                log::error!(
                    "{} box chart for {} {class} failed: {err}",
                    metric.token(),
                    operator.key()
                );
            }
        }
    }
}

fn plot_metric(
    class: BandClass,
    operator: Operator,
    ca_data: &BTreeMap<String, MetricSeries>,
    metric: Metric,
    direction: LinkDirection,
    config: &PlotConfig,
) -> Result<()> {
    let available = ca_data
        .iter()
        .filter(|(_, series)| !series.values.is_empty())
        .map(|(ca_type, _)| ca_type.as_str());
    let ordered = policy::select_and_order_ca_types(available, operator, class);
    if ordered.is_empty() {
        log::warn!(
            "{} has no valid {class} data for {}, skipping",
            operator.key(),
            metric.token()
        );
        return Ok(());
    }

    let groups: Vec<BoxGroup> = ordered
        .iter()
        .map(|ca_type| BoxGroup {
            label: policy::component_label(ca_type),
            samples: ca_data[ca_type.as_str()].values.clone(),
        })
        .collect();

    let filename = format!(
        "box_ca_{}_{}_{}_{}{}.png",
        metric.token(),
        class,
        operator.key(),
        direction.token(),
        config.integrity_suffix
    );
    plots::render_box_chart(
        &groups,
        "Number of CCs",
        metric.y_desc(),
        None,
        &config.plots_dir.join(&filename),
    )?;
    log::info!("Saved plot: {filename}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(tca: &[f64], tt: &[f64]) -> ThroughputSplit {
        ThroughputSplit {
            tca: tca.to_vec(),
            tt: tt.to_vec(),
        }
    }

    #[test]
    fn availability_depends_on_mode() {
        let mut ca_data: BTreeMap<String, ThroughputSplit> = BTreeMap::new();
        ca_data.insert("NonCA".to_string(), split(&[1.0], &[]));
        ca_data.insert("2CA".to_string(), split(&[], &[2.0]));

        let available_tca: Vec<&str> = ca_data
            .iter()
            .filter(|(_, s)| !s.tca.is_empty())
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(available_tca, ["NonCA"]);

        let available_either: Vec<&str> = ca_data
            .iter()
            .filter(|(_, s)| !s.tca.is_empty() || !s.tt.is_empty())
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(available_either.len(), 2);
    }

    #[test]
    fn component_labels_are_cc_counts() {
        assert_eq!(policy::component_label("NonCA"), "1");
        assert_eq!(policy::component_label("6CA"), "6");
        assert_eq!(policy::component_label("Odd"), "Odd");
    }
}
