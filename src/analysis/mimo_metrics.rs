//! Per-MIMO-layer box charts
//!
//! One box chart per (operator, band class, metric, direction): each box is
//! a MIMO layer count. The bandwidth charts pin their value axis per band
//! class so the per-class channel widths stay comparable across operators.

use crate::common::bands::BandClass;
use crate::common::data_structures::{GroupedSamples, MimoMetricStats};
use crate::common::plots::{self, BoxGroup, PlotError};
use crate::common::policy::{self, Operator};
use crate::config::{LinkDirection, Metric, PlotConfig};
use crate::parsing::{load_stats, ParsingError};
use thiserror::Error;

/// Errors that can occur while generating a MIMO box chart
#[derive(Error, Debug)]
pub enum MimoMetricsError {
    #[error("Plot generation failed: {0}")]
    Plot(#[from] PlotError),
}

type Result<T> = core::result::Result<T, MimoMetricsError>;

/// Value-axis limits of the bandwidth charts, per band class.
fn bandwidth_y_limits(class: BandClass) -> (f32, f32) {
    match class {
        BandClass::Low => (0.0, 24.0),
        BandClass::Mid => (0.0, 109.0),
        BandClass::MmWave => (45.0, 105.0),
    }
}

/// Generate the per-MIMO-layer box charts for every configured metric and
/// direction. Failures are logged per chart; none aborts the batch.
pub fn generate(config: &PlotConfig) {
    for &direction in &config.directions {
        for &metric in &config.mimo_box_metrics {
            log::info!("Plotting {} {} data...", metric.token(), direction.token());
            process_metric(config, direction, metric);
        }
    }
}

fn process_metric(config: &PlotConfig, direction: LinkDirection, metric: Metric) {
    let path = config.dataset_path(&format!("box_mimo_{}", metric.token()), direction);
    let data: MimoMetricStats = match load_stats(&path) {
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
            let Some(mimo_data) = operator_stats.get(operator.key()) else {
                log::warn!("{} has no {class} data, skipping", operator.key());
                continue;
            };
            if let Err(err) = plot_operator(class, operator, mimo_data, metric, direction, config)
            {
                log::error!(
                    "{} box chart for {} {class} failed: {err}",
                    metric.token(),
                    operator.key()
                );
            }
        }
    }
}

fn plot_operator(
    class: BandClass,
    operator: Operator,
    mimo_data: &GroupedSamples,
    metric: Metric,
    direction: LinkDirection,
    config: &PlotConfig,
) -> Result<()> {
    let layers = policy::order_layer_keys(
        mimo_data
            .iter()
            .filter(|(_, samples)| !samples.is_empty())
            .map(|(layer, _)| layer.as_str()),
    );
    if layers.is_empty() {
        return Ok(());
    }

    let groups: Vec<BoxGroup> = layers
        .iter()
        .map(|layer| BoxGroup {
            label: layer.clone(),
            samples: mimo_data[layer.as_str()].clone(),
        })
        .collect();

    let y_limits = (metric == Metric::Bandwidth).then(|| bandwidth_y_limits(class));

    let filename = format!(
        "box_mimo_{}_{}_{}_{}{}.png",
        metric.token(),
        class,
        operator.key(),
        direction.token(),
        config.integrity_suffix
    );
    plots::render_box_chart(
        &groups,
        "MIMO Layers",
        metric.y_desc(),
        y_limits,
        &config.plots_dir.join(&filename),
    )?;
    log::info!("Saved plot: {filename}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bandwidth_limits_pin_per_class() {
        assert_eq!(bandwidth_y_limits(BandClass::Low), (0.0, 24.0));
        assert_eq!(bandwidth_y_limits(BandClass::Mid), (0.0, 109.0));
        assert_eq!(bandwidth_y_limits(BandClass::MmWave), (45.0, 105.0));
    }
}
