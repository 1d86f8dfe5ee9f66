//! Throughput CDF charts
//!
//! One chart per (operator, band class, direction), overlaying the
//! empirical CDF of each configured throughput decomposition mode. Curve
//! colors are fixed per mode; the legend lists the baseline first, then the
//! single-factor gains, then the combined total.

use crate::common::bands::BandClass;
use crate::common::cdf;
use crate::common::data_structures::{GroupedSamples, ModeScopedCdfStats, ALL_SAMPLES_KEY};
use crate::common::plots::{self, CdfCurve, PlotError, RGBColor, SeriesLabelPosition};
use crate::common::policy::{self, Operator};
use crate::config::{LinkDirection, PlotConfig, TputMode};
use crate::parsing::{load_stats, ParsingError};
use plotters::style::colors::{BLACK, BLUE, GREEN, RED};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur while generating a throughput CDF chart
#[derive(Error, Debug)]
pub enum ThroughputCdfError {
    #[error("Plot generation failed: {0}")]
    Plot(#[from] PlotError),
}

type Result<T> = core::result::Result<T, ThroughputCdfError>;

/// Curve color of a decomposition mode.
fn mode_color(mode: TputMode) -> RGBColor {
    match mode {
        TputMode::Base => RED,
        TputMode::Ca => GREEN,
        TputMode::Mimo => BLUE,
        TputMode::Total => BLACK,
    }
}

/// Throughput-axis window per band class.
fn x_max(class: BandClass) -> f64 {
    match class {
        BandClass::MmWave => 3000.0,
        _ => 1000.0,
    }
}

/// Generate the throughput CDF charts for every configured direction.
/// Failures are logged per chart; none aborts the batch.
pub fn generate(config: &PlotConfig) {
    for &direction in &config.directions {
        let path = config.dataset_path("cdf_tput", direction);
        let data: ModeScopedCdfStats = match load_stats(&path) {
            Ok(data) => data,
            Err(ParsingError::MissingInput(path)) => {
                log::warn!("Dataset not found: {}", path.display());
                continue;
            }
            Err(err) => {
                log::error!("Failed to load {}: {err}", path.display());
                continue;
            }
        };

        for (class, mode_stats) in data.iter() {
            if mode_stats.is_empty() {
                continue;
            }
            for &operator in policy::target_operators(class) {
                if let Err(err) = plot_operator(class, operator, mode_stats, direction, config) {
                    log::error!(
                        "Throughput CDF for {} {class} failed: {err}",
                        operator.key()
                    );
                }
            }
        }
    }
}

fn plot_operator(
    class: BandClass,
    operator: Operator,
    mode_stats: &BTreeMap<String, BTreeMap<String, GroupedSamples>>,
    direction: LinkDirection,
    config: &PlotConfig,
) -> Result<()> {
    let mut curves = Vec::new();
    for mode in TputMode::LEGEND_ORDER {
        if !config.cdf_tput_modes.contains(&mode) {
            continue;
        }
        let samples = mode_stats
            .get(mode.key())
            .and_then(|operators| operators.get(operator.key()))
            .and_then(|groups| groups.get(ALL_SAMPLES_KEY));
        let Some(series) = samples.and_then(|samples| cdf::build_cdf(samples)) else {
            continue;
        };
        curves.push(CdfCurve {
            label: mode.display_name().to_string(),
            color: mode_color(mode),
            series,
        });
    }

    if curves.is_empty() {
        log::warn!(
            "{} has no valid {class} throughput samples, skipping",
            operator.key()
        );
        return Ok(());
    }

    let filename = format!(
        "cdf_tput_{}_{}_{}{}.png",
        class,
        operator.key(),
        direction.token(),
        config.integrity_suffix
    );
    plots::render_cdf_chart(
        &curves,
        "Throughput (Mbps)",
        x_max(class),
        Some(SeriesLabelPosition::LowerRight),
        &config.plots_dir.join(&filename),
    )?;
    log::info!("Saved plot: {filename}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_window_is_wider_for_mmwave() {
        assert_eq!(x_max(BandClass::MmWave), 3000.0);
        assert_eq!(x_max(BandClass::Low), 1000.0);
        assert_eq!(x_max(BandClass::Mid), 1000.0);
    }

    #[test]
    fn mode_colors_are_fixed() {
        assert_eq!(mode_color(TputMode::Base), RED);
        assert_eq!(mode_color(TputMode::Ca), GREEN);
        assert_eq!(mode_color(TputMode::Mimo), BLUE);
        assert_eq!(mode_color(TputMode::Total), BLACK);
    }

    #[test]
    fn legend_order_is_base_mimo_ca_total() {
        assert_eq!(
            TputMode::LEGEND_ORDER,
            [TputMode::Base, TputMode::Mimo, TputMode::Ca, TputMode::Total]
        );
    }
}
