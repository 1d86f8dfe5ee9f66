//! Ratio CDF charts
//!
//! Two chart families per (operator, band class, direction):
//! - throughput-ratio CDFs overlaying the configured gain ratios relative
//!   to the baseline throughput
//! - the single-curve bandwidth-ratio CDF (aggregate bandwidth over PCell
//!   bandwidth), whose axis window varies per band class and operator

use crate::common::bands::BandClass;
use crate::common::cdf;
use crate::common::data_structures::{
    GroupedSamples, ModeScopedCdfStats, OperatorCdfStats, ALL_SAMPLES_KEY,
};
use crate::common::plots::{self, CdfCurve, PlotError, RGBColor, SeriesLabelPosition};
use crate::common::policy::{self, Operator};
use crate::config::{LinkDirection, PlotConfig, RatioMode};
use crate::parsing::{load_stats, ParsingError};
use plotters::style::colors::{BLACK, BLUE, GREEN};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur while generating a ratio CDF chart
#[derive(Error, Debug)]
pub enum RatioCdfError {
    #[error("Plot generation failed: {0}")]
    Plot(#[from] PlotError),
}

type Result<T> = core::result::Result<T, RatioCdfError>;

/// Curve color of a ratio mode.
fn ratio_color(mode: RatioMode) -> RGBColor {
    match mode {
        RatioMode::CaOverBase => GREEN,
        RatioMode::MimoOverBase => BLUE,
        RatioMode::TotalOverBase => BLACK,
    }
}

/// Bandwidth-ratio axis window. TMobile's mid-band aggregation spans a far
/// wider ratio range than the other operators', so its window matches the
/// low-band one.
fn bandwidth_ratio_x_max(class: BandClass, operator: Operator) -> f64 {
    match class {
        BandClass::Low => 15.0,
        BandClass::Mid => {
            if operator == Operator::TMobile {
                15.0
            } else {
                3.9
            }
        }
        BandClass::MmWave => 8.3,
    }
}

/// Generate the throughput-ratio CDF charts for every configured direction.
/// Failures are logged per chart; none aborts the batch.
pub fn generate_tput_ratio(config: &PlotConfig) {
    for &direction in &config.directions {
        let path = config.dataset_path("cdf_tput_ratio", direction);
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
                if let Err(err) =
                    plot_ratio_operator(class, operator, mode_stats, direction, config)
                {
                    log::error!(
                        "Throughput ratio CDF for {} {class} failed: {err}",
                        operator.key()
                    );
                }
            }
        }
    }
}

fn plot_ratio_operator(
    class: BandClass,
    operator: Operator,
    mode_stats: &BTreeMap<String, BTreeMap<String, GroupedSamples>>,
    direction: LinkDirection,
    config: &PlotConfig,
) -> Result<()> {
    let mut curves = Vec::new();
    for mode in RatioMode::LEGEND_ORDER {
        if !config.ratio_modes.contains(&mode) {
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
            color: ratio_color(mode),
            series,
        });
    }

    if curves.is_empty() {
        log::warn!(
            "{} has no valid {class} ratio samples, skipping",
            operator.key()
        );
        return Ok(());
    }

    let filename = format!(
        "cdf_tput_ratio_{}_{}_{}{}.png",
        class,
        operator.key(),
        direction.token(),
        config.integrity_suffix
    );
    plots::render_cdf_chart(
        &curves,
        "Throughput Ratio",
        15.0,
        Some(SeriesLabelPosition::LowerRight),
        &config.plots_dir.join(&filename),
    )?;
    log::info!("Saved plot: {filename}");

    Ok(())
}

/// Generate the bandwidth-ratio CDF charts for every configured direction.
/// Failures are logged per chart; none aborts the batch.
pub fn generate_bandwidth_ratio(config: &PlotConfig) {
    for &direction in &config.directions {
        let path = config.dataset_path("cdf_bandwidth_ratio", direction);
        let data: OperatorCdfStats = match load_stats(&path) {
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

        for (class, operator_stats) in data.iter() {
            if operator_stats.is_empty() {
                continue;
            }
            for &operator in policy::target_operators(class) {
                if let Err(err) =
                    plot_bandwidth_operator(class, operator, operator_stats, direction, config)
                {
                    log::error!(
                        "Bandwidth ratio CDF for {} {class} failed: {err}",
                        operator.key()
                    );
                }
            }
        }
    }
}

fn plot_bandwidth_operator(
    class: BandClass,
    operator: Operator,
    operator_stats: &BTreeMap<String, GroupedSamples>,
    direction: LinkDirection,
    config: &PlotConfig,
) -> Result<()> {
    let samples = operator_stats
        .get(operator.key())
        .and_then(|groups| groups.get(ALL_SAMPLES_KEY));
    let Some(series) = samples.and_then(|samples| cdf::build_cdf(samples)) else {
        log::warn!(
            "{} has no valid {class} bandwidth ratio samples, skipping",
            operator.key()
        );
        return Ok(());
    };

    let curves = [CdfCurve {
        label: "Total BW / PCell BW".to_string(),
        color: BLACK,
        series,
    }];

    let filename = format!(
        "cdf_bandwidth_ratio_{}_{}_{}{}.png",
        class,
        operator.key(),
        direction.token(),
        config.integrity_suffix
    );
    plots::render_cdf_chart(
        &curves,
        "Bandwidth Ratio",
        bandwidth_ratio_x_max(class, operator),
        None,
        &config.plots_dir.join(&filename),
    )?;
    log::info!("Saved plot: {filename}");

    Ok(())
}
