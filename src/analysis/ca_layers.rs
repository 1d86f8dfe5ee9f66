//! MIMO-layer composition per CA type
//!
//! One stacked bar chart per (operator, band class, direction): each bar is
//! a CA configuration (labeled by component count), partitioned into the
//! percentage share of each MIMO layer count observed in it.

use crate::common::bands::BandClass;
use crate::common::data_structures::{CaMetricStats, MetricSeries};
use crate::common::distribution::{self, EmptyGroupError};
use crate::common::plots::{self, PlotError, RGBColor, SeriesStyle, FALLBACK_COLOR, SPECTRUM_COLORS};
use crate::common::policy::{self, Operator};
use crate::config::{LinkDirection, PlotConfig};
use crate::parsing::{load_stats, ParsingError};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur while generating a layer composition chart
#[derive(Error, Debug)]
pub enum CaLayersError {
    #[error("Plot generation failed: {0}")]
    Plot(#[from] PlotError),
}

type Result<T> = core::result::Result<T, CaLayersError>;

/// Segment color of a layer key: spectrum position by layer count.
fn layer_color(key: &str) -> RGBColor {
    match policy::layer_count(key) {
        Some(count @ 1..=4) => SPECTRUM_COLORS[(count - 1) as usize],
        _ => FALLBACK_COLOR,
    }
}

/// Legend label of a layer key: the bare layer count.
fn layer_legend_label(key: &str) -> String {
    match policy::layer_count(key) {
        Some(count) => count.to_string(),
        None => key.to_string(),
    }
}

/// Generate the layer composition charts for every configured direction.
/// Failures are logged per chart; none aborts the batch.
pub fn generate(config: &PlotConfig) {
    for &direction in &config.directions {
        let path = config.dataset_path("bar_ca_layer", direction);
        let data: CaMetricStats = match load_stats(&path) {
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
            log::info!("Plotting {class} band {} layers...", direction.token());
            for &operator in policy::target_operators(class) {
                if let Err(err) = plot_operator(class, operator, operator_stats, direction, config)
                {
                    log::error!(
                        "Layer composition chart for {} {class} failed: {err}",
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
    operator_stats: &BTreeMap<String, BTreeMap<String, MetricSeries>>,
    direction: LinkDirection,
    config: &PlotConfig,
) -> Result<()> {
    let Some(ca_data) = operator_stats.get(operator.key()) else {
        log::warn!("{} has no {class} data, skipping", operator.key());
        return Ok(());
    };
    if ca_data.is_empty() {
        log::warn!("{} has no {class} data, skipping", operator.key());
        return Ok(());
    }

    let available = ca_data
        .iter()
        .filter(|(_, series)| !series.values.is_empty())
        .map(|(ca_type, _)| ca_type.as_str());
    let ordered_ca_types = policy::select_and_order_ca_types(available, operator, class);
    if ordered_ca_types.is_empty() {
        return Ok(());
    }

    // Bin each CA configuration's layer samples into per-layer counts; each
    // bar is normalized against its own configuration's total.
    let mut layer_counts = Vec::with_capacity(ordered_ca_types.len());
    for ca_type in &ordered_ca_types {
        let samples = &ca_data[ca_type.as_str()].values;
        layer_counts.push((
            ca_type.clone(),
            distribution::bin_counts(samples, |value| format!("{} Layer", value as i64)),
        ));
    }

    let layer_keys = policy::order_layer_keys(
        layer_counts
            .iter()
            .flat_map(|(_, counts)| counts.keys().map(String::as_str)),
    );

    let mut groups = Vec::new();
    for (ca_type, counts) in &layer_counts {
        match distribution::normalize(counts, &layer_keys) {
            Ok(percentages) => groups.push((policy::component_label(ca_type), percentages)),
            Err(EmptyGroupError) => {
                log::warn!("{} {class} {ca_type} has no samples, skipping", operator.key());
            }
        }
    }
    if groups.is_empty() {
        return Ok(());
    }

    let composition = distribution::build_composition(&layer_keys, &groups);
    let styles: Vec<SeriesStyle> = layer_keys
        .iter()
        .map(|key| {
            SeriesStyle::with_alpha(Some(layer_legend_label(key)), layer_color(key), 0.8)
        })
        .collect();

    let visible = composition
        .series
        .iter()
        .filter(|series| series.has_visible_value())
        .count();
    let y_max = if visible > 2 { 154.0 } else { 126.0 };

    let filename = format!(
        "bar_ca_layers_{}_{}_{}{}.png",
        class,
        operator.key(),
        direction.token(),
        config.integrity_suffix
    );
    plots::render_composition_chart(
        &composition,
        &styles,
        "Number of CCs",
        y_max,
        &config.plots_dir.join(&filename),
    )?;
    log::info!("Saved plot: {filename}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_colors_follow_layer_count() {
        assert_eq!(layer_color("1 Layer"), SPECTRUM_COLORS[0]);
        assert_eq!(layer_color("4 Layer"), SPECTRUM_COLORS[3]);
        assert_eq!(layer_color("8 Layer"), FALLBACK_COLOR);
        assert_eq!(layer_color("Other"), FALLBACK_COLOR);
    }

    #[test]
    fn layer_legend_is_bare_count() {
        assert_eq!(layer_legend_label("2 Layer"), "2");
        assert_eq!(layer_legend_label("Other"), "Other");
    }
}
