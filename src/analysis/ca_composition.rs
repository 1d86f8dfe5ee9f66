//! Per-band carrier-aggregation composition charts
//!
//! One stacked bar chart per operator and link direction: each bar is a
//! PCell band, partitioned into the percentage share of every CA type
//! observed on that band. Also writes a plain-text composition summary
//! next to the charts.

use crate::common::data_structures::{CaCompositionStats, GroupedCounts};
use crate::common::distribution::{self, EmptyGroupError};
use crate::common::plots::{
    self, PlotError, RGBColor, SeriesStyle, FALLBACK_COLOR, SPECTRUM_COLORS,
};
use crate::common::policy::{self, Operator};
use crate::common::summary::{format_composition_table, CompositionRow};
use crate::config::{LinkDirection, PlotConfig};
use crate::parsing::{load_stats, ParsingError};
use std::collections::BTreeMap;
use std::fs;
use thiserror::Error;

/// Errors that can occur while generating a CA composition chart
#[derive(Error, Debug)]
pub enum CaCompositionError {
    #[error("Plot generation failed: {0}")]
    Plot(#[from] PlotError),
}

type Result<T> = core::result::Result<T, CaCompositionError>;

/// Segment color of a CA-type key: spectrum position by component count,
/// gray for keys outside the canonical set.
fn ca_color(key: &str) -> RGBColor {
    match policy::component_count(key) {
        Some(count @ 1..=8) => SPECTRUM_COLORS[(count - 1) as usize],
        _ => FALLBACK_COLOR,
    }
}

/// Legend entry of a CA-type key, as a component count ("3CC").
///
/// ATT's legend shows only 1CC-4CC and Verizon's only 5CC-8CC; the bars
/// themselves always show every category.
fn legend_entry(operator: Option<Operator>, key: &str) -> Option<String> {
    let count = policy::component_count(key);
    let keep = match operator {
        Some(Operator::Att) => matches!(count, Some(1..=4)),
        Some(Operator::Verizon) => matches!(count, Some(5..=8)),
        _ => true,
    };
    if !keep {
        return None;
    }
    Some(match count {
        Some(count) => format!("{count}CC"),
        None => key.to_string(),
    })
}

/// Generate the per-band CA composition charts for every configured
/// direction. Failures are logged per chart; none aborts the batch.
pub fn generate(config: &PlotConfig) {
    for &direction in &config.directions {
        let path = config.dataset_path("bar_ca_type_distribution", direction);
        let data: CaCompositionStats = match load_stats(&path) {
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

        let mut summaries = Vec::new();
        for (operator_key, band_data) in &data {
            match plot_operator(operator_key, band_data, direction, config) {
                Ok(Some(summary)) => summaries.push(summary),
                Ok(None) => {}
                Err(err) => {
                    log::error!("CA composition chart for {operator_key} failed: {err}");
                }
            }
        }

        if !summaries.is_empty() {
            let summary_path = config.plots_dir.join(format!(
                "bar_ca_type_distribution_{}_summary.txt",
                direction.token()
            ));
            if let Err(err) = fs::write(&summary_path, summaries.join("\n\n")) {
                log::error!("Failed to write {}: {err}", summary_path.display());
            }
        }
    }
}

/// Draws one operator's chart and returns its summary section, or `None`
/// when the operator has nothing plottable.
fn plot_operator(
    operator_key: &str,
    band_data: &BTreeMap<String, GroupedCounts>,
    direction: LinkDirection,
    config: &PlotConfig,
) -> Result<Option<String>> {
    if band_data.is_empty() {
        return Ok(None);
    }
    let operator = Operator::from_key(operator_key);

    let totals: GroupedCounts = band_data
        .iter()
        .map(|(band, counts)| (band.clone(), counts.values().sum()))
        .collect();

    let ordered_bands = policy::order_bands(operator, &totals);
    if ordered_bands.is_empty() {
        log::warn!("{operator_key} has no plottable bands, skipping");
        return Ok(None);
    }

    let ordered_keys = policy::order_ca_keys(
        ordered_bands
            .iter()
            .filter_map(|band| band_data.get(band))
            .flat_map(|counts| counts.keys().map(String::as_str)),
    );

    let mut groups = Vec::new();
    let mut sections = Vec::new();
    for band in &ordered_bands {
        let Some(counts) = band_data.get(band) else {
            continue;
        };
        match distribution::normalize(counts, &ordered_keys) {
            Ok(percentages) => {
                let total: u64 = counts.values().sum();
                let rows: Vec<CompositionRow> = ordered_keys
                    .iter()
                    .filter_map(|key| {
                        counts
                            .get(key)
                            .map(|&count| CompositionRow::new(key.clone(), count, total))
                    })
                    .collect();
                sections.push(format_composition_table(
                    &rows,
                    Some(&format!("{operator_key} / {band}")),
                ));
                groups.push((band.clone(), percentages));
            }
            Err(EmptyGroupError) => {
                log::warn!("{operator_key} {band} has no samples, skipping band");
            }
        }
    }

    if groups.is_empty() {
        return Ok(None);
    }

    let composition = distribution::build_composition(&ordered_keys, &groups);
    let styles: Vec<SeriesStyle> = ordered_keys
        .iter()
        .map(|key| SeriesStyle::new(legend_entry(operator, key), ca_color(key)))
        .collect();

    let y_max = if ordered_keys.len() > 2 { 136.0 } else { 120.0 };

    let filename = format!(
        "bar_ca_type_distribution_{}_{}.png",
        operator_key,
        direction.token()
    );
    plots::render_composition_chart(
        &composition,
        &styles,
        "PCell Band",
        y_max,
        &config.plots_dir.join(&filename),
    )?;
    log::info!("Saved plot: {filename}");

    Ok(Some(sections.join("\n\n")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ca_colors_follow_component_count() {
        assert_eq!(ca_color("DL NonCA"), SPECTRUM_COLORS[0]);
        assert_eq!(ca_color("DL 8CA"), SPECTRUM_COLORS[7]);
        assert_eq!(ca_color("Mystery"), FALLBACK_COLOR);
    }

    #[test]
    fn att_legend_keeps_low_component_counts() {
        let op = Some(Operator::Att);
        assert_eq!(legend_entry(op, "DL NonCA").as_deref(), Some("1CC"));
        assert_eq!(legend_entry(op, "DL 4CA").as_deref(), Some("4CC"));
        assert_eq!(legend_entry(op, "DL 5CA"), None);
        assert_eq!(legend_entry(op, "Mystery"), None);
    }

    #[test]
    fn verizon_legend_keeps_high_component_counts() {
        let op = Some(Operator::Verizon);
        assert_eq!(legend_entry(op, "DL 5CA").as_deref(), Some("5CC"));
        assert_eq!(legend_entry(op, "DL 8CA").as_deref(), Some("8CC"));
        assert_eq!(legend_entry(op, "DL NonCA"), None);
    }

    #[test]
    fn unrestricted_legend_keeps_everything() {
        let op = Some(Operator::TMobile);
        assert_eq!(legend_entry(op, "DL 2CA").as_deref(), Some("2CC"));
        assert_eq!(legend_entry(op, "Mystery").as_deref(), Some("Mystery"));
        assert_eq!(legend_entry(None, "DL 7CA").as_deref(), Some("7CC"));
    }

    #[test]
    #[ignore = "Font rendering not available in test environment"]
    fn end_to_end_from_fixture() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let stats_dir = dir.path().join("stats");
        let plots_dir = dir.path().join("plots");
        fs::create_dir_all(&stats_dir).unwrap();
        fs::create_dir_all(&plots_dir).unwrap();

        let json = r#"{
            "ATT": {
                "n77": {"DL NonCA": 6, "DL 2CA": 2},
                "n71": {"DL NonCA": 4}
            },
            "TMobile": {
                "n66": {"DL NonCA": 9}
            }
        }"#;
        let encoded = zstd::stream::encode_all(json.as_bytes(), 0).unwrap();
        let mut file =
            fs::File::create(stats_dir.join("bar_ca_type_distribution_dl.json.zst")).unwrap();
        file.write_all(&encoded).unwrap();

        let mut config = PlotConfig::new(stats_dir, plots_dir.clone());
        config.directions = vec![LinkDirection::Dl];
        generate(&config);

        // ATT renders; TMobile's only band is excluded, so it is skipped.
        assert!(plots_dir
            .join("bar_ca_type_distribution_ATT_dl.png")
            .exists());
        assert!(!plots_dir
            .join("bar_ca_type_distribution_TMobile_dl.png")
            .exists());

        let summary = fs::read_to_string(
            plots_dir.join("bar_ca_type_distribution_dl_summary.txt"),
        )
        .unwrap();
        assert!(summary.contains("ATT / n77"));
        assert!(summary.contains("75.00%"));
    }
}
