//! Per-band MIMO-mode composition charts
//!
//! One stacked bar chart per operator and link direction: each bar is a
//! band, partitioned into the percentage share of every MIMO mode observed
//! across the primary cell and all secondary cells combined.

use crate::common::data_structures::{GroupedCounts, MimoCompositionStats};
use crate::common::distribution::{self, EmptyGroupError};
use crate::common::plots::{self, PlotError, SeriesStyle, SPECTRUM_COLORS};
use crate::common::policy::{self, Operator};
use crate::config::{LinkDirection, PlotConfig};
use crate::parsing::{load_stats, ParsingError};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur while generating a MIMO composition chart
#[derive(Error, Debug)]
pub enum MimoCompositionError {
    #[error("Plot generation failed: {0}")]
    Plot(#[from] PlotError),
}

type Result<T> = core::result::Result<T, MimoCompositionError>;

/// The cell instances whose counts are merged per band: the primary cell
/// and up to seven secondary cells.
fn cell_types() -> Vec<String> {
    let mut cells = vec!["PCell".to_string()];
    cells.extend((1..8).map(|index| format!("SCell[{index}]")));
    cells
}

/// Merges per-cell mode counts into one band -> mode -> count mapping.
fn merge_cell_counts(
    cell_data: &BTreeMap<String, BTreeMap<String, GroupedCounts>>,
) -> BTreeMap<String, GroupedCounts> {
    let mut combined: BTreeMap<String, GroupedCounts> = BTreeMap::new();
    for cell_type in cell_types() {
        let Some(band_counts) = cell_data.get(&cell_type) else {
            continue;
        };
        for (band, mode_counts) in band_counts {
            let merged = combined.entry(band.clone()).or_default();
            for (mode, count) in mode_counts {
                *merged.entry(mode.clone()).or_insert(0) += count;
            }
        }
    }
    combined
}

/// Legend label of a MIMO mode key.
fn mode_legend_label(mode: &str) -> String {
    match mode {
        "1x1_MIMO" => "1x1".to_string(), // UL specific
        "2x2_MIMO" => "2x2".to_string(),
        other => other.to_string(),
    }
}

/// Generate the per-band MIMO mode composition charts for every configured
/// direction. Failures are logged per chart; none aborts the batch.
pub fn generate(config: &PlotConfig) {
    for &direction in &config.directions {
        let path = config.dataset_path("bar_mimo_mode_all_cells", direction);
        let data: MimoCompositionStats = match load_stats(&path) {
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

        for (operator_key, cell_data) in &data {
            if let Err(err) = plot_operator(operator_key, cell_data, direction, config) {
                log::error!("MIMO composition chart for {operator_key} failed: {err}");
            }
        }
    }
}

fn plot_operator(
    operator_key: &str,
    cell_data: &BTreeMap<String, BTreeMap<String, GroupedCounts>>,
    direction: LinkDirection,
    config: &PlotConfig,
) -> Result<()> {
    let combined = merge_cell_counts(cell_data);
    if combined.is_empty() {
        log::warn!("{operator_key} has no data, skipping");
        return Ok(());
    }
    let operator = Operator::from_key(operator_key);

    let totals: GroupedCounts = combined
        .iter()
        .map(|(band, modes)| (band.clone(), modes.values().sum()))
        .collect();

    let ordered_bands = policy::order_bands(operator, &totals);
    if ordered_bands.is_empty() {
        log::warn!("{operator_key} has no plottable bands, skipping");
        return Ok(());
    }

    let modes = policy::order_mode_keys(
        ordered_bands
            .iter()
            .filter_map(|band| combined.get(band))
            .flat_map(|counts| counts.keys().map(String::as_str)),
    );

    let mut groups = Vec::new();
    for band in &ordered_bands {
        let Some(counts) = combined.get(band) else {
            continue;
        };
        match distribution::normalize(counts, &modes) {
            Ok(percentages) => groups.push((band.clone(), percentages)),
            Err(EmptyGroupError) => {
                log::warn!("{operator_key} {band} has no samples, skipping band");
            }
        }
    }

    if groups.is_empty() {
        return Ok(());
    }

    let composition = distribution::build_composition(&modes, &groups);
    let styles: Vec<SeriesStyle> = modes
        .iter()
        .enumerate()
        .map(|(index, mode)| {
            SeriesStyle::new(
                Some(mode_legend_label(mode)),
                SPECTRUM_COLORS[index % SPECTRUM_COLORS.len()],
            )
        })
        .collect();

    let filename = format!(
        "bar_mimo_mode_all_cells_{}_{}.png",
        operator_key,
        direction.token()
    );
    plots::render_composition_chart(
        &composition,
        &styles,
        "Band",
        120.0,
        &config.plots_dir.join(&filename),
    )?;
    log::info!("Saved plot: {filename}");

    Ok(())
}
