//! Plotting infrastructure for campaign charts
//!
//! This module wraps the [`plotters`] crate behind three chart kinds:
//! stacked composition bars, box-and-whisker charts, and empirical CDF
//! line charts. Charts are saved as PNG files with fixed 1200x800
//! resolution using the bitmap backend, which works in headless
//! environments without system font dependencies.

use crate::common::cdf::CdfSeries;
use crate::common::data_structures::SampleSeries;
use crate::common::distribution::StackedComposition;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

pub use plotters::chart::SeriesLabelPosition;
pub use plotters::style::RGBColor;

/// Chart resolution in pixels.
pub const CHART_WIDTH: u32 = 1200;
pub const CHART_HEIGHT: u32 = 800;

/// Green-to-red spectrum used for composition segments, indexed by
/// component/layer rank.
pub const SPECTRUM_COLORS: [RGBColor; 8] = [
    RGBColor(0x08, 0x71, 0x0C),
    RGBColor(0x70, 0xCA, 0x32),
    RGBColor(0xAD, 0xE7, 0x28),
    RGBColor(0xF3, 0xFF, 0x33),
    RGBColor(0xFF, 0xB2, 0x33),
    RGBColor(0xFF, 0x7A, 0x30),
    RGBColor(0xFF, 0x46, 0x29),
    RGBColor(0xCB, 0x04, 0x04),
];

/// Gray used for categories outside the known palettes.
pub const FALLBACK_COLOR: RGBColor = RGBColor(0x99, 0x99, 0x99);

/// Box outline colors: light blue for single charts and the left series of
/// paired charts, light coral for the right series.
pub const BOX_COLOR: RGBColor = RGBColor(0x64, 0x95, 0xED);
pub const BOX_PAIR_COLOR: RGBColor = RGBColor(0xF0, 0x80, 0x80);

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save plot to file: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, PlotError>;

/// Per-category styling for one stacked series: legend text (None keeps the
/// series out of the legend) and segment color.
#[derive(Debug, Clone)]
pub struct SeriesStyle {
    pub legend: Option<String>,
    pub color: RGBColor,
    pub alpha: f64,
}

impl SeriesStyle {
    pub fn new(legend: Option<String>, color: RGBColor) -> Self {
        Self {
            legend,
            color,
            alpha: 1.0,
        }
    }

    pub fn with_alpha(legend: Option<String>, color: RGBColor, alpha: f64) -> Self {
        Self {
            legend,
            color,
            alpha,
        }
    }
}

/// One group of a box chart: the x tick label and its samples.
#[derive(Debug, Clone)]
pub struct BoxGroup {
    pub label: String,
    pub samples: SampleSeries,
}

/// One group of a paired box chart: two side-by-side sample collections
/// sharing an x tick.
#[derive(Debug, Clone)]
pub struct PairedBoxGroup {
    pub label: String,
    pub left: SampleSeries,
    pub right: SampleSeries,
}

/// One curve of a CDF chart.
#[derive(Debug, Clone)]
pub struct CdfCurve {
    pub label: String,
    pub color: RGBColor,
    pub series: CdfSeries,
}

/// Draws a stacked composition chart: one bar per x label, percentage
/// segments per category in stacking order.
///
/// `styles` runs parallel to `composition.series`. A series appears in the
/// legend only when its style carries a legend text *and* the series is
/// visible somewhere on the chart; invisible categories still occupy
/// zero-height segments. `y_max` sets the axis headroom that keeps the
/// legend clear of the bars; y tick labels beyond 100% are suppressed.
pub fn render_composition_chart(
    composition: &StackedComposition,
    styles: &[SeriesStyle],
    x_desc: &str,
    y_max: f64,
    output_path: &Path,
) -> Result<()> {
    if composition.x_labels.is_empty() {
        return Err(PlotError::InvalidData(
            "Composition has no x positions".to_string(),
        ));
    }
    if styles.len() != composition.series.len() {
        return Err(PlotError::InvalidData(format!(
            "{} styles supplied for {} series",
            styles.len(),
            composition.series.len()
        )));
    }
    for series in &composition.series {
        for (value, baseline) in series.values.iter().zip(&series.baselines) {
            let top = value + baseline;
            if *value < 0.0 || top > 100.0 + 1e-6 {
                return Err(PlotError::InvalidData(format!(
                    "Stack segment for {:?} reaches {:.2}, outside 0-100",
                    series.key, top
                )));
            }
        }
    }

    let root = BitMapBackend::new(output_path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let bar_count = composition.x_labels.len();
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d((0..bar_count).into_segmented(), 0.0..y_max)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    let x_labels = composition.x_labels.clone();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(x_desc)
        .y_desc("Percentage (%)")
        .x_label_style(("sans-serif", 35))
        .y_label_style(("sans-serif", 35))
        .x_label_formatter(&|segment| match segment {
            SegmentValue::CenterOf(index) | SegmentValue::Exact(index) => {
                x_labels.get(*index).cloned().unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        })
        .y_label_formatter(&|value| {
            if *value <= 100.0 {
                format!("{value:.0}")
            } else {
                String::new()
            }
        })
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let mut legend_count = 0;
    for (series, style) in composition.series.iter().zip(styles) {
        let color = style.color;
        let alpha = style.alpha;
        let mut bars = Vec::with_capacity(bar_count);
        for (index, (value, baseline)) in
            series.values.iter().zip(&series.baselines).enumerate()
        {
            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(index), *baseline),
                    (SegmentValue::Exact(index + 1), baseline + value),
                ],
                color.mix(alpha).filled(),
            );
            bar.set_margin(0, 0, 8, 8);
            bars.push(bar);
        }

        let annotation = chart
            .draw_series(bars)
            .map_err(|e| PlotError::Drawing(e.to_string()))?;

        if let Some(text) = &style.legend {
            if series.has_visible_value() {
                annotation.label(text).legend(move |(x, y)| {
                    Rectangle::new([(x, y - 8), (x + 16, y + 8)], color.mix(alpha).filled())
                });
                legend_count += 1;
            }
        }
    }

    if legend_count > 0 {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperMiddle)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font(("sans-serif", 25))
            .draw()
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

/// Value range with padding for auto-scaled box charts.
fn sample_range<'a>(samples: impl Iterator<Item = &'a f64>) -> (f32, f32) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &value in samples {
        min = min.min(value);
        max = max.max(value);
    }
    let span = (max - min).max(1.0);
    ((min - span * 0.05) as f32, (max + span * 0.05) as f32)
}

/// Draws a box-and-whisker chart with one box per group.
///
/// `y_limits` pins the value axis (used by the bandwidth charts); when
/// absent the axis is scaled to the data with a small padding.
pub fn render_box_chart(
    groups: &[BoxGroup],
    x_desc: &str,
    y_desc: &str,
    y_limits: Option<(f32, f32)>,
    output_path: &Path,
) -> Result<()> {
    if groups.is_empty() {
        return Err(PlotError::InvalidData("No box groups".to_string()));
    }
    if let Some(group) = groups.iter().find(|group| group.samples.is_empty()) {
        return Err(PlotError::InvalidData(format!(
            "Box group {:?} has no samples",
            group.label
        )));
    }

    let root = BitMapBackend::new(output_path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let (y_min, y_max) = y_limits
        .unwrap_or_else(|| sample_range(groups.iter().flat_map(|group| group.samples.iter())));

    let group_count = groups.len();
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d((0..group_count).into_segmented(), y_min..y_max)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    let x_labels: Vec<String> = groups.iter().map(|group| group.label.clone()).collect();
    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_label_style(("sans-serif", 35))
        .y_label_style(("sans-serif", 35))
        .x_label_formatter(&|segment| match segment {
            SegmentValue::CenterOf(index) | SegmentValue::Exact(index) => {
                x_labels.get(*index).cloned().unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        })
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(groups.iter().enumerate().map(|(index, group)| {
            Boxplot::new_vertical(
                SegmentValue::CenterOf(index),
                &Quartiles::new(&group.samples),
            )
            .width(40)
            .whisker_width(0.5)
            .style(BOX_COLOR.stroke_width(3))
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

/// Draws a paired box chart: two boxes per group, offset around a shared
/// x tick, with a two-entry legend naming the series.
pub fn render_paired_box_chart(
    groups: &[PairedBoxGroup],
    series_labels: (&str, &str),
    x_desc: &str,
    y_desc: &str,
    output_path: &Path,
) -> Result<()> {
    if groups.is_empty() {
        return Err(PlotError::InvalidData("No box groups".to_string()));
    }
    if groups
        .iter()
        .all(|group| group.left.is_empty() && group.right.is_empty())
    {
        return Err(PlotError::InvalidData(
            "All paired groups are empty".to_string(),
        ));
    }

    let root = BitMapBackend::new(output_path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let (y_min, y_max) = sample_range(
        groups
            .iter()
            .flat_map(|group| group.left.iter().chain(group.right.iter())),
    );

    let group_count = groups.len();
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d((0..group_count).into_segmented(), y_min..y_max)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    let x_labels: Vec<String> = groups.iter().map(|group| group.label.clone()).collect();
    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_label_style(("sans-serif", 35))
        .y_label_style(("sans-serif", 35))
        .x_label_formatter(&|segment| match segment {
            SegmentValue::CenterOf(index) | SegmentValue::Exact(index) => {
                x_labels.get(*index).cloned().unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        })
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    type SideAccessor = for<'a> fn(&'a PairedBoxGroup) -> &'a SampleSeries;
    let sides: [(&str, RGBColor, f64, SideAccessor); 2] = [
        (series_labels.0, BOX_COLOR, -28.0, |g| &g.left),
        (series_labels.1, BOX_PAIR_COLOR, 28.0, |g| &g.right),
    ];
    for (label, color, offset, samples) in sides {
        let annotation = chart
            .draw_series(
                groups
                    .iter()
                    .enumerate()
                    .filter(|(_, group)| !samples(group).is_empty())
                    .map(|(index, group)| {
                        Boxplot::new_vertical(
                            SegmentValue::CenterOf(index),
                            &Quartiles::new(samples(group)),
                        )
                        .width(36)
                        .whisker_width(0.5)
                        .style(color.stroke_width(3))
                        .offset(offset)
                    }),
            )
            .map_err(|e| PlotError::Drawing(e.to_string()))?;

        annotation.label(label).legend(move |(x, y)| {
            Rectangle::new([(x, y - 8), (x + 16, y + 8)], color.mix(0.7).filled())
        });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 25))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

/// Draws one or more empirical CDF curves.
///
/// The x axis runs from 0 to `x_max` (values beyond the limit are clipped,
/// matching the fixed axis windows of the published charts); the y axis is
/// the cumulative fraction in [0, 1]. Curves are drawn, and listed in the
/// legend, in the order supplied.
pub fn render_cdf_chart(
    curves: &[CdfCurve],
    x_desc: &str,
    x_max: f64,
    legend: Option<SeriesLabelPosition>,
    output_path: &Path,
) -> Result<()> {
    if curves.is_empty() {
        return Err(PlotError::InvalidData("No CDF curves".to_string()));
    }
    if let Some(curve) = curves.iter().find(|curve| curve.series.is_empty()) {
        return Err(PlotError::InvalidData(format!(
            "CDF curve {:?} has no samples",
            curve.label
        )));
    }

    let root = BitMapBackend::new(output_path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(0.0..x_max, 0.0..1.0)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc("CDF")
        .x_label_style(("sans-serif", 35))
        .y_label_style(("sans-serif", 35))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    for curve in curves {
        let color = curve.color;
        let annotation = chart
            .draw_series(LineSeries::new(
                curve.series.points(),
                color.mix(0.8).stroke_width(6),
            ))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;

        if legend.is_some() {
            annotation.label(&curve.label).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(6))
            });
        }
    }

    if let Some(position) = legend {
        chart
            .configure_series_labels()
            .position(position)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font(("sans-serif", 25))
            .draw()
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::cdf::build_cdf;
    use crate::common::distribution::{build_composition, StackSeries};
    use std::collections::BTreeMap;

    fn simple_composition() -> StackedComposition {
        let percentages: BTreeMap<String, f64> =
            [("a".to_string(), 60.0), ("b".to_string(), 40.0)].into();
        build_composition(
            &["a".to_string(), "b".to_string()],
            &[("n71".to_string(), percentages)],
        )
    }

    #[test]
    fn composition_rejects_empty_x_axis() {
        let empty = StackedComposition::default();
        let result = render_composition_chart(
            &empty,
            &[],
            "Band",
            120.0,
            Path::new("unused.png"),
        );
        assert!(matches!(result, Err(PlotError::InvalidData(_))));
    }

    #[test]
    fn composition_rejects_style_mismatch() {
        let composition = simple_composition();
        let styles = [SeriesStyle::new(None, FALLBACK_COLOR)];
        let result = render_composition_chart(
            &composition,
            &styles,
            "Band",
            120.0,
            Path::new("unused.png"),
        );
        assert!(matches!(result, Err(PlotError::InvalidData(_))));
    }

    #[test]
    fn composition_rejects_overflowing_stack() {
        let series = StackSeries {
            key: "a".to_string(),
            values: vec![80.0],
            baselines: vec![30.0],
        };
        let composition = StackedComposition {
            x_labels: vec!["n71".to_string()],
            series: vec![series],
        };
        let styles = [SeriesStyle::new(None, FALLBACK_COLOR)];
        let result = render_composition_chart(
            &composition,
            &styles,
            "Band",
            120.0,
            Path::new("unused.png"),
        );
        assert!(matches!(result, Err(PlotError::InvalidData(_))));
    }

    #[test]
    fn box_chart_rejects_empty_groups() {
        let result = render_box_chart(&[], "CCs", "Mbps", None, Path::new("unused.png"));
        assert!(matches!(result, Err(PlotError::InvalidData(_))));

        let groups = [BoxGroup {
            label: "1".to_string(),
            samples: vec![],
        }];
        let result = render_box_chart(&groups, "CCs", "Mbps", None, Path::new("unused.png"));
        assert!(matches!(result, Err(PlotError::InvalidData(_))));
    }

    #[test]
    fn paired_box_chart_rejects_all_empty() {
        let groups = [PairedBoxGroup {
            label: "1".to_string(),
            left: vec![],
            right: vec![],
        }];
        let result = render_paired_box_chart(
            &groups,
            ("T_CA", "T_TOTAL"),
            "CCs",
            "Mbps",
            Path::new("unused.png"),
        );
        assert!(matches!(result, Err(PlotError::InvalidData(_))));
    }

    #[test]
    fn cdf_chart_rejects_empty_curves() {
        let result = render_cdf_chart(&[], "Mbps", 1000.0, None, Path::new("unused.png"));
        assert!(matches!(result, Err(PlotError::InvalidData(_))));
    }

    #[test]
    fn sample_range_pads_both_sides() {
        let samples = vec![-100.0, -60.0];
        let (min, max) = sample_range(samples.iter());
        assert!(min < -100.0);
        assert!(max > -60.0);
    }

    #[test]
    #[ignore = "Font rendering not available in test environment"]
    fn renders_composition_to_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("composition.png");
        let composition = simple_composition();
        let styles = [
            SeriesStyle::new(Some("1CC".to_string()), SPECTRUM_COLORS[0]),
            SeriesStyle::new(Some("2CC".to_string()), SPECTRUM_COLORS[1]),
        ];
        render_composition_chart(&composition, &styles, "PCell Band", 120.0, &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    #[ignore = "Font rendering not available in test environment"]
    fn renders_cdf_to_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cdf.png");
        let curves = [CdfCurve {
            label: "T_BASE".to_string(),
            color: RED,
            series: build_cdf(&[100.0, 200.0, 300.0]).unwrap(),
        }];
        render_cdf_chart(&curves, "Throughput (Mbps)", 1000.0, None, &path).unwrap();
        assert!(path.exists());
    }
}
