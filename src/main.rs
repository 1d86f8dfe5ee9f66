mod analysis;
mod common;
mod config;
mod parsing;

use config::PlotConfig;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Input and output directories are resolved relative to the manifest
    // directory; the stats directory is produced by the upstream pipeline.
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let config = PlotConfig::new(manifest_dir.join("stats"), manifest_dir.join("plots"));

    if !config.stats_dir.exists() {
        log::error!(
            "Stats directory does not exist: {}",
            config.stats_dir.display()
        );
        return ExitCode::FAILURE;
    }
    if let Err(err) = std::fs::create_dir_all(&config.plots_dir) {
        log::error!(
            "Failed to create plots directory {}: {err}",
            config.plots_dir.display()
        );
        return ExitCode::FAILURE;
    }

    // Each analysis isolates its own failures; a bad dataset or chart is
    // logged and the batch moves on.
    type Analysis = (&'static str, fn(&PlotConfig));
    let analyses: [Analysis; 8] = [
        ("CA composition", analysis::ca_composition::generate),
        ("MIMO composition", analysis::mimo_composition::generate),
        ("CA layer composition", analysis::ca_layers::generate),
        ("CA box metrics", analysis::ca_metrics::generate),
        ("MIMO box metrics", analysis::mimo_metrics::generate),
        ("Throughput CDFs", analysis::throughput_cdf::generate),
        (
            "Throughput ratio CDFs",
            analysis::ratio_cdf::generate_tput_ratio,
        ),
        (
            "Bandwidth ratio CDFs",
            analysis::ratio_cdf::generate_bandwidth_ratio,
        ),
    ];

    let progress = ProgressBar::new(analyses.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("[{pos}/{len}] {msg}") {
        progress.set_style(style);
    }

    for (name, generate) in analyses {
        progress.set_message(name);
        generate(&config);
        progress.inc(1);
    }
    progress.finish_with_message("Plotting completed");

    ExitCode::SUCCESS
}
