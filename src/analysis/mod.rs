//! Chart-family analysis modules
//!
//! One module per chart family, each looping over its
//! (operator, band, metric, direction) tuples with per-chart failure
//! isolation:
//! - Composition bars: CA types per band, MIMO modes per band, MIMO layers
//!   per CA type
//! - Box charts: metrics per CA type and per MIMO layer
//! - CDFs: throughput decomposition, throughput ratios, bandwidth ratio

pub mod ca_composition;
pub mod ca_layers;
pub mod ca_metrics;
pub mod mimo_composition;
pub mod mimo_metrics;
pub mod ratio_cdf;
pub mod throughput_cdf;
