//! File parsing functionality for campaign statistics data
//!
//! This module handles loading and parsing the zstd-compressed JSON
//! dataset files produced by the upstream measurement pipeline.

use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use zstd::Decoder;

/// Errors that can occur during file parsing
#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("Input file does not exist: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("Failed to read input file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to decompress zstd file: {0}")]
    Decompression(String),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),
}

type Result<T> = core::result::Result<T, ParsingError>;

/// Parse one dataset file into its in-memory structure
///
/// This function:
/// - Verifies the file exists (a missing dataset skips that dataset's run,
///   it is not fatal to the batch)
/// - Opens the compressed file and creates a ZStandard decoder
/// - Deserializes JSON directly from the decoder
pub fn load_stats<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    if !file_path.exists() {
        return Err(ParsingError::MissingInput(file_path.to_path_buf()));
    }

    let file = File::open(file_path)?;

    let mut decoder = Decoder::new(file)
        .map_err(|e| ParsingError::Decompression(format!("Failed to create decoder: {}", e)))?;

    let stats: T = serde_json::from_reader(&mut decoder)?;
    Ok(stats)
}
