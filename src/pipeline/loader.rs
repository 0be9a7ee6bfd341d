//! Dataset loader for CSV and Parquet files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::*;

use super::error::PipelineResult;
use super::values::require_columns;

/// Default number of rows used for CSV schema inference
pub const DEFAULT_INFER_SCHEMA_LENGTH: usize = 10000;

/// Load a dataset from a file (CSV or Parquet based on extension).
///
/// `infer_schema_length` of 0 scans the whole CSV file for type inference.
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    if !path.exists() {
        anyhow::bail!("Dataset not found: {}", path.display());
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(schema_length)
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    lf.collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))
}

/// Resolve a file key against the data directory.
pub fn dataset_path(data_dir: &Path, key: &str) -> PathBuf {
    data_dir.join(key)
}

/// Load the dataset named `key` from the data directory.
pub fn load_table(data_dir: &Path, key: &str, infer_schema_length: usize) -> Result<DataFrame> {
    load_dataset(&dataset_path(data_dir, key), infer_schema_length)
}

/// Restrict a table to the given columns, in the given order.
pub fn select_features(df: &DataFrame, features: &[String]) -> PipelineResult<DataFrame> {
    require_columns(df, "FeatureSelection", features)?;
    Ok(df.select(features.iter().map(|s| s.as_str()))?)
}

/// Estimated in-memory size of a table in megabytes.
pub fn estimated_size_mb(df: &DataFrame) -> f64 {
    df.estimated_size() as f64 / (1024.0 * 1024.0)
}
