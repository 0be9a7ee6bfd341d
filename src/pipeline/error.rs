//! Error types for the preprocessing pipeline.
//!
//! Transformers and the estimator return `PipelineError` so callers can match
//! on the failure mode. Drivers wrap these into `anyhow` errors with context.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised while fitting or applying pipeline steps.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// `transform` or `predict` was called before `fit`.
    #[error("{step} is not fitted yet; call fit before transform/predict")]
    NotFitted {
        /// Step that was used uninitialized
        step: String,
    },

    /// A configured column is absent from the table.
    #[error("Column '{column}' required by {step} not found in table")]
    MissingColumn {
        /// Step that referenced the column
        step: String,
        /// Name of the absent column
        column: String,
    },

    /// A column that must be numeric holds another dtype.
    #[error("Column '{column}' must be numeric for {step}, found {dtype}")]
    NonNumericColumn {
        step: String,
        column: String,
        dtype: String,
    },

    /// A fit-time statistic has no non-missing values to learn from.
    #[error("Column '{column}' has no non-missing values; cannot compute {statistic}")]
    EmptyStatistic { column: String, statistic: String },

    /// Log transform received a value it cannot take the logarithm of.
    #[error("Column '{column}' has non-positive value {value} at row {row}; log transform requires values > 0")]
    NonPositiveValue {
        column: String,
        row: usize,
        value: f64,
    },

    /// Target column holds a label outside the fixed mapping.
    #[error("Unknown target label {label:?} at row {row}; expected one of {expected:?}")]
    UnknownLabel {
        row: usize,
        label: Option<String>,
        expected: Vec<String>,
    },

    /// Target vector is not binary 0/1.
    #[error("Target value {value} at row {row} is not 0 or 1")]
    InvalidTarget { row: usize, value: i32 },

    /// Feature table and target vector disagree on row count.
    #[error("Feature table has {rows} rows but target has {targets} values")]
    LengthMismatch { rows: usize, targets: usize },

    /// Underlying dataframe operation failed.
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
