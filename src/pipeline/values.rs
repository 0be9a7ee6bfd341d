//! Column access helpers shared by the transformers
//!
//! Cells are read out of polars columns into plain Rust vectors. Numeric
//! columns come out as `Option<f64>` (null and NaN both read as missing);
//! categorical columns come out as `CategoryValue`s or as their canonical text
//! form, which keys the label encoder.

use std::cmp::Ordering;
use std::fmt;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::{PipelineError, PipelineResult};

/// A single non-missing categorical cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryValue {
    Number(f64),
    Text(String),
}

impl CategoryValue {
    /// Ascending order used for tie-breaks: numbers before text, numbers
    /// numerically, text lexicographically.
    pub fn ascending(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CategoryValue::Number(a), CategoryValue::Number(b)) => a.total_cmp(b),
            (CategoryValue::Text(a), CategoryValue::Text(b)) => a.cmp(b),
            (CategoryValue::Number(_), CategoryValue::Text(_)) => Ordering::Less,
            (CategoryValue::Text(_), CategoryValue::Number(_)) => Ordering::Greater,
        }
    }

    /// Canonical text key, identical to what `canonical_values` yields for the
    /// same cell.
    pub fn key(&self) -> String {
        match self {
            CategoryValue::Number(n) => format!("{}", n),
            CategoryValue::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for CategoryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Look up a column, reporting the step that needed it when absent.
pub fn require_column<'a>(df: &'a DataFrame, step: &str, name: &str) -> PipelineResult<&'a Column> {
    df.column(name).map_err(|_| PipelineError::MissingColumn {
        step: step.to_string(),
        column: name.to_string(),
    })
}

/// Check every name is present before any work is done.
pub fn require_columns(df: &DataFrame, step: &str, names: &[String]) -> PipelineResult<()> {
    for name in names {
        require_column(df, step, name)?;
    }
    Ok(())
}

/// Whether a column can be read as numbers. An all-null column of any dtype
/// counts, since CSV inference types an empty column as text.
pub fn is_numeric(col: &Column) -> bool {
    col.dtype().is_primitive_numeric()
        || matches!(col.dtype(), DataType::Boolean | DataType::Null)
        || col.null_count() == col.len()
}

/// Read a numeric column as `Option<f64>`, treating NaN as missing.
pub fn numeric_values(df: &DataFrame, step: &str, name: &str) -> PipelineResult<Vec<Option<f64>>> {
    let col = require_column(df, step, name)?;

    if !is_numeric(col) {
        return Err(PipelineError::NonNumericColumn {
            step: step.to_string(),
            column: name.to_string(),
            dtype: col.dtype().to_string(),
        });
    }

    if col.null_count() == col.len() {
        return Ok(vec![None; col.len()]);
    }

    let cast = col.cast(&DataType::Float64)?;
    let values = cast
        .f64()?
        .into_iter()
        .map(|v| v.filter(|n| !n.is_nan()))
        .collect();

    Ok(values)
}

/// Read a categorical column, keeping numbers as numbers.
pub fn category_values(col: &Column) -> PipelineResult<Vec<Option<CategoryValue>>> {
    if col.dtype().is_primitive_numeric() {
        let cast = col.cast(&DataType::Float64)?;
        let values = cast
            .f64()?
            .into_iter()
            .map(|v| v.filter(|n| !n.is_nan()).map(CategoryValue::Number))
            .collect();
        return Ok(values);
    }

    Ok(canonical_values(col)?
        .into_iter()
        .map(|v| v.map(CategoryValue::Text))
        .collect())
}

/// Convert a column to its canonical text form, one entry per row.
pub fn canonical_values(col: &Column) -> PipelineResult<Vec<Option<String>>> {
    let values: Vec<Option<String>> = match col.dtype() {
        DataType::String => col
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect(),
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
            let cast = col.cast(&DataType::Int64)?;
            cast.i64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
            let cast = col.cast(&DataType::UInt64)?;
            cast.u64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::Float32 | DataType::Float64 => {
            let cast = col.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .map(|v| v.filter(|n| !n.is_nan()).map(|n| format!("{}", n)))
                .collect()
        }
        DataType::Boolean => col
            .bool()?
            .into_iter()
            .map(|v| v.map(|b| b.to_string()))
            .collect(),
        _ => {
            let cast = col.cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|v| v.map(|s| s.to_string()))
                .collect()
        }
    };

    Ok(values)
}

/// Replace (or add) a Float64 column in a copy-on-write table.
pub fn put_numeric(df: &mut DataFrame, name: &str, values: Vec<Option<f64>>) -> PipelineResult<()> {
    df.with_column(Column::new(name.into(), values))?;
    Ok(())
}

/// Replace (or add) a String column.
pub fn put_text(df: &mut DataFrame, name: &str, values: Vec<Option<String>>) -> PipelineResult<()> {
    df.with_column(Column::new(name.into(), values))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_values_treats_nan_as_missing() {
        let df = df! {
            "x" => [Some(1.0f64), Some(f64::NAN), None],
        }
        .unwrap();

        let values = numeric_values(&df, "test", "x").unwrap();
        assert_eq!(values, vec![Some(1.0), None, None]);
    }

    #[test]
    fn test_numeric_values_casts_integers() {
        let df = df! { "x" => [1i64, 2, 3] }.unwrap();
        let values = numeric_values(&df, "test", "x").unwrap();
        assert_eq!(values, vec![Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_numeric_values_rejects_text() {
        let df = df! { "x" => ["a", "b"] }.unwrap();
        let err = numeric_values(&df, "test", "x").unwrap_err();
        assert!(matches!(err, PipelineError::NonNumericColumn { .. }));
    }

    #[test]
    fn test_numeric_values_accepts_all_null_text_column() {
        let df = df! { "x" => [None::<String>, None] }.unwrap();
        let values = numeric_values(&df, "test", "x").unwrap();
        assert_eq!(values, vec![None, None]);
    }

    #[test]
    fn test_missing_column_reports_step() {
        let df = df! { "x" => [1.0f64] }.unwrap();
        match numeric_values(&df, "MeanImputer", "y").unwrap_err() {
            PipelineError::MissingColumn { step, column } => {
                assert_eq!(step, "MeanImputer");
                assert_eq!(column, "y");
            }
            other => panic!("Expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_canonical_float_matches_category_key() {
        let df = df! { "x" => [Some(1.0f64), Some(0.0), None] }.unwrap();
        let col = df.column("x").unwrap();

        let keys = canonical_values(col).unwrap();
        let cats = category_values(col).unwrap();

        assert_eq!(keys, vec![Some("1".to_string()), Some("0".to_string()), None]);
        assert_eq!(cats[0].as_ref().map(|c| c.key()), keys[0]);
    }

    #[test]
    fn test_category_ordering() {
        let one = CategoryValue::Number(1.0);
        let two = CategoryValue::Number(2.0);
        let a = CategoryValue::Text("a".to_string());
        assert_eq!(one.ascending(&two), Ordering::Less);
        assert_eq!(a.ascending(&one), Ordering::Greater);
    }
}
