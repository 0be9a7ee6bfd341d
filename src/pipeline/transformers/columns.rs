//! Stateless column engineering: combining and dropping columns

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::Transform;
use crate::pipeline::error::PipelineResult;
use crate::pipeline::values::{numeric_values, put_numeric, require_columns};

/// Adds `source` into `target` row by row. The source column is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombineColumns {
    pub target: String,
    pub source: String,
}

impl CombineColumns {
    pub fn new(target: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            source: source.into(),
        }
    }
}

impl Transform for CombineColumns {
    fn name(&self) -> &'static str {
        "CombineColumns"
    }

    fn fit(&mut self, _df: &DataFrame) -> PipelineResult<()> {
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> PipelineResult<DataFrame> {
        let target = numeric_values(df, self.name(), &self.target)?;
        let source = numeric_values(df, self.name(), &self.source)?;

        // Missing on either side stays missing
        let combined: Vec<Option<f64>> = target
            .into_iter()
            .zip(source)
            .map(|(t, s)| match (t, s) {
                (Some(t), Some(s)) => Some(t + s),
                _ => None,
            })
            .collect();

        let mut out = df.clone();
        put_numeric(&mut out, &self.target, combined)?;
        Ok(out)
    }

    fn is_fitted(&self) -> bool {
        true
    }
}

/// Removes a fixed set of columns. Every configured column must be present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropColumns {
    pub columns: Vec<String>,
}

impl DropColumns {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }
}

impl Transform for DropColumns {
    fn name(&self) -> &'static str {
        "DropColumns"
    }

    fn fit(&mut self, _df: &DataFrame) -> PipelineResult<()> {
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> PipelineResult<DataFrame> {
        require_columns(df, self.name(), &self.columns)?;
        Ok(df.drop_many(self.columns.iter().map(|s| s.as_str())))
    }

    fn is_fitted(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::error::PipelineError;

    #[test]
    fn test_combine_adds_source_into_target() {
        let df = df! {
            "ApplicantIncome" => [5000.0f64, 3000.0],
            "CoapplicantIncome" => [1500i64, 0],
        }
        .unwrap();

        let out = CombineColumns::new("ApplicantIncome", "CoapplicantIncome")
            .transform(&df)
            .unwrap();

        let income: Vec<Option<f64>> = out.column("ApplicantIncome").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(income, vec![Some(6500.0), Some(3000.0)]);
        assert!(out.column("CoapplicantIncome").is_ok(), "source column must be retained");
    }

    #[test]
    fn test_combine_propagates_missing() {
        let df = df! {
            "a" => [Some(1.0f64), None, Some(3.0)],
            "b" => [Some(1.0f64), Some(2.0), None],
        }
        .unwrap();

        let out = CombineColumns::new("a", "b").transform(&df).unwrap();
        let a: Vec<Option<f64>> = out.column("a").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(a, vec![Some(2.0), None, None]);
    }

    #[test]
    fn test_combine_requires_numeric() {
        let df = df! {
            "a" => [1.0f64],
            "b" => ["x"],
        }
        .unwrap();

        let err = CombineColumns::new("a", "b").transform(&df).unwrap_err();
        assert!(matches!(err, PipelineError::NonNumericColumn { .. }));
    }

    #[test]
    fn test_drop_removes_configured_columns() {
        let df = df! {
            "a" => [1, 2, 3],
            "b" => [4, 5, 6],
            "c" => [7, 8, 9],
        }
        .unwrap();

        let out = DropColumns::new(vec!["b".to_string()]).transform(&df).unwrap();
        assert_eq!(out.get_column_names(), &["a", "c"]);
        assert_eq!(out.height(), 3);
        assert!(out.column("a").unwrap().as_materialized_series().equals(df.column("a").unwrap().as_materialized_series()));
    }

    #[test]
    fn test_drop_absent_column_is_schema_mismatch() {
        let df = df! { "a" => [1, 2] }.unwrap();
        let err = DropColumns::new(vec!["missing".to_string()]).transform(&df).unwrap_err();

        match err {
            PipelineError::MissingColumn { column, .. } => assert_eq!(column, "missing"),
            other => panic!("Expected MissingColumn, got {:?}", other),
        }
    }
}
