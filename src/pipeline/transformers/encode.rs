//! Frequency-ranked label encoding
//!
//! Each distinct training value gets an integer rank by ascending occurrence
//! count: rank 0 is the least frequent value. Equal counts are ordered
//! lexicographically by the value's canonical text form, so the same training
//! table always yields the same encoding.
//!
//! Values never seen at fit time (and missing cells) encode to null. This is
//! a per-cell outcome, not an error.

use std::collections::{BTreeMap, HashMap};

use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::Transform;
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::values::{canonical_values, put_numeric, require_column, require_columns};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub columns: Vec<String>,
    /// Column → (canonical value → rank)
    #[serde(default)]
    pub labels: Option<BTreeMap<String, BTreeMap<String, u32>>>,
}

impl LabelEncoder {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            labels: None,
        }
    }

    /// Learned mapping for one column.
    pub fn mapping(&self, column: &str) -> Option<&BTreeMap<String, u32>> {
        self.labels.as_ref().and_then(|l| l.get(column))
    }
}

/// Rank distinct values by ascending frequency, ties lexicographic.
pub fn frequency_ranks(values: &[Option<String>]) -> BTreeMap<String, u32> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values.iter().flatten() {
        *counts.entry(value.as_str()).or_insert(0) += 1;
    }

    let mut ordered: Vec<(&str, usize)> = counts.into_iter().collect();
    ordered.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));

    ordered
        .into_iter()
        .enumerate()
        .map(|(rank, (value, _))| (value.to_string(), rank as u32))
        .collect()
}

impl Transform for LabelEncoder {
    fn name(&self) -> &'static str {
        "LabelEncoder"
    }

    fn fit(&mut self, df: &DataFrame) -> PipelineResult<()> {
        require_columns(df, self.name(), &self.columns)?;

        let fitted: Vec<(String, BTreeMap<String, u32>)> = self
            .columns
            .par_iter()
            .map(|col_name| {
                let col = require_column(df, self.name(), col_name)?;
                let values = canonical_values(col)?;
                Ok((col_name.clone(), frequency_ranks(&values)))
            })
            .collect::<PipelineResult<Vec<_>>>()?;

        self.labels = Some(fitted.into_iter().collect());
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> PipelineResult<DataFrame> {
        let labels = self.labels.as_ref().ok_or_else(|| PipelineError::NotFitted {
            step: self.name().to_string(),
        })?;

        let mut out = df.clone();
        for col_name in &self.columns {
            let col = require_column(df, self.name(), col_name)?;
            let mapping = labels.get(col_name).ok_or_else(|| PipelineError::NotFitted {
                step: format!("{} (column '{}')", self.name(), col_name),
            })?;

            let encoded: Vec<Option<f64>> = canonical_values(col)?
                .into_iter()
                .map(|v| v.and_then(|key| mapping.get(&key).map(|&rank| rank as f64)))
                .collect();
            put_numeric(&mut out, col_name, encoded)?;
        }

        Ok(out)
    }

    fn is_fitted(&self) -> bool {
        self.labels.is_some()
    }
}
