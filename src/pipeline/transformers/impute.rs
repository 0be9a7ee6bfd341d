//! Mean and mode imputation
//!
//! Both imputers learn one fill value per configured column at fit time and
//! replace missing cells with it at transform time. Transform never refits:
//! the fill values always come from the training table.

use std::collections::{BTreeMap, HashMap};

use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::Transform;
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::values::{
    category_values, numeric_values, put_numeric, put_text, require_column, require_columns,
    CategoryValue,
};

/// Replaces missing numerical cells with the training-time column mean.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeanImputer {
    pub columns: Vec<String>,
    /// Column → mean, populated by `fit`
    #[serde(default)]
    pub means: Option<BTreeMap<String, f64>>,
}

impl MeanImputer {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            means: None,
        }
    }

    /// Learned mean for a column, if fitted.
    pub fn mean(&self, column: &str) -> Option<f64> {
        self.means.as_ref().and_then(|m| m.get(column).copied())
    }
}

impl Transform for MeanImputer {
    fn name(&self) -> &'static str {
        "MeanImputer"
    }

    fn fit(&mut self, df: &DataFrame) -> PipelineResult<()> {
        let mut means = BTreeMap::new();

        for col_name in &self.columns {
            let values = numeric_values(df, self.name(), col_name)?;
            let (sum, count) = values
                .iter()
                .flatten()
                .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));

            if count == 0 {
                return Err(PipelineError::EmptyStatistic {
                    column: col_name.clone(),
                    statistic: "mean".to_string(),
                });
            }

            means.insert(col_name.clone(), sum / count as f64);
        }

        self.means = Some(means);
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> PipelineResult<DataFrame> {
        let means = self.means.as_ref().ok_or_else(|| PipelineError::NotFitted {
            step: self.name().to_string(),
        })?;

        let mut out = df.clone();
        for col_name in &self.columns {
            let values = numeric_values(df, self.name(), col_name)?;
            let mean = means
                .get(col_name)
                .copied()
                .ok_or_else(|| PipelineError::NotFitted {
                    step: format!("{} (column '{}')", self.name(), col_name),
                })?;

            let filled: Vec<Option<f64>> = values
                .into_iter()
                .map(|v| Some(v.unwrap_or(mean)))
                .collect();
            put_numeric(&mut out, col_name, filled)?;
        }

        Ok(out)
    }

    fn is_fitted(&self) -> bool {
        self.means.is_some()
    }
}

/// Replaces missing categorical cells with the training-time most frequent value.
///
/// Ties between equally frequent values go to the smallest value in ascending
/// order (numbers numerically, text lexicographically).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeImputer {
    pub columns: Vec<String>,
    #[serde(default)]
    pub modes: Option<BTreeMap<String, CategoryValue>>,
}

impl ModeImputer {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            modes: None,
        }
    }

    pub fn mode(&self, column: &str) -> Option<&CategoryValue> {
        self.modes.as_ref().and_then(|m| m.get(column))
    }
}

/// Most frequent value, smallest value on ties.
pub fn most_frequent(values: &[Option<CategoryValue>]) -> Option<CategoryValue> {
    let mut counts: HashMap<String, (CategoryValue, usize)> = HashMap::new();
    for value in values.iter().flatten() {
        counts
            .entry(value.key())
            .and_modify(|(_, c)| *c += 1)
            .or_insert_with(|| (value.clone(), 1));
    }

    let max_count = counts.values().map(|(_, c)| *c).max()?;
    counts
        .into_values()
        .filter(|(_, c)| *c == max_count)
        .map(|(v, _)| v)
        .min_by(|a, b| a.ascending(b))
}

impl Transform for ModeImputer {
    fn name(&self) -> &'static str {
        "ModeImputer"
    }

    fn fit(&mut self, df: &DataFrame) -> PipelineResult<()> {
        require_columns(df, self.name(), &self.columns)?;

        let modes: Vec<(String, Option<CategoryValue>)> = self
            .columns
            .par_iter()
            .map(|col_name| {
                let col = require_column(df, self.name(), col_name)?;
                let values = category_values(col)?;
                Ok((col_name.clone(), most_frequent(&values)))
            })
            .collect::<PipelineResult<Vec<_>>>()?;

        let mut fitted = BTreeMap::new();
        for (col_name, mode) in modes {
            let mode = mode.ok_or_else(|| PipelineError::EmptyStatistic {
                column: col_name.clone(),
                statistic: "mode".to_string(),
            })?;
            fitted.insert(col_name, mode);
        }

        self.modes = Some(fitted);
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> PipelineResult<DataFrame> {
        let modes = self.modes.as_ref().ok_or_else(|| PipelineError::NotFitted {
            step: self.name().to_string(),
        })?;

        let mut out = df.clone();
        for col_name in &self.columns {
            let col = require_column(df, self.name(), col_name)?;
            let mode = modes.get(col_name).ok_or_else(|| PipelineError::NotFitted {
                step: format!("{} (column '{}')", self.name(), col_name),
            })?;

            let values = category_values(col)?;
            match mode {
                // Numeric column with a numeric mode stays numeric
                CategoryValue::Number(fill) if col.dtype().is_primitive_numeric() || col.null_count() == col.len() => {
                    let filled = values
                        .into_iter()
                        .map(|v| match v {
                            Some(CategoryValue::Number(n)) => Some(n),
                            _ => Some(*fill),
                        })
                        .collect();
                    put_numeric(&mut out, col_name, filled)?;
                }
                _ => {
                    let filled = values
                        .into_iter()
                        .map(|v| Some(v.map(|c| c.key()).unwrap_or_else(|| mode.key())))
                        .collect();
                    put_text(&mut out, col_name, filled)?;
                }
            }
        }

        Ok(out)
    }

    fn is_fitted(&self) -> bool {
        self.modes.is_some()
    }
}
