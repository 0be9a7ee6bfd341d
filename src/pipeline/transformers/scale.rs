//! Numeric rescaling: log transform and min-max scaling

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::Transform;
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::values::{numeric_values, put_numeric};

/// Natural log of each configured column. Stateless.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogTransform {
    pub columns: Vec<String>,
}

impl LogTransform {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }
}

impl Transform for LogTransform {
    fn name(&self) -> &'static str {
        "LogTransform"
    }

    fn fit(&mut self, _df: &DataFrame) -> PipelineResult<()> {
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> PipelineResult<DataFrame> {
        let mut out = df.clone();

        for col_name in &self.columns {
            let values = numeric_values(df, self.name(), col_name)?;
            let mut logged = Vec::with_capacity(values.len());

            for (row, value) in values.into_iter().enumerate() {
                match value {
                    Some(v) if v <= 0.0 => {
                        return Err(PipelineError::NonPositiveValue {
                            column: col_name.clone(),
                            row,
                            value: v,
                        })
                    }
                    Some(v) => logged.push(Some(v.ln())),
                    None => logged.push(None),
                }
            }

            put_numeric(&mut out, col_name, logged)?;
        }

        Ok(out)
    }

    fn is_fitted(&self) -> bool {
        true
    }
}

/// Observed range of one column at fit time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnRange {
    pub min: f64,
    pub max: f64,
}

impl ColumnRange {
    fn scale(&self, v: f64) -> f64 {
        let range = self.max - self.min;
        let range = if range == 0.0 { 1.0 } else { range };
        (v - self.min) / range
    }
}

/// Rescales every column seen at fit time to `[0, 1]` over the training range.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinMaxScaler {
    /// Column order as seen at fit time, with its range
    #[serde(default)]
    pub ranges: Option<Vec<(String, ColumnRange)>>,
}

impl MinMaxScaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn range(&self, column: &str) -> Option<ColumnRange> {
        self.ranges
            .as_ref()
            .and_then(|r| r.iter().find(|(name, _)| name == column).map(|(_, range)| *range))
    }
}

impl Transform for MinMaxScaler {
    fn name(&self) -> &'static str {
        "MinMaxScaler"
    }

    fn fit(&mut self, df: &DataFrame) -> PipelineResult<()> {
        let mut ranges = Vec::with_capacity(df.width());

        for col_name in df.get_column_names() {
            let values = numeric_values(df, self.name(), col_name.as_str())?;
            let (min, max) = values.iter().flatten().fold(
                (f64::INFINITY, f64::NEG_INFINITY),
                |(lo, hi), &v| (lo.min(v), hi.max(v)),
            );

            if min > max {
                return Err(PipelineError::EmptyStatistic {
                    column: col_name.to_string(),
                    statistic: "min/max".to_string(),
                });
            }

            ranges.push((col_name.to_string(), ColumnRange { min, max }));
        }

        self.ranges = Some(ranges);
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> PipelineResult<DataFrame> {
        let ranges = self.ranges.as_ref().ok_or_else(|| PipelineError::NotFitted {
            step: self.name().to_string(),
        })?;

        let mut out = df.clone();
        for (col_name, range) in ranges {
            let scaled: Vec<Option<f64>> = numeric_values(df, self.name(), col_name)?
                .into_iter()
                .map(|v| v.map(|v| range.scale(v)))
                .collect();
            put_numeric(&mut out, col_name, scaled)?;
        }

        Ok(out)
    }

    fn is_fitted(&self) -> bool {
        self.ranges.is_some()
    }
}
