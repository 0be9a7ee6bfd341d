//! Preprocessing transformers
//!
//! Every step shares the same two-phase protocol: `fit` learns statistics from
//! a training table, `transform` applies them to any table without refitting.
//! Stateless steps treat `fit` as a no-op.

mod columns;
mod encode;
mod impute;
mod scale;

pub use columns::{CombineColumns, DropColumns};
pub use encode::{frequency_ranks, LabelEncoder};
pub use impute::{most_frequent, MeanImputer, ModeImputer};
pub use scale::{ColumnRange, LogTransform, MinMaxScaler};

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

use super::error::PipelineResult;

/// Two-phase fit/transform protocol shared by all preprocessing steps.
pub trait Transform {
    /// Step kind, used in error messages.
    fn name(&self) -> &'static str;

    /// Learn statistics from the training table. A refit replaces them.
    fn fit(&mut self, df: &DataFrame) -> PipelineResult<()>;

    /// Apply the learned statistics, returning a new table. Row count and
    /// row order are always preserved.
    fn transform(&self, df: &DataFrame) -> PipelineResult<DataFrame>;

    fn is_fitted(&self) -> bool;

    fn fit_transform(&mut self, df: &DataFrame) -> PipelineResult<DataFrame> {
        self.fit(df)?;
        self.transform(df)
    }
}

/// A pipeline step, serialized with a `kind` tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Step {
    MeanImputer(MeanImputer),
    ModeImputer(ModeImputer),
    CombineColumns(CombineColumns),
    DropColumns(DropColumns),
    LabelEncoder(LabelEncoder),
    LogTransform(LogTransform),
    MinMaxScaler(MinMaxScaler),
}

impl Step {
    fn inner(&self) -> &dyn Transform {
        match self {
            Step::MeanImputer(t) => t,
            Step::ModeImputer(t) => t,
            Step::CombineColumns(t) => t,
            Step::DropColumns(t) => t,
            Step::LabelEncoder(t) => t,
            Step::LogTransform(t) => t,
            Step::MinMaxScaler(t) => t,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Transform {
        match self {
            Step::MeanImputer(t) => t,
            Step::ModeImputer(t) => t,
            Step::CombineColumns(t) => t,
            Step::DropColumns(t) => t,
            Step::LabelEncoder(t) => t,
            Step::LogTransform(t) => t,
            Step::MinMaxScaler(t) => t,
        }
    }
}

impl Transform for Step {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn fit(&mut self, df: &DataFrame) -> PipelineResult<()> {
        self.inner_mut().fit(df)
    }

    fn transform(&self, df: &DataFrame) -> PipelineResult<DataFrame> {
        self.inner().transform(df)
    }

    fn is_fitted(&self) -> bool {
        self.inner().is_fitted()
    }
}
