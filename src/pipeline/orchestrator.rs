//! Sequential pipeline: named preprocessing steps followed by the classifier
//!
//! `fit` threads the training table through every step (fit, then transform)
//! and trains the classifier on the result. `transform`, `predict` and
//! `predict_proba` thread new tables through the already-fitted steps without
//! refitting anything. Step order is fixed at construction.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::config::FeatureConfig;
use super::error::{PipelineError, PipelineResult};
use super::model::LogisticRegression;
use super::transformers::{
    CombineColumns, DropColumns, LabelEncoder, LogTransform, MeanImputer, MinMaxScaler,
    ModeImputer, Step, Transform,
};

/// A step and the name it is reported under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedStep {
    pub name: String,
    pub step: Step,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    pub steps: Vec<NamedStep>,
    pub estimator_name: String,
    pub estimator: LogisticRegression,
}

impl Pipeline {
    pub fn new(estimator_name: impl Into<String>, estimator: LogisticRegression) -> Self {
        Self {
            steps: Vec::new(),
            estimator_name: estimator_name.into(),
            estimator,
        }
    }

    /// Append a preprocessing step; steps run in insertion order.
    pub fn with_step(mut self, name: impl Into<String>, step: Step) -> Self {
        self.steps.push(NamedStep {
            name: name.into(),
            step,
        });
        self
    }

    /// The loan classification pipeline for a feature schema.
    pub fn classification(config: &FeatureConfig) -> Self {
        let estimator = LogisticRegression::new()
            .with_c(config.c)
            .with_max_iterations(config.max_iterations);
        Pipeline::new("LogisticRegression", estimator)
            .with_step(
                "MeanImputation",
                Step::MeanImputer(MeanImputer::new(config.numerical.clone())),
            )
            .with_step(
                "ModeImputation",
                Step::ModeImputer(ModeImputer::new(config.categorical.clone())),
            )
            .with_step(
                "CombineColumns",
                Step::CombineColumns(CombineColumns::new(
                    config.combine_target.clone(),
                    config.combine_source.clone(),
                )),
            )
            .with_step(
                "DropColumns",
                Step::DropColumns(DropColumns::new(config.to_drop.clone())),
            )
            .with_step(
                "LabelEncoding",
                Step::LabelEncoder(LabelEncoder::new(config.to_encode.clone())),
            )
            .with_step(
                "LogTransformation",
                Step::LogTransform(LogTransform::new(config.to_log_transform.clone())),
            )
            .with_step("MinMaxScaling", Step::MinMaxScaler(MinMaxScaler::new()))
    }

    /// Step names in execution order, estimator last.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps
            .iter()
            .map(|s| s.name.as_str())
            .chain(std::iter::once(self.estimator_name.as_str()))
            .collect()
    }

    pub fn is_fitted(&self) -> bool {
        self.steps.iter().all(|s| s.step.is_fitted()) && self.estimator.is_fitted()
    }

    /// Fit every step in order, then the estimator on the transformed table.
    pub fn fit(&mut self, x: &DataFrame, y: &[i32]) -> PipelineResult<()> {
        if x.height() != y.len() {
            return Err(PipelineError::LengthMismatch {
                rows: x.height(),
                targets: y.len(),
            });
        }

        let mut table = x.clone();
        for named in self.steps.iter_mut() {
            table = named.step.fit_transform(&table)?;
        }
        self.estimator.fit(&table, y)
    }

    /// Run every preprocessing step without refitting.
    pub fn transform(&self, x: &DataFrame) -> PipelineResult<DataFrame> {
        let mut table = x.clone();
        for named in &self.steps {
            table = named.step.transform(&table)?;
        }
        Ok(table)
    }

    pub fn predict(&self, x: &DataFrame) -> PipelineResult<Vec<i32>> {
        let table = self.transform(x)?;
        self.estimator.predict(&table)
    }

    pub fn predict_proba(&self, x: &DataFrame) -> PipelineResult<Vec<f64>> {
        let table = self.transform(x)?;
        self.estimator.predict_proba(&table)
    }
}
