//! Training driver: load, map target, fit, persist

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use polars::prelude::*;

use super::config::FeatureConfig;
use super::loader::{estimated_size_mb, load_table, select_features};
use super::model::accuracy;
use super::orchestrator::Pipeline;
use super::persist::{save_pipeline, PipelineArtifact};
use super::target::{count_classes, encode_target, TargetMapping};

/// Outcome of a training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub rows: usize,
    pub features: usize,
    /// Estimated in-memory size of the loaded training table
    pub memory_mb: f64,
    pub events: usize,
    pub non_events: usize,
    /// Accuracy of the fitted pipeline on its own training rows
    pub train_accuracy: f64,
    pub solver_iterations: usize,
    pub solver_converged: bool,
    /// Estimator settings read back from the fitted artifact
    pub c: f64,
    pub max_iterations: usize,
    pub estimator_name: String,
    pub step_names: Vec<String>,
    pub artifact_path: PathBuf,
    pub load_time: Duration,
    pub fit_time: Duration,
    pub save_time: Duration,
}

/// Fit the classification pipeline on an in-memory training table.
///
/// Returns the fitted artifact and the encoded target.
pub fn fit_pipeline(train: &DataFrame, config: &FeatureConfig) -> Result<(PipelineArtifact, Vec<i32>)> {
    config.validate().context("Invalid feature configuration")?;
    let mapping = TargetMapping::default();

    let x = select_features(train, &config.features).context("Training data is missing features")?;
    let y = encode_target(train, &config.target, &mapping)
        .with_context(|| format!("Failed to map target column '{}'", config.target))?;

    let mut pipeline = Pipeline::classification(config);
    pipeline.fit(&x, &y).context("Failed to fit pipeline")?;

    let artifact = PipelineArtifact::new(
        pipeline,
        config.features.clone(),
        config.target.clone(),
        mapping,
    );
    Ok((artifact, y))
}

/// Load the configured training file, fit, and save under the configured name.
pub fn perform_training(
    config: &FeatureConfig,
    data_dir: &Path,
    model_dir: &Path,
    infer_schema_length: usize,
) -> Result<TrainingReport> {
    let step_start = Instant::now();
    let train = load_table(data_dir, &config.train_file, infer_schema_length)
        .with_context(|| format!("Failed to load training data '{}'", config.train_file))?;
    let load_time = step_start.elapsed();

    let step_start = Instant::now();
    let (artifact, y) = fit_pipeline(&train, config)?;
    let fit_time = step_start.elapsed();

    let x = select_features(&train, &config.features)?;
    let predicted = artifact.pipeline.predict(&x)?;
    let (events, non_events) = count_classes(&y);
    let estimator = &artifact.pipeline.estimator;
    let solver = estimator.fitted.as_ref();

    let step_start = Instant::now();
    let artifact_path = save_pipeline(&artifact, model_dir, &config.model_name)?;
    let save_time = step_start.elapsed();

    Ok(TrainingReport {
        rows: train.height(),
        features: config.features.len(),
        memory_mb: estimated_size_mb(&train),
        events,
        non_events,
        train_accuracy: accuracy(&predicted, &y),
        solver_iterations: solver.map(|s| s.iterations).unwrap_or(0),
        solver_converged: solver.map(|s| s.converged).unwrap_or(false),
        c: estimator.c,
        max_iterations: estimator.max_iterations,
        estimator_name: artifact.pipeline.estimator_name.clone(),
        step_names: artifact
            .pipeline
            .step_names()
            .into_iter()
            .map(String::from)
            .collect(),
        artifact_path,
        load_time,
        fit_time,
        save_time,
    })
}
