//! Saving and loading fitted pipelines
//!
//! A fitted pipeline is stored as one JSON document under the model
//! directory, keyed by name. Saving under an existing name overwrites it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::orchestrator::Pipeline;
use super::target::TargetMapping;

/// A fitted pipeline plus the metadata needed to use it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineArtifact {
    /// Crate version that wrote the artifact
    pub version: String,
    /// Creation time (ISO 8601, UTC)
    pub created_at: String,
    /// Columns the pipeline expects, in order
    pub features: Vec<String>,
    pub target: String,
    pub mapping: TargetMapping,
    pub pipeline: Pipeline,
}

impl PipelineArtifact {
    pub fn new(
        pipeline: Pipeline,
        features: Vec<String>,
        target: String,
        mapping: TargetMapping,
    ) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: Utc::now().to_rfc3339(),
            features,
            target,
            mapping,
            pipeline,
        }
    }
}

/// Location of a named artifact.
pub fn artifact_path(model_dir: &Path, name: &str) -> PathBuf {
    model_dir.join(name)
}

/// Write an artifact, creating the model directory if needed.
pub fn save_pipeline(artifact: &PipelineArtifact, model_dir: &Path, name: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(model_dir)
        .with_context(|| format!("Failed to create model directory: {}", model_dir.display()))?;

    let path = artifact_path(model_dir, name);
    let json = serde_json::to_string_pretty(artifact).context("Failed to serialize pipeline")?;

    std::fs::write(&path, json)
        .with_context(|| format!("Failed to write model artifact: {}", path.display()))?;

    Ok(path)
}

/// Read a named artifact back.
pub fn load_pipeline(model_dir: &Path, name: &str) -> Result<PipelineArtifact> {
    let path = artifact_path(model_dir, name);

    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read model artifact: {}", path.display()))?;
    let artifact: PipelineArtifact = serde_json::from_str(&json)
        .with_context(|| format!("Corrupt model artifact: {}", path.display()))?;

    if !artifact.pipeline.is_fitted() {
        anyhow::bail!("Model artifact {} holds an unfitted pipeline", path.display());
    }

    Ok(artifact)
}
