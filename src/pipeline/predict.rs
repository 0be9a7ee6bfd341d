//! Prediction driver: load a fitted pipeline and label new rows

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::loader::{load_table, select_features};
use super::persist::{load_pipeline, PipelineArtifact};
use super::target::decode_predictions;

/// Predicted labels in input row order, serialized as `{"prediction": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: Vec<String>,
    /// Positive-class probabilities, same order as `prediction`
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub probability: Option<Vec<f64>>,
}

/// Label every row of `data` with an already-loaded artifact.
pub fn generate_prediction(artifact: &PipelineArtifact, data: &DataFrame) -> Result<PredictionResult> {
    let x = select_features(data, &artifact.features).context("Input is missing features")?;
    let classes = artifact.pipeline.predict(&x).context("Prediction failed")?;

    Ok(PredictionResult {
        prediction: decode_predictions(&classes, &artifact.mapping),
        probability: None,
    })
}

/// Like `generate_prediction`, also reporting positive-class probabilities.
pub fn generate_prediction_with_proba(
    artifact: &PipelineArtifact,
    data: &DataFrame,
) -> Result<PredictionResult> {
    let x = select_features(data, &artifact.features).context("Input is missing features")?;
    let proba = artifact.pipeline.predict_proba(&x).context("Prediction failed")?;
    let classes: Vec<i32> = artifact
        .pipeline
        .predict(&x)
        .context("Prediction failed")?;

    Ok(PredictionResult {
        prediction: decode_predictions(&classes, &artifact.mapping),
        probability: Some(proba),
    })
}

/// Load the named model and label `data`.
pub fn predict_table(model_dir: &Path, model_name: &str, data: &DataFrame) -> Result<PredictionResult> {
    let artifact = load_pipeline(model_dir, model_name)?;
    generate_prediction(&artifact, data)
}

/// Load the named model and the dataset `key`, labelling every row.
pub fn predict_file(
    model_dir: &Path,
    model_name: &str,
    data_dir: &Path,
    key: &str,
    infer_schema_length: usize,
) -> Result<PredictionResult> {
    let data = load_table(data_dir, key, infer_schema_length)
        .with_context(|| format!("Failed to load input data '{}'", key))?;
    predict_table(model_dir, model_name, &data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_json_shape() {
        let result = PredictionResult {
            prediction: vec!["Y".to_string(), "N".to_string()],
            probability: None,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"prediction":["Y","N"]}"#);
    }

    #[test]
    fn test_prediction_json_with_probability() {
        let result = PredictionResult {
            prediction: vec!["Y".to_string()],
            probability: Some(vec![0.75]),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["probability"][0], 0.75);
    }
}
