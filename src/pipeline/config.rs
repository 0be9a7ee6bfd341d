//! Feature schema and file configuration
//!
//! The defaults describe the loan dataset. A JSON file with any subset of the
//! fields can override them (missing fields keep their defaults).

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default training file under the data directory
pub const DEFAULT_TRAIN_FILE: &str = "loan-train.csv";

/// Default scoring file under the data directory
pub const DEFAULT_TEST_FILE: &str = "loan-test.csv";

/// Default artifact name under the model directory
pub const DEFAULT_MODEL_NAME: &str = "classification.json";

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Column partitions and file keys used by the training and prediction drivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub train_file: String,
    pub test_file: String,
    pub model_name: String,
    /// Target column; labels "Y"/"N"
    pub target: String,
    /// Columns handed to the pipeline, in order
    pub features: Vec<String>,
    pub numerical: Vec<String>,
    pub categorical: Vec<String>,
    pub to_encode: Vec<String>,
    /// Column that receives `combine_source`
    pub combine_target: String,
    pub combine_source: String,
    pub to_drop: Vec<String>,
    pub to_log_transform: Vec<String>,
    /// Inverse regularisation strength of the logistic regression
    #[serde(rename = "C")]
    pub c: f64,
    pub max_iterations: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        let categorical = names(&[
            "Gender",
            "Married",
            "Dependents",
            "Education",
            "Self_Employed",
            "Credit_History",
            "Property_Area",
        ]);

        Self {
            train_file: DEFAULT_TRAIN_FILE.to_string(),
            test_file: DEFAULT_TEST_FILE.to_string(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            target: "Loan_Status".to_string(),
            features: names(&[
                "ApplicantIncome",
                "CoapplicantIncome",
                "Credit_History",
                "Dependents",
                "Education",
                "Gender",
                "LoanAmount",
                "Loan_Amount_Term",
                "Married",
                "Property_Area",
                "Self_Employed",
            ]),
            numerical: names(&["ApplicantIncome", "LoanAmount", "Loan_Amount_Term"]),
            to_encode: categorical.clone(),
            categorical,
            combine_target: "ApplicantIncome".to_string(),
            combine_source: "CoapplicantIncome".to_string(),
            to_drop: names(&["CoapplicantIncome"]),
            to_log_transform: names(&["ApplicantIncome", "LoanAmount", "Loan_Amount_Term"]),
            c: 1.0,
            max_iterations: 100,
        }
    }
}

impl FeatureConfig {
    /// Load a configuration from a JSON file, falling back to defaults for
    /// absent fields.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: FeatureConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every column a step references is available when it runs.
    pub fn validate(&self) -> Result<()> {
        let in_features = |group: &str, cols: &[String]| -> Result<()> {
            for col in cols {
                if !self.features.contains(col) {
                    anyhow::bail!(
                        "{} column '{}' is not in the feature list {:?}",
                        group,
                        col,
                        self.features
                    );
                }
            }
            Ok(())
        };

        if self.features.is_empty() {
            anyhow::bail!("Feature list is empty");
        }
        if self.features.contains(&self.target) {
            anyhow::bail!("Target column '{}' must not be a feature", self.target);
        }

        in_features("Numerical", &self.numerical)?;
        in_features("Categorical", &self.categorical)?;
        in_features("Encoded", &self.to_encode)?;
        in_features("Dropped", &self.to_drop)?;
        in_features(
            "Combined",
            &[self.combine_target.clone(), self.combine_source.clone()],
        )?;
        in_features("Log-transformed", &self.to_log_transform)?;

        if self.to_drop.contains(&self.combine_target) {
            anyhow::bail!(
                "Combine target '{}' is dropped before it can be used",
                self.combine_target
            );
        }
        if let Some(col) = self.to_log_transform.iter().find(|c| self.to_drop.contains(c)) {
            anyhow::bail!("Log-transformed column '{}' is dropped before the log step", col);
        }

        // Text columns must be encoded before the scaler sees them
        if let Some(col) = self
            .categorical
            .iter()
            .find(|c| !self.to_encode.contains(c) && !self.to_drop.contains(c))
        {
            anyhow::bail!("Categorical column '{}' is neither encoded nor dropped", col);
        }

        if !(self.c.is_finite() && self.c > 0.0) {
            anyhow::bail!("C must be a positive number, got {}", self.c);
        }
        if self.max_iterations == 0 {
            anyhow::bail!("max_iterations must be at least 1");
        }

        Ok(())
    }
}
