//! Command-line argument definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::pipeline::{FeatureConfig, DEFAULT_INFER_SCHEMA_LENGTH};
use crate::tracking::DEFAULT_TRACKING_DIR;

/// loanpred - Train and serve a loan eligibility classifier
#[derive(Parser, Debug)]
#[command(name = "loanpred")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the training and scoring files
    #[arg(long, global = true, default_value = "data")]
    pub data_dir: PathBuf,

    /// Directory where fitted pipelines are saved and loaded
    #[arg(long, global = true, default_value = "models")]
    pub model_dir: PathBuf,

    /// Artifact name under the model directory.
    /// Overrides `model_name` from --config; defaults to classification.json.
    #[arg(long, global = true)]
    pub model_name: Option<String>,

    /// JSON file overriding the default loan feature schema.
    /// Any field left out keeps its default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, global = true, default_value_t = DEFAULT_INFER_SCHEMA_LENGTH)]
    pub infer_schema_length: usize,

    /// Skip interactive confirmation prompts
    #[arg(long, global = true, default_value = "false")]
    pub no_confirm: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit the classification pipeline on the training file and save it
    Train {
        /// Training file under the data directory (defaults to the configured train file)
        #[arg(short, long)]
        input: Option<String>,

        /// Record parameters, training accuracy and the artifact in the local tracking store
        #[arg(long, default_value = "false")]
        track: bool,

        /// Tracking store directory (used with --track)
        #[arg(long, default_value = DEFAULT_TRACKING_DIR)]
        tracking_dir: PathBuf,
    },

    /// Label every row of a file with a saved pipeline
    Predict {
        /// Input file under the data directory (defaults to the configured test file)
        #[arg(short, long)]
        input: Option<String>,

        /// How to print predictions
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Also write the predictions as JSON to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Include positive-class probabilities
        #[arg(long, default_value = "false")]
        proba: bool,
    },

    /// Log a demo run (two parameters, one metric, one artifact) to the tracking store
    Track {
        #[arg(long, default_value_t = 5)]
        parameter1: i64,

        #[arg(long, default_value_t = 10)]
        parameter2: i64,

        /// Experiment name (created if missing)
        #[arg(long, default_value = "Default")]
        experiment: String,

        /// Optional run name
        #[arg(long)]
        run_name: Option<String>,

        /// Tracking store directory
        #[arg(long, default_value = DEFAULT_TRACKING_DIR)]
        tracking_dir: PathBuf,

        /// Scratch directory the demo artifact is written to before logging
        #[arg(long, default_value = "dummy")]
        artifact_dir: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `{"prediction": [...]}` on stdout
    Json,
    /// Styled table on stdout
    Table,
}

impl Cli {
    /// Resolve the feature configuration: defaults, then --config, then --model-name.
    pub fn feature_config(&self) -> anyhow::Result<FeatureConfig> {
        let mut config = match &self.config {
            Some(path) => FeatureConfig::from_json_file(path)?,
            None => FeatureConfig::default(),
        };
        if let Some(name) = &self.model_name {
            config.model_name = name.clone();
        }
        Ok(config)
    }

    /// Location of the artifact this invocation reads or writes.
    pub fn artifact_path(&self, config: &FeatureConfig) -> PathBuf {
        crate::pipeline::artifact_path(&self.model_dir, &config.model_name)
    }
}

/// Metric logged by the `track` demo
pub fn eval_metric(parameter1: i64, parameter2: i64) -> f64 {
    let (p1, p2) = (parameter1 as f64, parameter2 as f64);
    p1 * p1 + p2 * p2
}
