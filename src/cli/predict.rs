//! `predict` subcommand

use std::path::Path;

use anyhow::Result;

use crate::pipeline::{
    generate_prediction, generate_prediction_with_proba, load_pipeline, load_table,
};
use crate::report::{predictions_table, write_predictions_json};
use crate::utils::{print_info, print_success};

use super::{Cli, OutputFormat};

pub fn run_predict(
    cli: &Cli,
    input: Option<&str>,
    format: OutputFormat,
    output: Option<&Path>,
    proba: bool,
) -> Result<()> {
    let config = cli.feature_config()?;
    let key = input.unwrap_or(&config.test_file);

    let artifact = load_pipeline(&cli.model_dir, &config.model_name)?;
    let data = load_table(&cli.data_dir, key, cli.infer_schema_length)?;

    let result = if proba {
        generate_prediction_with_proba(&artifact, &data)?
    } else {
        generate_prediction(&artifact, &data)?
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&result)?),
        OutputFormat::Table => {
            println!();
            print_info(&format!(
                "{} row(s) from {} scored with {}",
                result.prediction.len(),
                key,
                config.model_name
            ));
            println!();
            for line in predictions_table(&result, &artifact.mapping.event_value)
                .to_string()
                .lines()
            {
                println!("    {}", line);
            }
        }
    }

    if let Some(path) = output {
        write_predictions_json(&result, path)?;
        if format == OutputFormat::Table {
            print_success(&format!("Predictions written to {}", path.display()));
        }
    }

    Ok(())
}
