//! `train` subcommand

use std::path::Path;

use anyhow::Result;

use crate::pipeline::{perform_training, FeatureConfig, TrainingReport};
use crate::report::display_training_summary;
use crate::tracking::TrackingStore;
use crate::utils::{
    create_spinner, finish_with_error, finish_with_success, print_banner, print_completion,
    print_config, print_info, print_step_header, print_step_time, print_warning,
};

use super::{confirm_overwrite, Cli};

/// Experiment that `train --track` logs to
pub const TRAINING_EXPERIMENT: &str = "Loan Eligibility";

pub fn run_train(cli: &Cli, input: Option<&str>, track: bool, tracking_dir: &Path) -> Result<()> {
    let mut config = cli.feature_config()?;
    if let Some(key) = input {
        config.train_file = key.to_string();
    }

    print_banner(env!("CARGO_PKG_VERSION"));
    let artifact = cli.artifact_path(&config);
    print_config(&cli.data_dir.join(&config.train_file), &config.target, &artifact);

    if !confirm_overwrite(&artifact, cli.no_confirm)? {
        println!("Cancelled by user.");
        return Ok(());
    }

    print_step_header(1, "Fit Pipeline");
    let spinner = create_spinner("Loading data and fitting pipeline...");
    let report = match perform_training(&config, &cli.data_dir, &cli.model_dir, cli.infer_schema_length) {
        Ok(report) => report,
        Err(e) => {
            finish_with_error(&spinner, "Training failed");
            return Err(e);
        }
    };
    finish_with_success(&spinner, "Pipeline fitted and saved");
    print_step_time(report.load_time + report.fit_time + report.save_time);

    if !report.solver_converged {
        print_warning(&format!(
            "Logistic regression stopped after {} iterations without converging",
            report.solver_iterations
        ));
    }

    display_training_summary(&report);

    if track {
        print_step_header(2, "Track Run");
        let run_id = log_training_run(tracking_dir, &config, &report)?;
        print_info(&format!("Logged run {} to {}", run_id, tracking_dir.display()));
    }

    print_completion("Training complete!");
    Ok(())
}

/// Record a finished training run in the tracking store. Returns the run id.
pub fn log_training_run(
    tracking_dir: &Path,
    config: &FeatureConfig,
    report: &TrainingReport,
) -> Result<String> {
    let store = TrackingStore::open(tracking_dir)?;
    let experiment = store.create_experiment(TRAINING_EXPERIMENT)?;
    let mut run = store.start_run(&experiment, Some(&report.estimator_name))?;

    run.log_param("train_file", &config.train_file)?;
    run.log_param("model_name", &config.model_name)?;
    run.log_param("features", config.features.join(","))?;
    run.log_param("C", report.c)?;
    run.log_param("max_iterations", report.max_iterations)?;
    run.log_metric("train_accuracy", report.train_accuracy)?;
    run.log_metric("solver_iterations", report.solver_iterations as f64)?;
    run.log_artifact(&report.artifact_path)?;

    Ok(run.end()?.run_id)
}
