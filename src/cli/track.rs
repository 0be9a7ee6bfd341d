//! `track` subcommand: a demo run exercising the tracking store

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;

use crate::tracking::{RunInfo, TrackingStore};
use crate::utils::{print_info, print_success};

use super::eval_metric;

pub struct TrackArgs<'a> {
    pub parameter1: i64,
    pub parameter2: i64,
    pub experiment: &'a str,
    pub run_name: Option<&'a str>,
    pub tracking_dir: &'a Path,
    pub artifact_dir: &'a Path,
}

/// Log both parameters, their squared sum and a timestamped text artifact.
pub fn run_track(args: &TrackArgs<'_>) -> Result<RunInfo> {
    let store = TrackingStore::open(args.tracking_dir)?;
    let experiment = store.create_experiment(args.experiment)?;
    let mut run = store.start_run(&experiment, args.run_name)?;

    run.log_param("parameter1", args.parameter1)?;
    run.log_param("parameter2", args.parameter2)?;
    let metric = eval_metric(args.parameter1, args.parameter2);
    run.log_metric("Eval_Metric", metric)?;

    std::fs::create_dir_all(args.artifact_dir).with_context(|| {
        format!("Failed to create artifact directory: {}", args.artifact_dir.display())
    })?;
    let note = args.artifact_dir.join("example.txt");
    std::fs::write(
        &note,
        format!("Artifact created at: {}", Local::now().format("%a %b %e %H:%M:%S %Y")),
    )
    .with_context(|| format!("Failed to write artifact: {}", note.display()))?;
    run.log_artifacts(args.artifact_dir)?;

    let info = run.end()?;
    print_info(&format!("Eval_Metric = {}", metric));
    print_success(&format!(
        "Run {} logged to experiment '{}' ({})",
        info.run_id,
        experiment.name,
        args.tracking_dir.display()
    ));
    Ok(info)
}
