//! loanpred: Loan eligibility CLI
//!
//! Trains the preprocessing + logistic regression pipeline on the loan
//! dataset, scores new applications with a saved pipeline, and logs runs to a
//! local tracking store.

use anyhow::Result;
use clap::Parser;

use loanpred::cli::{run_predict, run_track, run_train, Cli, Commands, TrackArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Train {
            input,
            track,
            tracking_dir,
        } => run_train(&cli, input.as_deref(), *track, tracking_dir),
        Commands::Predict {
            input,
            format,
            output,
            proba,
        } => run_predict(&cli, input.as_deref(), *format, output.as_deref(), *proba),
        Commands::Track {
            parameter1,
            parameter2,
            experiment,
            run_name,
            tracking_dir,
            artifact_dir,
        } => run_track(&TrackArgs {
            parameter1: *parameter1,
            parameter2: *parameter2,
            experiment,
            run_name: run_name.as_deref(),
            tracking_dir,
            artifact_dir,
        })
        .map(|_| ()),
    }
}
