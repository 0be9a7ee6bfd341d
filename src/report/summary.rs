//! Training summary report

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::TrainingReport;

/// Render a training report as an indented table on stdout.
pub fn display_training_summary(report: &TrainingReport) {
    println!();
    println!(
        "    {} {}",
        style("📋").cyan(),
        style("TRAINING SUMMARY").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();

    for line in training_table(report).to_string().lines() {
        println!("    {}", line);
    }

    if !report.step_names.is_empty() {
        println!();
        println!(
            "    {} {}",
            style("🧩").cyan(),
            style("PIPELINE STEPS").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        for (i, name) in report.step_names.iter().enumerate() {
            println!("      {} {}", style(format!("{}.", i + 1)).dim(), name);
        }
    }
}

/// Build the metric/value table for a training report.
pub fn training_table(report: &TrainingReport) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);

    table.add_row(vec![Cell::new("📁 Training Rows"), Cell::new(report.rows)]);
    table.add_row(vec![Cell::new("🔢 Features"), Cell::new(report.features)]);
    table.add_row(vec![
        Cell::new("🧠 Memory"),
        Cell::new(format!("{:.2} MB", report.memory_mb)),
    ]);
    table.add_row(vec![
        Cell::new("✅ Approved (Y)"),
        Cell::new(report.events).fg(Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("❌ Rejected (N)"),
        Cell::new(report.non_events).fg(Color::Red),
    ]);

    let accuracy_color = if report.train_accuracy >= 0.8 {
        Color::Green
    } else if report.train_accuracy >= 0.6 {
        Color::Yellow
    } else {
        Color::Red
    };
    table.add_row(vec![
        Cell::new("🎯 Training Accuracy"),
        Cell::new(format!("{:.1}%", report.train_accuracy * 100.0))
            .fg(accuracy_color)
            .add_attribute(Attribute::Bold),
    ]);

    table.add_row(vec![
        Cell::new("🔁 Solver Iterations"),
        Cell::new(report.solver_iterations).fg(if report.solver_converged {
            Color::White
        } else {
            Color::Yellow
        }),
    ]);

    table.add_row(vec![
        Cell::new("⏱️  Load / Fit / Save"),
        Cell::new(format!(
            "{} / {} / {}",
            format_duration(report.load_time),
            format_duration(report.fit_time),
            format_duration(report.save_time)
        )),
    ]);

    table.add_row(vec![
        Cell::new("💾 Artifact"),
        Cell::new(report.artifact_path.display()),
    ]);

    table
}

/// Human-readable duration: milliseconds below one second, seconds above.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else {
        format!("{:.2}s", secs)
    }
}
