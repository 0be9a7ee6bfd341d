//! Prediction output: JSON document or terminal table

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};

use crate::pipeline::PredictionResult;

/// Build a row/label table, with a probability column when available.
pub fn predictions_table(result: &PredictionResult, event_label: &str) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);

    let mut header = vec![
        Cell::new("Row").add_attribute(Attribute::Bold),
        Cell::new("Prediction").add_attribute(Attribute::Bold),
    ];
    if result.probability.is_some() {
        header.push(Cell::new("P(approve)").add_attribute(Attribute::Bold));
    }
    table.set_header(header);

    for (i, label) in result.prediction.iter().enumerate() {
        let color = if label == event_label {
            Color::Green
        } else {
            Color::Red
        };
        let mut row = vec![Cell::new(i), Cell::new(label).fg(color)];
        if let Some(p) = result.probability.as_ref().and_then(|p| p.get(i)) {
            row.push(Cell::new(format!("{:.3}", p)));
        }
        table.add_row(row);
    }

    table
}

/// Serialize a prediction result to a JSON file.
pub fn write_predictions_json(result: &PredictionResult, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(result).context("Failed to serialize predictions")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write predictions: {}", path.display()))
}
