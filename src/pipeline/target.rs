//! Target label mapping
//!
//! The loan target holds two string labels. Training maps them to 0/1 and
//! prediction maps model output back, using the same fixed mapping in both
//! directions.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::{PipelineError, PipelineResult};
use super::values::{canonical_values, require_column};

/// Mapping between target labels and binary classes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetMapping {
    /// Label that maps to 1 (event)
    pub event_value: String,
    /// Label that maps to 0 (non-event)
    pub non_event_value: String,
}

impl Default for TargetMapping {
    /// Loan approval: "Y" → 1, "N" → 0
    fn default() -> Self {
        Self::new("Y".to_string(), "N".to_string())
    }
}

impl TargetMapping {
    pub fn new(event_value: String, non_event_value: String) -> Self {
        Self {
            event_value,
            non_event_value,
        }
    }

    fn expected(&self) -> Vec<String> {
        vec![self.non_event_value.clone(), self.event_value.clone()]
    }

    /// Class for one label. Exact, case-sensitive match only.
    pub fn encode(&self, label: &str) -> Option<i32> {
        if label == self.event_value {
            Some(1)
        } else if label == self.non_event_value {
            Some(0)
        } else {
            None
        }
    }

    /// Label for one class: 1 is the event label, anything else the non-event.
    pub fn decode(&self, class: i32) -> &str {
        if class == 1 {
            &self.event_value
        } else {
            &self.non_event_value
        }
    }
}

/// Map a target column to 0/1. Any label outside the mapping, or a missing
/// label, aborts with `UnknownLabel`.
pub fn encode_target(df: &DataFrame, target: &str, mapping: &TargetMapping) -> PipelineResult<Vec<i32>> {
    let col = require_column(df, "TargetMapping", target)?;

    canonical_values(col)?
        .into_iter()
        .enumerate()
        .map(|(row, label)| {
            label
                .as_deref()
                .and_then(|l| mapping.encode(l))
                .ok_or_else(|| PipelineError::UnknownLabel {
                    row,
                    label: label.clone(),
                    expected: mapping.expected(),
                })
        })
        .collect()
}

/// Map model output back to labels, preserving order.
pub fn decode_predictions(classes: &[i32], mapping: &TargetMapping) -> Vec<String> {
    classes.iter().map(|&c| mapping.decode(c).to_string()).collect()
}

/// Count (events, non-events) in an encoded target.
pub fn count_classes(y: &[i32]) -> (usize, usize) {
    let events = y.iter().filter(|&&v| v == 1).count();
    (events, y.len() - events)
}
