//! Tests for target column mapping functionality

use loanpred::pipeline::*;
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

/// Loan_Status with a label outside Y/N ("Unknown")
fn create_multivalue_target_dataframe() -> DataFrame {
    df! {
        "Loan_Status" => ["Y", "N", "Unknown", "Y", "N", "Y"],
        "LoanAmount" => [100.0f64, 120.0, 90.0, 150.0, 80.0, 110.0],
    }
    .unwrap()
}

#[test]
fn test_loan_status_maps_to_binary() {
    let df = create_loan_dataframe(100, 3);
    let y = encode_target(&df, "Loan_Status", &TargetMapping::default()).unwrap();

    let labels: Vec<Option<&str>> = df.column("Loan_Status").unwrap().str().unwrap().into_iter().collect();
    for (label, class) in labels.iter().zip(&y) {
        match label {
            Some("Y") => assert_eq!(*class, 1),
            Some("N") => assert_eq!(*class, 0),
            other => panic!("Unexpected label {:?}", other),
        }
    }

    let (events, non_events) = count_classes(&y);
    assert_eq!(events + non_events, 100);
    assert!(events > non_events);
}

#[test]
fn test_unknown_label_aborts_with_row() {
    let df = create_multivalue_target_dataframe();

    let err = encode_target(&df, "Loan_Status", &TargetMapping::default()).unwrap_err();
    match err {
        PipelineError::UnknownLabel { row, label, expected } => {
            assert_eq!(row, 2);
            assert_eq!(label.as_deref(), Some("Unknown"));
            assert_eq!(expected, vec!["N".to_string(), "Y".to_string()]);
        }
        other => panic!("Expected UnknownLabel, got {:?}", other),
    }
}

#[test]
fn test_numeric_target_is_not_silently_accepted() {
    let df = df! {
        "Loan_Status" => [0i32, 1, 1],
    }
    .unwrap();

    assert!(matches!(
        encode_target(&df, "Loan_Status", &TargetMapping::default()).unwrap_err(),
        PipelineError::UnknownLabel { row: 0, .. }
    ));
}

#[test]
fn test_numeric_mapping_for_numeric_target() {
    let df = df! {
        "default_flag" => [0i32, 1, 1],
    }
    .unwrap();
    let mapping = TargetMapping::new("1".to_string(), "0".to_string());

    assert_eq!(encode_target(&df, "default_flag", &mapping).unwrap(), vec![0, 1, 1]);
}

#[test]
fn test_decode_preserves_order() {
    let mapping = TargetMapping::default();
    assert_eq!(
        decode_predictions(&[0, 1, 1, 0], &mapping),
        vec!["N", "Y", "Y", "N"]
    );
    assert!(decode_predictions(&[], &mapping).is_empty());
}

#[test]
fn test_mapping_survives_json() {
    let mapping = TargetMapping::new("G".to_string(), "B".to_string());
    let json = serde_json::to_string(&mapping).unwrap();
    let back: TargetMapping = serde_json::from_str(&json).unwrap();
    assert_eq!(back, mapping);
}
