//! Unit tests for dataset loading and feature selection

use loanpred::pipeline::{estimated_size_mb, load_dataset, load_table, select_features, PipelineError};
use polars::prelude::*;
use std::io::Write;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_load_csv_file() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "a,b,c").unwrap();
    writeln!(file, "1,2,3").unwrap();
    writeln!(file, "4,5,6").unwrap();
    drop(file);

    let df = load_dataset(&csv_path, 100).unwrap();

    assert_shape(&df, 2, 3);
    assert_eq!(df.get_column_names(), &["a", "b", "c"]);
    assert!(estimated_size_mb(&df) >= 0.0, "Memory estimate should be non-negative");
}

#[test]
fn test_load_parquet_file() {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("loan-train.parquet");

    let mut df = create_loan_dataframe(20, 5);
    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(&mut df).unwrap();

    let loaded = load_table(temp_dir.path(), "loan-train.parquet", 100).unwrap();

    assert_shape(&loaded, 20, 13);
    assert!(loaded.equals_missing(&df));
}

#[test]
fn test_loan_csv_types() {
    let (_temp_dir, data_dir, _) = create_loan_workspace(200, 8);
    let df = load_table(&data_dir, TRAIN_FILE, 10000).unwrap();

    assert_eq!(df.column("ApplicantIncome").unwrap().dtype(), &DataType::Float64);
    assert_eq!(df.column("Credit_History").unwrap().dtype(), &DataType::Float64);
    assert_eq!(df.column("Gender").unwrap().dtype(), &DataType::String);
    assert_eq!(df.column("Dependents").unwrap().dtype(), &DataType::String);
    assert!(df.column("LoanAmount").unwrap().null_count() > 0);
}

#[test]
fn test_unsupported_format() {
    let temp_dir = TempDir::new().unwrap();
    let bad_path = temp_dir.path().join("test.xlsx");
    std::fs::File::create(&bad_path).unwrap();

    let result = load_dataset(&bad_path, 100);

    assert!(result.is_err(), "Unsupported format should return error");
    let err_msg = result.unwrap_err().to_string();
    assert!(
        err_msg.contains("Unsupported"),
        "Error message should mention unsupported format: {}",
        err_msg
    );
}

#[test]
fn test_nonexistent_file() {
    let path = std::path::Path::new("/nonexistent/path/to/loan-train.csv");

    let result = load_dataset(path, 100);

    assert!(result.is_err(), "Nonexistent file should return error");
}

#[test]
fn test_csv_with_missing_values() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("missing.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "a,b,c").unwrap();
    writeln!(file, "1,,3").unwrap(); // b is missing
    writeln!(file, ",2,").unwrap(); // a and c are missing
    writeln!(file, "4,5,6").unwrap();
    drop(file);

    let df = load_dataset(&csv_path, 100).unwrap();

    let null_counts: Vec<usize> = df.get_columns().iter().map(|c| c.null_count()).collect();
    assert_eq!(null_counts, vec![1, 1, 1]);
}

#[test]
fn test_select_features_in_configured_order() {
    let df = create_loan_dataframe(10, 1);
    let features = vec![
        "LoanAmount".to_string(),
        "Gender".to_string(),
        "Credit_History".to_string(),
    ];

    let selected = select_features(&df, &features).unwrap();

    assert_eq!(selected.get_column_names(), &["LoanAmount", "Gender", "Credit_History"]);
    assert_missing_columns(&selected, &["Loan_ID", "Loan_Status"]);
}

#[test]
fn test_select_features_reports_missing_column() {
    let df = create_loan_dataframe(10, 1).drop("Married").unwrap();

    let err = select_features(&df, &["Gender".to_string(), "Married".to_string()]).unwrap_err();
    assert!(matches!(err, PipelineError::MissingColumn { column, .. } if column == "Married"));
}
