//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const TRAIN_FILE: &str = "loan-train.csv";
pub const TEST_FILE: &str = "loan-test.csv";

fn maybe<T>(rng: &mut StdRng, value: T, missing_rate: f64) -> Option<T> {
    if rng.gen::<f64>() < missing_rate {
        None
    } else {
        Some(value)
    }
}

/// Synthetic loan applications with the real dataset's schema.
///
/// Approval follows credit history (about 90% of the time) so a logistic
/// regression separates the classes well. Roughly 5% of cells in the
/// partially-missing columns are null. The same seed gives the same table.
pub fn create_loan_dataframe(rows: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut gender = Vec::with_capacity(rows);
    let mut married = Vec::with_capacity(rows);
    let mut dependents = Vec::with_capacity(rows);
    let mut education = Vec::with_capacity(rows);
    let mut self_employed = Vec::with_capacity(rows);
    let mut applicant_income = Vec::with_capacity(rows);
    let mut coapplicant_income = Vec::with_capacity(rows);
    let mut loan_amount = Vec::with_capacity(rows);
    let mut loan_term = Vec::with_capacity(rows);
    let mut credit_history = Vec::with_capacity(rows);
    let mut property_area = Vec::with_capacity(rows);
    let mut status = Vec::with_capacity(rows);

    for i in 0..rows {
        let good_credit = rng.gen::<f64>() < 0.8;
        let approved = if rng.gen::<f64>() < 0.9 { good_credit } else { !good_credit };

        let g = if rng.gen::<f64>() < 0.8 { "Male" } else { "Female" };
        gender.push(maybe(&mut rng, g, 0.05));
        let m = if rng.gen::<f64>() < 0.65 { "Yes" } else { "No" };
        married.push(maybe(&mut rng, m, 0.02));
        let d = ["0", "0", "1", "2", "3+"][rng.gen_range(0..5)];
        dependents.push(maybe(&mut rng, d, 0.05));
        education.push(Some(if rng.gen::<f64>() < 0.78 { "Graduate" } else { "Not Graduate" }));
        let se = if rng.gen::<f64>() < 0.14 { "Yes" } else { "No" };
        self_employed.push(maybe(&mut rng, se, 0.05));
        applicant_income.push(Some(rng.gen_range(1500..20000) as f64));
        coapplicant_income.push(Some(if rng.gen::<f64>() < 0.45 {
            0.0
        } else {
            rng.gen_range(500..5000) as f64
        }));
        let amount = rng.gen_range(40..400) as f64;
        loan_amount.push(maybe(&mut rng, amount, 0.04));
        let term = [360.0, 360.0, 360.0, 180.0, 480.0][rng.gen_range(0..5)];
        loan_term.push(maybe(&mut rng, term, 0.03));
        // Keep the first row complete so credit history is never wholly missing
        let rate = if i == 0 { 0.0 } else { 0.08 };
        credit_history.push(maybe(&mut rng, if good_credit { 1.0 } else { 0.0 }, rate));
        property_area.push(Some(["Urban", "Rural", "Semiurban"][rng.gen_range(0..3)]));
        status.push(if approved { "Y" } else { "N" });
    }

    df! {
        "Loan_ID" => (0..rows).map(|i| format!("LP{:06}", i)).collect::<Vec<_>>(),
        "Gender" => gender,
        "Married" => married,
        "Dependents" => dependents,
        "Education" => education,
        "Self_Employed" => self_employed,
        "ApplicantIncome" => applicant_income,
        "CoapplicantIncome" => coapplicant_income,
        "LoanAmount" => loan_amount,
        "Loan_Amount_Term" => loan_term,
        "Credit_History" => credit_history,
        "Property_Area" => property_area,
        "Loan_Status" => status,
    }
    .unwrap()
}

/// One applicant who should clearly be approved: good credit history and a
/// typical graduate profile.
pub fn create_approve_profile() -> DataFrame {
    df! {
        "Loan_ID" => ["LP999001"],
        "Gender" => ["Male"],
        "Married" => ["Yes"],
        "Dependents" => ["0"],
        "Education" => ["Graduate"],
        "Self_Employed" => ["No"],
        "ApplicantIncome" => [5720.0f64],
        "CoapplicantIncome" => [0.0f64],
        "LoanAmount" => [110.0f64],
        "Loan_Amount_Term" => [360.0f64],
        "Credit_History" => [1.0f64],
        "Property_Area" => ["Urban"],
    }
    .unwrap()
}

/// Same as the approve profile but with no credit history.
pub fn create_reject_profile() -> DataFrame {
    let mut df = create_approve_profile();
    df.with_column(Column::new("Credit_History".into(), [0.0f64]))
        .unwrap();
    df
}

/// Write a DataFrame as CSV into `dir/name`.
pub fn write_csv(df: &mut DataFrame, dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();
    path
}

/// Temp workspace with `data/` holding a training file and a scoring file
/// (training file minus the target), and an empty `models/` location.
pub fn create_loan_workspace(rows: usize, seed: u64) -> (TempDir, PathBuf, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("data");
    let model_dir = temp_dir.path().join("models");
    std::fs::create_dir_all(&data_dir).unwrap();

    let mut train = create_loan_dataframe(rows, seed);
    write_csv(&mut train, &data_dir, TRAIN_FILE);

    let mut test = create_loan_dataframe(rows / 4, seed + 1)
        .drop("Loan_Status")
        .unwrap();
    write_csv(&mut test, &data_dir, TEST_FILE);

    (temp_dir, data_dir, model_dir)
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a DataFrame does NOT contain specific columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column still present: '{}'",
            col
        );
    }
}

/// Assert a float column has no nulls
pub fn assert_no_nulls(df: &DataFrame, column: &str) {
    let nulls = df.column(column).unwrap().null_count();
    assert_eq!(nulls, 0, "Column '{}' has {} null(s)", column, nulls);
}
