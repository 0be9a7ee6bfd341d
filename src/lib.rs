//! loanpred: Loan Eligibility Library
//!
//! A preprocessing transformer suite (imputation, column combination and
//! dropping, frequency label encoding, log transform, min-max scaling) chained
//! into a logistic regression pipeline, with training and prediction drivers,
//! JSON model persistence and a local experiment tracking store.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod tracking;
pub mod utils;
