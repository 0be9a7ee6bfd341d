//! Binary logistic regression
//!
//! L2-regularised logistic regression with an unpenalised intercept, trained
//! with Newton's method. The objective is
//!
//! ```text
//! sum_i [ log(1 + exp(z_i)) - y_i * z_i ] + ||w||^2 / (2C)
//! ```
//!
//! where `z_i = w . x_i + b`. Newton steps are halved until the objective
//! decreases; an iteration that finds no decrease ends training, so the
//! objective never rises.

use faer::prelude::SpSolver;
use faer::{Col, Mat, Side};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::{PipelineError, PipelineResult};
use super::values::numeric_values;

const STEP_NAME: &str = "LogisticRegression";

/// Maximum number of step halvings per Newton iteration
const MAX_HALVINGS: usize = 30;

/// Learned parameters of a fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticFit {
    /// Feature columns in the order the coefficients refer to
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub iterations: usize,
    pub converged: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Inverse regularisation strength
    pub c: f64,
    pub max_iterations: usize,
    /// Convergence threshold on the gradient's max-norm
    pub tolerance: f64,
    #[serde(default)]
    pub fitted: Option<LogisticFit>,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iterations: 100,
            tolerance: 1e-8,
            fitted: None,
        }
    }
}

impl LogisticRegression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    fn fitted(&self) -> PipelineResult<&LogisticFit> {
        self.fitted.as_ref().ok_or_else(|| PipelineError::NotFitted {
            step: STEP_NAME.to_string(),
        })
    }

    /// Fit on every column of `df` against a 0/1 target.
    pub fn fit(&mut self, df: &DataFrame, y: &[i32]) -> PipelineResult<()> {
        if df.height() != y.len() {
            return Err(PipelineError::LengthMismatch {
                rows: df.height(),
                targets: y.len(),
            });
        }
        if let Some((row, &value)) = y.iter().enumerate().find(|&(_, &v)| v != 0 && v != 1) {
            return Err(PipelineError::InvalidTarget { row, value });
        }

        let feature_names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let x = design_matrix(df, &feature_names)?;
        let y = Col::<f64>::from_fn(y.len(), |i| y[i] as f64);

        let d = feature_names.len();
        let penalty = 1.0 / self.c;

        // params[..d] are coefficients, params[d] is the intercept
        let mut params = Col::<f64>::zeros(d + 1);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            let z = &x * &params;
            let p = Col::<f64>::from_fn(z.nrows(), |i| sigmoid(z[i]));
            let residual = Col::<f64>::from_fn(p.nrows(), |i| p[i] - y[i]);

            let mut gradient = x.transpose() * &residual;
            for j in 0..d {
                gradient[j] += penalty * params[j];
            }

            let max_grad = (0..=d).fold(0.0f64, |m, j| m.max(gradient[j].abs()));
            if max_grad < self.tolerance {
                converged = true;
                break;
            }

            let hessian = weighted_gram(&x, &p, penalty);
            let Ok(llt) = hessian.cholesky(Side::Lower) else {
                break;
            };
            let direction = llt.solve(&gradient);

            let current = objective(&x, &y, &params, penalty);
            let mut step = 1.0;
            let mut accepted = None;
            for _ in 0..MAX_HALVINGS {
                let candidate = Col::<f64>::from_fn(d + 1, |j| params[j] - step * direction[j]);
                if objective(&x, &y, &candidate, penalty) <= current {
                    accepted = Some(candidate);
                    break;
                }
                step *= 0.5;
            }

            // No halving lowered the objective: keep the current point
            let Some(candidate) = accepted else {
                break;
            };
            params = candidate;
            iterations += 1;
        }

        self.fitted = Some(LogisticFit {
            feature_names,
            coefficients: (0..d).map(|j| params[j]).collect(),
            intercept: params[d],
            iterations,
            converged,
        });
        Ok(())
    }

    /// Raw decision values `w . x + b`. Missing features contribute zero.
    pub fn decision_function(&self, df: &DataFrame) -> PipelineResult<Vec<f64>> {
        let fit = self.fitted()?;
        let x = design_matrix(df, &fit.feature_names)?;

        let d = fit.coefficients.len();
        let params = Col::<f64>::from_fn(d + 1, |j| {
            if j < d {
                fit.coefficients[j]
            } else {
                fit.intercept
            }
        });
        let z = &x * &params;
        Ok((0..z.nrows()).map(|i| z[i]).collect())
    }

    /// Probability of the positive class for each row.
    pub fn predict_proba(&self, df: &DataFrame) -> PipelineResult<Vec<f64>> {
        Ok(self
            .decision_function(df)?
            .into_iter()
            .map(sigmoid)
            .collect())
    }

    /// Class labels: 1 when the decision value is positive, else 0.
    pub fn predict(&self, df: &DataFrame) -> PipelineResult<Vec<i32>> {
        Ok(self
            .decision_function(df)?
            .into_iter()
            .map(|z| if z > 0.0 { 1 } else { 0 })
            .collect())
    }
}

/// Fraction of predictions equal to the truth.
pub fn accuracy(predicted: &[i32], truth: &[i32]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let correct = predicted
        .iter()
        .zip(truth)
        .filter(|(p, t)| p == t)
        .count();
    correct as f64 / truth.len() as f64
}

/// Build the n x (d + 1) design matrix in the given column order, with a
/// trailing column of ones for the intercept.
fn design_matrix(df: &DataFrame, feature_names: &[String]) -> PipelineResult<Mat<f64>> {
    let columns: Vec<Vec<Option<f64>>> = feature_names
        .iter()
        .map(|name| numeric_values(df, STEP_NAME, name))
        .collect::<PipelineResult<_>>()?;

    let d = feature_names.len();
    Ok(Mat::<f64>::from_fn(df.height(), d + 1, |i, j| {
        if j < d {
            columns[j][i].unwrap_or(0.0)
        } else {
            1.0
        }
    }))
}

/// Hessian of the objective: `X^T S X + diag(1/C, ..., 1/C, 0)`.
fn weighted_gram(x: &Mat<f64>, p: &Col<f64>, penalty: f64) -> Mat<f64> {
    let d = x.ncols() - 1;
    let xw = Mat::<f64>::from_fn(x.nrows(), x.ncols(), |i, j| x[(i, j)] * p[i] * (1.0 - p[i]));
    let mut hessian = x.transpose() * &xw;
    for j in 0..d {
        hessian[(j, j)] += penalty;
    }
    hessian
}

fn objective(x: &Mat<f64>, y: &Col<f64>, params: &Col<f64>, penalty: f64) -> f64 {
    let d = x.ncols() - 1;
    let z = x * params;
    let loss: f64 = (0..z.nrows()).map(|i| softplus(z[i]) - y[i] * z[i]).sum();
    let norm: f64 = (0..d).map(|j| params[j] * params[j]).sum();
    loss + 0.5 * penalty * norm
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// `log(1 + exp(z))` without overflow.
fn softplus(z: f64) -> f64 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}
