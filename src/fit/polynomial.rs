//! Polynomial regression of `Avg Salary` on `Company Score`.
//!
//! One call is one deterministic fit:
//! - collect `(score, avg salary)` pairs (rows missing either are skipped)
//! - expand the score into `[1, x, …, x^d]`
//! - solve OLS for the coefficients
//! - evaluate predictions, MSE and R²

use nalgebra::DVector;

use crate::domain::{PolyDegree, PolyFit, RecordTable};
use crate::error::AnalysisError;
use crate::math::{poly_design, solve_least_squares};

/// Relative tolerance for treating the residual sum as zero when the target
/// is constant.
const EXACT_FIT_TOL: f64 = 1e-9;

/// Fit the table's salary/score relationship at the given degree.
pub fn fit_polynomial(table: &RecordTable, degree: PolyDegree) -> Result<PolyFit, AnalysisError> {
    let (x, y): (Vec<f64>, Vec<f64>) = table
        .records
        .iter()
        .filter_map(|r| Some((r.company_score?, r.avg_salary?)))
        .unzip();

    if x.is_empty() {
        return Err(AnalysisError::EmptyInput(format!(
            "{} has no rows with both `Company Score` and a parsable `Salary`",
            table.source
        )));
    }

    fit_points(x, y, degree)
}

/// Fit already-extracted samples.
pub fn fit_points(x: Vec<f64>, y: Vec<f64>, degree: PolyDegree) -> Result<PolyFit, AnalysisError> {
    if x.is_empty() || x.len() != y.len() {
        return Err(AnalysisError::EmptyInput(
            "regression needs matching, non-empty x/y samples".to_string(),
        ));
    }

    let design = poly_design(&x, degree.get());
    let target = DVector::from_column_slice(&y);
    let beta = solve_least_squares(&design, &target).ok_or_else(|| {
        AnalysisError::Numerical(format!("least squares failed for degree {degree}"))
    })?;

    let y_pred: Vec<f64> = (&design * &beta).iter().copied().collect();
    if y_pred.iter().any(|v| !v.is_finite()) {
        return Err(AnalysisError::Numerical(
            "non-finite prediction from fitted polynomial".to_string(),
        ));
    }

    let (mse, r2) = fit_metrics(&y, &y_pred);
    log::debug!("degree {degree} fit on {} rows: mse={mse:.4} r2={r2:.4}", x.len());

    Ok(PolyFit {
        degree,
        coefficients: beta.iter().copied().collect(),
        x,
        y,
        y_pred,
        mse,
        r2,
    })
}

/// Mean squared error and coefficient of determination.
///
/// When every target is identical the R² denominator is zero: the fit counts
/// as perfect (1.0) if the residual sum is zero within tolerance, otherwise R²
/// is `NaN`.
pub fn fit_metrics(y: &[f64], y_pred: &[f64]) -> (f64, f64) {
    let n = y.len() as f64;
    let sse: f64 = y.iter().zip(y_pred).map(|(a, b)| (a - b).powi(2)).sum();
    let mse = sse / n;

    let mean = y.iter().sum::<f64>() / n;
    let constant_target = y.iter().all(|&v| v == y[0]);
    if constant_target {
        let tol = EXACT_FIT_TOL * mean.powi(2).max(1.0) * n;
        let r2 = if sse <= tol { 1.0 } else { f64::NAN };
        return (mse, r2);
    }

    let sst: f64 = y.iter().map(|v| (v - mean).powi(2)).sum();
    (mse, 1.0 - sse / sst)
}
