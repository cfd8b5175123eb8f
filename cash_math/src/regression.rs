//! Multivariate linear regression fit by least squares
//!
//! Features are standardized before solving. Columns without variance carry
//! no information for the fit and get a zero coefficient; a vanishing ridge
//! term keeps collinear designs solvable, which in the limit matches the
//! minimum-norm least-squares solution.

use crate::linalg::solve_ridge;
use crate::{MathError, Result};

/// Ridge weight (per observation) applied in standardized feature space
const STABILIZING_RIDGE: f64 = 1e-10;

/// Linear model `y = intercept + Σ coefficientᵢ · xᵢ`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegression {
    intercept: f64,
    coefficients: Vec<f64>,
}

impl LinearRegression {
    /// Fit the model to `rows` (one feature vector per observation) against `targets`
    pub fn fit(rows: &[Vec<f64>], targets: &[f64]) -> Result<Self> {
        if rows.is_empty() {
            return Err(MathError::InsufficientData(
                "Need at least one observation to fit a regression".to_string(),
            ));
        }
        if rows.len() != targets.len() {
            return Err(MathError::InvalidInput(format!(
                "Got {} feature rows but {} targets",
                rows.len(),
                targets.len()
            )));
        }

        let width = rows[0].len();
        if rows.iter().any(|row| row.len() != width) {
            return Err(MathError::InvalidInput(
                "All feature rows must have the same width".to_string(),
            ));
        }
        if targets.iter().any(|y| !y.is_finite()) || rows.iter().flatten().any(|x| !x.is_finite())
        {
            return Err(MathError::InvalidInput(
                "Features and targets must be finite".to_string(),
            ));
        }

        let n = rows.len() as f64;
        let y_mean = targets.iter().sum::<f64>() / n;

        let means: Vec<f64> = (0..width)
            .map(|j| rows.iter().map(|row| row[j]).sum::<f64>() / n)
            .collect();
        let scales: Vec<f64> = (0..width)
            .map(|j| {
                let variance =
                    rows.iter().map(|row| (row[j] - means[j]).powi(2)).sum::<f64>() / n;
                variance.sqrt()
            })
            .collect();

        let active: Vec<usize> = (0..width)
            .filter(|&j| scales[j] > 1e-12 * means[j].abs().max(1.0))
            .collect();

        let mut coefficients = vec![0.0; width];

        if !active.is_empty() {
            let standardized: Vec<Vec<f64>> = rows
                .iter()
                .map(|row| {
                    active
                        .iter()
                        .map(|&j| (row[j] - means[j]) / scales[j])
                        .collect()
                })
                .collect();
            let centered: Vec<f64> = targets.iter().map(|y| y - y_mean).collect();
            let penalties = vec![STABILIZING_RIDGE * n; active.len()];

            let beta = solve_ridge(&standardized, &centered, &penalties)?;
            for (&j, b) in active.iter().zip(beta) {
                coefficients[j] = b / scales[j];
            }
        }

        let intercept = y_mean
            - coefficients
                .iter()
                .zip(&means)
                .map(|(c, m)| c * m)
                .sum::<f64>();

        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err(MathError::CalculationError(
                "Regression produced non-finite coefficients".to_string(),
            ));
        }

        Ok(Self {
            intercept,
            coefficients,
        })
    }

    /// Predict the target for a single feature vector
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.coefficients.len() {
            return Err(MathError::InvalidInput(format!(
                "Expected {} features, got {}",
                self.coefficients.len(),
                features.len()
            )));
        }

        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(c, x)| c * x)
                .sum::<f64>())
    }

    /// Get the fitted intercept
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Get the fitted coefficients, one per feature
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Coefficient of determination on the given data
    pub fn r_squared(&self, rows: &[Vec<f64>], targets: &[f64]) -> Result<f64> {
        if rows.len() != targets.len() || rows.is_empty() {
            return Err(MathError::InvalidInput(
                "Rows and targets must have the same non-zero length".to_string(),
            ));
        }

        let y_mean = targets.iter().sum::<f64>() / targets.len() as f64;
        let mut ss_total = 0.0;
        let mut ss_residual = 0.0;

        for (row, &y) in rows.iter().zip(targets) {
            let y_pred = self.predict(row)?;
            ss_total += (y - y_mean).powi(2);
            ss_residual += (y - y_pred).powi(2);
        }

        if ss_total.abs() < 1e-10 {
            return Err(MathError::CalculationError(
                "Cannot calculate R-squared: total sum of squares is too small".to_string(),
            ));
        }

        Ok(1.0 - (ss_residual / ss_total))
    }
}
