//! Dense linear algebra for small least-squares problems
//!
//! The designs solved here have at most a few dozen columns, so the normal
//! equations are formed explicitly and solved with a Cholesky factorization.

use crate::{MathError, Result};

/// Solve `(XᵀX + diag(penalties)) β = Xᵀy` for β.
///
/// `design` is row-major: one inner vector per observation, all of the same
/// width. `penalties` holds one non-negative ridge weight per column; a zero
/// weight leaves that column unregularized.
pub fn solve_ridge(design: &[Vec<f64>], target: &[f64], penalties: &[f64]) -> Result<Vec<f64>> {
    if design.is_empty() {
        return Err(MathError::InsufficientData(
            "Design matrix has no rows".to_string(),
        ));
    }
    if design.len() != target.len() {
        return Err(MathError::InvalidInput(format!(
            "Design has {} rows but target has {} values",
            design.len(),
            target.len()
        )));
    }

    let width = design[0].len();
    if penalties.len() != width {
        return Err(MathError::InvalidInput(format!(
            "Expected {} penalties, got {}",
            width,
            penalties.len()
        )));
    }
    if penalties.iter().any(|p| *p < 0.0 || !p.is_finite()) {
        return Err(MathError::InvalidInput(
            "Penalties must be finite and non-negative".to_string(),
        ));
    }

    let mut gram = vec![vec![0.0; width]; width];
    let mut rhs = vec![0.0; width];

    for (row, &y) in design.iter().zip(target) {
        if row.len() != width {
            return Err(MathError::InvalidInput(
                "Design rows must all have the same width".to_string(),
            ));
        }
        for i in 0..width {
            rhs[i] += row[i] * y;
            for j in 0..=i {
                gram[i][j] += row[i] * row[j];
            }
        }
    }

    for i in 0..width {
        gram[i][i] += penalties[i];
        for j in 0..i {
            gram[j][i] = gram[i][j];
        }
    }

    cholesky_solve(&gram, &rhs)
}

/// Solve `A x = b` for a symmetric positive-definite `A`.
pub fn cholesky_solve(matrix: &[Vec<f64>], rhs: &[f64]) -> Result<Vec<f64>> {
    let n = matrix.len();
    if rhs.len() != n || matrix.iter().any(|row| row.len() != n) {
        return Err(MathError::InvalidInput(
            "Matrix must be square and match the right-hand side".to_string(),
        ));
    }

    // Lower-triangular factor L with A = L Lᵀ
    let mut lower = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let partial: f64 = (0..j).map(|k| lower[i][k] * lower[j][k]).sum();
            if i == j {
                let pivot = matrix[i][i] - partial;
                if pivot <= 0.0 || !pivot.is_finite() {
                    return Err(MathError::CalculationError(format!(
                        "Matrix is not positive definite (pivot {} at column {})",
                        pivot, i
                    )));
                }
                lower[i][j] = pivot.sqrt();
            } else {
                lower[i][j] = (matrix[i][j] - partial) / lower[j][j];
            }
        }
    }

    // Forward substitution: L z = b
    let mut z = vec![0.0; n];
    for i in 0..n {
        let partial: f64 = (0..i).map(|k| lower[i][k] * z[k]).sum();
        z[i] = (rhs[i] - partial) / lower[i][i];
    }

    // Back substitution: Lᵀ x = z
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let partial: f64 = (i + 1..n).map(|k| lower[k][i] * x[k]).sum();
        x[i] = (z[i] - partial) / lower[i][i];
    }

    if x.iter().any(|v| !v.is_finite()) {
        return Err(MathError::CalculationError(
            "Solution contains non-finite values".to_string(),
        ));
    }

    Ok(x)
}
