//! Fourier-series features for periodic effects

use crate::{MathError, Result};
use std::f64::consts::PI;

/// Period of the yearly cycle, in days
pub const YEARLY_PERIOD: f64 = 365.25;

/// Period of the weekly cycle, in days
pub const WEEKLY_PERIOD: f64 = 7.0;

/// Fourier terms `[sin(2πkt/P), cos(2πkt/P)]` for `k = 1..=order`
///
/// `t` is measured in days from a fixed epoch so the terms line up with the
/// calendar regardless of where a series starts.
pub fn fourier_terms(t: f64, period: f64, order: usize) -> Result<Vec<f64>> {
    if period <= 0.0 || !period.is_finite() {
        return Err(MathError::InvalidInput(format!(
            "Period must be positive, got {}",
            period
        )));
    }

    let mut terms = Vec::with_capacity(2 * order);
    for k in 1..=order {
        let angle = 2.0 * PI * k as f64 * t / period;
        terms.push(angle.sin());
        terms.push(angle.cos());
    }

    Ok(terms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_terms_repeat_each_period() {
        let a = fourier_terms(3.0, WEEKLY_PERIOD, 3).unwrap();
        let b = fourier_terms(3.0 + 7.0 * 52.0, WEEKLY_PERIOD, 3).unwrap();

        assert_eq!(a.len(), 6);
        for (x, y) in a.iter().zip(&b) {
            assert_abs_diff_eq!(x, y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_zero_order_is_empty() {
        assert!(fourier_terms(10.0, YEARLY_PERIOD, 0).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_bad_period() {
        assert!(fourier_terms(1.0, 0.0, 2).is_err());
    }
}
