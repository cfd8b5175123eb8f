//! # Cash Math
//!
//! Numerical routines used by the cash-flow forecasting engine.
//! This crate provides a small dense least-squares solver, a standardized
//! multivariate linear regression, Fourier-series features for periodic
//! effects and the accuracy measures used to score a forecast.

use thiserror::Error;

pub mod accuracy;
pub mod fourier;
pub mod linalg;
pub mod regression;

pub use crate::regression::LinearRegression;

/// Errors that can occur in numerical calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for numerical operations
pub type Result<T> = std::result::Result<T, MathError>;
