//! Error types for the cash_forecast crate

use cash_math::MathError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Custom error types for the cash_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// No observations were supplied
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Too little history to build lag features and a holdout window
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Requested horizon is not a positive number of days
    #[error("Invalid horizon: {0}")]
    InvalidHorizon(String),

    /// Numerical fitting failed or produced non-finite coefficients
    #[error("Fit failure: {0}")]
    FitFailure(String),

    /// Error from invalid configuration parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from reading CSV input
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Error from parsing a configuration file
    #[error("Config error: {0}")]
    ConfigError(String),
}

/// Tag identifying the kind of a [`ForecastError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    EmptyInput,
    InsufficientData,
    InvalidHorizon,
    FitFailure,
    InvalidParameter,
    Data,
    Io,
    Csv,
    Config,
}

impl ForecastError {
    /// The kind of failure, for callers that branch on it
    pub fn kind(&self) -> ErrorKind {
        match self {
            ForecastError::EmptyInput(_) => ErrorKind::EmptyInput,
            ForecastError::InsufficientData(_) => ErrorKind::InsufficientData,
            ForecastError::InvalidHorizon(_) => ErrorKind::InvalidHorizon,
            ForecastError::FitFailure(_) => ErrorKind::FitFailure,
            ForecastError::InvalidParameter(_) => ErrorKind::InvalidParameter,
            ForecastError::DataError(_) => ErrorKind::Data,
            ForecastError::IoError(_) => ErrorKind::Io,
            ForecastError::CsvError(_) => ErrorKind::Csv,
            ForecastError::ConfigError(_) => ErrorKind::Config,
        }
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        ForecastError::FitFailure(err.to_string())
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::CsvError(err.to_string())
    }
}

impl From<toml::de::Error> for ForecastError {
    fn from(err: toml::de::Error) -> Self {
        ForecastError::ConfigError(err.to_string())
    }
}
