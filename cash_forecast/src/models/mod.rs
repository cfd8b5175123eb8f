//! Forecasting models for daily cash-flow series
//!
//! Two strategies share one fit/predict contract: a seasonal decomposition
//! with uncertainty bounds and a lag regression without them. Callers pick
//! one with [`ModelVariant`] and go through [`forecast`].

use crate::config::EngineConfig;
use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::metrics::{evaluate_model, ValidationMetrics};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::str::FromStr;

pub mod lag_regression;
pub mod seasonal;

pub use lag_regression::{FittedLagRegression, LagRegression};
pub use seasonal::{FittedSeasonal, SeasonalDecomposition};

/// Number of most recent observed days scored by validation
pub const HOLDOUT_DAYS: usize = 30;

/// Longest lag used as a regression feature
pub const MAX_LAG: usize = 30;

/// Fewest dated rows a series needs before either model is fit
pub const MIN_HISTORY_ROWS: usize = MAX_LAG + 1;

/// Longest horizon accepted, ten years of days
pub const MAX_HORIZON_DAYS: i64 = 3650;

/// One forecast day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub point_estimate: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub lower_bound: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub upper_bound: Option<f64>,
}

impl ForecastPoint {
    /// A point without an uncertainty interval
    pub fn new(date: NaiveDate, point_estimate: f64) -> Self {
        Self {
            date,
            point_estimate,
            lower_bound: None,
            upper_bound: None,
        }
    }

    /// A point with an uncertainty interval
    pub fn with_bounds(date: NaiveDate, point_estimate: f64, lower: f64, upper: f64) -> Self {
        Self {
            date,
            point_estimate,
            lower_bound: Some(lower),
            upper_bound: Some(upper),
        }
    }

    pub fn has_bounds(&self) -> bool {
        self.lower_bound.is_some() && self.upper_bound.is_some()
    }
}

/// Forecast for a horizon together with the model's holdout metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub model: ModelVariant,
    pub points: Vec<ForecastPoint>,
    pub metrics: ValidationMetrics,
    pub warnings: Vec<String>,
}

impl ForecastResult {
    pub fn horizon(&self) -> usize {
        self.points.len()
    }
}

/// The available forecasting strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelVariant {
    /// Trend × (1 + yearly + weekly + holiday effects), with intervals
    Seasonal,
    /// Least squares over calendar trend and 1/7/30-day lags
    LagRegression,
}

impl FromStr for ModelVariant {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "seasonal" | "prophet" => Ok(ModelVariant::Seasonal),
            "lag_regression" | "lag-regression" | "linear" | "linear_regression" => {
                Ok(ModelVariant::LagRegression)
            }
            other => Err(ForecastError::InvalidParameter(format!(
                "Unknown model variant: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelVariant::Seasonal => write!(f, "seasonal"),
            ModelVariant::LagRegression => write!(f, "lag_regression"),
        }
    }
}

/// Actual and retrospectively predicted totals for the holdout window
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Holdout {
    pub actuals: Vec<f64>,
    pub predicted: Vec<f64>,
}

/// A model fitted to one series for one horizon
pub trait FittedModel: Debug {
    /// Point estimates (and bounds, when the model has them) for every horizon day
    fn predict(&self) -> Result<Vec<ForecastPoint>>;

    /// The model's retrospective predictions over the holdout window
    fn holdout(&self) -> Holdout;

    /// Caveats found while fitting
    fn warnings(&self) -> &[String];

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be fitted to a daily series
pub trait ForecastModel: Debug {
    /// The type of fitted model produced
    type Fitted: FittedModel;

    /// Fit the model to `series` for a forecast of `horizon` days
    fn fit(&self, series: &TimeSeries, horizon: usize) -> Result<Self::Fitted>;

    /// Which variant this model implements
    fn variant(&self) -> ModelVariant;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// Reject horizons that are not a positive number of days
pub fn check_horizon(horizon_days: i64) -> Result<usize> {
    if horizon_days <= 0 {
        return Err(ForecastError::InvalidHorizon(format!(
            "Horizon must be a positive number of days, got {}",
            horizon_days
        )));
    }
    if horizon_days > MAX_HORIZON_DAYS {
        return Err(ForecastError::InvalidHorizon(format!(
            "Horizon of {} days exceeds the maximum of {}",
            horizon_days, MAX_HORIZON_DAYS
        )));
    }
    usize::try_from(horizon_days).map_err(|_| {
        ForecastError::InvalidHorizon(format!("Horizon {} is too large", horizon_days))
    })
}

/// Check a forecast request before anything is fitted; returns the horizon as a count
pub fn check_request(series: &TimeSeries, horizon_days: i64) -> Result<usize> {
    let horizon = check_horizon(horizon_days)?;
    if series.is_empty() {
        return Err(ForecastError::EmptyInput(
            "Series has no observations".to_string(),
        ));
    }
    if series.len() < MIN_HISTORY_ROWS {
        return Err(ForecastError::InsufficientData(format!(
            "Need at least {} dated rows to build lag and holdout windows, got {}",
            MIN_HISTORY_ROWS,
            series.len()
        )));
    }
    if let Some(last) = series.last_date() {
        horizon_end(last, horizon)?;
    }

    Ok(horizon)
}

/// Last forecast date for a horizon starting the day after `last_date`
pub fn horizon_end(last_date: NaiveDate, horizon: usize) -> Result<NaiveDate> {
    if horizon as u64 > MAX_HORIZON_DAYS as u64 {
        return Err(ForecastError::InvalidHorizon(format!(
            "Horizon of {} days exceeds the maximum of {}",
            horizon, MAX_HORIZON_DAYS
        )));
    }
    last_date
        .checked_add_days(Days::new(horizon as u64))
        .ok_or_else(|| {
            ForecastError::InvalidHorizon(format!(
                "A {}-day horizon after {} runs past the supported calendar",
                horizon, last_date
            ))
        })
}

/// Fit `model`, forecast `horizon_days` and score the fit on its holdout window
pub fn run_model<M: ForecastModel>(
    model: &M,
    series: &TimeSeries,
    horizon_days: i64,
) -> Result<ForecastResult> {
    let horizon = check_request(series, horizon_days)?;

    let fitted = model.fit(series, horizon)?;
    let points = fitted.predict()?;
    if points.len() != horizon {
        return Err(ForecastError::FitFailure(format!(
            "{} produced {} points for a {}-day horizon",
            fitted.name(),
            points.len(),
            horizon
        )));
    }

    let metrics = evaluate_model(&fitted);

    tracing::info!(
        model = fitted.name(),
        history = series.len(),
        horizon,
        mae = ?metrics.mae,
        "forecast complete"
    );

    Ok(ForecastResult {
        model: model.variant(),
        points,
        metrics,
        warnings: fitted.warnings().to_vec(),
    })
}

/// Forecast `horizon_days` past the end of `series` with default settings
pub fn forecast(
    series: &TimeSeries,
    variant: ModelVariant,
    horizon_days: i64,
) -> Result<ForecastResult> {
    forecast_with_config(series, variant, horizon_days, &EngineConfig::default())
}

/// Forecast `horizon_days` past the end of `series` with the given settings
pub fn forecast_with_config(
    series: &TimeSeries,
    variant: ModelVariant,
    horizon_days: i64,
    config: &EngineConfig,
) -> Result<ForecastResult> {
    config.validate()?;

    match variant {
        ModelVariant::Seasonal => {
            let model = SeasonalDecomposition::new(config.seasonal.clone());
            run_model(&model, series, horizon_days)
        }
        ModelVariant::LagRegression => {
            let model = LagRegression::new(config.lag);
            run_model(&model, series, horizon_days)
        }
    }
}
