//! Engine configuration, loadable from TOML

use crate::alerts::AlertThresholds;
use crate::error::{ForecastError, Result};
use crate::holidays::{CustomHoliday, HolidayRegion};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for the seasonal-decomposition forecaster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonalConfig {
    /// Number of candidate trend change points
    pub changepoints: usize,
    /// Share of the history (from the start) in which change points are placed
    pub changepoint_range: f64,
    /// Prior scale of trend rate changes; smaller means a stiffer trend
    pub changepoint_prior_scale: f64,
    /// Prior scale of the yearly and weekly Fourier coefficients
    pub seasonality_prior_scale: f64,
    /// Prior scale of the holiday effects
    pub holidays_prior_scale: f64,
    /// Fourier order of the yearly cycle
    pub yearly_order: usize,
    /// Fourier order of the weekly cycle
    pub weekly_order: usize,
    /// Coverage of the uncertainty interval
    pub interval_width: f64,
    /// Number of simulated paths behind the interval
    pub uncertainty_samples: usize,
    /// Seed for the simulated paths
    pub seed: u64,
    /// Rounds of alternating trend / seasonality fitting
    pub fit_iterations: usize,
    /// Region whose holidays are modeled
    pub region: HolidayRegion,
    /// Additional one-off holidays
    pub extra_holidays: Vec<CustomHoliday>,
}

impl Default for SeasonalConfig {
    fn default() -> Self {
        Self {
            changepoints: 25,
            changepoint_range: 0.8,
            changepoint_prior_scale: 0.05,
            seasonality_prior_scale: 10.0,
            holidays_prior_scale: 10.0,
            yearly_order: 10,
            weekly_order: 3,
            interval_width: 0.8,
            uncertainty_samples: 1000,
            seed: 42,
            fit_iterations: 5,
            region: HolidayRegion::default(),
            extra_holidays: Vec::new(),
        }
    }
}

/// How the lag-regression forecaster fills lag features for future days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LagStrategy {
    /// Each forecast day feeds later days' lags
    #[default]
    Recursive,
    /// Lags are read from the tail of the training rows
    HistoricalTail,
}

/// Settings for the lag-regression forecaster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LagConfig {
    pub strategy: LagStrategy,
}

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub seasonal: SeasonalConfig,
    pub lag: LagConfig,
    pub alerts: AlertThresholds,
}

impl EngineConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the models cannot work with
    pub fn validate(&self) -> Result<()> {
        let s = &self.seasonal;

        if !(s.changepoint_range > 0.0 && s.changepoint_range <= 1.0) {
            return Err(ForecastError::InvalidParameter(
                "seasonal.changepoint_range must be in (0, 1]".to_string(),
            ));
        }
        for (field, value) in [
            ("seasonal.changepoint_prior_scale", s.changepoint_prior_scale),
            ("seasonal.seasonality_prior_scale", s.seasonality_prior_scale),
            ("seasonal.holidays_prior_scale", s.holidays_prior_scale),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ForecastError::InvalidParameter(format!(
                    "{} must be positive",
                    field
                )));
            }
        }
        if !(s.interval_width > 0.0 && s.interval_width < 1.0) {
            return Err(ForecastError::InvalidParameter(
                "seasonal.interval_width must be between 0 and 1".to_string(),
            ));
        }
        if s.uncertainty_samples == 0 {
            return Err(ForecastError::InvalidParameter(
                "seasonal.uncertainty_samples must be at least 1".to_string(),
            ));
        }
        if s.fit_iterations == 0 {
            return Err(ForecastError::InvalidParameter(
                "seasonal.fit_iterations must be at least 1".to_string(),
            ));
        }

        self.alerts.validate()
    }
}
