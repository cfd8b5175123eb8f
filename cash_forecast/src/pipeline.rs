//! End-to-end forecast request: aggregate, forecast, evaluate alerts

use crate::alerts::{evaluate_alerts, AlertResult, AlertThresholds};
use crate::config::EngineConfig;
use crate::data::{aggregate, Observation};
use crate::error::Result;
use crate::models::{check_horizon, forecast_with_config, ForecastResult, ModelVariant};
use serde::{Deserialize, Serialize};

/// Default number of days to forecast
pub const DEFAULT_HORIZON_DAYS: i64 = 30;

/// What to forecast and which limits to check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub model: ModelVariant,
    pub days: i64,
    #[serde(default)]
    pub alert_thresholds: AlertThresholds,
}

impl Default for ForecastRequest {
    fn default() -> Self {
        Self {
            model: ModelVariant::Seasonal,
            days: DEFAULT_HORIZON_DAYS,
            alert_thresholds: AlertThresholds::default(),
        }
    }
}

/// Forecast together with the alerts it triggered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub forecast: ForecastResult,
    pub alerts: AlertResult,
}

/// Turn raw observations into a forecast and its alerts
pub fn run_forecast(
    observations: &[Observation],
    request: &ForecastRequest,
    config: &EngineConfig,
) -> Result<ForecastReport> {
    check_horizon(request.days)?;
    request.alert_thresholds.validate()?;

    let series = aggregate(observations)?;
    let forecast = forecast_with_config(&series, request.model, request.days, config)?;
    let alerts = evaluate_alerts(&forecast, &request.alert_thresholds);

    if !alerts.is_empty() {
        tracing::info!(count = alerts.len(), "forecast triggered alerts");
    }

    Ok(ForecastReport { forecast, alerts })
}
