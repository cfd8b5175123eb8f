//! Threshold alerts over a forecast curve

use crate::error::{ForecastError, Result};
use crate::models::ForecastResult;
use serde::{Deserialize, Serialize};

/// Length of the rolling window checked against the weekly threshold
const WEEK_DAYS: usize = 7;

/// Named limits checked against a forecast
///
/// A threshold left as `None` is not evaluated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// Flag any forecast day whose outflow exceeds this amount
    pub daily_spending: Option<f64>,
    /// Flag any rolling 7-day window whose summed outflow exceeds this amount
    pub weekly_spending: Option<f64>,
    /// Flag the first day the running balance drops below zero
    pub negative_balance: bool,
    /// Balance the running sum starts from
    pub starting_balance: f64,
}

impl AlertThresholds {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("alerts.daily_spending", self.daily_spending),
            ("alerts.weekly_spending", self.weekly_spending),
        ] {
            if let Some(limit) = value {
                if !(limit >= 0.0 && limit.is_finite()) {
                    return Err(ForecastError::InvalidParameter(format!(
                        "{} must be a non-negative amount",
                        field
                    )));
                }
            }
        }
        if !self.starting_balance.is_finite() {
            return Err(ForecastError::InvalidParameter(
                "alerts.starting_balance must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Triggered conditions, in evaluation order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlertResult {
    pub triggered: Vec<String>,
}

impl AlertResult {
    pub fn is_empty(&self) -> bool {
        self.triggered.is_empty()
    }

    pub fn len(&self) -> usize {
        self.triggered.len()
    }
}

/// Outflow carried by a net daily amount (expenses are negative)
fn outflow(amount: f64) -> f64 {
    (-amount).max(0.0)
}

/// Check a forecast against the thresholds.
///
/// Daily limits are checked first, then every rolling week, then the running
/// balance. All breaches are reported; overlapping weeks each report on their
/// own and only the first negative balance day is reported.
pub fn evaluate_alerts(forecast: &ForecastResult, thresholds: &AlertThresholds) -> AlertResult {
    let points = &forecast.points;
    let mut triggered = Vec::new();

    if let Some(limit) = thresholds.daily_spending {
        for point in points {
            let spending = -point.point_estimate;
            if spending > limit {
                triggered.push(format!(
                    "Day {}: predicted spending ${:.2} exceeds daily threshold ${:.2}",
                    point.date, spending, limit
                ));
            }
        }
    }

    if let Some(limit) = thresholds.weekly_spending {
        for window in points.windows(WEEK_DAYS) {
            let spending: f64 = window.iter().map(|p| outflow(p.point_estimate)).sum();
            if spending > limit {
                triggered.push(format!(
                    "Week starting {}: predicted spending ${:.2} exceeds weekly threshold ${:.2}",
                    window[0].date, spending, limit
                ));
            }
        }
    }

    if thresholds.negative_balance {
        let mut balance = thresholds.starting_balance;
        for point in points {
            balance += point.point_estimate;
            if balance < 0.0 {
                triggered.push(format!(
                    "Balance projected to go negative on {}: -${:.2}",
                    point.date,
                    balance.abs()
                ));
                break;
            }
        }
    }

    tracing::debug!(
        days = points.len(),
        alerts = triggered.len(),
        "evaluated alert thresholds"
    );

    AlertResult { triggered }
}
