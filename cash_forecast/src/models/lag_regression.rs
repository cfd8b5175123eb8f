//! Lag-regression forecaster
//!
//! Each day is described by `[days_since_start, lag_1, lag_7, lag_30]` and a
//! linear model is fit by least squares against that day's total. The series
//! is first laid on a contiguous daily grid (missing days are zero) and the
//! first 30 grid days, which lack a full lag window, never become training
//! rows.

use crate::config::{LagConfig, LagStrategy};
use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::models::{
    horizon_end, FittedModel, ForecastModel, ForecastPoint, Holdout, ModelVariant, HOLDOUT_DAYS,
    MAX_LAG,
};
use crate::utils::future_dates;
use cash_math::LinearRegression;
use chrono::NaiveDate;

/// Lag offsets, in days, used as features
pub const LAGS: [usize; 3] = [1, 7, 30];

/// Lag-regression forecasting model
#[derive(Debug, Clone)]
pub struct LagRegression {
    /// Name of the model
    name: String,
    config: LagConfig,
}

/// Lag-regression model fitted to one series
#[derive(Debug, Clone)]
pub struct FittedLagRegression {
    name: String,
    strategy: LagStrategy,
    regression: LinearRegression,
    last_date: NaiveDate,
    horizon: usize,
    /// Daily totals on the contiguous grid, starting at the first observed date
    grid: Vec<f64>,
    targets: Vec<f64>,
    in_sample: Vec<f64>,
    warnings: Vec<String>,
}

impl LagRegression {
    pub fn new(config: LagConfig) -> Self {
        let strategy = match config.strategy {
            LagStrategy::Recursive => "recursive",
            LagStrategy::HistoricalTail => "historical tail",
        };
        Self {
            name: format!("Lag Regression (lags 1/7/30, {})", strategy),
            config,
        }
    }
}

impl Default for LagRegression {
    fn default() -> Self {
        Self::new(LagConfig::default())
    }
}

/// Feature vector for grid day `index`, reading lags from `values`
fn feature_row(index: usize, values: &[f64]) -> Vec<f64> {
    let mut row = Vec::with_capacity(1 + LAGS.len());
    row.push(index as f64);
    row.extend(LAGS.iter().map(|&lag| values[index - lag]));
    row
}

/// Training rows and targets for a contiguous daily grid.
///
/// Only days with a full 30-day lag window are included, so a grid of
/// `n` days yields `n - 30` rows.
pub fn lag_features(grid: &[f64]) -> (Vec<Vec<f64>>, Vec<f64>) {
    (MAX_LAG..grid.len())
        .map(|i| (feature_row(i, grid), grid[i]))
        .unzip()
}

impl ForecastModel for LagRegression {
    type Fitted = FittedLagRegression;

    fn fit(&self, series: &TimeSeries, horizon: usize) -> Result<FittedLagRegression> {
        let Some(last_date) = series.last_date() else {
            return Err(ForecastError::EmptyInput(
                "Series has no observations".to_string(),
            ));
        };

        horizon_end(last_date, horizon)?;

        let grid = series.daily_grid();
        let (rows, targets) = lag_features(&grid);
        if rows.is_empty() {
            return Err(ForecastError::InsufficientData(format!(
                "Need more than {} days on the daily grid, got {}",
                MAX_LAG,
                grid.len()
            )));
        }

        let regression = LinearRegression::fit(&rows, &targets)?;
        let in_sample = rows
            .iter()
            .map(|row| regression.predict(row))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut warnings = Vec::new();
        if self.config.strategy == LagStrategy::HistoricalTail {
            let warning = "Future lag features are read from the tail of the history, \
                           so early forecast days lean on past observations rather than forecasts"
                .to_string();
            tracing::warn!("{}", warning);
            warnings.push(warning);
        }

        tracing::debug!(
            grid_days = grid.len(),
            training_rows = rows.len(),
            intercept = regression.intercept(),
            coefficients = ?regression.coefficients(),
            r_squared = ?regression.r_squared(&rows, &targets).ok(),
            "fitted lag regression"
        );

        Ok(FittedLagRegression {
            name: self.name.clone(),
            strategy: self.config.strategy,
            regression,
            last_date,
            horizon,
            grid,
            targets,
            in_sample,
            warnings,
        })
    }

    fn variant(&self) -> ModelVariant {
        ModelVariant::LagRegression
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl FittedLagRegression {
    /// Number of rows the regression was trained on
    pub fn training_rows(&self) -> usize {
        self.targets.len()
    }

    /// Each forecast day becomes the lag source for the days after it
    fn predict_recursive(&self) -> Result<Vec<f64>> {
        let mut extended = self.grid.clone();
        extended.reserve(self.horizon);

        for step in 0..self.horizon {
            let index = self.grid.len() + step;
            let estimate = self.regression.predict(&feature_row(index, &extended))?;
            extended.push(estimate);
        }

        Ok(extended.split_off(self.grid.len()))
    }

    /// Lags for forecast day `h` come from training row `rows - horizon + h - lag`,
    /// clamped to the first training row
    fn predict_historical_tail(&self) -> Result<Vec<f64>> {
        let rows = self.targets.len() as i64;
        let horizon = self.horizon as i64;

        (0..self.horizon)
            .map(|step| -> Result<f64> {
                let index = self.grid.len() + step;
                let mut features = vec![index as f64];
                for &lag in &LAGS {
                    let source = (rows - horizon + step as i64 - lag as i64).max(0);
                    features.push(self.targets[source as usize]);
                }
                Ok(self.regression.predict(&features)?)
            })
            .collect()
    }
}

impl FittedModel for FittedLagRegression {
    fn predict(&self) -> Result<Vec<ForecastPoint>> {
        let dates = future_dates(self.last_date, self.horizon)?;
        let estimates = match self.strategy {
            LagStrategy::Recursive => self.predict_recursive()?,
            LagStrategy::HistoricalTail => self.predict_historical_tail()?,
        };

        if let Some(bad) = estimates.iter().position(|v| !v.is_finite()) {
            return Err(ForecastError::FitFailure(format!(
                "Non-finite estimate for forecast day {}",
                bad + 1
            )));
        }

        Ok(dates
            .into_iter()
            .zip(estimates)
            .map(|(date, estimate)| ForecastPoint::new(date, estimate))
            .collect())
    }

    fn holdout(&self) -> Holdout {
        let keep = HOLDOUT_DAYS.min(self.targets.len());
        let from = self.targets.len() - keep;
        Holdout {
            actuals: self.targets[from..].to_vec(),
            predicted: self.in_sample[from..].to_vec(),
        }
    }

    fn warnings(&self) -> &[String] {
        &self.warnings
    }

    fn name(&self) -> &str {
        &self.name
    }
}
