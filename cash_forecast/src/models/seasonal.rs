//! Seasonal-decomposition forecaster
//!
//! The series is modeled as `trend(t) · (1 + seasonal(t))` where the trend is
//! piecewise linear with regularized change points and the seasonal part sums
//! yearly and weekly Fourier terms and one effect per named holiday. Both
//! parts are linear given the other, so the fit alternates between two ridge
//! least-squares solves. Intervals come from simulated trend changes and
//! observation noise drawn from a seeded generator, so identical input gives
//! identical output.

use crate::config::SeasonalConfig;
use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::holidays::HolidayCalendar;
use crate::models::{
    horizon_end, FittedModel, ForecastModel, ForecastPoint, Holdout, ModelVariant, HOLDOUT_DAYS,
};
use crate::utils::{days_since_epoch, future_dates};
use cash_math::fourier::{fourier_terms, WEEKLY_PERIOD, YEARLY_PERIOD};
use cash_math::linalg::solve_ridge;
use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp1, Poisson, StandardNormal};
use statrs::statistics::{Data, OrderStatistics, Statistics};

/// History shorter than this many days cannot pin down a yearly cycle
const MIN_YEARLY_SPAN_DAYS: i64 = 365;

/// Lower bound on the variance used to turn prior scales into ridge weights
const MIN_PRIOR_VARIANCE: f64 = 1e-4;

/// Ridge weight on the unregularized trend terms, enough to keep them solvable
const TREND_BASE_PENALTY: f64 = 1e-9;

/// Seasonal-decomposition forecasting model
#[derive(Debug, Clone)]
pub struct SeasonalDecomposition {
    /// Name of the model
    name: String,
    config: SeasonalConfig,
}

/// Seasonal-decomposition model fitted to one series
#[derive(Debug, Clone)]
pub struct FittedSeasonal {
    name: String,
    config: SeasonalConfig,
    start: NaiveDate,
    last_date: NaiveDate,
    span_days: f64,
    horizon: usize,
    /// Divisor applied to the series before fitting
    scale: f64,
    /// Change point locations in scaled time
    changepoints: Vec<f64>,
    /// `[intercept, slope, rate changes...]`
    trend_params: Vec<f64>,
    seasonal_params: Vec<f64>,
    holiday_names: Vec<String>,
    calendar: HolidayCalendar,
    /// Standard deviation of in-sample residuals, in scaled units
    sigma: f64,
    history: Vec<f64>,
    fitted: Vec<f64>,
    warnings: Vec<String>,
}

impl SeasonalDecomposition {
    pub fn new(config: SeasonalConfig) -> Self {
        Self {
            name: format!(
                "Seasonal Decomposition (yearly={}, weekly={}, multiplicative)",
                config.yearly_order, config.weekly_order
            ),
            config,
        }
    }
}

impl Default for SeasonalDecomposition {
    fn default() -> Self {
        Self::new(SeasonalConfig::default())
    }
}

/// Piecewise-linear trend design row for scaled time `t`
fn trend_row(t: f64, changepoints: &[f64]) -> Vec<f64> {
    let mut row = Vec::with_capacity(2 + changepoints.len());
    row.push(1.0);
    row.push(t);
    row.extend(changepoints.iter().map(|&s| (t - s).max(0.0)));
    row
}

/// Seasonal design row: yearly terms, weekly terms, then one indicator per holiday name
fn seasonal_row(
    date: NaiveDate,
    config: &SeasonalConfig,
    holiday_names: &[String],
    calendar: &HolidayCalendar,
) -> Result<Vec<f64>> {
    let day = days_since_epoch(date);
    let mut row = fourier_terms(day, YEARLY_PERIOD, config.yearly_order)?;
    row.extend(fourier_terms(day, WEEKLY_PERIOD, config.weekly_order)?);

    let today = calendar.on(date);
    row.extend(
        holiday_names
            .iter()
            .map(|name| if today.contains(name) { 1.0 } else { 0.0 }),
    );
    Ok(row)
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Evenly spaced change points over the first `range` share of the history rows
fn place_changepoints(times: &[f64], requested: usize, range: f64) -> Vec<f64> {
    let hist_size = ((times.len() as f64) * range).floor() as usize;
    let count = requested.min(hist_size.saturating_sub(1));
    if count == 0 {
        return Vec::new();
    }

    let last = (hist_size - 1) as f64;
    let mut points: Vec<f64> = (1..=count)
        .map(|j| times[(j as f64 * last / count as f64).round() as usize])
        .collect();
    points.dedup();
    points
}

impl ForecastModel for SeasonalDecomposition {
    type Fitted = FittedSeasonal;

    fn fit(&self, series: &TimeSeries, horizon: usize) -> Result<FittedSeasonal> {
        let (Some(start), Some(last_date)) = (series.first_date(), series.last_date()) else {
            return Err(ForecastError::EmptyInput(
                "Series has no observations".to_string(),
            ));
        };
        let config = &self.config;
        let mut warnings = Vec::new();

        let span = series.span_days();
        if span < MIN_YEARLY_SPAN_DAYS {
            let warning = format!(
                "History spans only {} days; yearly seasonality needs at least {} \
                 and may be unreliable",
                span, MIN_YEARLY_SPAN_DAYS
            );
            tracing::warn!("{}", warning);
            warnings.push(warning);
        }
        let span_days = span.max(1) as f64;

        let values = series.values();
        let scale = values
            .iter()
            .fold(0.0_f64, |acc, v| acc.max(v.abs()))
            .max(f64::MIN_POSITIVE);
        let scaled: Vec<f64> = values.iter().map(|v| v / scale).collect();
        let times: Vec<f64> = series
            .dates()
            .iter()
            .map(|d| (*d - start).num_days() as f64 / span_days)
            .collect();

        let last_forecast_date = horizon_end(last_date, horizon)?;
        let calendar = HolidayCalendar::for_region(
            config.region,
            &config.extra_holidays,
            start.year(),
            last_forecast_date.year(),
        );
        let holiday_names = calendar.names();

        let changepoints =
            place_changepoints(&times, config.changepoints, config.changepoint_range);
        let trend_rows: Vec<Vec<f64>> = times
            .iter()
            .map(|&t| trend_row(t, &changepoints))
            .collect();
        let seasonal_rows: Vec<Vec<f64>> = series
            .dates()
            .into_iter()
            .map(|d| seasonal_row(d, config, &holiday_names, &calendar))
            .collect::<Result<_>>()?;

        // Prior scales are relative to the variance of the scaled series
        let variance = scaled.iter().population_variance();
        let prior_variance = if variance.is_finite() {
            variance.max(MIN_PRIOR_VARIANCE)
        } else {
            MIN_PRIOR_VARIANCE
        };
        let mut trend_penalties = vec![TREND_BASE_PENALTY; 2];
        trend_penalties.extend(
            std::iter::repeat(prior_variance / config.changepoint_prior_scale.powi(2))
                .take(changepoints.len()),
        );
        let fourier_width = 2 * (config.yearly_order + config.weekly_order);
        let mut seasonal_penalties =
            vec![prior_variance / config.seasonality_prior_scale.powi(2); fourier_width];
        seasonal_penalties.extend(
            std::iter::repeat(prior_variance / config.holidays_prior_scale.powi(2))
                .take(holiday_names.len()),
        );

        let n = scaled.len();
        let mut multiplier = vec![0.0; n];
        let mut trend_params = vec![0.0; trend_penalties.len()];
        let mut seasonal_params = vec![0.0; seasonal_penalties.len()];

        for _ in 0..config.fit_iterations {
            // Trend given seasonality: y = (1 + s) · (A θ)
            let design: Vec<Vec<f64>> = trend_rows
                .iter()
                .zip(&multiplier)
                .map(|(row, s)| row.iter().map(|a| a * (1.0 + s)).collect())
                .collect();
            trend_params = solve_ridge(&design, &scaled, &trend_penalties)?;
            let trend: Vec<f64> = trend_rows.iter().map(|row| dot(row, &trend_params)).collect();

            if seasonal_penalties.is_empty() {
                break;
            }

            // Seasonality given trend: y - T = T · (X β)
            let design: Vec<Vec<f64>> = seasonal_rows
                .iter()
                .zip(&trend)
                .map(|(row, tr)| row.iter().map(|x| x * tr).collect())
                .collect();
            let remainder: Vec<f64> = scaled.iter().zip(&trend).map(|(y, tr)| y - tr).collect();
            seasonal_params = solve_ridge(&design, &remainder, &seasonal_penalties)?;
            multiplier = seasonal_rows
                .iter()
                .map(|row| dot(row, &seasonal_params))
                .collect();
        }

        if trend_params
            .iter()
            .chain(&seasonal_params)
            .any(|p| !p.is_finite())
        {
            return Err(ForecastError::FitFailure(
                "Seasonal decomposition produced non-finite coefficients".to_string(),
            ));
        }

        let fitted_scaled: Vec<f64> = trend_rows
            .iter()
            .zip(&multiplier)
            .map(|(row, s)| dot(row, &trend_params) * (1.0 + s))
            .collect();
        let residuals: Vec<f64> = scaled
            .iter()
            .zip(&fitted_scaled)
            .map(|(y, f)| y - f)
            .collect();
        let sigma = residuals.iter().std_dev();
        let sigma = if sigma.is_finite() { sigma } else { 0.0 };

        tracing::debug!(
            rows = n,
            changepoints = changepoints.len(),
            holidays = holiday_names.len(),
            sigma,
            "fitted seasonal decomposition"
        );

        Ok(FittedSeasonal {
            name: self.name.clone(),
            config: config.clone(),
            start,
            last_date,
            span_days,
            horizon,
            scale,
            changepoints,
            trend_params,
            seasonal_params,
            holiday_names,
            calendar,
            sigma,
            history: values,
            fitted: fitted_scaled.iter().map(|f| f * scale).collect(),
            warnings,
        })
    }

    fn variant(&self) -> ModelVariant {
        ModelVariant::Seasonal
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl FittedSeasonal {
    fn scaled_time(&self, date: NaiveDate) -> f64 {
        (date - self.start).num_days() as f64 / self.span_days
    }

    /// Trend level and seasonal multiplier at `date`, in scaled units
    fn components(&self, date: NaiveDate) -> Result<(f64, f64)> {
        let trend = dot(
            &trend_row(self.scaled_time(date), &self.changepoints),
            &self.trend_params,
        );
        let seasonal = dot(
            &seasonal_row(date, &self.config, &self.holiday_names, &self.calendar)?,
            &self.seasonal_params,
        );
        Ok((trend, seasonal))
    }

    /// Simulated values per future day (outer index: day, inner: path)
    fn simulate(&self, times: &[f64], components: &[(f64, f64)]) -> Result<Vec<Vec<f64>>> {
        let samples = self.config.uncertainty_samples;
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        let rate_changes = &self.trend_params[2..];
        let mean_abs_change = if rate_changes.is_empty() {
            0.0
        } else {
            rate_changes.iter().map(|d| d.abs()).sum::<f64>() / rate_changes.len() as f64
        };
        let t_end = times.last().copied().unwrap_or(1.0);
        // Change points keep arriving at the historical rate per unit of scaled time
        let expected_changes = self.changepoints.len() as f64 * (t_end - 1.0).max(0.0);
        let arrivals = if expected_changes > 0.0 && mean_abs_change > 0.0 {
            Some(Poisson::new(expected_changes).map_err(|e| {
                ForecastError::FitFailure(format!("Invalid change point rate: {}", e))
            })?)
        } else {
            None
        };

        let mut draws = vec![Vec::with_capacity(samples); times.len()];
        for _ in 0..samples {
            let count = match &arrivals {
                Some(poisson) => {
                    let draw: f64 = poisson.sample(&mut rng);
                    draw as usize
                }
                None => 0,
            };
            let changes: Vec<(f64, f64)> = (0..count)
                .map(|_| {
                    let at = rng.gen_range(1.0..=t_end);
                    let a: f64 = rng.sample(Exp1);
                    let b: f64 = rng.sample(Exp1);
                    (at, mean_abs_change * (a - b))
                })
                .collect();

            for (day, (&t, &(trend, seasonal))) in times.iter().zip(components).enumerate() {
                let shift: f64 = changes
                    .iter()
                    .map(|&(at, delta)| delta * (t - at).max(0.0))
                    .sum();
                let noise: f64 = rng.sample(StandardNormal);
                let value = (trend + shift) * (1.0 + seasonal) + self.sigma * noise;
                draws[day].push(value * self.scale);
            }
        }

        Ok(draws)
    }
}

impl FittedModel for FittedSeasonal {
    fn predict(&self) -> Result<Vec<ForecastPoint>> {
        let dates = future_dates(self.last_date, self.horizon)?;
        let times: Vec<f64> = dates.iter().map(|d| self.scaled_time(*d)).collect();
        let components: Vec<(f64, f64)> = dates
            .iter()
            .map(|d| self.components(*d))
            .collect::<Result<_>>()?;
        let draws = self.simulate(&times, &components)?;

        let lower_q = (1.0 - self.config.interval_width) / 2.0;
        let upper_q = (1.0 + self.config.interval_width) / 2.0;

        dates
            .into_iter()
            .zip(components)
            .zip(draws)
            .map(|((date, (trend, seasonal)), samples)| {
                let estimate = trend * (1.0 + seasonal) * self.scale;
                let mut data = Data::new(samples);
                let lower = data.quantile(lower_q);
                let upper = data.quantile(upper_q);
                if !(estimate.is_finite() && lower.is_finite() && upper.is_finite()) {
                    return Err(ForecastError::FitFailure(format!(
                        "Non-finite forecast on {}",
                        date
                    )));
                }
                Ok(ForecastPoint::with_bounds(date, estimate, lower, upper))
            })
            .collect()
    }

    fn holdout(&self) -> Holdout {
        let keep = HOLDOUT_DAYS.min(self.history.len());
        let from = self.history.len() - keep;
        Holdout {
            actuals: self.history[from..].to_vec(),
            predicted: self.fitted[from..].to_vec(),
        }
    }

    fn warnings(&self) -> &[String] {
        &self.warnings
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changepoints_stay_in_range() {
        let times: Vec<f64> = (0..100).map(|i| i as f64 / 99.0).collect();
        let points = place_changepoints(&times, 25, 0.8);

        assert_eq!(points.len(), 25);
        assert!(points.iter().all(|&t| t > 0.0 && t <= 0.8));
        assert!(points.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_changepoints_shrink_for_short_history() {
        let times: Vec<f64> = (0..5).map(|i| i as f64 / 4.0).collect();
        assert_eq!(place_changepoints(&times, 25, 0.8).len(), 3);
        assert!(place_changepoints(&times[..1], 25, 0.8).is_empty());
    }

    #[test]
    fn test_trend_row_hinges() {
        assert_eq!(trend_row(0.5, &[0.25, 0.75]), vec![1.0, 0.5, 0.25, 0.0]);
    }
}
