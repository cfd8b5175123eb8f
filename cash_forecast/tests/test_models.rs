use approx::assert_abs_diff_eq;
use cash_forecast::config::{EngineConfig, LagConfig, LagStrategy};
use cash_forecast::data::TimeSeries;
use cash_forecast::error::ErrorKind;
use cash_forecast::models::lag_regression::LagRegression;
use cash_forecast::models::{
    forecast, forecast_with_config, FittedModel, ForecastModel, ModelVariant, HOLDOUT_DAYS,
    MAX_HORIZON_DAYS,
};
use chrono::{Datelike, Days, Duration, NaiveDate, Weekday};
use rstest::rstest;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 3).unwrap()
}

fn daily_series<F: Fn(NaiveDate) -> f64>(days: i64, value: F) -> TimeSeries {
    TimeSeries::from_pairs((0..days).map(|i| {
        let d = start() + Duration::days(i);
        (d, value(d))
    }))
    .unwrap()
}

fn weekly_pattern(d: NaiveDate) -> f64 {
    match d.weekday() {
        Weekday::Sat | Weekday::Sun => -200.0,
        _ => -50.0,
    }
}

#[rstest]
#[case(ModelVariant::Seasonal, 1)]
#[case(ModelVariant::Seasonal, 30)]
#[case(ModelVariant::LagRegression, 1)]
#[case(ModelVariant::LagRegression, 45)]
fn test_horizon_is_contiguous(#[case] variant: ModelVariant, #[case] horizon: i64) {
    let series = daily_series(120, weekly_pattern);
    let result = forecast(&series, variant, horizon).unwrap();

    assert_eq!(result.model, variant);
    assert_eq!(result.horizon(), horizon as usize);

    let last = series.last_date().unwrap();
    for (offset, point) in result.points.iter().enumerate() {
        assert_eq!(point.date, last + Duration::days(offset as i64 + 1));
        assert!(point.point_estimate.is_finite());
    }
}

#[rstest]
#[case(ModelVariant::Seasonal)]
#[case(ModelVariant::LagRegression)]
fn test_thirty_rows_is_insufficient(#[case] variant: ModelVariant) {
    let series = daily_series(30, |_| -25.0);
    let err = forecast(&series, variant, 10).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientData);
}

#[rstest]
#[case(ModelVariant::Seasonal, 0)]
#[case(ModelVariant::LagRegression, 0)]
#[case(ModelVariant::Seasonal, -5)]
fn test_non_positive_horizon(#[case] variant: ModelVariant, #[case] horizon: i64) {
    // Too short to fit as well: the horizon check must come first
    let series = daily_series(5, |_| -25.0);
    let err = forecast(&series, variant, horizon).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidHorizon);
}

#[rstest]
#[case(ModelVariant::Seasonal, 200_000_000)]
#[case(ModelVariant::LagRegression, 200_000_000)]
#[case(ModelVariant::LagRegression, MAX_HORIZON_DAYS + 1)]
#[case(ModelVariant::Seasonal, i64::MAX)]
fn test_oversized_horizon(#[case] variant: ModelVariant, #[case] horizon: i64) {
    let series = daily_series(60, |_| -25.0);
    let err = forecast(&series, variant, horizon).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidHorizon);
}

#[test]
fn test_longest_horizon_is_accepted() {
    let series = daily_series(60, |_| -25.0);
    let result = forecast(&series, ModelVariant::LagRegression, MAX_HORIZON_DAYS).unwrap();
    assert_eq!(result.horizon(), MAX_HORIZON_DAYS as usize);
}

#[rstest]
#[case(ModelVariant::Seasonal)]
#[case(ModelVariant::LagRegression)]
fn test_horizon_past_calendar_end(#[case] variant: ModelVariant) {
    let first = NaiveDate::MAX - Days::new(60);
    let series =
        TimeSeries::from_pairs((0..40).map(|i| (first + Days::new(i), -25.0))).unwrap();

    let err = forecast(&series, variant, 30).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidHorizon);
}

#[test]
fn test_direct_fit_rejects_oversized_horizon() {
    let series = daily_series(60, |_| -25.0);
    let err = LagRegression::default().fit(&series, 200_000_000).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidHorizon);
}

#[test]
fn test_empty_series_is_rejected() {
    let err = forecast(&TimeSeries::default(), ModelVariant::LagRegression, 5).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyInput);
}

#[test]
fn test_flat_series_lag_regression() {
    let series = daily_series(400, |_| 100.0);
    let result = forecast(&series, ModelVariant::LagRegression, 30).unwrap();

    for point in &result.points {
        assert_abs_diff_eq!(point.point_estimate, 100.0, epsilon = 1e-6);
        assert!(!point.has_bounds());
    }
    assert_abs_diff_eq!(result.metrics.mae.unwrap(), 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(result.metrics.rmse.unwrap(), 0.0, epsilon = 1e-6);
    assert_eq!(result.metrics.holdout_actuals.len(), HOLDOUT_DAYS);
    assert_eq!(result.metrics.holdout_predicted.len(), HOLDOUT_DAYS);
}

#[test]
fn test_flat_series_seasonal() {
    let series = daily_series(400, |_| 100.0);
    let result = forecast(&series, ModelVariant::Seasonal, 14).unwrap();

    for point in &result.points {
        assert_abs_diff_eq!(point.point_estimate, 100.0, epsilon = 0.5);
        assert!(point.has_bounds());
    }
    assert!(result.metrics.mae.unwrap() < 0.5);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_thirty_one_rows_train_once() {
    let series = daily_series(31, |d| d.day() as f64);
    let fitted = LagRegression::default().fit(&series, 7).unwrap();

    assert_eq!(fitted.training_rows(), 1);

    let result = forecast(&series, ModelVariant::LagRegression, 7).unwrap();
    assert_eq!(result.horizon(), 7);
    assert!(result.metrics.mae.is_none());
    assert!(result.metrics.rmse.is_none());
    assert!(!result.metrics.warnings.is_empty());
}

#[test]
fn test_gaps_count_toward_lag_window() {
    // 31 observed rows spread over 61 calendar days
    let series = TimeSeries::from_pairs(
        (0..31).map(|i| (start() + Duration::days(2 * i), -10.0 - i as f64)),
    )
    .unwrap();
    let fitted = LagRegression::default().fit(&series, 3).unwrap();

    assert_eq!(fitted.training_rows(), 61 - 30);
}

#[test]
fn test_lag_regression_repeats_weekly_spike() {
    let series = daily_series(210, |d| {
        if d.weekday() == Weekday::Fri {
            -5000.0
        } else {
            -10.0
        }
    });
    let result = forecast(&series, ModelVariant::LagRegression, 14).unwrap();

    for point in &result.points {
        let expected = if point.date.weekday() == Weekday::Fri {
            -5000.0
        } else {
            -10.0
        };
        assert_abs_diff_eq!(point.point_estimate, expected, epsilon = 1e-3);
    }
}

#[test]
fn test_historical_tail_strategy() {
    let series = daily_series(200, weekly_pattern);
    let config = EngineConfig {
        lag: LagConfig {
            strategy: LagStrategy::HistoricalTail,
        },
        ..Default::default()
    };
    let result = forecast_with_config(&series, ModelVariant::LagRegression, 60, &config).unwrap();

    assert_eq!(result.horizon(), 60);
    assert!(result.points.iter().all(|p| p.point_estimate.is_finite()));
    assert_eq!(result.warnings.len(), 1);
}

#[test]
fn test_horizon_longer_than_training_rows_with_tail_lags() {
    let series = daily_series(40, weekly_pattern);
    let model = LagRegression::new(LagConfig {
        strategy: LagStrategy::HistoricalTail,
    });
    let fitted = model.fit(&series, 90).unwrap();

    assert_eq!(fitted.predict().unwrap().len(), 90);
}

#[test]
fn test_seasonal_captures_weekly_cycle() {
    let series = daily_series(730, weekly_pattern);
    let result = forecast(&series, ModelVariant::Seasonal, 28).unwrap();

    let mean = |weekend: bool| {
        let values: Vec<f64> = result
            .points
            .iter()
            .filter(|p| matches!(p.date.weekday(), Weekday::Sat | Weekday::Sun) == weekend)
            .map(|p| p.point_estimate)
            .collect();
        values.iter().sum::<f64>() / values.len() as f64
    };

    assert!(mean(true) < mean(false) - 100.0);
    for point in &result.points {
        assert!(point.lower_bound.unwrap() <= point.upper_bound.unwrap());
    }
}

#[test]
fn test_seasonal_warns_on_short_history() {
    let series = daily_series(90, weekly_pattern);
    let result = forecast(&series, ModelVariant::Seasonal, 10).unwrap();

    assert_eq!(result.horizon(), 10);
    assert!(result.warnings.iter().any(|w| w.contains("yearly")));
}

#[rstest]
#[case(ModelVariant::Seasonal)]
#[case(ModelVariant::LagRegression)]
fn test_forecast_is_deterministic(#[case] variant: ModelVariant) {
    let series = daily_series(400, |d| {
        weekly_pattern(d) - (d.ordinal() % 11) as f64 * 3.0
    });

    let first = forecast(&series, variant, 21).unwrap();
    let second = forecast(&series, variant, 21).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_model_variant_parsing() {
    assert_eq!("seasonal".parse::<ModelVariant>().unwrap(), ModelVariant::Seasonal);
    assert_eq!("prophet".parse::<ModelVariant>().unwrap(), ModelVariant::Seasonal);
    assert_eq!(
        "lag-regression".parse::<ModelVariant>().unwrap(),
        ModelVariant::LagRegression
    );
    assert!("arima".parse::<ModelVariant>().is_err());
}
