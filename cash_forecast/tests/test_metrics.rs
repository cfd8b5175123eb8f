use approx::assert_abs_diff_eq;
use cash_forecast::metrics::{validate, VALIDATION_SCOPE};
use cash_forecast::models::HOLDOUT_DAYS;

#[test]
fn test_holdout_errors() {
    let actuals: Vec<f64> = (0..HOLDOUT_DAYS).map(|i| -(i as f64)).collect();
    // Alternating misses of +2 and -2, plus one miss of 10
    let mut predicted: Vec<f64> = actuals
        .iter()
        .enumerate()
        .map(|(i, a)| if i % 2 == 0 { a + 2.0 } else { a - 2.0 })
        .collect();
    predicted[0] = actuals[0] + 10.0;

    let metrics = validate(&actuals, &predicted);

    let expected_mae = (29.0 * 2.0 + 10.0) / 30.0;
    let expected_rmse = ((29.0 * 4.0 + 100.0) / 30.0_f64).sqrt();
    assert_abs_diff_eq!(metrics.mae.unwrap(), expected_mae, epsilon = 1e-9);
    assert_abs_diff_eq!(metrics.rmse.unwrap(), expected_rmse, epsilon = 1e-9);
    assert!(metrics.rmse.unwrap() >= metrics.mae.unwrap());
    assert!(metrics.is_defined());
    assert!(metrics.warnings.is_empty());
    assert_eq!(metrics.scope, VALIDATION_SCOPE);
}

#[test]
fn test_perfect_holdout() {
    let actuals = vec![-42.0; HOLDOUT_DAYS];
    let metrics = validate(&actuals, &actuals);

    assert_eq!(metrics.mae, Some(0.0));
    assert_eq!(metrics.rmse, Some(0.0));
}

#[test]
fn test_short_holdout_is_undefined() {
    let actuals = vec![1.0, 2.0, 3.0];
    let predicted = vec![1.5, 2.5, 3.5];
    let metrics = validate(&actuals, &predicted);

    assert_eq!(metrics.mae, None);
    assert_eq!(metrics.rmse, None);
    assert_eq!(metrics.holdout_actuals, actuals);
    assert_eq!(metrics.holdout_predicted, predicted);
    assert_eq!(metrics.warnings.len(), 1);
    assert!(metrics.warnings[0].contains("3 of 30"));
}

#[test]
fn test_undefined_serializes_as_null() {
    let metrics = validate(&[1.0], &[1.0]);
    let json = serde_json::to_value(&metrics).unwrap();

    assert!(json["mae"].is_null());
    assert!(json["rmse"].is_null());
}

#[test]
fn test_display_mentions_scope() {
    let metrics = validate(&vec![0.0; HOLDOUT_DAYS], &vec![1.0; HOLDOUT_DAYS]);
    let text = metrics.to_string();

    assert!(text.contains("MAE:  1.0000"));
    assert!(text.contains("not a guarantee"));
}
