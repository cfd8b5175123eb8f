use cash_forecast::data::{aggregate, aggregate_by_category, DataLoader, Observation, TimeSeries};
use cash_forecast::error::ErrorKind;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use std::io::Write;
use std::str::FromStr;
use tempfile::NamedTempFile;

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn obs(d: &str, amount: &str, category: &str) -> Observation {
    Observation::new(date(d), Decimal::from_str(amount).unwrap(), category)
}

fn cents(values: &[f64]) -> Vec<i64> {
    values.iter().map(|v| (v * 100.0).round() as i64).collect()
}

fn create_observations() -> Vec<Observation> {
    vec![
        obs("2024-01-03", "-12.50", "Dining"),
        obs("2024-01-01", "-40.00", "Groceries"),
        obs("2024-01-03", "-7.25", "Groceries"),
        obs("2024-01-02", "2500.00", "Salary"),
        obs("2024-01-01", "-0.10", "Dining"),
        obs("2024-01-01", "-0.20", "Dining"),
    ]
}

#[test]
fn test_aggregate_sums_per_date_in_order() {
    let series = aggregate(&create_observations()).unwrap();

    assert_eq!(
        series.dates(),
        vec![date("2024-01-01"), date("2024-01-02"), date("2024-01-03")]
    );
    assert_eq!(cents(&series.values()), vec![-4030, 250000, -1975]);
}

#[test]
fn test_aggregate_dates_strictly_ascending() {
    let mut observations = Vec::new();
    for i in (0..60).rev() {
        let d = date("2024-03-01") + chrono::Duration::days(i % 17);
        observations.push(Observation::new(d, Decimal::new(i, 0), "Misc"));
    }

    let series = aggregate(&observations).unwrap();
    assert_eq!(series.len(), 17);
    assert!(series.points().windows(2).all(|w| w[0].date < w[1].date));

    let total: f64 = series.values().iter().sum();
    assert_eq!(total, (0..60).sum::<i64>() as f64);
}

#[test]
fn test_aggregate_by_category() {
    let by_category = aggregate_by_category(&create_observations()).unwrap();

    assert_eq!(
        by_category.keys().cloned().collect::<Vec<_>>(),
        vec!["Dining", "Groceries", "Salary"]
    );
    let dining = &by_category["Dining"];
    assert_eq!(dining.dates(), vec![date("2024-01-01"), date("2024-01-03")]);
    assert_eq!(cents(&dining.values()), vec![-30, -1250]);
}

#[test]
fn test_empty_input_is_rejected() {
    let err = aggregate(&[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyInput);

    let err = aggregate_by_category(&[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyInput);
}

#[test]
fn test_time_series_rejects_unsorted_dates() {
    let result = TimeSeries::from_pairs(vec![(date("2024-01-02"), 1.0), (date("2024-01-01"), 2.0)]);
    assert!(result.is_err());

    let result = TimeSeries::from_pairs(vec![(date("2024-01-01"), 1.0), (date("2024-01-01"), 2.0)]);
    assert!(result.is_err());
}

#[test]
fn test_daily_grid_fills_gaps_with_zero() {
    let series = TimeSeries::from_pairs(vec![
        (date("2024-01-01"), 5.0),
        (date("2024-01-04"), -3.0),
    ])
    .unwrap();

    assert_eq!(series.span_days(), 3);
    assert_eq!(series.daily_grid(), vec![5.0, 0.0, 0.0, -3.0]);
}

#[test]
fn test_load_csv() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,amount,category").unwrap();
    writeln!(file, "2024-01-01,-12.34,Dining").unwrap();
    writeln!(file, "2024-01-02, 1500.00 ,Salary").unwrap();
    writeln!(file, "2024-01-02,-0.1,").unwrap();

    let observations = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(observations.len(), 3);
    assert_eq!(observations[0], obs("2024-01-01", "-12.34", "Dining"));
    assert_eq!(observations[1].amount, Decimal::from_str("1500.00").unwrap());
    assert_eq!(observations[2].category, "Uncategorized");
}

#[test]
fn test_load_csv_reports_bad_rows() {
    let csv = "date,amount,category\n2024-13-01,-1.00,Dining\n";
    let err = DataLoader::from_reader(csv.as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Data);
    assert!(err.to_string().contains("line 2"));

    let csv = "date,amount,category\n2024-01-01,lots,Dining\n";
    let err = DataLoader::from_reader(csv.as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Data);
}

#[test]
fn test_overflowing_daily_total_is_an_error() {
    let d = date("2024-01-01");
    let observations = vec![
        Observation::new(d, Decimal::MAX, "Windfall"),
        Observation::new(d, Decimal::MAX, "Windfall"),
    ];

    let err = aggregate(&observations).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Data);
    assert!(err.to_string().contains("2024-01-01"));

    let err = aggregate_by_category(&observations).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Data);
    assert!(err.to_string().contains("Windfall"));
}

#[test]
fn test_deserialized_series_is_checked() {
    let unsorted = r#"{"points":[
        {"date":"2024-02-01","value":-10.0},
        {"date":"2024-01-01","value":-20.0}
    ]}"#;
    assert!(serde_json::from_str::<TimeSeries>(unsorted).is_err());

    let duplicated = r#"{"points":[
        {"date":"2024-01-01","value":-10.0},
        {"date":"2024-01-01","value":-20.0}
    ]}"#;
    assert!(serde_json::from_str::<TimeSeries>(duplicated).is_err());

    let sorted = r#"{"points":[
        {"date":"2024-01-01","value":-20.0},
        {"date":"2024-01-03","value":-10.0}
    ]}"#;
    let series: TimeSeries = serde_json::from_str(sorted).unwrap();
    assert_eq!(series.daily_grid(), vec![-20.0, 0.0, -10.0]);
    let round_trip: TimeSeries =
        serde_json::from_str(&serde_json::to_string(&series).unwrap()).unwrap();
    assert_eq!(round_trip, series);
}

#[test]
fn test_load_csv_missing_file() {
    let err = DataLoader::from_csv("/nonexistent/transactions.csv").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}
