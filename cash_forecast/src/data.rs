//! Transaction ingestion and time series aggregation

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// A single dated transaction amount
///
/// Expenses are negative, income is positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: String,
}

impl Observation {
    pub fn new(date: NaiveDate, amount: Decimal, category: impl Into<String>) -> Self {
        Self {
            date,
            amount,
            category: category.into(),
        }
    }
}

/// One day of a [`TimeSeries`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Daily totals with unique dates in ascending order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "UncheckedSeries")]
pub struct TimeSeries {
    points: Vec<SeriesPoint>,
}

/// Wire form of a [`TimeSeries`], checked on the way in
#[derive(Deserialize)]
struct UncheckedSeries {
    points: Vec<SeriesPoint>,
}

impl TryFrom<UncheckedSeries> for TimeSeries {
    type Error = ForecastError;

    fn try_from(unchecked: UncheckedSeries) -> Result<Self> {
        Self::new(unchecked.points)
    }
}

impl TimeSeries {
    /// Create a series, checking that dates are strictly ascending and values finite
    pub fn new(points: Vec<SeriesPoint>) -> Result<Self> {
        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(ForecastError::DataError(format!(
                    "Series dates must be strictly ascending ({} followed by {})",
                    pair[0].date, pair[1].date
                )));
            }
        }
        if let Some(bad) = points.iter().find(|p| !p.value.is_finite()) {
            return Err(ForecastError::DataError(format!(
                "Non-finite total on {}",
                bad.date
            )));
        }

        Ok(Self { points })
    }

    /// Create a series from `(date, total)` pairs
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(date, value)| SeriesPoint { date, value })
                .collect(),
        )
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Number of calendar days between the first and last observation
    pub fn span_days(&self) -> i64 {
        match (self.first_date(), self.last_date()) {
            (Some(first), Some(last)) => (last - first).num_days(),
            _ => 0,
        }
    }

    /// Values on a contiguous daily grid from the first to the last date,
    /// with days that have no observation contributing zero
    pub fn daily_grid(&self) -> Vec<f64> {
        let Some(first) = self.first_date() else {
            return Vec::new();
        };

        let mut grid = vec![0.0; self.span_days() as usize + 1];
        for point in &self.points {
            grid[(point.date - first).num_days() as usize] = point.value;
        }
        grid
    }
}

fn decimal_to_f64(date: NaiveDate, amount: Decimal) -> Result<f64> {
    amount.to_f64().ok_or_else(|| {
        ForecastError::DataError(format!("Total {} on {} is not representable", amount, date))
    })
}

fn series_from_totals(totals: BTreeMap<NaiveDate, Decimal>) -> Result<TimeSeries> {
    let points = totals
        .into_iter()
        .map(|(date, total)| {
            Ok(SeriesPoint {
                date,
                value: decimal_to_f64(date, total)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    TimeSeries::new(points)
}

/// Add `amount` into a running total, failing instead of overflowing
pub(crate) fn accumulate(total: &mut Decimal, amount: Decimal, bucket: &dyn Display) -> Result<()> {
    *total = total.checked_add(amount).ok_or_else(|| {
        ForecastError::DataError(format!("Total for {} overflows a decimal amount", bucket))
    })?;
    Ok(())
}

/// Collapse observations into one series of per-day totals
pub fn aggregate(observations: &[Observation]) -> Result<TimeSeries> {
    if observations.is_empty() {
        return Err(ForecastError::EmptyInput(
            "No observations supplied; a forecast needs at least some history".to_string(),
        ));
    }

    let mut totals: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for obs in observations {
        let total = totals.entry(obs.date).or_insert(Decimal::ZERO);
        accumulate(total, obs.amount, &obs.date)?;
    }

    series_from_totals(totals)
}

/// Collapse observations into one series of per-day totals for each category
pub fn aggregate_by_category(
    observations: &[Observation],
) -> Result<BTreeMap<String, TimeSeries>> {
    if observations.is_empty() {
        return Err(ForecastError::EmptyInput(
            "No observations supplied for category analysis".to_string(),
        ));
    }

    let mut totals: BTreeMap<String, BTreeMap<NaiveDate, Decimal>> = BTreeMap::new();
    for obs in observations {
        let total = totals
            .entry(obs.category.clone())
            .or_default()
            .entry(obs.date)
            .or_insert(Decimal::ZERO);
        accumulate(total, obs.amount, &format_args!("{} on {}", obs.category, obs.date))?;
    }

    totals
        .into_iter()
        .map(|(category, by_date)| Ok((category, series_from_totals(by_date)?)))
        .collect()
}

/// Raw CSV row; the amount is kept as text so it parses as an exact decimal
#[derive(Debug, Deserialize)]
struct CsvRecord {
    date: String,
    amount: String,
    #[serde(default)]
    category: Option<String>,
}

/// Loader for transaction history files
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load observations from a CSV file with `date,amount,category` columns
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Observation>> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load observations from any CSV source with `date,amount,category` columns
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Observation>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut observations = Vec::new();
        for (index, record) in csv_reader.deserialize::<CsvRecord>().enumerate() {
            let record = record?;
            // Header is line 1
            let line = index + 2;

            let date = NaiveDate::parse_from_str(&record.date, "%Y-%m-%d").map_err(|e| {
                ForecastError::DataError(format!(
                    "Invalid date '{}' on line {}, expected YYYY-MM-DD: {}",
                    record.date, line, e
                ))
            })?;
            let amount = Decimal::from_str(&record.amount).map_err(|e| {
                ForecastError::DataError(format!(
                    "Invalid amount '{}' on line {}: {}",
                    record.amount, line, e
                ))
            })?;
            let category = record
                .category
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "Uncategorized".to_string());

            observations.push(Observation {
                date,
                amount,
                category,
            });
        }

        Ok(observations)
    }
}
