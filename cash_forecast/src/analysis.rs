//! Spending breakdowns by category, calendar period and weekday

use crate::data::{accumulate, Observation};
use crate::error::{ForecastError, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Calendar bucket used by [`spending_by_period`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    #[default]
    Monthly,
}

impl FromStr for Period {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "daily" | "day" | "d" => Ok(Period::Daily),
            "weekly" | "week" | "w" => Ok(Period::Weekly),
            "monthly" | "month" | "m" => Ok(Period::Monthly),
            other => Err(ForecastError::InvalidParameter(format!(
                "Unsupported period: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
    pub transactions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotal {
    /// `YYYY-MM-DD`, ISO `YYYY-Www` or `YYYY-MM`, depending on the period
    pub period: String,
    /// First calendar day of the bucket
    pub start: NaiveDate,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayTotal {
    pub weekday: Weekday,
    pub total: Decimal,
}

/// All breakdowns for one set of observations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingAnalysis {
    pub by_category: Vec<CategoryTotal>,
    pub by_period: Vec<PeriodTotal>,
    pub by_weekday: Vec<WeekdayTotal>,
}

fn require_observations(observations: &[Observation]) -> Result<()> {
    if observations.is_empty() {
        return Err(ForecastError::EmptyInput(
            "No observations supplied for spending analysis".to_string(),
        ));
    }
    Ok(())
}

/// Net totals per category, sorted by category name
pub fn spending_by_category(observations: &[Observation]) -> Result<Vec<CategoryTotal>> {
    require_observations(observations)?;

    let mut totals: BTreeMap<&str, (Decimal, usize)> = BTreeMap::new();
    for obs in observations {
        let entry = totals.entry(obs.category.as_str()).or_insert((Decimal::ZERO, 0));
        accumulate(&mut entry.0, obs.amount, &obs.category)?;
        entry.1 += 1;
    }

    Ok(totals
        .into_iter()
        .map(|(category, (total, transactions))| CategoryTotal {
            category: category.to_string(),
            total,
            transactions,
        })
        .collect())
}

fn bucket(date: NaiveDate, period: Period) -> (NaiveDate, String) {
    match period {
        Period::Daily => (date, date.format("%Y-%m-%d").to_string()),
        Period::Weekly => {
            let week = date.iso_week();
            let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
            (monday, format!("{}-W{:02}", week.year(), week.week()))
        }
        Period::Monthly => {
            let first = date.with_day(1).unwrap_or(date);
            (first, date.format("%Y-%m").to_string())
        }
    }
}

/// Net totals per calendar period, in date order
pub fn spending_by_period(
    observations: &[Observation],
    period: Period,
) -> Result<Vec<PeriodTotal>> {
    require_observations(observations)?;

    let mut totals: BTreeMap<NaiveDate, (String, Decimal)> = BTreeMap::new();
    for obs in observations {
        let (start, label) = bucket(obs.date, period);
        let entry = totals.entry(start).or_insert((label, Decimal::ZERO));
        accumulate(&mut entry.1, obs.amount, &entry.0)?;
    }

    Ok(totals
        .into_iter()
        .map(|(start, (period, total))| PeriodTotal {
            period,
            start,
            total,
        })
        .collect())
}

/// Net totals per weekday, Monday through Sunday
pub fn spending_by_weekday(observations: &[Observation]) -> Result<Vec<WeekdayTotal>> {
    require_observations(observations)?;

    let mut totals = [Decimal::ZERO; 7];
    for obs in observations {
        let weekday = obs.date.weekday();
        accumulate(
            &mut totals[weekday.num_days_from_monday() as usize],
            obs.amount,
            &weekday,
        )?;
    }

    let mut weekday = Weekday::Mon;
    let mut result = Vec::with_capacity(7);
    for total in totals {
        result.push(WeekdayTotal { weekday, total });
        weekday = weekday.succ();
    }
    Ok(result)
}

/// Category, period and weekday breakdowns together
pub fn analyze_spending(observations: &[Observation], period: Period) -> Result<SpendingAnalysis> {
    Ok(SpendingAnalysis {
        by_category: spending_by_category(observations)?,
        by_period: spending_by_period(observations, period)?,
        by_weekday: spending_by_weekday(observations)?,
    })
}
