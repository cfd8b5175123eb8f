//! Utility functions for the cash_forecast crate

use crate::error::{ForecastError, Result};
use chrono::{Datelike, Days, NaiveDate};

/// `num_days_from_ce` of 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Calendar days following `last_date`, one per horizon step
pub fn future_dates(last_date: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>> {
    let mut dates = Vec::with_capacity(horizon);
    let mut current = last_date;

    for _ in 0..horizon {
        current = current.checked_add_days(Days::new(1)).ok_or_else(|| {
            ForecastError::InvalidHorizon(format!(
                "Forecast dates run past the supported calendar after {}",
                current
            ))
        })?;
        dates.push(current);
    }

    Ok(dates)
}

/// Days elapsed since 1970-01-01
pub fn days_since_epoch(date: NaiveDate) -> f64 {
    (date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE) as f64
}
