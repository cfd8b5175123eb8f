//! Rule-based regional holiday calendars
//!
//! The seasonal model treats each named holiday as its own multiplicative
//! effect. Calendars are resolved from a region tag plus any user-supplied
//! dates, so nothing about a particular country is baked into the model.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Region whose public holidays feed the seasonal model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolidayRegion {
    /// No regional holidays
    None,
    /// United States federal holidays
    #[default]
    Us,
    /// Bank holidays of England and Wales
    Uk,
}

/// A one-off dated holiday supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomHoliday {
    pub name: String,
    pub date: NaiveDate,
}

/// Holiday dates for a span of years
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HolidayCalendar {
    by_date: BTreeMap<NaiveDate, Vec<String>>,
}

impl HolidayCalendar {
    /// Resolve the holidays of `region` for every year in `from_year..=to_year`,
    /// merged with `extra` dates falling anywhere
    pub fn for_region(
        region: HolidayRegion,
        extra: &[CustomHoliday],
        from_year: i32,
        to_year: i32,
    ) -> Self {
        let mut calendar = Self::default();

        for year in from_year..=to_year {
            let rules = match region {
                HolidayRegion::None => Vec::new(),
                HolidayRegion::Us => us_holidays(year),
                HolidayRegion::Uk => uk_holidays(year),
            };
            for (name, date) in rules {
                calendar.insert(date, name.to_string());
            }
        }

        for holiday in extra {
            calendar.insert(holiday.date, holiday.name.clone());
        }

        calendar
    }

    fn insert(&mut self, date: NaiveDate, name: String) {
        let names = self.by_date.entry(date).or_default();
        if !names.contains(&name) {
            names.push(name);
        }
    }

    /// Names of the holidays falling on `date`
    pub fn on(&self, date: NaiveDate) -> &[String] {
        self.by_date.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every distinct holiday name, sorted
    pub fn names(&self) -> Vec<String> {
        self.by_date
            .values()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_date.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}

fn ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u8) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
}

fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        ymd(year + 1, 1, 1)?
    } else {
        ymd(year, month + 1, 1)?
    };
    let mut day = first_of_next - Duration::days(1);
    while day.weekday() != weekday {
        day -= Duration::days(1);
    }
    Some(day)
}

/// Gregorian Easter Sunday (anonymous Gregorian algorithm)
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    ymd(year, month as u32, day as u32)
}

fn us_holidays(year: i32) -> Vec<(&'static str, NaiveDate)> {
    let candidates = [
        ("New Year's Day", ymd(year, 1, 1)),
        (
            "Martin Luther King Jr. Day",
            nth_weekday(year, 1, Weekday::Mon, 3),
        ),
        ("Washington's Birthday", nth_weekday(year, 2, Weekday::Mon, 3)),
        ("Memorial Day", last_weekday(year, 5, Weekday::Mon)),
        (
            "Juneteenth National Independence Day",
            if year >= 2021 { ymd(year, 6, 19) } else { None },
        ),
        ("Independence Day", ymd(year, 7, 4)),
        ("Labor Day", nth_weekday(year, 9, Weekday::Mon, 1)),
        ("Columbus Day", nth_weekday(year, 10, Weekday::Mon, 2)),
        ("Veterans Day", ymd(year, 11, 11)),
        ("Thanksgiving", nth_weekday(year, 11, Weekday::Thu, 4)),
        ("Christmas Day", ymd(year, 12, 25)),
    ];

    candidates
        .into_iter()
        .filter_map(|(name, date)| date.map(|d| (name, d)))
        .collect()
}

fn uk_holidays(year: i32) -> Vec<(&'static str, NaiveDate)> {
    let easter = easter_sunday(year);
    let candidates = [
        ("New Year's Day", ymd(year, 1, 1)),
        ("Good Friday", easter.map(|d| d - Duration::days(2))),
        ("Easter Monday", easter.map(|d| d + Duration::days(1))),
        (
            "Early May Bank Holiday",
            nth_weekday(year, 5, Weekday::Mon, 1),
        ),
        ("Spring Bank Holiday", last_weekday(year, 5, Weekday::Mon)),
        ("Summer Bank Holiday", last_weekday(year, 8, Weekday::Mon)),
        ("Christmas Day", ymd(year, 12, 25)),
        ("Boxing Day", ymd(year, 12, 26)),
    ];

    candidates
        .into_iter()
        .filter_map(|(name, date)| date.map(|d| (name, d)))
        .collect()
}
