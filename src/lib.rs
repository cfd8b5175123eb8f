//! # Cashflow
//!
//! Umbrella crate for the cash-flow forecasting workspace. It re-exports the
//! forecasting engine ([`forecast`]) and its numerical building blocks
//! ([`math`]).
//!
//! ## Example
//!
//! ```
//! use cashflow_workspace::forecast::{forecast, ModelVariant, TimeSeries};
//! use chrono::{Duration, NaiveDate};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let series =
//!     TimeSeries::from_pairs((0..60).map(|i| (start + Duration::days(i), -25.0))).unwrap();
//!
//! let result = forecast(&series, ModelVariant::LagRegression, 7).unwrap();
//! assert_eq!(result.horizon(), 7);
//! assert_eq!(result.points[0].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
//! ```

pub use cash_forecast as forecast;
pub use cash_math as math;

/// Version of the engine crate
pub const ENGINE_VERSION: &str = cash_forecast::VERSION;
