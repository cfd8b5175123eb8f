//! # Cash Forecast
//!
//! Short-horizon cash-flow forecasting and threshold alerts over a user's
//! transaction history.
//!
//! ## Features
//!
//! - Aggregation of dated transactions into daily series (overall and per category)
//! - Two forecasting models behind one interface:
//!   - Seasonal decomposition (trend × yearly/weekly/holiday effects) with uncertainty bounds
//!   - Lag regression over calendar trend and 1/7/30-day lags
//! - Holdout validation (MAE, RMSE) over the most recent 30 observed days
//! - Daily, rolling-weekly and running-balance alerts
//! - Spending breakdowns by category, period and weekday
//!
//! Every call is a pure function of its input and configuration: no state is
//! kept between forecasts and the seasonal model's simulations are seeded.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cash_forecast::{
//!     aggregate, evaluate_alerts, forecast, AlertThresholds, DataLoader, ModelVariant,
//! };
//!
//! let observations = DataLoader::from_csv("transactions.csv")?;
//! let series = aggregate(&observations)?;
//!
//! let result = forecast(&series, ModelVariant::LagRegression, 30)?;
//! println!("MAE over the holdout window: {:?}", result.metrics.mae);
//!
//! let thresholds = AlertThresholds {
//!     daily_spending: Some(200.0),
//!     weekly_spending: Some(1000.0),
//!     negative_balance: true,
//!     ..Default::default()
//! };
//! for alert in evaluate_alerts(&result, &thresholds).triggered {
//!     println!("{}", alert);
//! }
//! # Ok::<(), cash_forecast::ForecastError>(())
//! ```

pub mod alerts;
pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod holidays;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod utils;

// Re-export commonly used types
pub use crate::alerts::{evaluate_alerts, AlertResult, AlertThresholds};
pub use crate::config::{EngineConfig, LagStrategy};
pub use crate::data::{aggregate, aggregate_by_category, DataLoader, Observation, TimeSeries};
pub use crate::error::{ErrorKind, ForecastError};
pub use crate::metrics::ValidationMetrics;
pub use crate::models::{
    forecast, forecast_with_config, ForecastPoint, ForecastResult, ModelVariant,
};
pub use crate::pipeline::{run_forecast, ForecastReport, ForecastRequest};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
