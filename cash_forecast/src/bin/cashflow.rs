use anyhow::{Context, Result};
use cash_forecast::analysis::{analyze_spending, Period};
use cash_forecast::pipeline::{run_forecast, ForecastRequest, DEFAULT_HORIZON_DAYS};
use cash_forecast::{DataLoader, EngineConfig, ModelVariant};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "cashflow", version, about = "Cash-flow forecasts and spending alerts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Forecast daily net cash flow and check alert thresholds
    Forecast {
        /// CSV file with date,amount,category columns
        #[arg(long)]
        transactions: PathBuf,
        /// TOML engine configuration (model settings and alert thresholds)
        #[arg(long)]
        config: Option<PathBuf>,
        /// seasonal or lag-regression
        #[arg(long, default_value = "seasonal")]
        model: String,
        /// Number of days to forecast
        #[arg(long, default_value_t = DEFAULT_HORIZON_DAYS)]
        days: i64,
    },
    /// Break spending down by category, period and weekday
    Analyze {
        /// CSV file with date,amount,category columns
        #[arg(long)]
        transactions: PathBuf,
        /// daily, weekly or monthly
        #[arg(long, default_value = "monthly")]
        period: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Forecast {
            transactions,
            config,
            model,
            days,
        } => {
            let config = match config {
                Some(path) => EngineConfig::load(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => EngineConfig::default(),
            };
            let observations = DataLoader::from_csv(&transactions)
                .with_context(|| format!("Failed to read {}", transactions.display()))?;
            let request = ForecastRequest {
                model: model.parse::<ModelVariant>()?,
                days,
                alert_thresholds: config.alerts.clone(),
            };

            let report = run_forecast(&observations, &request, &config)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Analyze {
            transactions,
            period,
        } => {
            let observations = DataLoader::from_csv(&transactions)
                .with_context(|| format!("Failed to read {}", transactions.display()))?;
            let analysis = analyze_spending(&observations, period.parse::<Period>()?)?;
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        }
    }

    Ok(())
}
