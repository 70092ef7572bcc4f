//! owm-forecast - Hourly and 5-day forecasts from OpenWeatherMap
//!
//! Fetches one forecast for the requested location and prints either a
//! plain-text table or the aggregated JSON.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use owm_forecast::cli::{Cli, StartupConfig};
use owm_forecast::display::render_forecasts;
use owm_forecast::service::ForecastService;

/// Sets up logging to stderr, filtered by `RUST_LOG` (default: warn)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = StartupConfig::from_cli(cli)?;
    let units = config.client.units;
    let location = config.location;

    let mut service = ForecastService::from_config(config.client)?;
    let forecasts = service
        .get_weather_forecasts(location.lat, location.lon, true)
        .await?;

    if config.json {
        println!("{}", serde_json::to_string_pretty(forecasts.as_ref())?);
    } else {
        print!(
            "{}",
            render_forecasts(
                &forecasts,
                units,
                location.lat,
                location.lon,
                location.label.as_deref(),
            )?
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
