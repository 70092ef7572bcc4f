//! Plain-text rendering of forecasts for the terminal

use std::fmt::{self, Write};

use crate::data::{Forecasts, Units};

/// Renders forecasts as a small two-section table
///
/// Times are shown in UTC. `label` replaces the raw coordinates in the
/// heading when present.
pub fn render_forecasts(
    forecasts: &Forecasts,
    units: Units,
    lat: f64,
    lon: f64,
    label: Option<&str>,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let place = match label {
        Some(label) => format!("{} ({:.4}, {:.4})", label, lat, lon),
        None => format!("{:.4}, {:.4}", lat, lon),
    };
    writeln!(out, "Forecast for {}", place)?;

    if forecasts.is_empty() {
        writeln!(out, "\nNo forecast data available")?;
        return Ok(out);
    }

    let symbol = units.temperature_symbol();

    writeln!(out, "\nNext hours")?;
    for point in &forecasts.hourly_forecast {
        let when = point
            .time()
            .map(|t| t.format("%a %d %b %H:%M").to_string())
            .unwrap_or_else(|| point.dt.to_string());
        writeln!(
            out,
            "  {:<18} {:>7.1}{:<2}  {:>3}%  {}",
            when, point.temp, symbol, point.humidity, point.icon
        )?;
    }

    writeln!(out, "\nNext days")?;
    for day in &forecasts.daily_forecast {
        let when = day
            .time()
            .map(|t| t.format("%a %d %b").to_string())
            .unwrap_or_else(|| day.dt.to_string());
        writeln!(
            out,
            "  {:<12} {:>6.1}{} / {:>5.1}{}  {:<4} {}",
            when, day.temp_min, symbol, day.temp_max, symbol, day.icon, day.summary
        )?;
    }

    Ok(out)
}
