//! Command-line interface parsing for owm-forecast
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! the client configuration and target location used at startup. The API key
//! and base URL can also come from the `OWM_API_KEY` and `OWM_BASE_URL`
//! environment variables.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::data::weather::{DEFAULT_TIMEOUT_SECS, OPENWEATHERMAP_BASE_URL};
use crate::data::{find_city, load_cities, ApiVariant, CityError, ClientConfig, Units};

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The coordinate argument is not a number
    #[error("Invalid coordinate: '{0}' is not a number")]
    InvalidCoordinate(String),

    /// Latitude outside -90..=90
    #[error("Invalid latitude: {0} (must be between -90 and 90)")]
    LatitudeOutOfRange(f64),

    /// Longitude outside -180..=180
    #[error("Invalid longitude: {0} (must be between -180 and 180)")]
    LongitudeOutOfRange(f64),

    /// No API key on the command line or in the environment
    #[error("Missing API key: pass --api-key or set OWM_API_KEY")]
    MissingApiKey,

    /// Neither coordinates nor a city were given
    #[error("Missing location: pass --lat and --lon, or --city with --cities")]
    MissingLocation,

    /// The city is not in the city list
    #[error("Unknown city: '{0}'")]
    UnknownCity(String),

    /// The city list could not be loaded
    #[error(transparent)]
    Cities(#[from] CityError),
}

/// owm-forecast - Hourly and 5-day forecasts from OpenWeatherMap
#[derive(Parser, Debug)]
#[command(name = "owm-forecast")]
#[command(about = "Hourly and 5-day weather forecasts from OpenWeatherMap")]
#[command(version)]
pub struct Cli {
    /// Latitude of the location, in degrees
    #[arg(long, allow_negative_numbers = true, value_parser = parse_latitude, requires = "lon")]
    pub lat: Option<f64>,

    /// Longitude of the location, in degrees
    #[arg(long, allow_negative_numbers = true, value_parser = parse_longitude, requires = "lat")]
    pub lon: Option<f64>,

    /// City name or id to look up in the --cities file instead of --lat/--lon
    ///
    /// Examples:
    ///   owm-forecast --city London --cities cities.json
    ///   owm-forecast --city 6173331 --cities cities.json
    #[arg(long, requires = "cities", conflicts_with_all = ["lat", "lon"])]
    pub city: Option<String>,

    /// JSON file with an array of {id, name, country, lat, lon} objects
    #[arg(long, value_name = "FILE")]
    pub cities: Option<PathBuf>,

    /// Unit system: metric, imperial or standard
    #[arg(long, default_value = "metric")]
    pub units: Units,

    /// API variant: three-hour (5 day / 3 hour forecast) or one-call
    #[arg(long, default_value = "three-hour")]
    pub variant: ApiVariant,

    /// OpenWeatherMap API key
    #[arg(long, env = "OWM_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// API base URL
    #[arg(long, env = "OWM_BASE_URL", default_value = OPENWEATHERMAP_BASE_URL)]
    pub base_url: String,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Print the forecasts as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Parses and range-checks a latitude argument
pub fn parse_latitude(s: &str) -> Result<f64, ConfigError> {
    let value = parse_coordinate(s)?;
    if !(-90.0..=90.0).contains(&value) {
        return Err(ConfigError::LatitudeOutOfRange(value));
    }
    Ok(value)
}

/// Parses and range-checks a longitude argument
pub fn parse_longitude(s: &str) -> Result<f64, ConfigError> {
    let value = parse_coordinate(s)?;
    if !(-180.0..=180.0).contains(&value) {
        return Err(ConfigError::LongitudeOutOfRange(value));
    }
    Ok(value)
}

fn parse_coordinate(s: &str) -> Result<f64, ConfigError> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ConfigError::InvalidCoordinate(s.to_string()))
}

/// Where to fetch the forecast for
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    /// Display label, e.g. "London, United Kingdom"
    pub label: Option<String>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Settings for the API client
    pub client: ClientConfig,
    /// Location to fetch
    pub location: Location,
    /// Whether to print JSON
    pub json: bool,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with the client settings and resolved location
    /// * `Err(ConfigError)` if the API key is missing or the location can't be resolved
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let api_key = cli
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let client = ClientConfig::new(api_key)
            .with_base_url(cli.base_url.as_str())
            .with_units(cli.units)
            .with_variant(cli.variant)
            .with_timeout(Duration::from_secs(cli.timeout));

        Ok(StartupConfig {
            client,
            location: resolve_location(cli)?,
            json: cli.json,
        })
    }
}

/// Resolves the location from coordinates or a city lookup
pub fn resolve_location(cli: &Cli) -> Result<Location, ConfigError> {
    match (cli.lat, cli.lon, &cli.city, &cli.cities) {
        (Some(lat), Some(lon), _, _) => Ok(Location {
            lat,
            lon,
            label: None,
        }),
        (_, _, Some(query), Some(path)) => {
            let cities = load_cities(path)?;
            let city = find_city(&cities, query)
                .ok_or_else(|| ConfigError::UnknownCity(query.clone()))?;
            Ok(Location {
                lat: city.lat,
                lon: city.lon,
                label: Some(format!("{}, {}", city.name, city.country)),
            })
        }
        _ => Err(ConfigError::MissingLocation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["owm-forecast", "--api-key", "test-key"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_parse_latitude_valid() {
        assert_eq!(parse_latitude("49.2827").unwrap(), 49.2827);
        assert_eq!(parse_latitude("-90").unwrap(), -90.0);
        assert_eq!(parse_latitude(" 12.5 ").unwrap(), 12.5);
    }

    #[test]
    fn test_parse_latitude_out_of_range() {
        let err = parse_latitude("91").unwrap_err();
        assert!(matches!(err, ConfigError::LatitudeOutOfRange(_)));
        assert!(err.to_string().contains("Invalid latitude"));
    }

    #[test]
    fn test_parse_longitude_out_of_range() {
        assert!(matches!(
            parse_longitude("-180.5"),
            Err(ConfigError::LongitudeOutOfRange(_))
        ));
        assert_eq!(parse_longitude("180").unwrap(), 180.0);
    }

    #[test]
    fn test_parse_coordinate_rejects_garbage() {
        assert!(matches!(
            parse_latitude("north"),
            Err(ConfigError::InvalidCoordinate(_))
        ));
        assert!(parse_longitude("NaN").is_err());
        assert!(parse_longitude("inf").is_err());
    }

    #[test]
    fn test_cli_parse_coordinates_with_negative_longitude() {
        let cli = parse(&["--lat", "49.2827", "--lon", "-123.1207"]);
        assert_eq!(cli.lat, Some(49.2827));
        assert_eq!(cli.lon, Some(-123.1207));
        assert_eq!(cli.units, Units::Metric);
        assert_eq!(cli.variant, ApiVariant::ThreeHour);
        assert!(!cli.json);
    }

    #[test]
    fn test_cli_parse_units_and_variant() {
        let cli = parse(&[
            "--lat", "1", "--lon", "2", "--units", "imperial", "--variant", "one-call",
        ]);
        assert_eq!(cli.units, Units::Imperial);
        assert_eq!(cli.variant, ApiVariant::OneCall);
    }

    #[test]
    fn test_cli_rejects_lat_without_lon() {
        let result = Cli::try_parse_from(["owm-forecast", "--api-key", "k", "--lat", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_city_with_coordinates() {
        let result = Cli::try_parse_from([
            "owm-forecast", "--lat", "1", "--lon", "2", "--city", "London", "--cities", "c.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_units() {
        let result = Cli::try_parse_from([
            "owm-forecast", "--lat", "1", "--lon", "2", "--units", "kelvin",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_startup_config_from_cli_coordinates() {
        let cli = parse(&[
            "--lat", "49.2827", "--lon", "-123.1207", "--base-url", "http://localhost:9000/",
            "--timeout", "3", "--json",
        ]);
        let config = StartupConfig::from_cli(&cli).unwrap();

        assert_eq!(config.client.api_key, "test-key");
        assert_eq!(config.client.base_url, "http://localhost:9000");
        assert_eq!(config.client.timeout, Duration::from_secs(3));
        assert_eq!(
            config.location,
            Location {
                lat: 49.2827,
                lon: -123.1207,
                label: None
            }
        );
        assert!(config.json);
    }

    #[test]
    fn test_startup_config_requires_api_key() {
        let mut cli = parse(&["--lat", "1", "--lon", "2"]);
        cli.api_key = None;
        assert!(matches!(
            StartupConfig::from_cli(&cli),
            Err(ConfigError::MissingApiKey)
        ));

        cli.api_key = Some("   ".to_string());
        assert!(matches!(
            StartupConfig::from_cli(&cli),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn test_startup_config_requires_location() {
        let cli = parse(&[]);
        assert!(matches!(
            StartupConfig::from_cli(&cli),
            Err(ConfigError::MissingLocation)
        ));
    }

    #[test]
    fn test_resolve_location_from_city_file() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        write!(
            file,
            r#"[{{"id": "2643743", "name": "London", "country": "United Kingdom", "lat": 51.5085, "lon": -0.1257}}]"#
        )
        .expect("Failed to write temp file");
        let path = file.path().to_string_lossy().to_string();

        let cli = parse(&["--city", "london", "--cities", &path]);
        let location = resolve_location(&cli).unwrap();

        assert_eq!(location.lat, 51.5085);
        assert_eq!(location.lon, -0.1257);
        assert_eq!(location.label.as_deref(), Some("London, United Kingdom"));

        let cli = parse(&["--city", "Paris", "--cities", &path]);
        assert!(matches!(
            resolve_location(&cli),
            Err(ConfigError::UnknownCity(name)) if name == "Paris"
        ));
    }
}
