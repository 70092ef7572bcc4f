//! Core data models for owm-forecast
//!
//! This module contains the simplified forecast types handed to callers, plus
//! the unit and API variant selectors used when talking to OpenWeatherMap.

pub mod aggregate;
pub mod city;
pub mod weather;

pub use aggregate::{aggregate, DayBucket};
pub use city::{find_city, load_cities, City, CityError};
pub use weather::{ClientConfig, FetchError, RawForecast, WeatherClient};

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One near-term forecast point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPoint {
    /// Forecast time as Unix epoch seconds
    pub dt: i64,
    /// Temperature in the requested units
    pub temp: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// OpenWeatherMap icon code, e.g. "10d"
    pub icon: String,
}

impl HourlyPoint {
    /// Forecast time as a UTC timestamp, if `dt` is in range
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.dt, 0)
    }
}

/// One day of the 5-day summary forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    /// Timestamp of the sample chosen to represent the day
    pub dt: i64,
    /// Textual description, e.g. "light rain"
    pub summary: String,
    /// OpenWeatherMap icon code of the representative sample
    pub icon: String,
    /// Lowest temperature seen across the whole day
    pub temp_min: f64,
    /// Highest temperature seen across the whole day
    pub temp_max: f64,
}

impl DailySummary {
    /// Representative time as a UTC timestamp, if `dt` is in range
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.dt, 0)
    }
}

/// Hourly and daily forecasts for one location
///
/// Serializes as `{"hourlyForecast": [...], "dailyForecast": [...]}` so the
/// output can be handed straight to a display layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecasts {
    pub hourly_forecast: Vec<HourlyPoint>,
    pub daily_forecast: Vec<DailySummary>,
}

impl Forecasts {
    /// Returns true when neither sequence has any entries
    pub fn is_empty(&self) -> bool {
        self.hourly_forecast.is_empty() && self.daily_forecast.is_empty()
    }
}

/// Unit system passed to the API as the `units` query parameter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Celsius, meters/sec
    #[default]
    Metric,
    /// Fahrenheit, miles/hour
    Imperial,
    /// Kelvin, meters/sec
    Standard,
}

impl Units {
    /// Value used for the `units` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }

    /// Temperature suffix for display
    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
            Units::Standard => "K",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            "standard" => Ok(Units::Standard),
            other => Err(format!(
                "unknown units '{}', expected metric, imperial or standard",
                other
            )),
        }
    }
}

/// Which upstream endpoint shape to request and aggregate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApiVariant {
    /// `/data/2.5/forecast`: flat list of 3-hour samples, bucketed locally
    #[default]
    ThreeHour,
    /// `/data/3.0/onecall`: pre-split `hourly` and `daily` arrays
    OneCall,
}

impl ApiVariant {
    /// Endpoint path appended to the configured base URL
    pub fn path(&self) -> &'static str {
        match self {
            ApiVariant::ThreeHour => "/data/2.5/forecast",
            ApiVariant::OneCall => "/data/3.0/onecall",
        }
    }

    /// Upstream sections excluded from the response, if the endpoint supports it
    pub fn exclude(&self) -> Option<&'static str> {
        match self {
            ApiVariant::ThreeHour => None,
            ApiVariant::OneCall => Some("current,minutely,alerts"),
        }
    }

    /// Maximum number of hourly points produced for this variant
    pub fn hourly_slots(&self) -> usize {
        match self {
            ApiVariant::ThreeHour => 2,
            ApiVariant::OneCall => 5,
        }
    }
}

impl FromStr for ApiVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "three-hour" | "3h" | "forecast" => Ok(ApiVariant::ThreeHour),
            "one-call" | "onecall" => Ok(ApiVariant::OneCall),
            other => Err(format!(
                "unknown variant '{}', expected three-hour or one-call",
                other
            )),
        }
    }
}

/// Maximum number of days in the daily summary
pub const MAX_DAYS: usize = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecasts_serialize_with_camel_case_keys() {
        let forecasts = Forecasts {
            hourly_forecast: vec![HourlyPoint {
                dt: 1_700_000_000,
                temp: 12.5,
                humidity: 80,
                icon: "10d".to_string(),
            }],
            daily_forecast: vec![],
        };

        let json = serde_json::to_value(&forecasts).expect("Failed to serialize Forecasts");

        assert!(json.get("hourlyForecast").is_some());
        assert!(json.get("dailyForecast").is_some());
        assert_eq!(json["hourlyForecast"][0]["icon"], "10d");
        assert_eq!(json["hourlyForecast"][0]["humidity"], 80);
    }

    #[test]
    fn test_daily_summary_field_names() {
        let day = DailySummary {
            dt: 1_700_000_000,
            summary: "light rain".to_string(),
            icon: "10d".to_string(),
            temp_min: 4.0,
            temp_max: 9.5,
        };

        let json = serde_json::to_value(&day).expect("Failed to serialize DailySummary");

        assert_eq!(json["summary"], "light rain");
        assert_eq!(json["temp_min"], 4.0);
        assert_eq!(json["temp_max"], 9.5);
    }

    #[test]
    fn test_point_time_conversion() {
        let point = HourlyPoint {
            dt: 0,
            temp: 0.0,
            humidity: 0,
            icon: String::new(),
        };
        assert_eq!(point.time().map(|t| t.timestamp()), Some(0));
    }

    #[test]
    fn test_default_forecasts_is_empty() {
        assert!(Forecasts::default().is_empty());
    }

    #[test]
    fn test_units_parse() {
        assert_eq!("metric".parse::<Units>(), Ok(Units::Metric));
        assert_eq!("Imperial".parse::<Units>(), Ok(Units::Imperial));
        assert_eq!("standard".parse::<Units>(), Ok(Units::Standard));
        assert!("kelvin".parse::<Units>().is_err());
    }

    #[test]
    fn test_units_query_value() {
        assert_eq!(Units::default().as_str(), "metric");
        assert_eq!(Units::Imperial.to_string(), "imperial");
        assert_eq!(Units::Imperial.temperature_symbol(), "°F");
    }

    #[test]
    fn test_variant_parse() {
        assert_eq!("three-hour".parse::<ApiVariant>(), Ok(ApiVariant::ThreeHour));
        assert_eq!("onecall".parse::<ApiVariant>(), Ok(ApiVariant::OneCall));
        assert!("daily".parse::<ApiVariant>().is_err());
    }

    #[test]
    fn test_variant_endpoints() {
        assert_eq!(ApiVariant::ThreeHour.path(), "/data/2.5/forecast");
        assert_eq!(ApiVariant::OneCall.path(), "/data/3.0/onecall");
        assert!(ApiVariant::ThreeHour.exclude().is_none());
        assert_eq!(ApiVariant::OneCall.exclude(), Some("current,minutely,alerts"));
        assert_eq!(ApiVariant::ThreeHour.hourly_slots(), 2);
        assert_eq!(ApiVariant::OneCall.hourly_slots(), 5);
    }
}
