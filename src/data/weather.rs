//! OpenWeatherMap API client
//!
//! This module issues the single forecast request against OpenWeatherMap and
//! decodes the body into the raw response models consumed by the aggregator.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

use super::{ApiVariant, Units};

/// Base URL for the OpenWeatherMap API
pub const OPENWEATHERMAP_BASE_URL: &str = "https://api.openweathermap.org";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Errors that can occur when fetching forecast data
///
/// Every variant is a failed fetch as far as callers are concerned; the
/// variants only keep the cause around for logging and display.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read
    #[error("HTTP request failed: {0}")]
    Request(reqwest::Error),

    /// The API answered with a non-success status
    #[error("HTTP error! status: {0}")]
    Status(StatusCode),

    /// The body was not JSON at all
    #[error("Failed to parse JSON response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        // Request URLs carry the API key
        FetchError::Request(err.without_url())
    }
}

/// Connection settings for the forecast API
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// OpenWeatherMap API key, sent as `appid`
    pub api_key: String,
    /// Scheme and host of the API, without a trailing path
    pub base_url: String,
    /// Unit system for returned temperatures
    pub units: Units,
    /// Which endpoint shape to request
    pub variant: ApiVariant,
    /// Request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: OPENWEATHERMAP_BASE_URL.to_string(),
            units: Units::default(),
            variant: ApiVariant::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    pub fn with_variant(mut self, variant: ApiVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full endpoint URL for the configured variant
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, self.variant.path())
    }
}

/// Client for fetching forecast data from OpenWeatherMap
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    config: ClientConfig,
}

impl WeatherClient {
    /// Create a new WeatherClient from the given configuration
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Create a new WeatherClient with a custom HTTP client
    ///
    /// The timeout in `config` is ignored; the given client's settings apply.
    pub fn with_client(client: Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch the raw forecast for the given coordinates
    ///
    /// # Arguments
    /// * `lat` - Latitude coordinate
    /// * `lon` - Longitude coordinate
    ///
    /// # Returns
    /// * `Ok(RawForecast)` - Decoded response for the configured variant
    /// * `Err(FetchError)` - If the request fails, the status is not a success,
    ///   or the body is not JSON
    pub async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<RawForecast, FetchError> {
        let result = self.request(lat, lon).await;
        if let Err(err) = &result {
            error!(error = %err, lat, lon, "Error fetching weather data");
        }
        result
    }

    async fn request(&self, lat: f64, lon: f64) -> Result<RawForecast, FetchError> {
        let url = self.config.endpoint();
        debug!(%url, lat, lon, units = %self.config.units, "Requesting forecast");

        let response = self
            .client
            .get(&url)
            .query(&self.query_params(lat, lon))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let text = response.text().await?;
        self.decode(&text)
    }

    /// Query parameters for one forecast request
    fn query_params(&self, lat: f64, lon: f64) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("appid", self.config.api_key.clone()),
            ("units", self.config.units.as_str().to_string()),
        ];
        if let Some(exclude) = self.config.variant.exclude() {
            params.push(("exclude", exclude.to_string()));
        }
        params
    }

    /// Decode a response body according to the configured variant
    ///
    /// Only a body that is not JSON is an error. Fields of the wrong shape
    /// decode as absent and are dropped by the aggregator.
    fn decode(&self, body: &str) -> Result<RawForecast, FetchError> {
        let document: Value = serde_json::from_str(body)?;
        let raw = match self.config.variant {
            ApiVariant::ThreeHour => RawForecast::ThreeHour(from_document(document)),
            ApiVariant::OneCall => RawForecast::OneCall(from_document(document)),
        };
        Ok(raw)
    }
}

/// Read a response document, treating an unusable one as empty
fn from_document<T: DeserializeOwned + Default>(document: Value) -> T {
    serde_json::from_value(document).unwrap_or_else(|err| {
        warn!(error = %err, "Unexpected forecast document, treating as empty");
        T::default()
    })
}

/// Deserialize a field, mapping a value of the wrong type to `None`
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Deserialize an array field entry by entry
///
/// A non-array value becomes `None`. An entry of the wrong shape becomes the
/// default (all-absent) entry so it is skipped later without losing the rest.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .map(|item| serde_json::from_value(item).unwrap_or_default())
                .collect(),
        )),
        Value::Null => Ok(None),
        other => {
            warn!(found = %json_kind(&other), "Expected an array in forecast response");
            Ok(None)
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Decoded upstream response, one shape per API variant
#[derive(Debug, Clone, PartialEq)]
pub enum RawForecast {
    ThreeHour(ThreeHourResponse),
    OneCall(OneCallResponse),
}

/// `/data/2.5/forecast` response structure
///
/// Only the fields the aggregator reads are modeled. Every field is optional
/// and a value of the wrong type decodes as absent, so a partial or odd
/// response still decodes; presence is checked before projection.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ThreeHourResponse {
    #[serde(default, deserialize_with = "lenient_list")]
    pub list: Option<Vec<RawSample>>,
}

/// One 3-hour sample from the forecast list
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawSample {
    #[serde(default, deserialize_with = "lenient")]
    pub dt: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub main: Option<RawMain>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub weather: Option<Vec<RawCondition>>,
    /// Formatted time, e.g. "2024-07-15 12:00:00"
    #[serde(default, deserialize_with = "lenient")]
    pub dt_txt: Option<String>,
}

/// Temperature and humidity block of a 3-hour sample
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawMain {
    #[serde(default, deserialize_with = "lenient")]
    pub temp: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub temp_min: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub temp_max: Option<f64>,
}

/// Weather condition entry
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawCondition {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub icon: Option<String>,
}

/// `/data/3.0/onecall` response structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OneCallResponse {
    #[serde(default, deserialize_with = "lenient_list")]
    pub hourly: Option<Vec<RawHourly>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub daily: Option<Vec<RawDaily>>,
}

/// Hourly entry from the one-call response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawHourly {
    #[serde(default, deserialize_with = "lenient")]
    pub dt: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub temp: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub weather: Option<Vec<RawCondition>>,
}

/// Daily entry from the one-call response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawDaily {
    #[serde(default, deserialize_with = "lenient")]
    pub dt: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub temp: Option<RawDailyTemp>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub weather: Option<Vec<RawCondition>>,
}

/// Daily temperature block from the one-call response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawDailyTemp {
    #[serde(default, deserialize_with = "lenient")]
    pub min: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub max: Option<f64>,
}
