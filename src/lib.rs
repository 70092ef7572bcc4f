//! owm-forecast library
//!
//! Fetches OpenWeatherMap forecasts and condenses them into a short hourly
//! forecast and a 5-day daily summary. The binary and integration tests use
//! these modules directly.

pub mod cache;
pub mod cli;
pub mod data;
pub mod display;
pub mod service;

pub use cache::ForecastCache;
pub use data::{
    ApiVariant, ClientConfig, DailySummary, FetchError, Forecasts, HourlyPoint, Units,
    WeatherClient,
};
pub use service::ForecastService;
