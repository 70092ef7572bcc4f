//! Forecast service
//!
//! Ties the API client, the aggregator and the result cache together behind
//! one call.

use std::sync::Arc;

use tracing::debug;

use crate::cache::ForecastCache;
use crate::data::{aggregate, ClientConfig, FetchError, Forecasts, WeatherClient};

/// Fetches, aggregates and memoizes forecasts
#[derive(Debug)]
pub struct ForecastService {
    client: WeatherClient,
    cache: ForecastCache,
}

impl ForecastService {
    /// Creates a service with an empty cache
    pub fn new(client: WeatherClient) -> Self {
        Self::with_cache(client, ForecastCache::new())
    }

    /// Creates a service around an existing cache
    pub fn with_cache(client: WeatherClient, cache: ForecastCache) -> Self {
        Self { client, cache }
    }

    /// Builds the HTTP client from `config` and creates a service
    pub fn from_config(config: ClientConfig) -> Result<Self, FetchError> {
        Ok(Self::new(WeatherClient::new(config)?))
    }

    pub fn client(&self) -> &WeatherClient {
        &self.client
    }

    pub fn cache(&self) -> &ForecastCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut ForecastCache {
        &mut self.cache
    }

    /// Get hourly and daily forecasts for a location
    ///
    /// # Arguments
    /// * `lat` - Latitude coordinate
    /// * `lon` - Longitude coordinate
    /// * `use_cache` - Return a cached result for these coordinates if present
    ///
    /// # Returns
    /// * `Ok(Arc<Forecasts>)` - Cached or freshly aggregated forecasts; a fresh
    ///   result always replaces the cache entry
    /// * `Err(FetchError)` - If the API request fails; the cache is unchanged
    pub async fn get_weather_forecasts(
        &mut self,
        lat: f64,
        lon: f64,
        use_cache: bool,
    ) -> Result<Arc<Forecasts>, FetchError> {
        if use_cache {
            if let Some(hit) = self.cache.get(lat, lon) {
                debug!(key = %ForecastCache::key(lat, lon), "Forecast cache hit");
                return Ok(hit);
            }
            debug!(key = %ForecastCache::key(lat, lon), "Forecast cache miss");
        }

        let raw = self.client.fetch_forecast(lat, lon).await?;
        let forecasts = aggregate(&raw);
        Ok(self.cache.insert(lat, lon, forecasts))
    }
}
