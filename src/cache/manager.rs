//! In-memory forecast cache keyed by rounded coordinates
//!
//! Provides a `ForecastCache` that memoizes aggregated forecasts for the
//! lifetime of the owning service. Entries are never evicted or expired.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::data::Forecasts;

/// Decimal places kept when building a cache key
const KEY_PRECISION: usize = 5;

/// Round to the key precision; adding `0.0` turns `-0.0` into `0.0`
fn round_coordinate(value: f64) -> f64 {
    let scale = 10f64.powi(KEY_PRECISION as i32);
    (value * scale).round() / scale + 0.0
}

/// A stored forecast and when it was stored
#[derive(Debug, Clone)]
pub struct CachedForecast {
    /// The cached forecasts, shared with every caller that hit this entry
    pub data: Arc<Forecasts>,
    /// When the entry was written
    pub cached_at: DateTime<Utc>,
}

/// Memoizes forecasts per location
///
/// Coordinates that agree to five decimal places (about one meter) share an
/// entry.
#[derive(Debug, Default)]
pub struct ForecastCache {
    entries: HashMap<String, CachedForecast>,
}

impl ForecastCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache key for the given coordinates, e.g. `"49.28270,-123.12070"`
    ///
    /// Values that round to zero share the key of `0.0` whatever their sign.
    pub fn key(lat: f64, lon: f64) -> String {
        format!(
            "{:.prec$},{:.prec$}",
            round_coordinate(lat),
            round_coordinate(lon),
            prec = KEY_PRECISION
        )
    }

    /// Returns the cached forecasts for the coordinates, if any
    pub fn get(&self, lat: f64, lon: f64) -> Option<Arc<Forecasts>> {
        self.entry(lat, lon).map(|e| Arc::clone(&e.data))
    }

    /// Returns the full cache entry for the coordinates, if any
    pub fn entry(&self, lat: f64, lon: f64) -> Option<&CachedForecast> {
        self.entries.get(&Self::key(lat, lon))
    }

    /// Stores forecasts for the coordinates, replacing any previous entry
    ///
    /// Returns the shared handle that later hits will hand out.
    pub fn insert(&mut self, lat: f64, lon: f64, forecasts: Forecasts) -> Arc<Forecasts> {
        let data = Arc::new(forecasts);
        self.entries.insert(
            Self::key(lat, lon),
            CachedForecast {
                data: Arc::clone(&data),
                cached_at: Utc::now(),
            },
        );
        data
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
