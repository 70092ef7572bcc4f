//! Cache module for memoizing aggregated forecasts
//!
//! This module provides an in-memory cache keyed by coordinates rounded to
//! five decimal places, so repeated lookups for the same place skip the
//! network. Entries live as long as the cache does.

mod manager;

pub use manager::{CachedForecast, ForecastCache};
