//! City list for looking up forecast coordinates by name
//!
//! Cities are read from a JSON array of `{id, name, country, lat, lon}`
//! objects. The array is converted from a CSV export with the columns
//! `city_id, city_name, country_full, lat, lon`, one object per row, with
//! rows that fail to parse left out.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading a city list
#[derive(Debug, Error)]
pub enum CityError {
    /// The city file could not be read
    #[error("Failed to read city file: {0}")]
    Read(#[from] std::io::Error),

    /// The city file is not a JSON array of cities
    #[error("Failed to parse city file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A named location with coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    /// Identifier from the source data set
    pub id: String,
    /// Display name, e.g. "Vancouver"
    pub name: String,
    /// Full country name
    pub country: String,
    /// Latitude coordinate
    pub lat: f64,
    /// Longitude coordinate
    pub lon: f64,
}

/// Load a city list from a JSON file
pub fn load_cities(path: &Path) -> Result<Vec<City>, CityError> {
    let content = fs::read_to_string(path)?;
    let cities = serde_json::from_str(&content)?;
    Ok(cities)
}

/// Find a city by exact id or case-insensitive name
///
/// Returns the first match in list order.
pub fn find_city<'a>(cities: &'a [City], query: &str) -> Option<&'a City> {
    let query = query.trim();
    cities
        .iter()
        .find(|c| c.id == query || c.name.eq_ignore_ascii_case(query))
}
