//! Loading sensor and earthquake tables.
//!
//! Both tables are CSV with at least the columns `id, latitude, longitude`;
//! extra columns are ignored. Everything is validated here so that a bad
//! input fails the run before a single event is scheduled.

use plum_env::{ConfigError, GeoPoint};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Table name used in error messages for sensors.
pub const SENSOR_TABLE: &str = "sensor";

/// Table name used in error messages for earthquakes.
pub const EARTHQUAKE_TABLE: &str = "earthquake";

/// A named location: a sensor station or an earthquake epicenter.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub id: String,
    pub location: GeoPoint,
}

impl Site {
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            location: GeoPoint::new(latitude, longitude),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SiteRow {
    id: String,
    latitude: f64,
    longitude: f64,
}

/// Loads the sensor table from a CSV file.
pub fn load_sensors_csv(path: impl AsRef<Path>) -> Result<Vec<Site>, ConfigError> {
    load_sites_csv(path, SENSOR_TABLE)
}

/// Loads the earthquake table from a CSV file.
pub fn load_earthquakes_csv(path: impl AsRef<Path>) -> Result<Vec<Site>, ConfigError> {
    load_sites_csv(path, EARTHQUAKE_TABLE)
}

/// Loads and validates a site table from a CSV file.
pub fn load_sites_csv(path: impl AsRef<Path>, table: &str) -> Result<Vec<Site>, ConfigError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_sites_reader(file, table)
}

/// Loads and validates a site table from any reader.
pub fn load_sites_reader<R: Read>(reader: R, table: &str) -> Result<Vec<Site>, ConfigError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut sites = Vec::new();
    for (index, row) in csv_reader.deserialize::<SiteRow>().enumerate() {
        // rows are numbered from 1, header excluded
        let row = row.map_err(|e| ConfigError::malformed(table, index + 1, e))?;
        sites.push(Site::new(row.id, row.latitude, row.longitude));
    }

    validate_sites(table, &sites)?;
    Ok(sites)
}

/// Checks a table is non-empty, ids are non-empty and unique, and every
/// coordinate is a valid latitude/longitude.
pub fn validate_sites(table: &str, sites: &[Site]) -> Result<(), ConfigError> {
    if sites.is_empty() {
        return Err(ConfigError::EmptyTable(table.to_string()));
    }

    let mut seen = HashSet::new();
    for (index, site) in sites.iter().enumerate() {
        if site.id.trim().is_empty() {
            return Err(ConfigError::EmptyId {
                table: table.to_string(),
                row: index + 1,
            });
        }
        if !site.location.is_valid() {
            return Err(ConfigError::InvalidCoordinate {
                table: table.to_string(),
                id: site.id.clone(),
                latitude: site.location.latitude,
                longitude: site.location.longitude,
            });
        }
        if !seen.insert(site.id.as_str()) {
            return Err(ConfigError::DuplicateId {
                table: table.to_string(),
                id: site.id.clone(),
            });
        }
    }

    Ok(())
}
