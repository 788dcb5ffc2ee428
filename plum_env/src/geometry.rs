//! Great-circle geometry for sensor placement.

use geo::{HaversineDistance, Point};
use serde::{Deserialize, Serialize};

/// Earth radius used for every distance (km).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// geo's mean earth radius (meters); not exported by geo 0.28
const MEAN_EARTH_RADIUS: f64 = 6371008.8;

/// A fixed geographic location in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a point from latitude and longitude (degrees).
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns true if both coordinates are finite and in range.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Haversine distance to another point in kilometers, on a sphere of
    /// radius [`EARTH_RADIUS_KM`].
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        // geo measures on its own mean radius (meters); keep only the angle
        let meters = self.to_point().haversine_distance(&other.to_point());
        meters / MEAN_EARTH_RADIUS * EARTH_RADIUS_KM
    }

    // geo points are (x = longitude, y = latitude)
    fn to_point(self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}
