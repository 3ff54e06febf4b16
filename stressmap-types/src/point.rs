use serde::{Deserialize, Serialize};

/// Point in geographic coordinates (longitude/latitude degrees).
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    lon: f64,
    lat: f64,
}

impl GeoPoint {
    /// Creates a new point. Note the argument order: longitude first, as in `[x, y]`.
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }
}

impl From<geo_types::Coord<f64>> for GeoPoint {
    fn from(coord: geo_types::Coord<f64>) -> Self {
        Self::new(coord.x, coord.y)
    }
}
