//! Coordinate model for geographic positions

use serde::{Deserialize, Serialize};

/// A point on the map in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
}

impl Coordinate {
    /// Create a new coordinate
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Format coordinate as a `lat, lon` string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.lat, self.lon)
    }

    /// Straight-line distance in degree space.
    ///
    /// This is not a geographic distance; it is only meaningful for ranking
    /// nearby points against each other.
    #[must_use]
    pub fn degree_distance(&self, other: &Coordinate) -> f64 {
        (self.lat - other.lat).hypot(self.lon - other.lon)
    }

    /// Great-circle distance in kilometers
    #[must_use]
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        haversine::distance(
            haversine::Location {
                latitude: self.lat,
                longitude: self.lon,
            },
            haversine::Location {
                latitude: other.lat,
                longitude: other.lon,
            },
            haversine::Units::Kilometers,
        )
    }
}
