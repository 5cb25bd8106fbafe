use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::geo::haversine_distance;

/// A geographic position in degrees. Ranges are not validated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to `other` in kilometers.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_distance(self.lat, self.lng, other.lat, other.lng)
    }

    pub fn latitude_hemisphere(&self) -> &'static str {
        if self.lat < 0.0 {
            "S"
        } else {
            "N"
        }
    }

    pub fn longitude_hemisphere(&self) -> &'static str {
        if self.lng < 0.0 {
            "W"
        } else {
            "E"
        }
    }
}

/// Free function form of [`Coordinate::distance_to`].
pub fn distance(a: &Coordinate, b: &Coordinate) -> f64 {
    a.distance_to(b)
}
