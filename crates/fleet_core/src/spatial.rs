//! Spatial operations: WGS84 points and great-circle distance.
//!
//! This module provides:
//!
//! - **GeoPoint**: latitude/longitude pair in degrees
//! - **Distance calculations**: Haversine distance between two points
//!
//! All routing in the fleet engines is a straight-line proxy; there is no road
//! network. Distances are pure functions of their inputs and are never cached.

use serde::{Deserialize, Serialize};

use crate::twin::lenient;

/// Mean Earth radius used by the haversine formula (km).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub lat: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to `other` in kilometres.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        distance_km(*self, *other)
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

/// Haversine distance between two points in kilometres.
///
/// Returns 0.0 for identical points.
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlon = (dlon * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    // Rounding can push h a hair above 1.0 for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();
    EARTH_RADIUS_KM * c
}
