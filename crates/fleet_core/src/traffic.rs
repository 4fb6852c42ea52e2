//! Traffic model: per-mode average speeds, ETA estimation, and link-speed
//! congestion.
//!
//! The traffic model turns a straight-line distance into minutes of travel.
//! It is independent of any road network. It works from average speed rather
//! than route geometry, and every engine shares the same ETA proxy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::spatial::{distance_km, GeoPoint};

/// Floor applied to every speed before dividing (km/h).
pub const MIN_SPEED_KMH: f64 = 5.0;

/// Reference free-flow link speed for congestion normalisation (km/h).
pub const BASELINE_LINK_SPEED_KMH: f64 = 30.0;

// ---------------------------------------------------------------------------
// Traffic modes
// ---------------------------------------------------------------------------

/// Coarse traffic condition used to pick an average travel speed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficMode {
    /// Free flow, ~45 km/h.
    Free,
    /// Typical urban traffic, ~32 km/h.
    #[default]
    Normal,
    /// Rush-hour congestion, ~18 km/h.
    Congested,
}

impl TrafficMode {
    pub const ALL: [TrafficMode; 3] = [TrafficMode::Free, TrafficMode::Normal, TrafficMode::Congested];

    /// Average speed for this mode in km/h.
    pub fn avg_speed_kmh(self) -> f64 {
        match self {
            TrafficMode::Free => 45.0,
            TrafficMode::Normal => 32.0,
            TrafficMode::Congested => 18.0,
        }
    }

    /// Parse a mode name, falling back to [`TrafficMode::Normal`] for anything
    /// unrecognised.
    pub fn parse_lenient(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrafficMode::Free => "free",
            TrafficMode::Normal => "normal",
            TrafficMode::Congested => "congested",
        }
    }
}

impl fmt::Display for TrafficMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for mode names outside `free | normal | congested`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown traffic mode `{0}`")]
pub struct UnknownTrafficMode(pub String);

impl FromStr for TrafficMode {
    type Err = UnknownTrafficMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(TrafficMode::Free),
            "normal" => Ok(TrafficMode::Normal),
            "congested" => Ok(TrafficMode::Congested),
            other => Err(UnknownTrafficMode(other.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for TrafficMode {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(de)?;
        Ok(TrafficMode::parse_lenient(&raw))
    }
}

// ---------------------------------------------------------------------------
// ETA estimation
// ---------------------------------------------------------------------------

/// Travel minutes for `distance_km` at `speed_kmh`, with the speed floored at
/// [`MIN_SPEED_KMH`].
pub fn minutes_at_speed(distance_km: f64, speed_kmh: f64) -> f64 {
    let kmh = speed_kmh.max(MIN_SPEED_KMH);
    distance_km / kmh * 60.0
}

/// Estimated travel minutes from `origin` to `dest` under `mode`.
pub fn eta_minutes(origin: GeoPoint, dest: GeoPoint, mode: TrafficMode) -> f64 {
    minutes_at_speed(distance_km(origin, dest), mode.avg_speed_kmh())
}

// ---------------------------------------------------------------------------
// Link congestion
// ---------------------------------------------------------------------------

/// Congestion in [0, 1] from an observed link speed: `1 - speed / baseline`.
///
/// A missing or non-positive baseline yields 0.0.
pub fn congestion_from_speed(speed_kmh: f64, baseline_kmh: f64) -> f64 {
    if !(baseline_kmh > 0.0) || !speed_kmh.is_finite() {
        return 0.0;
    }
    (1.0 - speed_kmh / baseline_kmh).clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_speeds() {
        assert_eq!(TrafficMode::Free.avg_speed_kmh(), 45.0);
        assert_eq!(TrafficMode::Normal.avg_speed_kmh(), 32.0);
        assert_eq!(TrafficMode::Congested.avg_speed_kmh(), 18.0);
    }

    #[test]
    fn unknown_mode_falls_back_to_normal() {
        assert_eq!(TrafficMode::parse_lenient("gridlock"), TrafficMode::Normal);
        assert_eq!(TrafficMode::parse_lenient(" Congested "), TrafficMode::Congested);
        assert!("gridlock".parse::<TrafficMode>().is_err());
    }

    #[test]
    fn deserialize_is_lenient() {
        let mode: TrafficMode = serde_json::from_str("\"weird\"").expect("string");
        assert_eq!(mode, TrafficMode::Normal);
        let mode: TrafficMode = serde_json::from_str("\"free\"").expect("string");
        assert_eq!(mode, TrafficMode::Free);
    }

    #[test]
    fn eta_zero_for_identical_points() {
        let p = GeoPoint::new(37.5, 127.0);
        assert_eq!(eta_minutes(p, p, TrafficMode::Congested), 0.0);
    }

    #[test]
    fn speed_is_floored() {
        // 10 km at a claimed 1 km/h behaves like 5 km/h.
        assert!((minutes_at_speed(10.0, 1.0) - 120.0).abs() < 1e-9);
        assert!((minutes_at_speed(10.0, 0.0) - 120.0).abs() < 1e-9);
    }

    #[test]
    fn congested_eta_is_slowest() {
        let a = GeoPoint::new(37.5665, 126.9780);
        let b = GeoPoint::new(37.60, 127.05);
        let free = eta_minutes(a, b, TrafficMode::Free);
        let normal = eta_minutes(a, b, TrafficMode::Normal);
        let congested = eta_minutes(a, b, TrafficMode::Congested);
        assert!(free < normal && normal < congested);
    }

    #[test]
    fn congestion_from_link_speed() {
        assert_eq!(congestion_from_speed(30.0, BASELINE_LINK_SPEED_KMH), 0.0);
        assert_eq!(congestion_from_speed(45.0, BASELINE_LINK_SPEED_KMH), 0.0);
        assert!((congestion_from_speed(15.0, BASELINE_LINK_SPEED_KMH) - 0.5).abs() < 1e-9);
        assert_eq!(congestion_from_speed(0.0, BASELINE_LINK_SPEED_KMH), 1.0);
        assert_eq!(congestion_from_speed(10.0, 0.0), 0.0);
    }
}
