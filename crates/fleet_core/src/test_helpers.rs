//! Test helpers for common test setup and utilities.
//!
//! This module provides shared fixtures to reduce duplication across test files.

use chrono::{DateTime, Duration, FixedOffset};

use crate::priority::PriorityCandidate;
use crate::spatial::GeoPoint;
use crate::twin::{format_stat_timestamp, parse_stat_timestamp, Twin};

/// Reference "now" shared by tests, as a feed timestamp.
pub const TEST_NOW: &str = "20260114120000";

/// Default depot used by tests (Seoul City Hall).
pub const TEST_BASE: GeoPoint = GeoPoint::new(37.5665, 126.9780);

/// Reference "now" as an instant.
///
/// # Panics
///
/// Panics if [`TEST_NOW`] is not a valid feed timestamp (should never happen).
pub fn test_now() -> DateTime<FixedOffset> {
    parse_stat_timestamp(TEST_NOW).expect("TEST_NOW should be a valid feed timestamp")
}

/// A twin at (37.50, 127.00) with status code 4 whose last status change was
/// `down_minutes` before [`test_now`].
pub fn down_twin(
    station_id: &str,
    down_minutes: i64,
    down_prob_6h: f64,
    congestion: f64,
    output_kw: f64,
) -> Twin {
    let mut twin = Twin {
        station_id: station_id.to_string(),
        charger_id: "01".to_string(),
        name: format!("{station_id} / CH-01"),
        location: GeoPoint::new(37.50, 127.00),
        ..Twin::default()
    };
    twin.signals.status_code = 4;
    twin.signals.traffic_congestion = congestion;
    twin.signals.stat_upd_dt = Some(format_stat_timestamp(
        test_now() - Duration::minutes(down_minutes),
    ));
    twin.derived.down_prob_6h = down_prob_6h;
    twin.meta.output_kw = output_kw;
    twin
}

/// A healthy twin at `location`.
pub fn twin_at(station_id: &str, location: GeoPoint) -> Twin {
    let mut twin = Twin {
        station_id: station_id.to_string(),
        charger_id: "01".to_string(),
        location,
        ..Twin::default()
    };
    twin.signals.status_code = 2;
    twin
}

/// A bare candidate at `location` for routing and planning tests.
pub fn candidate_at(station_id: &str, location: GeoPoint, congestion: f64) -> PriorityCandidate {
    PriorityCandidate {
        station_id: station_id.to_string(),
        charger_id: "01".to_string(),
        name: station_id.to_string(),
        location,
        status_code: 4,
        score: 0.5,
        down_minutes: Some(60),
        down_prob_6h: 0.5,
        traffic_congestion: congestion,
        output_kw: 50.0,
        reasons: Vec::new(),
    }
}
