//! Shared fixtures for unit tests in this crate.

use fleet_core::planner::DEFAULT_BASE;
use fleet_core::spatial::GeoPoint;
use fleet_core::test_helpers::twin_at;
use fleet_core::twin::Twin;

use crate::provider::ProviderProfile;

/// Six units spread 2-15 km around the default depot.
pub fn pool() -> Vec<Twin> {
    [
        (37.58, 126.99),
        (37.52, 127.03),
        (37.49, 126.90),
        (37.63, 127.06),
        (37.65, 126.93),
        (37.45, 127.10),
    ]
    .iter()
    .enumerate()
    .map(|(i, &(lat, lon))| twin_at(&format!("ST{i:03}"), GeoPoint::new(lat, lon)))
    .collect()
}

/// Provider based at the default depot.
pub fn provider(name: &str, remote_recovery_rate: f64, sla_minutes: i64) -> ProviderProfile {
    ProviderProfile::new(name, DEFAULT_BASE, remote_recovery_rate, sla_minutes)
}
