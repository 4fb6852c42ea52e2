//! Maintenance provider profiles under evaluation.

use fleet_core::error::{check_location, ConfigError};
use fleet_core::planner::DEFAULT_BASE;
use fleet_core::spatial::GeoPoint;
use serde::{Deserialize, Serialize};

/// A bidder's operating profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderProfile {
    pub name: String,
    /// Depot the provider's crews leave from.
    pub base: GeoPoint,
    /// Chance an incident is fixed remotely, before the DOWN penalty.
    pub remote_recovery_rate: f64,
    pub sla_minutes: i64,
    /// Crew count. Informational only; the simulator sends one crew per incident.
    pub crews: u32,
}

impl Default for ProviderProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            base: DEFAULT_BASE,
            remote_recovery_rate: 0.35,
            sla_minutes: 60,
            crews: 1,
        }
    }
}

impl ProviderProfile {
    pub fn new(name: impl Into<String>, base: GeoPoint, remote_recovery_rate: f64, sla_minutes: i64) -> Self {
        Self {
            name: name.into(),
            base,
            remote_recovery_rate,
            sla_minutes,
            crews: 1,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.remote_recovery_rate) {
            return Err(ConfigError::InvalidRecoveryRate {
                provider: self.name.clone(),
                value: self.remote_recovery_rate,
            });
        }
        if self.sla_minutes <= 0 {
            return Err(ConfigError::InvalidProviderSla {
                provider: self.name.clone(),
                value: self.sla_minutes,
            });
        }
        check_location(self.base.lat, self.base.lon)
    }
}

/// Validate every profile, stopping at the first bad one.
pub fn validate_providers(providers: &[ProviderProfile]) -> Result<(), ConfigError> {
    providers.iter().try_for_each(ProviderProfile::validate)
}
