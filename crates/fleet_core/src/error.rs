//! Error types shared by the fleet engines.
//!
//! Malformed record fields are never errors (they decode to defaults); only
//! configuration outside its documented range and collaborator failures are.

/// Configuration rejected before any engine runs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("weight `{name}` must be finite and non-negative, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },
    #[error("`{name}` must be within {min}..={max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("sla_minutes must be positive, got {0}")]
    NonPositiveSla(i64),
    #[error("congestion alpha must be finite and non-negative, got {0}")]
    InvalidAlpha(f64),
    #[error("base location ({lat}, {lon}) is not a valid WGS84 coordinate")]
    InvalidLocation { lat: f64, lon: f64 },
    #[error("provider `{provider}`: remote recovery rate must be within [0, 1], got {value}")]
    InvalidRecoveryRate { provider: String, value: f64 },
    #[error("provider `{provider}`: sla_minutes must be positive, got {value}")]
    InvalidProviderSla { provider: String, value: i64 },
}

/// Top-level error for fallible boundary operations.
#[derive(Debug, thiserror::Error)]
pub enum FleetError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("twin snapshot unavailable: {0}")]
    Snapshot(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Reject a weight that would break score monotonicity.
pub fn check_weight(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidWeight { name, value })
    }
}

pub fn check_range(name: &'static str, value: i64, min: i64, max: i64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

pub fn check_location(lat: f64, lon: f64) -> Result<(), ConfigError> {
    if lat.is_finite() && lon.is_finite() && lat.abs() <= 90.0 && lon.abs() <= 180.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidLocation { lat, lon })
    }
}
