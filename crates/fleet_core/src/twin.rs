//! The canonical per-unit record ("twin") consumed by every decision engine.
//!
//! A twin merges identity, location, live signals and derived health/risk for
//! one charger. Twins are produced by an external ingestion collaborator and
//! are read-only here. Decoding is lenient: see [`lenient`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::numeric::round_to;
use crate::spatial::GeoPoint;
use crate::traffic::{congestion_from_speed, BASELINE_LINK_SPEED_KMH};

pub mod lenient;

/// Status code assumed when the feed's value is missing or unreadable.
pub const DEFAULT_STATUS_CODE: i64 = 9;

/// Status codes that mean "unit down" in the charger status feed.
pub const DOWN_STATUS_CODES: [i64; 2] = [4, 5];

/// Offset of the status feed's wall-clock timestamps (UTC+9).
pub const FEED_UTC_OFFSET_SECS: i32 = 9 * 3600;

const STAT_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Fixed UTC+9 offset used by `statUpdDt`.
pub fn feed_offset() -> FixedOffset {
    FixedOffset::east_opt(FEED_UTC_OFFSET_SECS).expect("UTC+9 is a valid offset")
}

/// Parse a `YYYYMMDDHHMMSS` timestamp in the feed's UTC+9 offset.
///
/// Returns `None` for anything that is not exactly 14 digits or not a real
/// calendar instant.
pub fn parse_stat_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.len() != 14 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let naive = NaiveDateTime::parse_from_str(raw, STAT_TIMESTAMP_FORMAT).ok()?;
    feed_offset().from_local_datetime(&naive).single()
}

/// Format an instant as a feed timestamp in UTC+9.
pub fn format_stat_timestamp(at: DateTime<FixedOffset>) -> String {
    at.with_timezone(&feed_offset())
        .format(STAT_TIMESTAMP_FORMAT)
        .to_string()
}

// ---------------------------------------------------------------------------
// Derived labels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Health {
    Ok,
    Degraded,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Risk {
    None,
    Suspect,
    Alert,
    Critical,
}

/// Error for labels the feed does not define.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown label `{0}`")]
pub struct UnknownLabel(pub String);

impl FromStr for Health {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OK" => Ok(Health::Ok),
            "DEGRADED" => Ok(Health::Degraded),
            "DOWN" => Ok(Health::Down),
            _ => Err(UnknownLabel(s.to_string())),
        }
    }
}

impl FromStr for Risk {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NONE" => Ok(Risk::None),
            "SUSPECT" => Ok(Risk::Suspect),
            "ALERT" => Ok(Risk::Alert),
            "CRITICAL" => Ok(Risk::Critical),
            _ => Err(UnknownLabel(s.to_string())),
        }
    }
}

impl fmt::Display for Risk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Risk::None => "NONE",
            Risk::Suspect => "SUSPECT",
            Risk::Alert => "ALERT",
            Risk::Critical => "CRITICAL",
        })
    }
}

// ---------------------------------------------------------------------------
// Twin record
// ---------------------------------------------------------------------------

/// Live signals reported for a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signals {
    #[serde(default = "default_status_code", deserialize_with = "lenient::status_code")]
    pub status_code: i64,
    #[serde(rename = "commLossRate24h", default, deserialize_with = "lenient::f64_or_zero")]
    pub comm_loss_rate_24h: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub vision_smoke: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub vision_fire: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub sensor_risk: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub traffic_congestion: f64,
    /// Observed speed on the nearest road link (km/h), when joined.
    #[serde(
        default,
        deserialize_with = "lenient::optional_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub traffic_speed: Option<f64>,
    /// Last status change, `YYYYMMDDHHMMSS` in UTC+9.
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub stat_upd_dt: Option<String>,
}

fn default_status_code() -> i64 {
    DEFAULT_STATUS_CODE
}

impl Default for Signals {
    fn default() -> Self {
        Self {
            status_code: DEFAULT_STATUS_CODE,
            comm_loss_rate_24h: 0.0,
            vision_smoke: 0.0,
            vision_fire: 0.0,
            sensor_risk: 0.0,
            traffic_congestion: 0.0,
            traffic_speed: None,
            stat_upd_dt: None,
        }
    }
}

/// Health and risk computed from signals by the ingestion layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Derived {
    #[serde(default, deserialize_with = "lenient::optional_label")]
    pub health: Option<Health>,
    #[serde(default, deserialize_with = "lenient::optional_label")]
    pub risk: Option<Risk>,
    #[serde(rename = "downProb6h", default, deserialize_with = "lenient::f64_or_zero")]
    pub down_prob_6h: f64,
}

/// Static charger metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// Rated output in kW (the feed ships it as a numeric string).
    #[serde(rename = "output", default, deserialize_with = "lenient::f64_or_zero")]
    pub output_kw: f64,
}

/// Canonical per-unit record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Twin {
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub station_id: String,
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub charger_id: String,
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub name: String,
    #[serde(flatten)]
    pub location: GeoPoint,
    #[serde(default, deserialize_with = "lenient::section")]
    pub signals: Signals,
    #[serde(default, deserialize_with = "lenient::section")]
    pub derived: Derived,
    #[serde(default, deserialize_with = "lenient::section")]
    pub meta: Meta,
}

impl Twin {
    /// `stationId/chargerId`, the identity shown to operators.
    pub fn unit_id(&self) -> String {
        format!("{}/{}", self.station_id, self.charger_id)
    }

    /// Down if the status code is in `down_codes` or health says DOWN.
    pub fn is_down(&self, down_codes: &[i64]) -> bool {
        down_codes.contains(&self.signals.status_code) || self.derived.health == Some(Health::Down)
    }

    /// Parsed `statUpdDt`, if present and well-formed.
    pub fn last_update(&self) -> Option<DateTime<FixedOffset>> {
        self.signals
            .stat_upd_dt
            .as_deref()
            .and_then(parse_stat_timestamp)
    }

    /// Whole minutes between the last update and `now`, floored at zero.
    pub fn down_minutes(&self, now: DateTime<FixedOffset>) -> Option<i64> {
        self.last_update()
            .map(|upd| (now - upd).num_seconds().div_euclid(60).max(0))
    }

    /// Recompute `derived` from the raw signals, as ingestion does.
    ///
    /// When a link speed is present, `trafficCongestion` is refreshed from it
    /// first (3 decimals). Any `derived` values shipped with the record are
    /// replaced.
    pub fn recompute_derived(&mut self) {
        if let Some(speed) = self.signals.traffic_speed {
            self.signals.traffic_congestion =
                round_to(congestion_from_speed(speed, BASELINE_LINK_SPEED_KMH), 3);
        }
        self.derived = derive_state(&self.signals);
    }
}

// ---------------------------------------------------------------------------
// Derived state model
// ---------------------------------------------------------------------------

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Recompute health, risk and 6-hour down probability from raw signals.
///
/// Logistic model over status, comms loss, sensor risk and smoke; health and
/// risk are threshold bands over the result.
pub fn derive_state(signals: &Signals) -> Derived {
    let status_down = DOWN_STATUS_CODES.contains(&signals.status_code);

    let mut x = 0.0;
    if status_down {
        x += 1.2;
    }
    x += 0.9 * signals.comm_loss_rate_24h;
    x += 1.3 * signals.sensor_risk;
    x += 0.8 * signals.vision_smoke;
    let down_prob = (sigmoid(1.2 * (x - 0.55)) * 1000.0).round() / 1000.0;

    let health = if status_down {
        Health::Down
    } else if signals.comm_loss_rate_24h > 0.12 || down_prob > 0.55 {
        Health::Degraded
    } else {
        Health::Ok
    };

    let mut risk_score =
        signals.vision_fire.max(signals.vision_smoke) * 0.7 + signals.sensor_risk * 0.8;
    if health == Health::Down {
        risk_score += 0.2;
    }
    let risk = if risk_score > 0.55 {
        Risk::Critical
    } else if risk_score > 0.35 {
        Risk::Alert
    } else if risk_score > 0.18 {
        Risk::Suspect
    } else {
        Risk::None
    };

    Derived {
        health: Some(health),
        risk: Some(risk),
        down_prob_6h: down_prob,
    }
}
