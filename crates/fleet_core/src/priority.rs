//! Priority scoring: turns raw twin signals into a ranked incident list.
//!
//! A twin becomes a candidate when its status code is in the configured
//! down set or its derived health is DOWN. Each candidate gets a weighted
//! score over four normalised factors:
//!
//! - **duration**: minutes since the last status change, saturating at 24 h
//! - **probability**: 6-hour down probability
//! - **congestion**: traffic congestion near the unit (only if enabled)
//! - **importance**: rated output, saturating at 100 kW
//!
//! Candidates are ordered by score, highest first. Equal scores keep the
//! order in which the twins were supplied.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::{check_range, check_weight, ConfigError, FleetError};
use crate::numeric::{clamp01, round_to};
use crate::spatial::GeoPoint;
use crate::twin::{Twin, DOWN_STATUS_CODES};

/// Down duration at which the duration factor saturates (minutes).
pub const DURATION_SATURATION_MIN: f64 = 24.0 * 60.0;

/// Rated output at which the importance factor saturates (kW).
pub const IMPORTANCE_SATURATION_KW: f64 = 100.0;

/// Upper bound for `min_down_minutes` (one week).
pub const MAX_MIN_DOWN_MINUTES: i64 = 7 * 24 * 60;

pub const MAX_TOP_N: usize = 500;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Factor weights. They need not sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub w_duration: f64,
    pub w_prob: f64,
    pub w_congestion: f64,
    pub w_importance: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            w_duration: 0.45,
            w_prob: 0.35,
            w_congestion: 0.15,
            w_importance: 0.05,
        }
    }
}

impl ScoringWeights {
    pub fn new(w_duration: f64, w_prob: f64, w_congestion: f64, w_importance: f64) -> Self {
        Self {
            w_duration,
            w_prob,
            w_congestion,
            w_importance,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_weight("w_duration", self.w_duration)?;
        check_weight("w_prob", self.w_prob)?;
        check_weight("w_congestion", self.w_congestion)?;
        check_weight("w_importance", self.w_importance)
    }
}

/// Everything the scorer needs besides the twins and the clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringParams {
    #[serde(flatten)]
    pub weights: ScoringWeights,
    pub down_status_codes: Vec<i64>,
    pub min_down_minutes: i64,
    pub use_traffic: bool,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            down_status_codes: DOWN_STATUS_CODES.to_vec(),
            min_down_minutes: 0,
            use_traffic: true,
        }
    }
}

impl ScoringParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;
        check_range(
            "min_down_minutes",
            self.min_down_minutes,
            0,
            MAX_MIN_DOWN_MINUTES,
        )
    }
}

/// Scoring parameters plus the size of the returned list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityConfig {
    #[serde(flatten)]
    pub scoring: ScoringParams,
    pub top_n: usize,
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringParams::default(),
            top_n: 50,
        }
    }
}

impl PriorityConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scoring.validate()?;
        check_range("top_n", self.top_n as i64, 1, MAX_TOP_N as i64)
    }
}

// ---------------------------------------------------------------------------
// Candidates
// ---------------------------------------------------------------------------

/// A down unit with its urgency score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityCandidate {
    pub station_id: String,
    pub charger_id: String,
    pub name: String,
    #[serde(flatten)]
    pub location: GeoPoint,
    pub status_code: i64,
    pub score: f64,
    /// Minutes since the last status change; `None` if the timestamp is unusable.
    pub down_minutes: Option<i64>,
    pub down_prob_6h: f64,
    /// Normalised congestion, 0.0 when traffic is not used.
    pub traffic_congestion: f64,
    pub output_kw: f64,
    pub reasons: Vec<String>,
}

impl PriorityCandidate {
    pub fn unit_id(&self) -> String {
        format!("{}/{}", self.station_id, self.charger_id)
    }
}

/// Normalised factors for one candidate, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreFactors {
    pub duration: f64,
    pub probability: f64,
    pub congestion: f64,
    pub importance: f64,
}

impl ScoreFactors {
    /// Weighted sum rounded to 6 decimal places.
    pub fn weighted(&self, weights: &ScoringWeights) -> f64 {
        let raw = weights.w_duration * self.duration
            + weights.w_prob * self.probability
            + weights.w_congestion * self.congestion
            + weights.w_importance * self.importance;
        round_to(raw, 6)
    }
}

fn factors_for(twin: &Twin, down_minutes: Option<i64>, use_traffic: bool) -> ScoreFactors {
    let duration = down_minutes
        .map(|m| (m as f64 / DURATION_SATURATION_MIN).min(1.0))
        .unwrap_or(0.0);
    let congestion = if use_traffic {
        clamp01(twin.signals.traffic_congestion)
    } else {
        0.0
    };
    ScoreFactors {
        duration,
        probability: clamp01(twin.derived.down_prob_6h),
        congestion,
        importance: clamp01(twin.meta.output_kw / IMPORTANCE_SATURATION_KW),
    }
}

fn reasons_for(
    down_minutes: Option<i64>,
    factors: &ScoreFactors,
    output_kw: f64,
    use_traffic: bool,
) -> Vec<String> {
    let mut reasons = Vec::with_capacity(4);
    if let Some(minutes) = down_minutes {
        reasons.push(format!("down for {minutes} min"));
    }
    reasons.push(format!("downProb6h {:.3}", factors.probability));
    if use_traffic {
        reasons.push(format!("congestion {:.3}", factors.congestion));
    }
    if output_kw != 0.0 {
        reasons.push(format!("output {output_kw}kW"));
    }
    reasons
}

/// Score one twin, or `None` if it is not a candidate.
pub fn score_twin(
    twin: &Twin,
    params: &ScoringParams,
    now: DateTime<FixedOffset>,
) -> Option<PriorityCandidate> {
    if !twin.is_down(&params.down_status_codes) {
        return None;
    }

    let down_minutes = twin.down_minutes(now);
    if matches!(down_minutes, Some(m) if m < params.min_down_minutes) {
        return None;
    }

    let factors = factors_for(twin, down_minutes, params.use_traffic);
    let score = factors.weighted(&params.weights);
    let reasons = reasons_for(down_minutes, &factors, twin.meta.output_kw, params.use_traffic);

    Some(PriorityCandidate {
        station_id: twin.station_id.clone(),
        charger_id: twin.charger_id.clone(),
        name: twin.name.clone(),
        location: twin.location,
        status_code: twin.signals.status_code,
        score,
        down_minutes,
        down_prob_6h: round_to(factors.probability, 3),
        traffic_congestion: round_to(factors.congestion, 3),
        output_kw: twin.meta.output_kw,
        reasons,
    })
}

/// Score every twin and return all candidates, highest score first.
///
/// The sort is stable: equal scores keep input order.
pub fn score(
    twins: &[Twin],
    params: &ScoringParams,
    now: DateTime<FixedOffset>,
) -> Vec<PriorityCandidate> {
    let mut candidates: Vec<PriorityCandidate> = twins
        .iter()
        .filter_map(|twin| score_twin(twin, params, now))
        .collect();
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    tracing::debug!(
        twins = twins.len(),
        candidates = candidates.len(),
        "scored fleet"
    );
    candidates
}

/// Ranked candidates truncated to `top_n`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prioritized {
    pub top_n: usize,
    pub total_candidates: usize,
    pub items: Vec<PriorityCandidate>,
}

/// Validate `config`, score, and keep the top `config.top_n`.
pub fn prioritize(
    twins: &[Twin],
    config: &PriorityConfig,
    now: DateTime<FixedOffset>,
) -> Result<Prioritized, FleetError> {
    config.validate()?;
    let mut items = score(twins, &config.scoring, now);
    let total_candidates = items.len();
    items.truncate(config.top_n);
    Ok(Prioritized {
        top_n: config.top_n,
        total_candidates,
        items,
    })
}
