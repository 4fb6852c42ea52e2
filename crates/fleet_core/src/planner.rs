//! Rule-based action planning for scored candidates.
//!
//! Every plan walks the same ladder:
//!
//! ```text
//! OPEN_CASE -> REMOTE_DIAG -> REMOTE_RESET -> DISPATCH | ESCALATE | MONITOR
//! ```
//!
//! The terminal step depends on whether the unit needs a field visit (hard
//! down status, high down probability, or a long outage) and, if so, whether
//! a crew can reach it within the SLA. Plans are advisory: the requested
//! [`AutoLevel`] is recorded on the plan for an executor to interpret (see
//! [`crate::executor`]) and never changes the steps produced here.

use serde::{Deserialize, Serialize};

use crate::error::{check_location, check_range, ConfigError};
use crate::numeric::round_to;
use crate::priority::PriorityCandidate;
use crate::spatial::{distance_km, GeoPoint};
use crate::traffic::{eta_minutes, TrafficMode};
use crate::twin::{Risk, Twin, DOWN_STATUS_CODES};

/// Crew speed assumed for dispatch ETAs before congestion (km/h).
pub const DISPATCH_SPEED_KMH: f64 = 30.0;

/// ETA inflation per unit of congestion.
pub const CONGESTION_ETA_FACTOR: f64 = 0.6;

/// Down probability at or above which a visit is warranted.
pub const DISPATCH_PROB_THRESHOLD: f64 = 0.8;

/// Outage length at or above which a visit is warranted (minutes).
pub const DISPATCH_DOWN_MINUTES: i64 = 6 * 60;

/// Default depot: Seoul City Hall.
pub const DEFAULT_BASE: GeoPoint = GeoPoint::new(37.5665, 126.9780);

pub const MAX_SLA_MINUTES: i64 = 24 * 60;

const REASON_OPEN_CASE: &str = "open a case for the suspected outage";
const REASON_REMOTE_DIAG: &str = "run remote diagnostics to check comms and status";
const REASON_REMOTE_RESET: &str = "attempt a remote reset (low-risk automation)";
const REASON_DISPATCH: &str = "crew can arrive within SLA: dispatch (advisory)";
const REASON_ESCALATE: &str = "SLA expected to be exceeded: escalate to the next tier (advisory)";
const REASON_MONITOR: &str = "no dispatch trigger fired: intensify monitoring (advisory)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    OpenCase,
    RemoteDiag,
    RemoteReset,
    Dispatch,
    Escalate,
    Monitor,
    /// Only produced by [`assess_twin`] for low-risk units.
    NoAction,
}

impl Action {
    /// Whether this action ends a plan.
    pub fn is_terminal(self) -> bool {
        matches!(self, Action::Dispatch | Action::Escalate | Action::Monitor)
    }
}

/// How much of a plan an executor may carry out unattended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoLevel {
    /// Remote diagnostics and resets only.
    #[default]
    Safe,
    /// Also case handling and monitoring; field work stays a suggestion.
    Assist,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    pub action: Action,
    /// Execution order, 1 = first.
    pub priority: u32,
    pub eta_min: Option<u32>,
    pub reason: String,
}

impl PlanStep {
    fn new(action: Action, priority: u32, eta_min: Option<u32>, reason: &str) -> Self {
        Self {
            action,
            priority,
            eta_min,
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPlan {
    pub auto_level: AutoLevel,
    pub steps: Vec<PlanStep>,
}

impl ActionPlan {
    /// The DISPATCH / ESCALATE / MONITOR step.
    pub fn terminal(&self) -> Option<&PlanStep> {
        self.steps.last().filter(|step| step.action.is_terminal())
    }
}

/// Depot, SLA and automation level used to plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanParams {
    pub base: GeoPoint,
    pub sla_minutes: i64,
    pub auto_level: AutoLevel,
}

impl Default for PlanParams {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE,
            sla_minutes: 90,
            auto_level: AutoLevel::Safe,
        }
    }
}

impl PlanParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_location(self.base.lat, self.base.lon)?;
        if self.sla_minutes <= 0 {
            return Err(ConfigError::NonPositiveSla(self.sla_minutes));
        }
        check_range("sla_minutes", self.sla_minutes, 1, MAX_SLA_MINUTES)
    }

    /// SLA as an unsigned minute count. Call after [`PlanParams::validate`].
    pub fn sla(&self) -> u32 {
        self.sla_minutes.clamp(0, MAX_SLA_MINUTES) as u32
    }
}

/// Crew ETA in whole minutes: 30 km/h inflated by 60 % of the congestion,
/// truncated.
pub fn dispatch_eta_minutes(base: GeoPoint, candidate: &PriorityCandidate) -> u32 {
    let km = distance_km(base, candidate.location);
    let minutes = km / DISPATCH_SPEED_KMH * 60.0
        * (1.0 + CONGESTION_ETA_FACTOR * candidate.traffic_congestion);
    minutes as u32
}

/// Whether the candidate warrants a field visit at all.
pub fn needs_field_visit(candidate: &PriorityCandidate) -> bool {
    DOWN_STATUS_CODES.contains(&candidate.status_code)
        || candidate.down_prob_6h >= DISPATCH_PROB_THRESHOLD
        || candidate
            .down_minutes
            .is_some_and(|m| m >= DISPATCH_DOWN_MINUTES)
}

fn terminal_step(field_visit: bool, eta_min: u32, sla_minutes: u32) -> PlanStep {
    if !field_visit {
        PlanStep::new(Action::Monitor, 4, None, REASON_MONITOR)
    } else if eta_min <= sla_minutes {
        PlanStep::new(Action::Dispatch, 4, Some(eta_min), REASON_DISPATCH)
    } else {
        PlanStep::new(Action::Escalate, 4, Some(eta_min), REASON_ESCALATE)
    }
}

/// Build a plan given an already-estimated crew ETA.
pub fn plan_with_eta(
    candidate: &PriorityCandidate,
    eta_min: u32,
    sla_minutes: u32,
    auto_level: AutoLevel,
) -> ActionPlan {
    let steps = vec![
        PlanStep::new(Action::OpenCase, 1, None, REASON_OPEN_CASE),
        PlanStep::new(Action::RemoteDiag, 2, None, REASON_REMOTE_DIAG),
        PlanStep::new(Action::RemoteReset, 3, None, REASON_REMOTE_RESET),
        terminal_step(needs_field_visit(candidate), eta_min, sla_minutes),
    ];
    ActionPlan { auto_level, steps }
}

/// Build the advisory plan for one candidate dispatched from `base`.
pub fn plan(
    candidate: &PriorityCandidate,
    base: GeoPoint,
    sla_minutes: u32,
    auto_level: AutoLevel,
) -> ActionPlan {
    let eta = dispatch_eta_minutes(base, candidate);
    plan_with_eta(candidate, eta, sla_minutes, auto_level)
}

// ---------------------------------------------------------------------------
// Single-unit assessment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentParams {
    pub base: GeoPoint,
    pub traffic_mode: TrafficMode,
    pub sla_minutes: i64,
    pub remote_recovery_rate: f64,
}

impl Default for AssessmentParams {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE,
            traffic_mode: TrafficMode::Normal,
            sla_minutes: 60,
            remote_recovery_rate: 0.35,
        }
    }
}

impl AssessmentParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_location(self.base.lat, self.base.lon)?;
        if self.sla_minutes <= 0 {
            return Err(ConfigError::NonPositiveSla(self.sla_minutes));
        }
        if !(0.0..=1.0).contains(&self.remote_recovery_rate) {
            return Err(ConfigError::InvalidRecoveryRate {
                provider: "assessment".to_string(),
                value: self.remote_recovery_rate,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentStep {
    pub action: Action,
    pub eta_min: Option<f64>,
}

/// Quick verdict for a single selected unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub risk: Risk,
    /// Travel minutes from the depot under the traffic mode, one decimal.
    pub eta_min: f64,
    pub plan: Vec<AssessmentStep>,
    pub reasons: Vec<String>,
}

/// Risk-driven plan for one twin: nothing for low-risk units, otherwise a
/// remote reset backed by a dispatch or an escalation.
pub fn assess_twin(twin: &Twin, params: &AssessmentParams) -> Assessment {
    let risk = twin.derived.risk.unwrap_or(Risk::None);
    let eta = round_to(
        eta_minutes(params.base, twin.location, params.traffic_mode),
        1,
    );

    let mut plan = Vec::new();
    let mut reasons = Vec::new();

    if risk == Risk::None {
        plan.push(AssessmentStep {
            action: Action::NoAction,
            eta_min: None,
        });
        reasons.push("risk is low (NONE)".to_string());
    } else {
        plan.push(AssessmentStep {
            action: Action::RemoteReset,
            eta_min: None,
        });
        reasons.push(format!(
            "try remote recovery first (remote_recovery_rate={})",
            params.remote_recovery_rate
        ));

        if eta <= params.sla_minutes as f64 {
            plan.push(AssessmentStep {
                action: Action::Dispatch,
                eta_min: Some(eta),
            });
            reasons.push(format!(
                "reachable within SLA ({} min): dispatch in parallel",
                params.sla_minutes
            ));
        } else {
            plan.push(AssessmentStep {
                action: Action::Escalate,
                eta_min: Some(eta),
            });
            reasons.push(format!(
                "SLA ({} min) expected to be exceeded: reassign region or use a fallback",
                params.sla_minutes
            ));
        }
    }

    Assessment {
        risk,
        eta_min: eta,
        plan,
        reasons,
    }
}
