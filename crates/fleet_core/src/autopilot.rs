//! One-shot triage: score the fleet, pick the most urgent units and attach
//! a plan to each.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::{check_range, FleetError};
use crate::executor::{ExecutionPolicy, ExecutionSplit};
use crate::planner::{plan, ActionPlan, PlanParams};
use crate::priority::{score, PriorityCandidate, ScoringParams};
use crate::twin::Twin;

pub const MAX_AUTO_TOP_K: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotConfig {
    pub scoring: ScoringParams,
    #[serde(flatten)]
    pub plan: PlanParams,
    /// How many of the highest-scoring candidates get a plan.
    pub auto_top_k: usize,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringParams {
                min_down_minutes: 30,
                ..ScoringParams::default()
            },
            plan: PlanParams::default(),
            auto_top_k: 10,
        }
    }
}

impl AutopilotConfig {
    pub fn validate(&self) -> Result<(), crate::error::ConfigError> {
        self.scoring.validate()?;
        self.plan.validate()?;
        check_range("auto_top_k", self.auto_top_k as i64, 0, MAX_AUTO_TOP_K as i64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutopilotCase {
    pub candidate: PriorityCandidate,
    pub plan: ActionPlan,
    pub execution: ExecutionSplit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutopilotReport {
    pub total_candidates: usize,
    pub picked: usize,
    pub cases: Vec<AutopilotCase>,
}

pub fn run_autopilot(
    twins: &[Twin],
    config: &AutopilotConfig,
    now: DateTime<FixedOffset>,
) -> Result<AutopilotReport, FleetError> {
    config.validate()?;

    let mut candidates = score(twins, &config.scoring, now);
    let total_candidates = candidates.len();
    candidates.truncate(config.auto_top_k);

    let sla = config.plan.sla();
    let policy = ExecutionPolicy::for_level(config.plan.auto_level);
    let cases: Vec<AutopilotCase> = candidates
        .into_iter()
        .map(|candidate| {
            let plan = plan(&candidate, config.plan.base, sla, config.plan.auto_level);
            let execution = policy.split(&plan);
            AutopilotCase {
                candidate,
                plan,
                execution,
            }
        })
        .collect();

    tracing::info!(
        total_candidates,
        picked = cases.len(),
        level = ?config.plan.auto_level,
        "autopilot pass complete"
    );

    Ok(AutopilotReport {
        total_candidates,
        picked: cases.len(),
        cases,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::planner::Action;
    use crate::test_helpers::{down_twin, test_now};

    fn fleet(n: usize) -> Vec<Twin> {
        (0..n)
            .map(|i| down_twin(&format!("S{i:02}"), 60 + i as i64 * 30, 0.5, 0.2, 50.0))
            .collect()
    }

    #[test]
    fn picks_top_k_in_score_order() {
        let config = AutopilotConfig {
            auto_top_k: 3,
            ..AutopilotConfig::default()
        };
        let report = run_autopilot(&fleet(8), &config, test_now()).expect("autopilot");
        assert_eq!(report.total_candidates, 8);
        assert_eq!(report.picked, 3);
        // Longer outages score higher.
        let ids: Vec<&str> = report
            .cases
            .iter()
            .map(|c| c.candidate.station_id.as_str())
            .collect();
        assert_eq!(ids, vec!["S07", "S06", "S05"]);
    }

    #[test]
    fn default_min_down_filters_fresh_outages() {
        let twins = vec![
            down_twin("fresh", 10, 0.5, 0.0, 50.0),
            down_twin("stale", 45, 0.5, 0.0, 50.0),
        ];
        let report = run_autopilot(&twins, &AutopilotConfig::default(), test_now()).expect("autopilot");
        assert_eq!(report.total_candidates, 1);
        assert_eq!(report.cases[0].candidate.station_id, "stale");
    }

    #[test]
    fn zero_k_still_counts_candidates() {
        let config = AutopilotConfig {
            auto_top_k: 0,
            ..AutopilotConfig::default()
        };
        let report = run_autopilot(&fleet(4), &config, test_now()).expect("autopilot");
        assert_eq!(report.total_candidates, 4);
        assert!(report.cases.is_empty());
    }

    #[test]
    fn every_case_keeps_field_work_advisory() {
        let report = run_autopilot(&fleet(5), &AutopilotConfig::default(), test_now()).expect("autopilot");
        for case in &report.cases {
            assert!(case
                .execution
                .automatic
                .iter()
                .all(|s| !matches!(s.action, Action::Dispatch | Action::Escalate)));
            assert_eq!(
                case.execution.automatic.len() + case.execution.advisory.len(),
                case.plan.steps.len()
            );
        }
    }

    #[test]
    fn oversized_k_is_rejected() {
        let config = AutopilotConfig {
            auto_top_k: 201,
            ..AutopilotConfig::default()
        };
        let err = run_autopilot(&[], &config, test_now()).expect_err("should reject");
        assert!(matches!(
            err,
            FleetError::Config(ConfigError::OutOfRange {
                name: "auto_top_k",
                ..
            })
        ));
    }
}
