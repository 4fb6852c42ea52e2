mod support;

use fleet_core::autopilot::{run_autopilot, AutopilotConfig};
use fleet_core::executor::ExecutionPolicy;
use fleet_core::planner::{
    assess_twin, plan, Action, AssessmentParams, AutoLevel, DEFAULT_BASE,
};
use fleet_core::priority::{prioritize, score, PriorityConfig, ScoringParams};
use fleet_core::routing::{route, RouteStrategy, TwoOptRoute};
use fleet_core::spatial::distance_km;
use fleet_core::test_helpers::test_now;
use support::fleet::fleet;

#[test]
fn fleet_is_scored_in_urgency_order() {
    let candidates = score(&fleet(), &ScoringParams::default(), test_now());
    let ids: Vec<&str> = candidates.iter().map(|c| c.station_id.as_str()).collect();
    assert_eq!(ids, vec!["ST001", "ST003", "ST002"]);

    assert!((candidates[0].score - 0.54).abs() < 1e-9);
    assert_eq!(candidates[0].down_minutes, Some(400));
    assert_eq!(
        candidates[0].reasons,
        vec![
            "down for 400 min",
            "downProb6h 0.900",
            "congestion 0.500",
            "output 50kW"
        ]
    );

    // Health-only candidate without a usable timestamp.
    assert_eq!(candidates[1].down_minutes, None);
    assert_eq!(
        candidates[1].reasons,
        vec!["downProb6h 0.700", "congestion 0.000", "output 7kW"]
    );
}

#[test]
fn prioritize_truncates_but_reports_total() {
    let config = PriorityConfig {
        top_n: 1,
        ..PriorityConfig::default()
    };
    let out = prioritize(&fleet(), &config, test_now()).expect("valid config");
    assert_eq!(out.total_candidates, 3);
    assert_eq!(out.items.len(), 1);
    assert_eq!(out.items[0].station_id, "ST001");
}

#[test]
fn autopilot_plans_every_picked_candidate() {
    let report = run_autopilot(&fleet(), &AutopilotConfig::default(), test_now()).expect("autopilot");
    assert_eq!(report.total_candidates, 3);
    assert_eq!(report.picked, 3);

    let terminals: Vec<(String, Action)> = report
        .cases
        .iter()
        .map(|c| {
            (
                c.candidate.station_id.clone(),
                c.plan.terminal().expect("terminal").action,
            )
        })
        .collect();
    assert_eq!(
        terminals,
        vec![
            ("ST001".to_string(), Action::Dispatch),
            ("ST003".to_string(), Action::Monitor),
            ("ST002".to_string(), Action::Dispatch),
        ]
    );
}

#[test]
fn tight_sla_turns_dispatch_into_escalation() {
    let candidates = score(&fleet(), &ScoringParams::default(), test_now());
    let plan = plan(&candidates[0], DEFAULT_BASE, 5, AutoLevel::Assist);
    assert_eq!(plan.terminal().map(|s| s.action), Some(Action::Escalate));

    let split = ExecutionPolicy::for_level(AutoLevel::Assist).split(&plan);
    assert_eq!(split.advisory.len(), 1);
    assert_eq!(split.advisory[0].action, Action::Escalate);
}

#[test]
fn route_visits_each_candidate_once() {
    let candidates = score(&fleet(), &ScoringParams::default(), test_now());
    let greedy = route(&candidates, DEFAULT_BASE, 0.4);
    let improved = TwoOptRoute::default().plan(&candidates, DEFAULT_BASE, 0.4);

    for r in [&greedy, &improved] {
        let mut ids: Vec<&str> = r.steps.iter().map(|s| s.station_id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["ST001", "ST002", "ST003"]);

        let mut prev = DEFAULT_BASE;
        let mut total = 0.0;
        for step in &r.steps {
            total += distance_km(prev, step.location);
            prev = step.location;
        }
        assert!((total - r.total_km).abs() < 1e-9);
    }
}

#[test]
fn assessment_follows_derived_risk() {
    let twins = fleet();
    let params = AssessmentParams::default();

    let alert = assess_twin(&twins[0], &params);
    assert_eq!(alert.plan[0].action, Action::RemoteReset);
    assert_eq!(alert.plan[1].action, Action::Dispatch);

    let healthy = assess_twin(&twins[3], &params);
    assert_eq!(healthy.plan.len(), 1);
    assert_eq!(healthy.plan[0].action, Action::NoAction);
}
