//! Visit-order planning for a crew leaving the depot.
//!
//! Two strategies, selectable via [`RouteStrategyKind`]:
//!
//! - **`NearestNeighborRoute`**: greedy single pass on congestion-weighted
//!   distance. This is what [`route`] uses.
//! - **`TwoOptRoute`**: the greedy tour improved by segment reversals until
//!   no reversal lowers the weighted cost.
//!
//! Costs are inflated by congestion (`distance * (1 + alpha * congestion)`),
//! but legs and totals always report the actual haversine distance.

mod nearest_neighbor;
mod two_opt;

pub use nearest_neighbor::NearestNeighborRoute;
pub use two_opt::TwoOptRoute;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::priority::PriorityCandidate;
use crate::spatial::{distance_km, GeoPoint};

// ---------------------------------------------------------------------------
// Core types
// ---------------------------------------------------------------------------

/// One stop on a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// 1-based visit order.
    pub idx: usize,
    pub station_id: String,
    pub charger_id: String,
    pub name: String,
    #[serde(flatten)]
    pub location: GeoPoint,
    pub score: f64,
    /// Actual distance from the previous position (km).
    pub leg_km: f64,
    /// Running total of `leg_km` up to and including this stop.
    pub cumulative_km: f64,
    pub congestion: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub total_km: f64,
    pub steps: Vec<RouteStep>,
}

/// Trait for strategies that order candidates into a route.
pub trait RouteStrategy: Send + Sync {
    /// Visit order as indices into `candidates`. Must be a permutation.
    fn order(&self, candidates: &[PriorityCandidate], base: GeoPoint, alpha: f64) -> Vec<usize>;

    /// Order the candidates and materialise the route.
    fn plan(&self, candidates: &[PriorityCandidate], base: GeoPoint, alpha: f64) -> Route {
        let order = self.order(candidates, base, alpha);
        build_route(candidates, base, &order)
    }
}

/// Which strategy [`RouteConfig`] selects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStrategyKind {
    #[default]
    NearestNeighbor,
    TwoOpt,
}

/// Create a boxed strategy from its kind.
pub fn create_route_strategy(kind: RouteStrategyKind) -> Box<dyn RouteStrategy> {
    match kind {
        RouteStrategyKind::NearestNeighbor => Box::new(NearestNeighborRoute),
        RouteStrategyKind::TwoOpt => Box::new(TwoOptRoute::default()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Congestion cost multiplier.
    pub alpha: f64,
    pub strategy: RouteStrategyKind,
    /// How many top-priority candidates to route.
    pub max_stops: usize,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            alpha: 0.4,
            strategy: RouteStrategyKind::NearestNeighbor,
            max_stops: 20,
        }
    }
}

impl RouteConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.alpha.is_finite() && self.alpha >= 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidAlpha(self.alpha))
        }
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Congestion-weighted cost of driving from `from` to `to`.
pub(crate) fn weighted_cost(from: GeoPoint, to: &PriorityCandidate, alpha: f64) -> f64 {
    distance_km(from, to.location) * (1.0 + alpha * to.traffic_congestion)
}

/// Weighted cost of the open path base -> order[0] -> ... -> order[n-1].
pub(crate) fn path_cost(
    candidates: &[PriorityCandidate],
    base: GeoPoint,
    order: &[usize],
    alpha: f64,
) -> f64 {
    let mut current = base;
    let mut cost = 0.0;
    for &i in order {
        cost += weighted_cost(current, &candidates[i], alpha);
        current = candidates[i].location;
    }
    cost
}

/// Materialise `order` into steps with actual leg distances.
pub fn build_route(candidates: &[PriorityCandidate], base: GeoPoint, order: &[usize]) -> Route {
    let mut current = base;
    let mut total_km = 0.0;
    let mut steps = Vec::with_capacity(order.len());

    for (k, &i) in order.iter().enumerate() {
        let stop = &candidates[i];
        let leg_km = distance_km(current, stop.location);
        total_km += leg_km;
        steps.push(RouteStep {
            idx: k + 1,
            station_id: stop.station_id.clone(),
            charger_id: stop.charger_id.clone(),
            name: stop.name.clone(),
            location: stop.location,
            score: stop.score,
            leg_km,
            cumulative_km: total_km,
            congestion: stop.traffic_congestion,
        });
        current = stop.location;
    }

    Route { total_km, steps }
}

/// Greedy nearest-neighbour route from `base`.
pub fn route(candidates: &[PriorityCandidate], base: GeoPoint, alpha: f64) -> Route {
    let route = NearestNeighborRoute.plan(candidates, base, alpha);
    tracing::debug!(
        stops = route.steps.len(),
        total_km = route.total_km,
        "route planned"
    );
    route
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{candidate_at, TEST_BASE};

    #[test]
    fn single_stop_route_is_one_leg() {
        let c = candidate_at("S1", GeoPoint::new(37.5665, 126.9880), 0.0);
        let r = route(&[c], TEST_BASE, 0.4);
        assert_eq!(r.steps.len(), 1);
        assert_eq!(r.steps[0].idx, 1);
        assert!((r.total_km - 0.88).abs() < 0.01, "got {}", r.total_km);
        assert_eq!(r.steps[0].leg_km, r.total_km);
    }

    #[test]
    fn empty_input_is_empty_route() {
        let r = route(&[], TEST_BASE, 0.4);
        assert!(r.steps.is_empty());
        assert_eq!(r.total_km, 0.0);
    }

    #[test]
    fn total_is_sum_of_actual_legs() {
        let cands = vec![
            candidate_at("A", GeoPoint::new(37.60, 127.00), 0.9),
            candidate_at("B", GeoPoint::new(37.55, 126.95), 0.1),
            candidate_at("C", GeoPoint::new(37.52, 127.05), 0.5),
        ];
        let r = route(&cands, TEST_BASE, 0.4);
        let mut prev = TEST_BASE;
        let mut sum = 0.0;
        for step in &r.steps {
            let d = distance_km(prev, step.location);
            assert!((d - step.leg_km).abs() < 1e-12);
            sum += d;
            assert!((sum - step.cumulative_km).abs() < 1e-9);
            prev = step.location;
        }
        assert!((sum - r.total_km).abs() < 1e-9);
    }

    #[test]
    fn alpha_validation() {
        assert!(RouteConfig::default().validate().is_ok());
        let bad = RouteConfig {
            alpha: -0.1,
            ..RouteConfig::default()
        };
        assert_eq!(bad.validate(), Err(ConfigError::InvalidAlpha(-0.1)));
        let nan = RouteConfig {
            alpha: f64::NAN,
            ..RouteConfig::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn factory_selects_strategy() {
        let cands = vec![
            candidate_at("A", GeoPoint::new(37.57, 126.99), 0.0),
            candidate_at("B", GeoPoint::new(37.58, 127.00), 0.0),
        ];
        for kind in [RouteStrategyKind::NearestNeighbor, RouteStrategyKind::TwoOpt] {
            let r = create_route_strategy(kind).plan(&cands, TEST_BASE, 0.0);
            assert_eq!(r.steps.len(), 2);
        }
    }
}
