use crate::priority::PriorityCandidate;
use crate::spatial::GeoPoint;

use super::{path_cost, NearestNeighborRoute, RouteStrategy};

const IMPROVEMENT_EPSILON: f64 = 1e-9;

/// Nearest-neighbour seed refined by 2-opt segment reversals.
///
/// The path is open (it starts at the depot and ends at the last stop), and
/// the weighted cost depends on the destination's congestion, so each
/// candidate reversal is scored on the whole path rather than by edge
/// deltas. Passes stop once a full sweep finds no improvement or after
/// `max_passes`. The result is never worse than the greedy seed.
#[derive(Debug, Clone, Copy)]
pub struct TwoOptRoute {
    pub max_passes: usize,
}

impl Default for TwoOptRoute {
    fn default() -> Self {
        Self { max_passes: 50 }
    }
}

impl RouteStrategy for TwoOptRoute {
    fn order(&self, candidates: &[PriorityCandidate], base: GeoPoint, alpha: f64) -> Vec<usize> {
        let mut order = NearestNeighborRoute.order(candidates, base, alpha);
        let n = order.len();
        if n < 2 {
            return order;
        }

        let mut best = path_cost(candidates, base, &order, alpha);
        for _ in 0..self.max_passes {
            let mut improved = false;
            for i in 0..n - 1 {
                for j in i + 1..n {
                    order[i..=j].reverse();
                    let cost = path_cost(candidates, base, &order, alpha);
                    if cost + IMPROVEMENT_EPSILON < best {
                        best = cost;
                        improved = true;
                    } else {
                        order[i..=j].reverse();
                    }
                }
            }
            if !improved {
                break;
            }
        }

        order
    }
}
