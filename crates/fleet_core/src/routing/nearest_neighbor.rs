use crate::priority::PriorityCandidate;
use crate::spatial::GeoPoint;

use super::{weighted_cost, RouteStrategy};

/// Greedy nearest-neighbour ordering.
///
/// From the current position, always drive to the unvisited candidate with
/// the lowest congestion-weighted cost. Ties go to the candidate that comes
/// first in the remaining pool, which keeps input order. O(n²).
#[derive(Debug, Default, Clone, Copy)]
pub struct NearestNeighborRoute;

impl RouteStrategy for NearestNeighborRoute {
    fn order(&self, candidates: &[PriorityCandidate], base: GeoPoint, alpha: f64) -> Vec<usize> {
        let mut pool: Vec<usize> = (0..candidates.len()).collect();
        let mut order = Vec::with_capacity(candidates.len());
        let mut current = base;

        while !pool.is_empty() {
            let mut best_pos = 0;
            let mut best_cost = f64::INFINITY;
            for (pos, &i) in pool.iter().enumerate() {
                let cost = weighted_cost(current, &candidates[i], alpha);
                if cost < best_cost {
                    best_cost = cost;
                    best_pos = pos;
                }
            }
            // `remove` keeps the remaining pool in input order for tie-breaks.
            let pick = pool.remove(best_pos);
            current = candidates[pick].location;
            order.push(pick);
        }

        order
    }
}
