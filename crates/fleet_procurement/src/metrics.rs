//! Per-provider outcome statistics for one simulated scenario.

use serde::{Deserialize, Serialize};

/// Outcome of one provider over one batch of incidents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreboardRow {
    pub provider: String,
    pub sla_minutes: i64,
    /// Incidents simulated (0 when the twin pool was empty).
    pub trials: usize,
    /// Incidents resolved within the SLA, remote fixes included.
    pub sla_hits: usize,
    pub sla_hit_rate: f64,
    pub eta_p50_min: f64,
    pub eta_p90_min: f64,
    pub remote_recovery_count: usize,
}

/// Nearest-rank percentile over an ascending slice: `sorted[floor(p * (n - 1))]`.
/// Returns 0.0 for an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() - 1) as f64 * p) as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Raw per-provider tallies collected while simulating.
#[derive(Debug, Clone, Default)]
pub(crate) struct OutcomeTally {
    pub etas: Vec<f64>,
    pub sla_hits: usize,
    pub remote_recoveries: usize,
}

impl OutcomeTally {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            etas: Vec::with_capacity(n),
            ..Self::default()
        }
    }

    pub fn record(&mut self, eta_min: f64, sla_minutes: i64, remote: bool) {
        if remote {
            self.remote_recoveries += 1;
        }
        if eta_min <= sla_minutes as f64 {
            self.sla_hits += 1;
        }
        self.etas.push(eta_min);
    }

    pub fn into_row(mut self, provider: &str, sla_minutes: i64) -> ScoreboardRow {
        self.etas.sort_by(f64::total_cmp);
        let trials = self.etas.len();
        let sla_hit_rate = if trials == 0 {
            0.0
        } else {
            self.sla_hits as f64 / trials as f64
        };
        ScoreboardRow {
            provider: provider.to_string(),
            sla_minutes,
            trials,
            sla_hits: self.sla_hits,
            sla_hit_rate,
            eta_p50_min: percentile(&self.etas, 0.50),
            eta_p90_min: percentile(&self.etas, 0.90),
            remote_recovery_count: self.remote_recoveries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_uses_floor_index() {
        let v: Vec<f64> = (1..=10).map(f64::from).collect();
        // floor(0.9 * 9) = 8, floor(0.5 * 9) = 4
        assert_eq!(percentile(&v, 0.90), 9.0);
        assert_eq!(percentile(&v, 0.50), 5.0);
        assert_eq!(percentile(&[], 0.9), 0.0);
        assert_eq!(percentile(&[3.0], 0.9), 3.0);
    }

    #[test]
    fn tally_counts_hits_and_sorts() {
        let mut tally = OutcomeTally::with_capacity(4);
        tally.record(70.0, 60, false);
        tally.record(0.0, 60, true);
        tally.record(60.0, 60, false);
        tally.record(15.0, 60, false);
        let row = tally.into_row("Acme", 60);
        assert_eq!(row.trials, 4);
        assert_eq!(row.sla_hits, 3);
        assert_eq!(row.sla_hit_rate, 0.75);
        assert_eq!(row.remote_recovery_count, 1);
        // sorted: 0, 15, 60, 70
        assert_eq!(row.eta_p50_min, 15.0);
        assert_eq!(row.eta_p90_min, 60.0);
    }

    #[test]
    fn empty_tally_is_zero_row() {
        let row = OutcomeTally::default().into_row("Acme", 60);
        assert_eq!(row.trials, 0);
        assert_eq!(row.sla_hit_rate, 0.0);
        assert_eq!(row.eta_p50_min, 0.0);
        assert_eq!(row.eta_p90_min, 0.0);
    }
}
