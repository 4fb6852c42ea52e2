//! Monte-Carlo incident simulation for one traffic scenario.
//!
//! All incidents are drawn up front (twin, then severity, per trial) so every
//! provider faces the same batch. Providers are then evaluated in input
//! order, each drawing one remote-recovery Bernoulli per incident from the
//! same generator. Same seed, same inputs, same trial count: identical rows.

use fleet_core::spatial::GeoPoint;
use fleet_core::traffic::{eta_minutes, TrafficMode};
use fleet_core::twin::Twin;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::metrics::{OutcomeTally, ScoreboardRow};
use crate::provider::ProviderProfile;

/// Remote recovery odds are halved for hard-down incidents.
pub const DOWN_REMOTE_PENALTY: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Down,
    Alert,
    Suspect,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Down, Severity::Alert, Severity::Suspect];

    fn remote_factor(self) -> f64 {
        match self {
            Severity::Down => DOWN_REMOTE_PENALTY,
            Severity::Alert | Severity::Suspect => 1.0,
        }
    }
}

/// A synthetic incident. Lives only for one simulation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedIncident {
    pub station_id: String,
    pub charger_id: String,
    pub location: GeoPoint,
    pub severity: Severity,
}

/// Draw `trials` incidents from `twins`, with replacement.
pub fn sample_incidents<R: Rng + ?Sized>(
    twins: &[Twin],
    trials: usize,
    rng: &mut R,
) -> Vec<SimulatedIncident> {
    if twins.is_empty() {
        return Vec::new();
    }
    (0..trials)
        .map(|_| {
            let twin = &twins[rng.gen_range(0..twins.len())];
            let severity = Severity::ALL[rng.gen_range(0..Severity::ALL.len())];
            SimulatedIncident {
                station_id: twin.station_id.clone(),
                charger_id: twin.charger_id.clone(),
                location: twin.location,
                severity,
            }
        })
        .collect()
}

fn evaluate_provider<R: Rng + ?Sized>(
    provider: &ProviderProfile,
    incidents: &[SimulatedIncident],
    mode: TrafficMode,
    rng: &mut R,
) -> ScoreboardRow {
    let mut tally = OutcomeTally::with_capacity(incidents.len());
    for incident in incidents {
        let remote_prob = provider.remote_recovery_rate * incident.severity.remote_factor();
        let remote = rng.gen::<f64>() < remote_prob;
        let eta = if remote {
            0.0
        } else {
            eta_minutes(provider.base, incident.location, mode)
        };
        tally.record(eta, provider.sla_minutes, remote);
    }
    tally.into_row(&provider.name, provider.sla_minutes)
}

/// Rows in provider input order. Callers that aggregate across runs rely on
/// this order.
pub(crate) fn simulate_in_provider_order<R: Rng + ?Sized>(
    twins: &[Twin],
    providers: &[ProviderProfile],
    trials: usize,
    mode: TrafficMode,
    rng: &mut R,
) -> Vec<ScoreboardRow> {
    let incidents = sample_incidents(twins, trials, rng);
    providers
        .iter()
        .map(|provider| evaluate_provider(provider, &incidents, mode, rng))
        .collect()
}

/// Best SLA hit rate first, then lowest p90. Stable.
pub fn sort_scoreboard(rows: &mut [ScoreboardRow]) {
    rows.sort_by(|a, b| {
        b.sla_hit_rate
            .total_cmp(&a.sla_hit_rate)
            .then(a.eta_p90_min.total_cmp(&b.eta_p90_min))
    });
}

/// Simulate with a caller-supplied generator.
pub fn simulate_with_rng<R: Rng + ?Sized>(
    twins: &[Twin],
    providers: &[ProviderProfile],
    trials: usize,
    mode: TrafficMode,
    rng: &mut R,
) -> Vec<ScoreboardRow> {
    let mut rows = simulate_in_provider_order(twins, providers, trials, mode, rng);
    sort_scoreboard(&mut rows);
    tracing::debug!(
        providers = providers.len(),
        trials,
        mode = %mode,
        "scenario simulated"
    );
    rows
}

/// Build the generator for `seed`: reproducible when given, entropy-seeded
/// otherwise.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Simulate `trials` incidents for every provider under `mode`.
pub fn simulate(
    twins: &[Twin],
    providers: &[ProviderProfile],
    trials: usize,
    seed: Option<u64>,
    mode: TrafficMode,
) -> Vec<ScoreboardRow> {
    let mut rng = seeded_rng(seed);
    simulate_with_rng(twins, providers, trials, mode, &mut rng)
}
