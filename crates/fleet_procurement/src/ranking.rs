//! Provider ranking across traffic scenarios.
//!
//! Each scenario is simulated with the same seed, every scoreboard row is
//! collapsed into a composite score, and a provider's total is the plain sum
//! over scenarios (more scenarios, more weight).

use fleet_core::error::{check_range, check_weight, ConfigError, FleetError};
use fleet_core::numeric::clamp01;
use fleet_core::traffic::TrafficMode;
use fleet_core::twin::Twin;
use serde::{Deserialize, Serialize};

use crate::metrics::ScoreboardRow;
use crate::provider::{validate_providers, ProviderProfile};
use crate::simulator::{seeded_rng, simulate_in_provider_order};

/// p90 at or beyond this many minutes earns no latency credit.
pub const P90_SATURATION_MIN: f64 = 120.0;

pub const MAX_TRIALS: usize = 100_000;

/// Configurable weights for the per-scenario composite score.
///
/// - SLA hit rate: 0.55
/// - p90 latency (inverted, saturating at 120 min): 0.25
/// - Remote recovery share: 0.20
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeWeights {
    pub w_sla: f64,
    pub w_p90: f64,
    pub w_remote: f64,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            w_sla: 0.55,
            w_p90: 0.25,
            w_remote: 0.20,
        }
    }
}

impl CompositeWeights {
    pub fn new(w_sla: f64, w_p90: f64, w_remote: f64) -> Self {
        Self {
            w_sla,
            w_p90,
            w_remote,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_weight("w_sla", self.w_sla)?;
        check_weight("w_p90", self.w_p90)?;
        check_weight("w_remote", self.w_remote)
    }
}

/// A named traffic condition to evaluate providers under.
///
/// In config either field may be left out: a missing mode is read from the
/// name (`{"name": "congested"}`), and a missing name is the mode's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ScenarioEntry")]
pub struct Scenario {
    pub name: String,
    pub traffic_mode: TrafficMode,
}

#[derive(Deserialize)]
struct ScenarioEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "trafficMode")]
    traffic_mode: Option<String>,
}

impl From<ScenarioEntry> for Scenario {
    fn from(entry: ScenarioEntry) -> Self {
        let name = entry.name.filter(|n| !n.trim().is_empty());
        let mode = entry
            .traffic_mode
            .filter(|m| !m.trim().is_empty())
            .or_else(|| name.clone());
        let traffic_mode = mode
            .as_deref()
            .map(TrafficMode::parse_lenient)
            .unwrap_or_default();
        Self {
            name: name.unwrap_or_else(|| traffic_mode.as_str().to_string()),
            traffic_mode,
        }
    }
}

impl Scenario {
    pub fn new(name: impl Into<String>, traffic_mode: TrafficMode) -> Self {
        Self {
            name: name.into(),
            traffic_mode,
        }
    }

    /// A scenario named after its mode.
    pub fn for_mode(traffic_mode: TrafficMode) -> Self {
        Self::new(traffic_mode.as_str(), traffic_mode)
    }
}

/// free, normal, congested.
pub fn default_scenarios() -> Vec<Scenario> {
    TrafficMode::ALL.into_iter().map(Scenario::for_mode).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Incidents simulated per scenario.
    pub trials: usize,
    /// Reused for every scenario so all providers face comparable draws.
    pub seed: Option<u64>,
    #[serde(flatten)]
    pub weights: CompositeWeights,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            trials: 80,
            seed: Some(42),
            weights: CompositeWeights::default(),
        }
    }
}

impl RankingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;
        check_range("trials", self.trials as i64, 0, MAX_TRIALS as i64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioScore {
    pub scenario: String,
    pub score: f64,
    pub sla_hit_rate: f64,
    pub eta_p90_min: f64,
    pub remote_recovery_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderScore {
    pub provider: String,
    pub total_score: f64,
    /// One entry per scenario, in scenario order.
    pub by_scenario: Vec<ScenarioScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRanking {
    pub winner: Option<String>,
    pub ranking: Vec<ProviderScore>,
    pub scenarios: Vec<String>,
    pub weights: CompositeWeights,
}

/// `w_sla*hit + w_p90*clamp(1 - p90/120) + w_remote*clamp(remote/N)`.
pub fn composite_score(row: &ScoreboardRow, weights: &CompositeWeights) -> f64 {
    let p90_score = clamp01(1.0 - row.eta_p90_min / P90_SATURATION_MIN);
    let remote_share = if row.trials == 0 {
        0.0
    } else {
        clamp01(row.remote_recovery_count as f64 / row.trials as f64)
    };
    weights.w_sla * row.sla_hit_rate + weights.w_p90 * p90_score + weights.w_remote * remote_share
}

/// Rank `providers` over `scenarios` (the default three when empty).
///
/// Ties on total score keep provider input order.
pub fn rank(
    twins: &[Twin],
    providers: &[ProviderProfile],
    scenarios: &[Scenario],
    config: &RankingConfig,
) -> Result<ProviderRanking, FleetError> {
    config.validate()?;
    validate_providers(providers)?;

    let defaults;
    let scenarios = if scenarios.is_empty() {
        defaults = default_scenarios();
        &defaults[..]
    } else {
        scenarios
    };

    let mut ranking: Vec<ProviderScore> = providers
        .iter()
        .map(|p| ProviderScore {
            provider: p.name.clone(),
            total_score: 0.0,
            by_scenario: Vec::with_capacity(scenarios.len()),
        })
        .collect();

    for scenario in scenarios {
        let mut rng = seeded_rng(config.seed);
        let rows = simulate_in_provider_order(
            twins,
            providers,
            config.trials,
            scenario.traffic_mode,
            &mut rng,
        );
        for (entry, row) in ranking.iter_mut().zip(&rows) {
            let score = composite_score(row, &config.weights);
            entry.total_score += score;
            entry.by_scenario.push(ScenarioScore {
                scenario: scenario.name.clone(),
                score,
                sla_hit_rate: row.sla_hit_rate,
                eta_p90_min: row.eta_p90_min,
                remote_recovery_count: row.remote_recovery_count,
            });
        }
    }

    ranking.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
    let winner = ranking.first().map(|s| s.provider.clone());
    tracing::info!(
        providers = ranking.len(),
        scenarios = scenarios.len(),
        winner = winner.as_deref().unwrap_or("-"),
        "providers ranked"
    );

    Ok(ProviderRanking {
        winner,
        ranking,
        scenarios: scenarios.iter().map(|s| s.name.clone()).collect(),
        weights: config.weights,
    })
}
