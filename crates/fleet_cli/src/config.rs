//! JSON configuration file for `fleetctl`.
//!
//! Every section is optional and falls back to the engine defaults, so an
//! empty object (or no file at all) is a valid configuration.

use std::path::Path;

use fleet_core::autopilot::AutopilotConfig;
use fleet_core::error::{check_range, ConfigError, FleetError};
use fleet_core::planner::{AssessmentParams, PlanParams};
use fleet_core::priority::PriorityConfig;
use fleet_core::routing::RouteConfig;
use fleet_core::traffic::TrafficMode;
use fleet_procurement::provider::validate_providers;
use fleet_procurement::ranking::MAX_TRIALS;
use fleet_procurement::{ProviderProfile, RankingConfig, Scenario};
use serde::{Deserialize, Serialize};

pub const MAX_REPLICATIONS: usize = 10_000;

/// Single-scenario simulation and replication settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub trials: usize,
    pub seed: Option<u64>,
    pub traffic_mode: TrafficMode,
    /// Seeds used by `replicate`: `seed.unwrap_or(0)..+replications`.
    pub replications: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: 80,
            seed: None,
            traffic_mode: TrafficMode::Normal,
            replications: 20,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("trials", self.trials as i64, 0, MAX_TRIALS as i64)?;
        check_range(
            "replications",
            self.replications as i64,
            0,
            MAX_REPLICATIONS as i64,
        )
    }

    pub fn replication_seeds(&self) -> Vec<u64> {
        let first = self.seed.unwrap_or(0);
        (0..self.replications as u64)
            .map(|i| first.wrapping_add(i))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    pub priority: PriorityConfig,
    pub plan: PlanParams,
    pub route: RouteConfig,
    pub autopilot: AutopilotConfig,
    pub assessment: AssessmentParams,
    pub providers: Vec<ProviderProfile>,
    /// Empty means free, normal and congested.
    pub scenarios: Vec<Scenario>,
    pub ranking: RankingConfig,
    pub simulation: SimulationConfig,
}

impl FleetConfig {
    /// Read `path`, or use defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, FleetError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)?;
        let config: FleetConfig = serde_json::from_str(&text)?;
        tracing::debug!(path = %path.display(), providers = config.providers.len(), "config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.priority.validate()?;
        self.plan.validate()?;
        self.route.validate()?;
        self.autopilot.validate()?;
        self.assessment.validate()?;
        validate_providers(&self.providers)?;
        self.ranking.validate()?;
        self.simulation.validate()
    }
}
