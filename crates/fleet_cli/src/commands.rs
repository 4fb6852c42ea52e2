//! Subcommand handlers. Each returns the JSON document printed to stdout.

use std::path::Path;

use anyhow::{anyhow, bail, Context as _, Result};
use chrono::{DateTime, FixedOffset};
use fleet_core::autopilot::run_autopilot;
use fleet_core::planner::{assess_twin, plan, ActionPlan};
use fleet_core::priority::{prioritize, score, PriorityCandidate};
use fleet_core::routing::{create_route_strategy, route, RouteStrategyKind};
use fleet_core::snapshot::TwinSnapshot;
use fleet_core::traffic::TrafficMode;
use fleet_procurement::export::export_replications_to_csv;
use fleet_procurement::runner::run_replications;
use fleet_procurement::{
    export_ranking_to_csv, export_scoreboard_to_csv, export_to_json, rank, simulate, ScoreboardRow,
};
use serde::Serialize;
use serde_json::Value;

use crate::cli::Commands;
use crate::config::FleetConfig;

/// Everything a handler needs: the loaded twins, configuration and "now".
pub struct Context {
    pub snapshot: TwinSnapshot,
    pub config: FleetConfig,
    pub now: DateTime<FixedOffset>,
}

#[derive(Debug, Serialize)]
struct PlannedCandidate {
    candidate: PriorityCandidate,
    plan: ActionPlan,
}

#[derive(Debug, Serialize)]
struct PlanOutput {
    total_candidates: usize,
    sla_minutes: i64,
    cases: Vec<PlannedCandidate>,
}

#[derive(Debug, Serialize)]
struct SimulationOutput {
    traffic_mode: TrafficMode,
    trials: usize,
    seed: Option<u64>,
    scoreboard: Vec<ScoreboardRow>,
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

fn write_export(
    kind: &str,
    path: &Path,
    result: Result<(), Box<dyn std::error::Error>>,
) -> Result<()> {
    result.map_err(|err| anyhow!("{kind} export to {} failed: {err}", path.display()))?;
    tracing::info!(path = %path.display(), kind, "exported");
    Ok(())
}

/// Apply command-line overrides, validate, and run `command`.
pub fn run(ctx: &Context, command: Commands) -> Result<Value> {
    let mut config = ctx.config.clone();
    let twins = ctx.snapshot.twins();

    match command {
        Commands::Prioritize { top_n } => {
            if let Some(top_n) = top_n {
                config.priority.top_n = top_n;
            }
            let out = prioritize(twins, &config.priority, ctx.now)?;
            to_json(&out)
        }
        Commands::Plan { top_n, sla_minutes } => {
            if let Some(top_n) = top_n {
                config.priority.top_n = top_n;
            }
            if let Some(sla) = sla_minutes {
                config.plan.sla_minutes = sla;
            }
            config.plan.validate()?;
            let ranked = prioritize(twins, &config.priority, ctx.now)?;
            let sla = config.plan.sla();
            let cases = ranked
                .items
                .into_iter()
                .map(|candidate| {
                    let plan = plan(&candidate, config.plan.base, sla, config.plan.auto_level);
                    PlannedCandidate { candidate, plan }
                })
                .collect();
            to_json(&PlanOutput {
                total_candidates: ranked.total_candidates,
                sla_minutes: config.plan.sla_minutes,
                cases,
            })
        }
        Commands::Route {
            alpha,
            strategy,
            max_stops,
        } => {
            if let Some(alpha) = alpha {
                config.route.alpha = alpha;
            }
            if let Some(strategy) = strategy {
                config.route.strategy = strategy.into();
            }
            if let Some(max_stops) = max_stops {
                config.route.max_stops = max_stops;
            }
            config.route.validate()?;
            config.priority.scoring.validate()?;

            let mut candidates = score(twins, &config.priority.scoring, ctx.now);
            candidates.truncate(config.route.max_stops);
            let base = config.plan.base;
            let out = match config.route.strategy {
                RouteStrategyKind::NearestNeighbor => route(&candidates, base, config.route.alpha),
                kind => create_route_strategy(kind).plan(&candidates, base, config.route.alpha),
            };
            to_json(&out)
        }
        Commands::Autopilot { top_k, level } => {
            if let Some(top_k) = top_k {
                config.autopilot.auto_top_k = top_k;
            }
            if let Some(level) = level {
                config.autopilot.plan.auto_level = level.into();
            }
            let report = run_autopilot(twins, &config.autopilot, ctx.now)?;
            to_json(&report)
        }
        Commands::Assess {
            station_id,
            charger_id,
            mode,
        } => {
            if let Some(mode) = mode {
                config.assessment.traffic_mode = mode;
            }
            config.assessment.validate()?;
            let twin = twins
                .iter()
                .find(|t| {
                    t.station_id == station_id
                        && charger_id.as_deref().map_or(true, |c| t.charger_id == c)
                })
                .ok_or_else(|| anyhow!("no twin with station id {station_id}"))?;
            to_json(&assess_twin(twin, &config.assessment))
        }
        Commands::Simulate {
            trials,
            seed,
            mode,
            csv,
            json,
        } => {
            if let Some(trials) = trials {
                config.simulation.trials = trials;
            }
            if seed.is_some() {
                config.simulation.seed = seed;
            }
            if let Some(mode) = mode {
                config.simulation.traffic_mode = mode;
            }
            require_providers(&config)?;
            config.simulation.validate()?;
            fleet_procurement::provider::validate_providers(&config.providers)?;

            let sim = &config.simulation;
            let scoreboard = simulate(twins, &config.providers, sim.trials, sim.seed, sim.traffic_mode);
            if let Some(path) = csv.as_deref() {
                write_export("csv", path, export_scoreboard_to_csv(&scoreboard, path))?;
            }
            if let Some(path) = json.as_deref() {
                write_export("json", path, export_to_json(&scoreboard, path))?;
            }
            to_json(&SimulationOutput {
                traffic_mode: sim.traffic_mode,
                trials: sim.trials,
                seed: sim.seed,
                scoreboard,
            })
        }
        Commands::Rank {
            trials,
            seed,
            csv,
            json,
        } => {
            if let Some(trials) = trials {
                config.ranking.trials = trials;
            }
            if seed.is_some() {
                config.ranking.seed = seed;
            }
            require_providers(&config)?;
            let ranking = rank(twins, &config.providers, &config.scenarios, &config.ranking)?;
            if let Some(path) = csv.as_deref() {
                write_export("csv", path, export_ranking_to_csv(&ranking, path))?;
            }
            if let Some(path) = json.as_deref() {
                write_export("json", path, export_to_json(&ranking, path))?;
            }
            to_json(&ranking)
        }
        Commands::Replicate {
            trials,
            seed,
            mode,
            replications,
            progress,
            csv,
        } => {
            if let Some(trials) = trials {
                config.simulation.trials = trials;
            }
            if seed.is_some() {
                config.simulation.seed = seed;
            }
            if let Some(mode) = mode {
                config.simulation.traffic_mode = mode;
            }
            if let Some(replications) = replications {
                config.simulation.replications = replications;
            }
            require_providers(&config)?;
            config.simulation.validate()?;
            fleet_procurement::provider::validate_providers(&config.providers)?;

            let sim = &config.simulation;
            let seeds = sim.replication_seeds();
            let summaries = run_replications(
                twins,
                &config.providers,
                sim.trials,
                sim.traffic_mode,
                &seeds,
                progress,
            );
            if let Some(path) = csv.as_deref() {
                write_export("csv", path, export_replications_to_csv(&summaries, path))?;
            }
            to_json(&summaries)
        }
    }
}

fn require_providers(config: &FleetConfig) -> Result<()> {
    if config.providers.is_empty() {
        bail!("no providers configured: add a \"providers\" list to the --config file");
    }
    Ok(())
}

/// Load the configuration named on the command line, with context on failure.
pub fn load_config(path: Option<&Path>) -> Result<FleetConfig> {
    let config = FleetConfig::load(path).with_context(|| match path {
        Some(p) => format!("reading config {}", p.display()),
        None => "building default config".to_string(),
    })?;
    config.validate().context("invalid configuration")?;
    Ok(config)
}
