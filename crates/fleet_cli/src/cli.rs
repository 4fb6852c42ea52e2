use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use fleet_core::planner::AutoLevel;
use fleet_core::routing::RouteStrategyKind;
use fleet_core::traffic::TrafficMode;

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "fleetctl",
    version,
    about = "Fleet dispatch and provider procurement decisions for charger fleets",
    long_about = "Scores down chargers, plans field actions and crew routes, and\n\
                  simulates incident handling to rank maintenance providers.\n\
                  Results are printed to stdout as JSON; logs go to stderr."
)]
pub struct Cli {
    /// Twin snapshot: JSON array, {"items": [...]} object, or JSON Lines
    #[arg(long, global = true, env = "FLEET_TWINS", default_value = "twins.json")]
    pub twins: PathBuf,
    /// JSON configuration file (all sections optional)
    #[arg(long, global = true, env = "FLEET_CONFIG")]
    pub config: Option<PathBuf>,
    /// Reference time as YYYYMMDDHHMMSS in UTC+9 (defaults to the system clock)
    #[arg(long, global = true)]
    pub now: Option<String>,
    /// Recompute health, risk and downProb6h from each twin's signals
    #[arg(long, global = true)]
    pub recompute_derived: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank down units by urgency
    Prioritize {
        #[arg(long)]
        top_n: Option<usize>,
    },
    /// Rank down units and attach an action plan to each
    Plan {
        #[arg(long)]
        top_n: Option<usize>,
        #[arg(long)]
        sla_minutes: Option<i64>,
    },
    /// Order the most urgent units into a crew route
    Route {
        /// Congestion cost multiplier
        #[arg(long)]
        alpha: Option<f64>,
        #[arg(value_enum, long)]
        strategy: Option<StrategyArg>,
        #[arg(long)]
        max_stops: Option<usize>,
    },
    /// Score, pick the top K and plan each with its automation split
    Autopilot {
        #[arg(long)]
        top_k: Option<usize>,
        #[arg(value_enum, long)]
        level: Option<LevelArg>,
    },
    /// Quick risk-based verdict for one unit
    Assess {
        #[arg(long)]
        station_id: String,
        #[arg(long)]
        charger_id: Option<String>,
        #[arg(long)]
        mode: Option<TrafficMode>,
    },
    /// Simulate incidents for every configured provider under one traffic mode
    Simulate {
        #[arg(long, env = "FLEET_TRIALS")]
        trials: Option<usize>,
        #[arg(long, env = "FLEET_SEED")]
        seed: Option<u64>,
        #[arg(long)]
        mode: Option<TrafficMode>,
        /// Also write the scoreboard as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Also write the scoreboard as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Rank configured providers across traffic scenarios
    Rank {
        #[arg(long, env = "FLEET_TRIALS")]
        trials: Option<usize>,
        #[arg(long, env = "FLEET_SEED")]
        seed: Option<u64>,
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Repeat one simulation over many seeds in parallel
    Replicate {
        #[arg(long, env = "FLEET_TRIALS")]
        trials: Option<usize>,
        /// First seed; replications use consecutive seeds
        #[arg(long, env = "FLEET_SEED")]
        seed: Option<u64>,
        #[arg(long)]
        mode: Option<TrafficMode>,
        #[arg(long)]
        replications: Option<usize>,
        /// Show a progress bar on stderr
        #[arg(long)]
        progress: bool,
        /// Also write the per-provider summaries as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LevelArg {
    /// Remote diagnostics and resets only
    Safe,
    /// Also case handling and monitoring
    Assist,
}

impl From<LevelArg> for AutoLevel {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Safe => AutoLevel::Safe,
            LevelArg::Assist => AutoLevel::Assist,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    NearestNeighbor,
    TwoOpt,
}

impl From<StrategyArg> for RouteStrategyKind {
    fn from(strategy: StrategyArg) -> Self {
        match strategy {
            StrategyArg::NearestNeighbor => RouteStrategyKind::NearestNeighbor,
            StrategyArg::TwoOpt => RouteStrategyKind::TwoOpt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_route_flags() {
        let cli = Cli::try_parse_from([
            "fleetctl",
            "--twins",
            "fleet.json",
            "route",
            "--alpha",
            "0.6",
            "--strategy",
            "two-opt",
        ])
        .unwrap();
        match cli.command {
            Commands::Route {
                alpha, strategy, ..
            } => {
                assert_eq!(alpha, Some(0.6));
                assert!(matches!(strategy, Some(StrategyArg::TwoOpt)));
            }
            _ => panic!("expected route"),
        }
    }

    #[test]
    fn recompute_flag_is_global() {
        let cli = Cli::try_parse_from(["fleetctl", "prioritize", "--recompute-derived"]).unwrap();
        assert!(cli.recompute_derived);
        let cli = Cli::try_parse_from(["fleetctl", "prioritize"]).unwrap();
        assert!(!cli.recompute_derived);
    }

    #[test]
    fn parses_traffic_mode() {
        let cli = Cli::try_parse_from(["fleetctl", "simulate", "--mode", "congested", "--seed", "42"])
            .unwrap();
        match cli.command {
            Commands::Simulate { mode, seed, .. } => {
                assert_eq!(mode, Some(TrafficMode::Congested));
                assert_eq!(seed, Some(42));
            }
            _ => panic!("expected simulate"),
        }
    }
}
