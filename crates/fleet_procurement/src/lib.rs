//! Provider procurement analysis for fleet maintenance contracts.
//!
//! Simulates synthetic incidents over a twin pool, scores how each bidding
//! provider would have handled them, and ranks providers across traffic
//! scenarios.
//!
//! # Quick Start
//!
//! ```no_run
//! use fleet_procurement::{rank, ProviderProfile, RankingConfig};
//! use fleet_core::spatial::GeoPoint;
//!
//! let twins: Vec<fleet_core::twin::Twin> = Vec::new(); // from a SnapshotProvider
//! let providers = vec![
//!     ProviderProfile::new("Acme", GeoPoint::new(37.55, 126.98), 0.35, 60),
//!     ProviderProfile::new("Volt", GeoPoint::new(37.50, 127.03), 0.50, 45),
//! ];
//! let ranking = rank(&twins, &providers, &[], &RankingConfig::default()).unwrap();
//! println!("{:?}", ranking.winner);
//! ```
//!
//! # Architecture
//!
//! - [`provider`]: Provider profiles and validation
//! - [`simulator`]: Seeded Monte-Carlo incident simulation
//! - [`metrics`]: Scoreboard rows and percentile statistics
//! - [`ranking`]: Composite scoring across scenarios
//! - [`runner`]: Parallel seed replications using rayon
//! - [`export`]: CSV/JSON export

pub mod export;
pub mod metrics;
pub mod provider;
pub mod ranking;
pub mod runner;
pub mod simulator;

#[cfg(test)]
mod test_support;

pub use export::{export_ranking_to_csv, export_scoreboard_to_csv, export_to_json};
pub use metrics::ScoreboardRow;
pub use provider::ProviderProfile;
pub use ranking::{rank, CompositeWeights, ProviderRanking, RankingConfig, Scenario};
pub use runner::{run_replications, ReplicationSummary};
pub use simulator::{simulate, simulate_with_rng};
