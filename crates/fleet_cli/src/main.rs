mod cli;
mod commands;
mod config;
mod source;

use anyhow::{anyhow, Context as _, Result};
use clap::Parser;
use fleet_core::clock::{Clock, FixedClock, SystemClock};
use fleet_core::snapshot::SnapshotProvider;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::commands::{load_config, run, Context};
use crate::source::FileSnapshot;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let snapshot = FileSnapshot::new(&cli.twins)
        .recompute_derived(cli.recompute_derived)
        .snapshot()
        .context("loading twins")?;
    let now = match cli.now.as_deref() {
        Some(raw) => FixedClock::from_stat_timestamp(raw)
            .ok_or_else(|| anyhow!("--now must be YYYYMMDDHHMMSS, got {raw}"))?
            .now(),
        None => SystemClock.now(),
    };

    let ctx = Context {
        snapshot,
        config,
        now,
    };
    let output = run(&ctx, cli.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
