//! Scoreboard and ranking export.
//!
//! CSV for spreadsheets, pretty JSON for everything else. Writers return
//! boxed errors; the CLI wraps them with the output path.

use std::path::Path;

use serde::Serialize;

use crate::metrics::ScoreboardRow;
use crate::ranking::ProviderRanking;
use crate::runner::ReplicationSummary;

#[path = "export/csv.rs"]
mod csv;
#[path = "export/json.rs"]
mod json;
#[path = "export/writer_utils.rs"]
mod writer_utils;

/// Export any serialisable result (scoreboard, ranking, summaries) as pretty JSON.
pub fn export_to_json<T: Serialize + ?Sized>(
    value: &T,
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = writer_utils::create_output_file(path)?;
    json::export_to_json_impl(value, file)
}

/// Export scoreboard rows, one line per provider.
///
/// # Errors
///
/// Returns an error if `rows` is empty or the file cannot be written.
pub fn export_scoreboard_to_csv(
    rows: &[ScoreboardRow],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    writer_utils::ensure_not_empty(rows)?;
    let file = writer_utils::create_output_file(path)?;
    csv::export_rows_impl(rows, file)
}

/// Export a ranking flattened to one line per (provider, scenario).
///
/// # Errors
///
/// Returns an error if the ranking has no providers or the file cannot be written.
pub fn export_ranking_to_csv(
    ranking: &ProviderRanking,
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    writer_utils::ensure_not_empty(&ranking.ranking)?;
    let file = writer_utils::create_output_file(path)?;
    csv::export_ranking_impl(ranking, file)
}

pub fn export_replications_to_csv(
    summaries: &[ReplicationSummary],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    writer_utils::ensure_not_empty(summaries)?;
    let file = writer_utils::create_output_file(path)?;
    csv::export_rows_impl(summaries, file)
}
