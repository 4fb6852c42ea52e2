use serde::Serialize;

use crate::ranking::ProviderRanking;

/// Flat records, header taken from the field names.
pub(crate) fn export_rows_impl<T: Serialize>(
    rows: &[T],
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(file);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub(crate) fn export_ranking_impl(
    ranking: &ProviderRanking,
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record([
        "rank",
        "provider",
        "total_score",
        "scenario",
        "score",
        "sla_hit_rate",
        "eta_p90_min",
        "remote_recovery_count",
    ])?;

    for (position, entry) in ranking.ranking.iter().enumerate() {
        for scenario in &entry.by_scenario {
            wtr.write_record([
                &(position + 1).to_string(),
                &entry.provider,
                &entry.total_score.to_string(),
                &scenario.scenario,
                &scenario.score.to_string(),
                &scenario.sla_hit_rate.to_string(),
                &scenario.eta_p90_min.to_string(),
                &scenario.remote_recovery_count.to_string(),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
