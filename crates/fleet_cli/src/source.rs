use std::path::PathBuf;

use fleet_core::error::FleetError;
use fleet_core::snapshot::{decode_twins, SnapshotProvider, TwinSnapshot};

/// Reads a fresh snapshot from a JSON / JSON Lines file on every call.
#[derive(Debug, Clone)]
pub struct FileSnapshot {
    path: PathBuf,
    recompute_derived: bool,
}

impl FileSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            recompute_derived: false,
        }
    }

    /// Rebuild every twin's derived health/risk from its signals on load.
    pub fn recompute_derived(mut self, enabled: bool) -> Self {
        self.recompute_derived = enabled;
        self
    }
}

impl SnapshotProvider for FileSnapshot {
    fn snapshot(&self) -> Result<TwinSnapshot, FleetError> {
        let text = std::fs::read_to_string(&self.path)
            .map_err(|err| FleetError::Snapshot(format!("{}: {err}", self.path.display())))?;
        let mut twins = decode_twins(&text)?;
        if self.recompute_derived {
            twins.iter_mut().for_each(|twin| twin.recompute_derived());
        }
        tracing::info!(
            path = %self.path.display(),
            twins = twins.len(),
            recomputed = self.recompute_derived,
            "twin snapshot loaded"
        );
        Ok(TwinSnapshot::new(twins))
    }
}
