//! Twin snapshot capability.
//!
//! Engines consume an immutable [`TwinSnapshot`] handed to them by a
//! [`SnapshotProvider`]. How and when the provider refreshes its data is the
//! provider's business; each call returns a self-contained value and nothing
//! is cached behind the engines' backs.

use std::sync::Arc;

use serde_json::Value;

use crate::error::FleetError;
use crate::twin::Twin;

/// Immutable set of twins captured at one point in time.
#[derive(Debug, Clone, Default)]
pub struct TwinSnapshot {
    twins: Arc<[Twin]>,
}

impl TwinSnapshot {
    pub fn new(twins: Vec<Twin>) -> Self {
        Self {
            twins: twins.into(),
        }
    }

    pub fn twins(&self) -> &[Twin] {
        &self.twins
    }

    pub fn len(&self) -> usize {
        self.twins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.twins.is_empty()
    }
}

/// Source of twin snapshots.
pub trait SnapshotProvider: Send + Sync {
    fn snapshot(&self) -> Result<TwinSnapshot, FleetError>;
}

/// Provider serving the same in-memory snapshot on every call.
#[derive(Debug, Clone, Default)]
pub struct StaticSnapshot(TwinSnapshot);

impl StaticSnapshot {
    pub fn new(twins: Vec<Twin>) -> Self {
        Self(TwinSnapshot::new(twins))
    }
}

impl SnapshotProvider for StaticSnapshot {
    fn snapshot(&self) -> Result<TwinSnapshot, FleetError> {
        Ok(self.0.clone())
    }
}

fn decode_value(value: Value, position: usize) -> Option<Twin> {
    match serde_json::from_value::<Twin>(value) {
        Ok(twin) => Some(twin),
        Err(error) => {
            tracing::warn!(position, %error, "skipping undecodable twin record");
            None
        }
    }
}

/// Decode twins from JSON text.
///
/// Accepts a JSON array of twins, an object with an `items` array, or JSON
/// Lines (one twin per line). Records that are not objects are skipped; only
/// text that is not JSON at all is an error.
pub fn decode_twins(text: &str) -> Result<Vec<Twin>, FleetError> {
    let trimmed = text.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let whole = serde_json::from_str::<Value>(trimmed);
    let records = match whole {
        Ok(Value::Array(items)) => items,
        Ok(Value::Object(mut obj)) => match obj.remove("items") {
            Some(Value::Array(items)) => items,
            _ => vec![Value::Object(obj)],
        },
        Ok(other) => {
            tracing::warn!(kind = ?other, "twin document is not an array or object");
            Vec::new()
        }
        Err(whole_err) => {
            // Not a single document: try JSON Lines.
            let mut records = Vec::new();
            let mut parsed_any = false;
            for (line_no, line) in trimmed.lines().enumerate() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match serde_json::from_str::<Value>(line) {
                    Ok(value) => {
                        parsed_any = true;
                        records.push(value);
                    }
                    Err(error) => {
                        tracing::warn!(line = line_no + 1, %error, "skipping unreadable line");
                    }
                }
            }
            if !parsed_any {
                return Err(FleetError::Json(whole_err));
            }
            records
        }
    };

    Ok(records
        .into_iter()
        .enumerate()
        .filter_map(|(position, value)| decode_value(value, position))
        .collect())
}
