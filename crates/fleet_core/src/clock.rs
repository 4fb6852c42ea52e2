//! Injectable "now" for the scoring engines.
//!
//! Engines never read the system clock themselves; callers pass an instant
//! obtained from a [`Clock`], which lets tests pin time exactly.

use chrono::{DateTime, FixedOffset, Utc};

use crate::twin::{feed_offset, parse_stat_timestamp};

pub trait Clock: Send + Sync {
    /// Current instant in the feed's UTC+9 offset.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&feed_offset())
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl FixedClock {
    /// Build from a `YYYYMMDDHHMMSS` feed timestamp.
    pub fn from_stat_timestamp(raw: &str) -> Option<Self> {
        parse_stat_timestamp(raw).map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}
