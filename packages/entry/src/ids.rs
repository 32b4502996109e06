//! Node id allocation and timestamps.

use chrono::{DateTime, Utc};

/// Format of [`GeoEntry::timestamp`](nominatim_import_entry_models::GeoEntry).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Hands out consecutive id pairs for one import run.
///
/// Each record consumes two ids: `n` for the primary node and `n + 1`
/// for the place node. The counter is owned by a single run; concurrent
/// runs need their own counters seeded with non-overlapping bases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryIdCounter {
    next: i64,
}

impl EntryIdCounter {
    #[must_use]
    pub const fn new(base: i64) -> Self {
        Self { next: base }
    }

    /// Seeds the counter from the current wall-clock time in
    /// milliseconds.
    #[must_use]
    pub fn from_clock() -> Self {
        Self::new(Utc::now().timestamp_millis())
    }

    /// The id the next pair will start at.
    #[must_use]
    pub const fn peek(&self) -> i64 {
        self.next
    }

    /// Returns `(n, n + 1)` and advances by two.
    pub const fn next_pair(&mut self) -> (i64, i64) {
        let id = self.next;
        self.next += 2;
        (id, id + 1)
    }
}

#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Current UTC time in [`TIMESTAMP_FORMAT`].
#[must_use]
pub fn timestamp_now() -> String {
    format_timestamp(Utc::now())
}
