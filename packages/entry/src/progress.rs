//! Import progress reporting.
//!
//! [`EntryImporter::write_entries`](crate::EntryImporter::write_entries)
//! counts progress in written nodes, two per record, and labels each step
//! with the record index, its classification and the normalized street.

use std::sync::Arc;

/// Receives updates from an import run.
///
/// Shared as `Arc<dyn ProgressCallback>` with the blocking writer task,
/// hence `Send + Sync`.
pub trait ProgressCallback: Send + Sync {
    /// Number of nodes the batch will write.
    fn set_total(&self, nodes: u64);

    /// `nodes` more were written.
    fn inc(&self, nodes: u64);

    /// Describes the record just written, e.g. `"#3 Street Address: Elm Avenue"`.
    fn set_message(&self, msg: String);

    /// The batch completed.
    fn finish(&self, summary: String);
}

/// Ignores every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _nodes: u64) {}
    fn inc(&self, _nodes: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _summary: String) {}
}

#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
