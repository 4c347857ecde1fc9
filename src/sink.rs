//! Reporting sinks observe an organize run as it happens.
//!
//! Sinks are purely observational: nothing they do feeds back into the
//! organizer's decisions.

use crate::report::{EntryReport, Outcome, OrganizeReport};
use std::path::Path;

/// Receives progress and outcome events from the organizer.
pub trait ReportSink {
    /// Called once the entries have been listed, before any is processed.
    fn started(&self, _directory: &Path, _entry_count: usize) {}

    /// Called after each entry reaches its outcome.
    fn record(&self, entry: &EntryReport);

    /// Called with the complete report before it is returned.
    fn finished(&self, _report: &OrganizeReport) {}
}

impl<T: ReportSink + ?Sized> ReportSink for &T {
    fn started(&self, directory: &Path, entry_count: usize) {
        (**self).started(directory, entry_count)
    }

    fn record(&self, entry: &EntryReport) {
        (**self).record(entry)
    }

    fn finished(&self, report: &OrganizeReport) {
        (**self).finished(report)
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ReportSink for NullSink {
    fn record(&self, _entry: &EntryReport) {}
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn started(&self, directory: &Path, entry_count: usize) {
        tracing::info!(directory = %directory.display(), entry_count, "organizing directory");
    }

    fn record(&self, entry: &EntryReport) {
        let category = entry.category.as_ref().map(|c| c.as_str()).unwrap_or("-");
        match &entry.outcome {
            Outcome::Moved { destination } => tracing::info!(
                entry = %entry.entry_name,
                category,
                destination = %destination.display(),
                "moved"
            ),
            Outcome::Skipped(reason) => tracing::debug!(
                entry = %entry.entry_name,
                category,
                %reason,
                "skipped"
            ),
            Outcome::Failed(reason) => tracing::warn!(
                entry = %entry.entry_name,
                category,
                %reason,
                "failed"
            ),
        }
    }

    fn finished(&self, report: &OrganizeReport) {
        let summary = report.summary();
        tracing::info!(
            directory = %report.directory().display(),
            total = summary.total,
            moved = summary.moved,
            skipped = summary.skipped,
            failed = summary.failed,
            "organize finished"
        );
    }
}
