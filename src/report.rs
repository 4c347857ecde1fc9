//! Per-entry outcomes of an organize run.
//!
//! An [`OrganizeReport`] accounts for every top-level entry seen at scan time,
//! each exactly once, in the order the entries were processed.

use crate::category::CategoryKey;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Why an entry was left where it was without being an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Directories are destination candidates and are never moved.
    IsDirectory,
    /// The organized directory is already named after the entry's category.
    AlreadyOrganized,
    /// A filter rule rejected the entry.
    Excluded,
    /// The entry is the organizer's own undo history file.
    History,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SkipReason::IsDirectory => "is a directory",
            SkipReason::AlreadyOrganized => "already organized",
            SkipReason::Excluded => "excluded by filter",
            SkipReason::History => "undo history",
        };
        f.write_str(reason)
    }
}

/// Why moving an entry failed. The source is left untouched in every case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// A file with the same name already exists in the destination directory.
    DestinationCollision,
    /// The category directory could not be created.
    CreateDirectory(String),
    /// The move itself failed.
    Move(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::DestinationCollision => f.write_str("destination collision"),
            FailureReason::CreateDirectory(detail) => {
                write!(f, "could not create directory: {}", detail)
            }
            FailureReason::Move(detail) => write!(f, "move failed: {}", detail),
        }
    }
}

/// The terminal result for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The entry now lives at `destination`.
    Moved { destination: PathBuf },
    Skipped(SkipReason),
    Failed(FailureReason),
}

/// Outcome discriminant, as rendered in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OutcomeKind {
    Moved,
    Skipped,
    Failed,
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            OutcomeKind::Moved => "Moved",
            OutcomeKind::Skipped => "Skipped",
            OutcomeKind::Failed => "Failed",
        };
        f.write_str(kind)
    }
}

impl Outcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Moved { .. } => OutcomeKind::Moved,
            Outcome::Skipped(_) => OutcomeKind::Skipped,
            Outcome::Failed(_) => OutcomeKind::Failed,
        }
    }

    /// Human-readable reason for skipped and failed outcomes.
    pub fn reason(&self) -> Option<String> {
        match self {
            Outcome::Moved { .. } => None,
            Outcome::Skipped(reason) => Some(reason.to_string()),
            Outcome::Failed(reason) => Some(reason.to_string()),
        }
    }

    pub fn is_moved(&self) -> bool {
        matches!(self, Outcome::Moved { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

/// What happened to a single entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryReport {
    /// The entry's name inside the organized directory.
    pub entry_name: String,
    /// The entry's category. `None` for directories.
    pub category: Option<CategoryKey>,
    #[serde(rename = "outcome", serialize_with = "serialize_outcome_kind")]
    pub outcome: Outcome,
}

fn serialize_outcome_kind<S: serde::Serializer>(
    outcome: &Outcome,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    outcome.kind().serialize(serializer)
}

impl EntryReport {
    pub fn new(
        entry_name: impl Into<String>,
        category: Option<CategoryKey>,
        outcome: Outcome,
    ) -> Self {
        Self {
            entry_name: entry_name.into(),
            category,
            outcome,
        }
    }
}

/// Outcome counts for a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub moved: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Ordered per-entry outcomes of one organize run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizeReport {
    directory: PathBuf,
    entries: Vec<EntryReport>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EntryRecord<'a> {
    entry_name: &'a str,
    category: Option<&'a str>,
    outcome: OutcomeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    destination: Option<&'a Path>,
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    directory: &'a Path,
    entries: Vec<EntryRecord<'a>>,
    summary: ReportSummary,
}

impl OrganizeReport {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            entries: Vec::new(),
        }
    }

    /// Appends the outcome of the next entry.
    pub fn push(&mut self, entry: EntryReport) {
        self.entries.push(entry);
    }

    /// The directory that was organized.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn entries(&self) -> &[EntryReport] {
        &self.entries
    }

    /// Looks up the outcome of an entry by name.
    pub fn entry(&self, name: &str) -> Option<&EntryReport> {
        self.entries.iter().find(|e| e.entry_name == name)
    }

    /// Iterates over entries whose outcome has the given kind.
    pub fn with_outcome(&self, kind: OutcomeKind) -> impl Iterator<Item = &EntryReport> {
        self.entries
            .iter()
            .filter(move |e| e.outcome.kind() == kind)
    }

    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary {
            total: self.entries.len(),
            ..Default::default()
        };
        for entry in &self.entries {
            match entry.outcome.kind() {
                OutcomeKind::Moved => summary.moved += 1,
                OutcomeKind::Skipped => summary.skipped += 1,
                OutcomeKind::Failed => summary.failed += 1,
            }
        }
        summary
    }

    /// Returns true if no entry failed.
    pub fn is_success(&self) -> bool {
        !self.entries.iter().any(|e| e.outcome.is_failed())
    }

    /// Number of moved files per category, sorted by category.
    pub fn moved_by_category(&self) -> BTreeMap<CategoryKey, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            if entry.outcome.is_moved()
                && let Some(category) = &entry.category
            {
                *counts.entry(category.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Renders the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let document = ReportDocument {
            directory: &self.directory,
            entries: self
                .entries
                .iter()
                .map(|e| EntryRecord {
                    entry_name: &e.entry_name,
                    category: e.category.as_ref().map(CategoryKey::as_str),
                    outcome: e.outcome.kind(),
                    reason: e.outcome.reason(),
                    destination: match &e.outcome {
                        Outcome::Moved { destination } => Some(destination.as_path()),
                        _ => None,
                    },
                })
                .collect(),
            summary: self.summary(),
        };
        serde_json::to_string_pretty(&document)
    }
}
