//! Regrouping a directory's files into per-extension subdirectories.
//!
//! [`DirectoryOrganizer::organize`] lists the immediate entries of a
//! directory, classifies every file by extension and moves it into a
//! subdirectory named after its category. Entries are handled one at a time,
//! in lexicographic order, and every entry ends up in the returned
//! [`OrganizeReport`] with exactly one outcome.
//!
//! Nothing is ever deleted or overwritten: a move whose destination is taken
//! is recorded as `Failed: destination collision` and the source stays put.

use crate::category::{CategoryKey, classify};
use crate::config::CompiledFilters;
use crate::error::{OrganizeError, OrganizeResult};
use crate::fs::{DirectoryEntry, FileSystem};
use crate::history::HISTORY_FILE_NAME;
use crate::report::{EntryReport, FailureReason, OrganizeReport, Outcome, SkipReason};
use crate::sink::ReportSink;
use std::io;
use std::path::{Path, PathBuf};

/// A planned move of one file into its category directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOperation {
    /// Entry name inside the organized directory.
    pub source: String,
    pub source_path: PathBuf,
    /// Category the file is grouped under, also the destination directory name.
    pub destination_dir: CategoryKey,
    pub destination_path: PathBuf,
}

/// What `organize` would do with an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedAction {
    Move(MoveOperation),
    Skip(SkipReason),
    /// The destination is already occupied, so the move would fail.
    Collision(MoveOperation),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEntry {
    pub entry_name: String,
    pub category: Option<CategoryKey>,
    pub action: PlannedAction,
}

/// Read-only preview of an organize run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizePlan {
    pub directory: PathBuf,
    pub entries: Vec<PlannedEntry>,
}

impl OrganizePlan {
    /// Planned moves, in processing order.
    pub fn moves(&self) -> impl Iterator<Item = &MoveOperation> {
        self.entries.iter().filter_map(|e| match &e.action {
            PlannedAction::Move(op) => Some(op),
            _ => None,
        })
    }

    /// Planned moves that would fail on an occupied destination.
    pub fn collisions(&self) -> impl Iterator<Item = &MoveOperation> {
        self.entries.iter().filter_map(|e| match &e.action {
            PlannedAction::Collision(op) => Some(op),
            _ => None,
        })
    }
}

/// Groups the files of a directory by extension.
///
/// The organizer holds no state between runs. It talks to the disk only
/// through its [`FileSystem`] and reports through its [`ReportSink`].
///
/// # Examples
///
/// ```no_run
/// use dirsort::fs::LocalFileSystem;
/// use dirsort::organizer::DirectoryOrganizer;
/// use dirsort::sink::TracingSink;
/// use std::path::Path;
///
/// let organizer = DirectoryOrganizer::new(LocalFileSystem, TracingSink);
/// match organizer.organize(Path::new("/home/user/Downloads")) {
///     Ok(report) => println!("{} files moved", report.summary().moved),
///     Err(e) => eprintln!("Organization failed: {}", e),
/// }
/// ```
pub struct DirectoryOrganizer<F, S> {
    fs: F,
    sink: S,
    filters: CompiledFilters,
}

impl<F: FileSystem, S: ReportSink> DirectoryOrganizer<F, S> {
    /// Creates an organizer that considers every entry.
    pub fn new(fs: F, sink: S) -> Self {
        Self {
            fs,
            sink,
            filters: CompiledFilters::allow_all(),
        }
    }

    /// Restricts which files may be moved. Rejected files are reported as skipped.
    pub fn with_filters(mut self, filters: CompiledFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn file_system(&self) -> &F {
        &self.fs
    }

    /// Regroups the immediate files of `directory` into per-extension subdirectories.
    ///
    /// Fails with [`OrganizeError::DirectoryNotFound`] if `directory` is not an
    /// existing directory, before touching anything. All per-entry problems
    /// are recorded in the report and never abort the batch.
    pub fn organize(&self, directory: &Path) -> OrganizeResult<OrganizeReport> {
        let OrganizePlan { directory, entries } = self.plan(directory)?;
        let mut report = OrganizeReport::new(directory.clone());

        self.sink.started(&directory, entries.len());
        for planned in entries {
            let outcome = match planned.action {
                PlannedAction::Skip(reason) => Outcome::Skipped(reason),
                PlannedAction::Move(op) | PlannedAction::Collision(op) => self.execute(&op),
            };
            let entry = EntryReport::new(planned.entry_name, planned.category, outcome);
            self.sink.record(&entry);
            report.push(entry);
        }
        self.sink.finished(&report);

        Ok(report)
    }

    /// Classifies every entry of `directory` without changing anything.
    ///
    /// The plan refers to the directory by its canonical path, so `.` and
    /// `..` components never hide the directory's own name.
    pub fn plan(&self, directory: &Path) -> OrganizeResult<OrganizePlan> {
        if !self.fs.is_dir(directory) {
            return Err(OrganizeError::DirectoryNotFound {
                path: directory.to_path_buf(),
            });
        }
        let resolved = self
            .fs
            .canonicalize(directory)
            .map_err(|e| OrganizeError::ResolveFailed {
                path: directory.to_path_buf(),
                source: e,
            })?;
        let directory = resolved.as_path();

        let mut entries =
            self.fs
                .list_entries(directory)
                .map_err(|e| OrganizeError::ListFailed {
                    path: directory.to_path_buf(),
                    source: e,
                })?;
        entries.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.file_name.cmp(&b.file_name))
        });
        tracing::debug!(directory = %directory.display(), count = entries.len(), "listed entries");

        // A directory named after a category holds files that are already organized
        let own_name = directory
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());

        let entries = entries
            .into_iter()
            .map(|entry| self.plan_entry(directory, own_name.as_deref(), entry))
            .collect();

        Ok(OrganizePlan {
            directory: directory.to_path_buf(),
            entries,
        })
    }

    fn plan_entry(
        &self,
        directory: &Path,
        own_name: Option<&str>,
        entry: DirectoryEntry,
    ) -> PlannedEntry {
        if entry.is_directory() {
            return PlannedEntry {
                entry_name: entry.name,
                category: None,
                action: PlannedAction::Skip(SkipReason::IsDirectory),
            };
        }

        let category = classify(&entry.name);
        let action = if entry.name == HISTORY_FILE_NAME {
            PlannedAction::Skip(SkipReason::History)
        } else if !self.filters.should_include(&entry.name) {
            PlannedAction::Skip(SkipReason::Excluded)
        } else if own_name == Some(category.dir_name()) {
            PlannedAction::Skip(SkipReason::AlreadyOrganized)
        } else {
            let destination_dir = directory.join(category.dir_name());
            let op = MoveOperation {
                source_path: directory.join(&entry.file_name),
                destination_path: destination_dir.join(&entry.file_name),
                source: entry.name.clone(),
                destination_dir: category.clone(),
            };
            if self.fs.exists(&op.destination_path) {
                PlannedAction::Collision(op)
            } else {
                PlannedAction::Move(op)
            }
        };

        tracing::debug!(entry = %entry.name, %category, ?action, "planned entry");
        PlannedEntry {
            entry_name: entry.name,
            category: Some(category),
            action,
        }
    }

    /// Ensures the category directory exists, then moves one file into it.
    fn execute(&self, op: &MoveOperation) -> Outcome {
        let destination_dir = op
            .destination_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        if let Err(e) = self.fs.make_directory(&destination_dir, true) {
            return Outcome::Failed(FailureReason::CreateDirectory(e.to_string()));
        }

        // Checked again here: an earlier move in this run may have filled the slot
        if self.fs.exists(&op.destination_path) {
            return Outcome::Failed(FailureReason::DestinationCollision);
        }

        match self.fs.move_entry(&op.source_path, &op.destination_path) {
            Ok(()) => Outcome::Moved {
                destination: op.destination_path.clone(),
            },
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                Outcome::Failed(FailureReason::DestinationCollision)
            }
            Err(e) => Outcome::Failed(FailureReason::Move(e.to_string())),
        }
    }
}
