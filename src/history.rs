//! Persisted record of the moves made by one organize run.
//!
//! The log lives next to the organized files, in [`HISTORY_FILE_NAME`], and
//! is what [`UndoManager`](crate::undo::UndoManager) replays in reverse.

use crate::error::{OrganizeError, OrganizeResult};
use crate::report::{OrganizeReport, Outcome};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the history log inside an organized directory.
pub const HISTORY_FILE_NAME: &str = ".dirsort_history.json";

/// One file moved during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub original_path: PathBuf,
    pub new_path: PathBuf,
    pub category: String,
}

/// All moves of a single run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationLog {
    /// RFC 3339 timestamp of the run.
    pub timestamp: String,
    pub base_path: PathBuf,
    pub operations: Vec<Operation>,
}

impl OperationLog {
    /// Creates an empty log for a given base path.
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            base_path,
            operations: Vec::new(),
        }
    }

    /// Builds a log from the `Moved` entries of a report.
    ///
    /// Moves of files whose names are not valid UTF-8 are left out.
    pub fn from_report(report: &OrganizeReport) -> Self {
        let mut log = Self::new(report.directory().to_path_buf());
        for entry in report.entries() {
            let Outcome::Moved { destination } = &entry.outcome else {
                continue;
            };
            // JSON cannot hold paths that are not valid UTF-8
            if destination.to_str().is_none() {
                tracing::warn!(
                    entry = %entry.entry_name,
                    "file name is not valid UTF-8, move will not be undoable"
                );
                continue;
            }
            // The destination keeps the exact on-disk file name
            if let Some(file_name) = destination.file_name() {
                log.add_operation(Operation {
                    original_path: report.directory().join(file_name),
                    new_path: destination.clone(),
                    category: entry
                        .category
                        .as_ref()
                        .map(|c| c.to_string())
                        .unwrap_or_default(),
                });
            }
        }
        log
    }

    pub fn add_operation(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Returns the path to the history file for this base path.
    pub fn history_file_path(base_path: &Path) -> PathBuf {
        base_path.join(HISTORY_FILE_NAME)
    }

    /// Saves this log as JSON, replacing any previous log.
    pub fn save(&self, base_path: &Path) -> OrganizeResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            OrganizeError::HistoryWriteFailed {
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("JSON serialization failed: {}", e),
                ),
            }
        })?;

        let history_path = Self::history_file_path(base_path);
        fs::write(&history_path, json)
            .map_err(|e| OrganizeError::HistoryWriteFailed { source: e })?;
        tracing::debug!(
            path = %history_path.display(),
            operations = self.operations.len(),
            "saved history"
        );
        Ok(())
    }

    /// Loads the most recent log, if there is one.
    pub fn load(base_path: &Path) -> OrganizeResult<Option<Self>> {
        let history_path = Self::history_file_path(base_path);
        if !history_path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&history_path)
            .map_err(|e| OrganizeError::HistoryReadFailed { source: e })?;
        let log = serde_json::from_str(&json).map_err(|e| OrganizeError::InvalidHistoryFormat {
            reason: format!("JSON parse error: {}", e),
        })?;
        Ok(Some(log))
    }

    /// Deletes the history file for a given base path, if present.
    pub fn delete(base_path: &Path) -> OrganizeResult<()> {
        let history_path = Self::history_file_path(base_path);
        if history_path.exists() {
            fs::remove_file(&history_path)
                .map_err(|e| OrganizeError::HistoryWriteFailed { source: e })?;
        }
        Ok(())
    }
}
