/// Undo functionality for reverting the last organize run.
///
/// Moves files back to where they were, replaying the recorded
/// [`OperationLog`] in reverse.
use crate::error::{OrganizeError, OrganizeResult};
use crate::fs::FileSystem;
use crate::history::{Operation, OperationLog};
use std::path::{Path, PathBuf};

/// Represents the result of an undo operation.
#[derive(Debug, Default)]
pub struct UndoReport {
    /// Number of files successfully restored.
    pub restored_files: usize,
    /// Files that could not be restored, with the reason.
    pub failed_restores: Vec<(PathBuf, String)>,
    /// Files that were no longer where the run left them.
    pub skipped_files: Vec<(PathBuf, String)>,
}

impl UndoReport {
    pub fn total_processed(&self) -> usize {
        self.restored_files + self.failed_restores.len() + self.skipped_files.len()
    }

    /// Returns true if the undo was completely successful.
    pub fn is_complete_success(&self) -> bool {
        self.failed_restores.is_empty() && self.skipped_files.is_empty()
    }
}

enum RestoreError {
    Missing(PathBuf, String),
    Failed(PathBuf, String),
}

/// Manages undo operations for organize runs.
pub struct UndoManager;

impl UndoManager {
    /// Undoes the most recent organize run in `base_path`.
    ///
    /// Operations are reversed last-first. A file that is gone from its
    /// organized location is skipped. If something now occupies a file's
    /// original location, that occupant is renamed aside with a timestamp
    /// suffix first; nothing is overwritten. The history file is deleted only
    /// when every file was restored.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dirsort::fs::LocalFileSystem;
    /// use dirsort::undo::UndoManager;
    /// use std::path::Path;
    ///
    /// match UndoManager::undo(&LocalFileSystem, Path::new("/path/to/directory")) {
    ///     Ok(report) => println!("Restored {} files", report.restored_files),
    ///     Err(e) => eprintln!("Undo failed: {}", e),
    /// }
    /// ```
    pub fn undo<F: FileSystem>(fs: &F, base_path: &Path) -> OrganizeResult<UndoReport> {
        if !fs.is_dir(base_path) {
            return Err(OrganizeError::DirectoryNotFound {
                path: base_path.to_path_buf(),
            });
        }

        let log = OperationLog::load(base_path)?.ok_or_else(|| OrganizeError::NoHistory {
            path: base_path.to_path_buf(),
        })?;
        tracing::info!(
            directory = %base_path.display(),
            operations = log.operations.len(),
            recorded = %log.timestamp,
            "undoing organize run"
        );

        let mut report = UndoReport::default();
        for operation in log.operations.iter().rev() {
            match Self::restore_file(fs, operation) {
                Ok(()) => report.restored_files += 1,
                Err(RestoreError::Missing(path, reason)) => {
                    tracing::debug!(path = %path.display(), %reason, "skipped restore");
                    report.skipped_files.push((path, reason));
                }
                Err(RestoreError::Failed(path, reason)) => {
                    tracing::warn!(path = %path.display(), %reason, "restore failed");
                    report.failed_restores.push((path, reason));
                }
            }
        }

        if report.is_complete_success()
            && let Err(e) = OperationLog::delete(base_path)
        {
            tracing::warn!(error = %e, "could not delete history file");
        }

        Ok(report)
    }

    fn restore_file<F: FileSystem>(fs: &F, operation: &Operation) -> Result<(), RestoreError> {
        if !fs.exists(&operation.new_path) {
            return Err(RestoreError::Missing(
                operation.new_path.clone(),
                "File not found at expected location".to_string(),
            ));
        }

        if fs.exists(&operation.original_path) {
            let backup_path = Self::generate_backup_path(&operation.original_path);
            fs.move_entry(&operation.original_path, &backup_path)
                .map_err(|e| {
                    RestoreError::Failed(
                        operation.original_path.clone(),
                        format!("Could not backup conflicting file: {}", e),
                    )
                })?;
            tracing::info!(
                original = %operation.original_path.display(),
                backup = %backup_path.display(),
                "backed up conflicting file"
            );
        }

        fs.move_entry(&operation.new_path, &operation.original_path)
            .map_err(|e| {
                RestoreError::Failed(
                    operation.new_path.clone(),
                    format!("Failed to restore file: {}", e),
                )
            })
    }

    /// Generates a backup path for a file by appending a timestamp.
    ///
    /// Example: `file.txt` becomes `file.txt.bak.20251109-143052`
    fn generate_backup_path(original_path: &Path) -> PathBuf {
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let filename = original_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file");

        let backup_name = format!("{}.bak.{}", filename, timestamp);

        match original_path.parent() {
            Some(parent) => parent.join(backup_name),
            None => PathBuf::from(backup_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::LocalFileSystem;
    use crate::organizer::DirectoryOrganizer;
    use crate::sink::NullSink;
    use std::fs;
    use tempfile::TempDir;

    fn organize_and_record(base_path: &Path) {
        let organizer = DirectoryOrganizer::new(LocalFileSystem, NullSink);
        let report = organizer.organize(base_path).expect("Organize failed");
        OperationLog::from_report(&report)
            .save(base_path)
            .expect("Failed to save history");
    }

    #[test]
    fn test_undo_no_history() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let result = UndoManager::undo(&LocalFileSystem, temp_dir.path());
        assert!(matches!(result, Err(OrganizeError::NoHistory { .. })));
    }

    #[test]
    fn test_undo_restores_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::write(base_path.join("image.png"), "image data").unwrap();
        fs::write(base_path.join("notes.txt"), "text").unwrap();

        organize_and_record(base_path);
        assert!(base_path.join("png/image.png").exists());

        let report = UndoManager::undo(&LocalFileSystem, base_path).expect("Undo failed");

        assert_eq!(report.restored_files, 2);
        assert!(report.is_complete_success());
        assert!(base_path.join("image.png").is_file());
        assert!(base_path.join("notes.txt").is_file());
        assert!(!base_path.join("png/image.png").exists());
        assert!(!OperationLog::history_file_path(base_path).exists());
    }

    #[test]
    fn test_undo_with_file_name_conflict() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let file_path = base_path.join("test.txt");
        fs::write(&file_path, "original content").unwrap();

        organize_and_record(base_path);

        // Something new took the original slot
        fs::write(&file_path, "new content").unwrap();

        let report = UndoManager::undo(&LocalFileSystem, base_path).expect("Undo failed");

        assert_eq!(report.restored_files, 1);
        assert!(report.failed_restores.is_empty());
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "original content");

        let backups: Vec<_> = fs::read_dir(base_path)
            .unwrap()
            .flatten()
            .filter(|e| e.file_name().to_string_lossy().starts_with("test.txt.bak."))
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(
            fs::read_to_string(backups[0].path()).unwrap(),
            "new content"
        );
    }

    #[test]
    fn test_undo_with_missing_file_keeps_history() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        let mut log = OperationLog::new(base_path.to_path_buf());
        log.add_operation(Operation {
            original_path: base_path.join("gone.txt"),
            new_path: base_path.join("txt").join("gone.txt"),
            category: "txt".to_string(),
        });
        log.save(base_path).unwrap();

        let report = UndoManager::undo(&LocalFileSystem, base_path).expect("Undo failed");

        assert_eq!(report.restored_files, 0);
        assert_eq!(report.skipped_files.len(), 1);
        assert_eq!(report.total_processed(), 1);
        assert!(OperationLog::history_file_path(base_path).exists());
    }

    #[test]
    fn test_undo_invalid_base_path() {
        let result = UndoManager::undo(&LocalFileSystem, Path::new("/non/existent/path"));
        assert!(matches!(
            result,
            Err(OrganizeError::DirectoryNotFound { .. })
        ));
    }
}
