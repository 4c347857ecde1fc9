//! dirsort - group the files of a directory by extension
//!
//! This library classifies the immediate files of a directory by their
//! lowercase extension and moves each into a subdirectory of that name.
//! Runs are idempotent, never overwrite or delete anything, and report a
//! per-entry outcome for every entry seen. Dry-run planning, filter rules
//! loaded from TOML, and undo of the last run are built on top.

pub mod category;
pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod history;
pub mod logging;
pub mod organizer;
pub mod output;
pub mod report;
pub mod sink;
pub mod undo;

pub use category::{CategoryKey, NO_EXTENSION_CATEGORY, classify};
pub use config::{CompiledFilters, FilterConfig};
pub use error::{CliError, ConfigError, OrganizeError, OrganizeResult};
pub use fs::{DirectoryEntry, EntryKind, FileSystem, LocalFileSystem};
pub use organizer::{DirectoryOrganizer, MoveOperation, OrganizePlan};
pub use report::{EntryReport, FailureReason, OrganizeReport, Outcome, OutcomeKind, SkipReason};
pub use sink::{NullSink, ReportSink, TracingSink};
pub use undo::{UndoManager, UndoReport};

pub use cli::{OrganizeCommand, run_cli};
