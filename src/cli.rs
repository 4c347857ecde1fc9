//! Command-line interface module for dirsort.
//!
//! This module handles:
//! - Argument parsing
//! - Loading filter configuration
//! - Organization, dry-run and undo orchestration
//! - Saving the history that undo relies on

use crate::config::{CompiledFilters, FilterConfig};
use crate::error::CliError;
use crate::fs::LocalFileSystem;
use crate::history::OperationLog;
use crate::organizer::DirectoryOrganizer;
use crate::output::{ConsoleSink, OutputFormatter};
use crate::report::OrganizeReport;
use crate::sink::{ReportSink, TracingSink};
use crate::undo::UndoManager;
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};

/// Group the files of a directory into per-extension subdirectories.
#[derive(Debug, Parser)]
#[command(name = "dirsort", version, about)]
pub struct Cli {
    /// Directory to organize
    pub directory: PathBuf,

    /// Show what would be moved without changing anything
    #[arg(long, conflicts_with = "undo")]
    pub dry_run: bool,

    /// Move the files of the last run back where they were
    #[arg(long)]
    pub undo: bool,

    /// Filter configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the report as JSON instead of the console summary
    #[arg(long, conflicts_with_all = ["dry_run", "undo"])]
    pub json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    pub fn command(&self) -> OrganizeCommand {
        if self.undo {
            OrganizeCommand::Undo
        } else {
            OrganizeCommand::Organize {
                dry_run: self.dry_run,
            }
        }
    }

    pub fn format(&self) -> ReportFormat {
        if self.json {
            ReportFormat::Json
        } else {
            ReportFormat::Console
        }
    }
}

/// Represents a CLI command to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizeCommand {
    /// Organize files in a directory.
    Organize {
        /// If true, only print the plan.
        dry_run: bool,
    },
    /// Undo the previous organization.
    Undo,
}

/// How a finished organize run is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Console,
    Json,
}

/// Whether every entry made it through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    /// Some entries failed; the count is included.
    EntriesFailed(usize),
}

impl RunStatus {
    pub fn exit_code(self) -> u8 {
        match self {
            RunStatus::Success => 0,
            RunStatus::EntriesFailed(_) => 1,
        }
    }
}

/// Runs a command with configuration discovered the default way.
///
/// # Examples
///
/// ```no_run
/// use dirsort::cli::{run_cli, OrganizeCommand};
/// use std::path::Path;
///
/// let result = run_cli(OrganizeCommand::Organize { dry_run: false }, Path::new("/path/to/directory"));
/// match result {
///     Ok(status) => println!("Finished: {:?}", status),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(command: OrganizeCommand, dir_path: &Path) -> Result<RunStatus, CliError> {
    run_cli_with_config(command, dir_path, None, ReportFormat::Console)
}

/// Runs a command with an optional explicit configuration file.
pub fn run_cli_with_config(
    command: OrganizeCommand,
    dir_path: &Path,
    config_path: Option<&Path>,
    format: ReportFormat,
) -> Result<RunStatus, CliError> {
    match command {
        OrganizeCommand::Organize { dry_run: true } => {
            let filters = load_filters(config_path)?;
            organize_dry_run(dir_path, filters)
        }
        OrganizeCommand::Organize { dry_run: false } => {
            let filters = load_filters(config_path)?;
            organize_directory(dir_path, filters, format)
        }
        OrganizeCommand::Undo => undo_organization(dir_path),
    }
}

fn load_filters(config_path: Option<&Path>) -> Result<CompiledFilters, CliError> {
    Ok(FilterConfig::load(config_path)?.compile()?)
}

/// Organizes the directory, saves the history and prints the report.
fn organize_directory(
    base_path: &Path,
    filters: CompiledFilters,
    format: ReportFormat,
) -> Result<RunStatus, CliError> {
    let report = match format {
        ReportFormat::Console => organize_with(base_path, filters, ConsoleSink::new())?,
        ReportFormat::Json => organize_with(base_path, filters, TracingSink)?,
    };

    let log = OperationLog::from_report(&report);
    // An empty run must not replace the history of the run before it
    if !log.is_empty()
        && let Err(e) = log.save(base_path)
    {
        tracing::warn!(error = %e, "could not save history");
        if format == ReportFormat::Console {
            OutputFormatter::warning(&format!("Could not save history: {}", e));
            OutputFormatter::warning("Undo will not be available for this run.");
        }
    }

    match format {
        ReportFormat::Console => {
            OutputFormatter::print_report(&report);
            if !log.is_empty() {
                OutputFormatter::plain(&format!(
                    "Use 'dirsort {} --undo' to revert changes.",
                    base_path.display()
                ));
            }
        }
        ReportFormat::Json => println!("{}", report.to_json()?),
    }

    let failed = report.summary().failed;
    Ok(if failed == 0 {
        RunStatus::Success
    } else {
        RunStatus::EntriesFailed(failed)
    })
}

fn organize_with<S: ReportSink>(
    base_path: &Path,
    filters: CompiledFilters,
    sink: S,
) -> Result<OrganizeReport, CliError> {
    let organizer = DirectoryOrganizer::new(LocalFileSystem, sink).with_filters(filters);
    Ok(organizer.organize(base_path)?)
}

/// Prints the plan without touching the file system.
fn organize_dry_run(base_path: &Path, filters: CompiledFilters) -> Result<RunStatus, CliError> {
    let organizer = DirectoryOrganizer::new(LocalFileSystem, TracingSink).with_filters(filters);
    let plan = organizer.plan(base_path)?;
    OutputFormatter::print_plan(&plan);
    OutputFormatter::plain(&format!(
        "Run 'dirsort {}' (without --dry-run) to execute the organization.",
        base_path.display()
    ));
    Ok(RunStatus::Success)
}

/// Reverses the previous run recorded in the directory.
fn undo_organization(base_path: &Path) -> Result<RunStatus, CliError> {
    OutputFormatter::info("Undoing previous organization...");
    let report = UndoManager::undo(&LocalFileSystem, base_path)?;
    OutputFormatter::print_undo_report(&report);

    Ok(if report.failed_restores.is_empty() {
        RunStatus::Success
    } else {
        RunStatus::EntriesFailed(report.failed_restores.len())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_command() {
        let cli = Cli::try_parse_from(["dirsort", "/tmp/inbox"]).expect("Parse failed");
        assert_eq!(cli.directory, PathBuf::from("/tmp/inbox"));
        assert_eq!(cli.command(), OrganizeCommand::Organize { dry_run: false });
        assert_eq!(cli.format(), ReportFormat::Console);
    }

    #[test]
    fn test_parse_dry_run_and_undo() {
        let dry = Cli::try_parse_from(["dirsort", "dir", "--dry-run"]).unwrap();
        assert_eq!(dry.command(), OrganizeCommand::Organize { dry_run: true });

        let undo = Cli::try_parse_from(["dirsort", "dir", "--undo"]).unwrap();
        assert_eq!(undo.command(), OrganizeCommand::Undo);

        assert!(Cli::try_parse_from(["dirsort", "dir", "--undo", "--dry-run"]).is_err());
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from(["dirsort", "dir", "--json", "-vv", "-c", "rules.toml"])
            .expect("Parse failed");
        assert_eq!(cli.format(), ReportFormat::Json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("rules.toml")));

        assert!(Cli::try_parse_from(["dirsort", "dir", "--json", "--undo"]).is_err());
        assert!(Cli::try_parse_from(["dirsort", "dir", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_parse_requires_directory() {
        assert!(Cli::try_parse_from(["dirsort"]).is_err());
    }

    #[test]
    fn test_run_status_exit_codes() {
        assert_eq!(RunStatus::Success.exit_code(), 0);
        assert_eq!(RunStatus::EntriesFailed(2).exit_code(), 1);
    }
}
