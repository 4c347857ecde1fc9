//! Output formatting and styling module.
//!
//! Everything the command-line front end prints goes through here: colored
//! status lines, the progress bar shown while organizing, and the summary
//! tables printed at the end.

use crate::organizer::{OrganizePlan, PlannedAction};
use crate::report::{EntryReport, OrganizeReport, Outcome};
use crate::sink::ReportSink;
use crate::undo::UndoReport;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::Path;

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dirsort::output::OutputFormatter;
    /// OutputFormatter::info("Organizing directory: /home/user/Downloads");
    /// ```
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Style shared by every progress bar.
    pub fn progress_style() -> Option<ProgressStyle> {
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .ok()
            .map(|style| style.progress_chars("█▓░"))
    }

    /// Creates a progress bar for `total` entries.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        if let Some(style) = Self::progress_style() {
            pb.set_style(style);
        }
        pb
    }

    /// One-line rendering of an entry outcome, without color.
    pub fn describe_entry(entry: &EntryReport) -> String {
        match &entry.outcome {
            Outcome::Moved { .. } => {
                let category = entry.category.as_ref().map(|c| c.dir_name()).unwrap_or("");
                format!("{} → {}/", entry.entry_name, category)
            }
            other => format!(
                "{}: {}",
                entry.entry_name,
                other.reason().unwrap_or_default()
            ),
        }
    }

    /// Prints a table of file counts per category.
    pub fn summary_table(category_counts: &BTreeMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let max_category_len = category_counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(8); // At least "Category" width

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 10));

        for (category, count) in category_counts {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                plural_files(*count),
                width = max_category_len
            );
        }

        println!("{}", "-".repeat(max_category_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural_files(total_files),
            width = max_category_len
        );
    }

    /// Prints the overall counts and a per-category table for a finished run.
    ///
    /// Failed entries are always listed again so none is lost in the scroll.
    pub fn print_report(report: &OrganizeReport) {
        let summary = report.summary();

        let failures: Vec<_> = report
            .entries()
            .iter()
            .filter(|e| e.outcome.is_failed())
            .collect();
        if !failures.is_empty() {
            Self::header("FAILED");
            for entry in failures {
                Self::error(&Self::describe_entry(entry));
            }
        }

        let counts: BTreeMap<String, usize> = report
            .moved_by_category()
            .into_iter()
            .map(|(category, count)| (category.to_string(), count))
            .collect();
        if !counts.is_empty() {
            Self::summary_table(&counts, summary.moved);
        }

        println!();
        println!(
            "{} entries: {} moved, {} skipped, {} failed",
            summary.total,
            summary.moved.to_string().green(),
            summary.skipped.to_string().yellow(),
            summary.failed.to_string().red()
        );
    }

    /// Prints what an organize run would do.
    pub fn print_plan(plan: &OrganizePlan) {
        Self::dry_run_notice(&format!("Analyzing contents of: {}", plan.directory.display()));

        if plan.entries.is_empty() {
            Self::plain("No entries found to organize.");
            return;
        }

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for entry in &plan.entries {
            match &entry.action {
                PlannedAction::Move(op) => {
                    println!(" - {}", entry.entry_name);
                    println!("   → Would move to {}/", op.destination_dir);
                    *counts.entry(op.destination_dir.to_string()).or_insert(0) += 1;
                }
                PlannedAction::Collision(op) => {
                    println!(" - {}", entry.entry_name);
                    Self::warning(&format!(
                        "  {}/{} already exists, would not be moved",
                        op.destination_dir, op.source
                    ));
                }
                PlannedAction::Skip(reason) => {
                    println!(" - {} {}", entry.entry_name, format!("({})", reason).dimmed());
                }
            }
        }

        let total = counts.values().sum();
        Self::summary_table(&counts, total);
        println!();
        Self::success("Dry run complete. No files were modified.");
    }

    /// Prints the outcome of an undo.
    pub fn print_undo_report(report: &UndoReport) {
        Self::success("Undo complete!");
        println!("  Restored: {}", report.restored_files);

        if !report.skipped_files.is_empty() {
            Self::warning(&format!("Skipped: {}", report.skipped_files.len()));
            for (path, reason) in &report.skipped_files {
                println!("    - {}: {}", path.display(), reason);
            }
        }

        if !report.failed_restores.is_empty() {
            Self::error(&format!("Failed: {}", report.failed_restores.len()));
            for (path, reason) in &report.failed_restores {
                eprintln!("    - {}: {}", path.display(), reason);
            }
            Self::warning("History file was NOT deleted due to failures.");
        }
    }

    pub fn plain(message: &str) {
        println!("{}", message);
    }
}

fn plural_files(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

/// [`ReportSink`] that renders progress on the terminal.
///
/// A progress bar tracks the run while one line per entry is printed above it.
pub struct ConsoleSink {
    progress: ProgressBar,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            progress: OutputFormatter::create_progress_bar(0),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportSink for ConsoleSink {
    fn started(&self, directory: &Path, entry_count: usize) {
        OutputFormatter::info(&format!("Organizing contents of: {}", directory.display()));
        self.progress.set_length(entry_count as u64);
        self.progress.set_position(0);
    }

    fn record(&self, entry: &EntryReport) {
        let line = OutputFormatter::describe_entry(entry);
        let styled = match &entry.outcome {
            Outcome::Moved { .. } => format!("{} {}", "✓".green(), line),
            Outcome::Skipped(_) => format!("{} {}", "⚠".yellow(), line.dimmed()),
            Outcome::Failed(_) => format!("{} {}", "✗".red(), line),
        };
        // Hides the bar while the line is printed above it
        self.progress.suspend(|| println!("{}", styled));
        self.progress.set_message(entry.entry_name.clone());
        self.progress.inc(1);
    }

    fn finished(&self, _report: &OrganizeReport) {
        self.progress.finish_and_clear();
    }
}
