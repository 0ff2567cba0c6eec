//! Output formatting and styling module.
//!
//! Centralizes all terminal output: colored status messages, the rendered
//! form of a [`Report`](crate::organizer::Report), and progress indication
//! for execute runs. Keeping formatting here means the engine stays free of
//! presentation concerns.

use crate::organizer::Report;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages all CLI output with consistent styling.
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
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates a spinner-style progress bar for the per-file run loop.
    ///
    /// The total file count is not known before the snapshot is taken inside
    /// the engine, so the bar counts processed files rather than showing a
    /// percentage.
    pub fn progress_spinner() -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {pos} {msg}")
                .expect("Invalid progress bar template"),
        );
        pb
    }

    /// Renders a Report for human consumption: the per-category listing
    /// followed by a summary table and, if any moves failed, the failure
    /// list.
    ///
    /// # Example output
    ///
    /// ```text
    /// Images
    ///   - photo.jpg
    /// Documents
    ///   - report.pdf
    ///
    /// SUMMARY
    /// Category  | Files
    /// ------------------
    /// Images    | 1 file
    /// Documents | 1 file
    /// ------------------
    /// Total     | 2 files
    /// ```
    pub fn report(report: &Report) {
        if !report.is_success() {
            Self::error(&report.message);
            return;
        }

        if let Some(folder) = &report.folder {
            Self::info(&format!("Folder: {}", folder));
        }

        let Some(buckets) = report.buckets() else {
            Self::success(&report.message);
            return;
        };

        if buckets.is_empty() {
            Self::success(&report.message);
            return;
        }

        for (category, files) in buckets.iter() {
            println!("{}", category.bold());
            for file in files {
                println!("  - {}", file);
            }
        }

        Self::summary_table(report);

        if let Some(errors) = &report.errors {
            Self::header("FAILURES");
            for failure in errors {
                Self::error(&format!("{}: {}", failure.file, failure.reason));
            }
        }

        println!();
        Self::success(&report.message);
    }

    /// Prints the per-category count table for a successful run.
    fn summary_table(report: &Report) {
        let Some(buckets) = report.buckets() else {
            return;
        };

        Self::header("SUMMARY");

        let max_category_len = buckets
            .iter()
            .map(|(name, _)| name.len())
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

        for (category, files) in buckets.iter() {
            let file_word = if files.len() == 1 { "file" } else { "files" };
            println!(
                "{:<width$} | {} {}",
                category,
                files.len().to_string().green(),
                file_word,
                width = max_category_len
            );
        }

        let total = buckets.total_files();
        println!("{}", "-".repeat(max_category_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total.to_string().green().bold(),
            if total == 1 { "file" } else { "files" },
            width = max_category_len
        );
    }
}
