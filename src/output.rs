//! Console output for the command-line front end.
//!
//! All styling lives here so the library itself never depends on terminal
//! colors. `colored` honours `NO_COLOR` and non-terminal output on its own.

use crate::organizer::FileOutcome;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;

/// Prints styled status lines, dry-run trees and summaries.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tidydir::output::OutputFormatter;
    /// OutputFormatter::success("Organization completed.");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message to stderr in red with an X mark.
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

    pub fn plain(message: &str) {
        println!("{}", message);
    }

    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice in bold yellow.
    pub fn dry_run_notice(message: &str) {
        println!("{}: {}", "Dry-run mode".yellow().bold(), message);
    }

    /// Prints a rendered dry-run tree. Directory lines are highlighted.
    pub fn tree(rendered: &str) {
        for line in rendered.lines() {
            if line.ends_with('/') {
                println!("{}", line.blue().bold());
            } else {
                println!("{}", line);
            }
        }
    }

    /// Formats one outcome the way verbose mode prints it.
    pub fn outcome_line(outcome: &FileOutcome) -> String {
        match outcome {
            FileOutcome::Moved {
                source,
                destination,
                ..
            } => format!(
                "{}: {} -> {}",
                "Moved".green(),
                source.display(),
                destination.display()
            ),
            FileOutcome::Simulated {
                source,
                destination,
                ..
            } => format!(
                "{}: {} -> {}",
                "Simulated move".cyan().bold(),
                source.display(),
                destination.display()
            ),
            FileOutcome::Skipped { path } => {
                format!("{}: {} (no category)", "Skipped".dimmed(), path.display())
            }
            FileOutcome::Failed { path, error } => {
                format!("{}: {}: {}", "Failed".red(), path.display(), error)
            }
        }
    }

    /// Creates a progress bar for live runs.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tidydir::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(100);
    /// pb.inc(1);
    /// pb.finish_with_message("done");
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    /// Prints a summary table with file counts by category.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tidydir::output::OutputFormatter;
    /// use std::collections::BTreeMap;
    ///
    /// let mut counts = BTreeMap::new();
    /// counts.insert("document".to_string(), 15);
    /// counts.insert("image".to_string(), 8);
    /// OutputFormatter::summary_table(&counts, 23);
    /// ```
    pub fn summary_table(category_counts: &BTreeMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let width = category_counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(8); // "Category"

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));

        for (category, count) in category_counts {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                plural(*count),
                width = width
            );
        }

        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural(total_files),
            width = width
        );
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
