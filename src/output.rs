//! Console output formatting and styling.
//!
//! Provides a centralized interface for all CLI output, including colored
//! messages, progress tracking, and the batch summary table. This is the
//! notification sink the CLI hands to the executor; an embedding host would
//! supply its own [`Notifier`] instead.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;

use crate::vault::Notifier;

/// Writes batch progress and outcomes to the terminal.
///
/// Messages routed through the [`Notifier`] trait:
/// - notifications as plain progress lines
/// - warnings in yellow with ⚠
/// - errors in red with ✗
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        println!("{}", message);
    }

    fn warn(&self, message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }
}

impl ConsoleNotifier {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use vaultmove::output::ConsoleNotifier;
    /// ConsoleNotifier::success("Batch completed!");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates and returns a progress bar for batch operations.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use vaultmove::output::ConsoleNotifier;
    /// let pb = ConsoleNotifier::create_progress_bar(100);
    /// pb.inc(1);
    /// pb.finish_with_message("Completed!");
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Prints a summary table of moved files per destination folder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use vaultmove::output::ConsoleNotifier;
    /// use std::collections::HashMap;
    ///
    /// let mut counts = HashMap::new();
    /// counts.insert("Notes".to_string(), 15);
    /// counts.insert("Attachments".to_string(), 8);
    /// ConsoleNotifier::summary_table(&counts, 23);
    /// ```
    pub fn summary_table(folder_counts: &HashMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        // Sort folders for consistent output
        let mut folders: Vec<_> = folder_counts.iter().collect();
        folders.sort_by_key(|&(name, _)| name);

        // Calculate column widths
        let max_folder_len = folders
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max(6); // At least "Folder" width

        // Print header
        println!(
            "{:<width$} | {}",
            "Folder".bold(),
            "Files".bold(),
            width = max_folder_len
        );
        println!("{}", "-".repeat(max_folder_len + 10));

        // Print rows
        for (folder, count) in &folders {
            let file_word = if **count == 1 { "file" } else { "files" };
            println!(
                "{:<width$} | {} {}",
                folder,
                count.to_string().green(),
                file_word,
                width = max_folder_len
            );
        }

        // Print footer
        println!("{}", "-".repeat(max_folder_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            if total_files == 1 { "file" } else { "files" },
            width = max_folder_len
        );
    }
}
