//! Command-line interface module for vaultmove.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing and command dispatch
//! - Batch execution and dry-run previews
//! - The interactive shell where move and undo share one live history
//! - Report formatting (summary table or JSON)

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::VaultConfig;
use crate::mover::{BatchReport, Mover, SkipReason};
use crate::output::ConsoleNotifier;
use crate::vault::FsVault;

/// Move root-level vault files into per-extension target folders.
#[derive(Debug, Parser)]
#[command(name = "vaultmove", version, about)]
pub struct Cli {
    /// Vault root directory to operate on.
    pub vault: PathBuf,

    /// Path to a configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// What to do with the vault.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Move eligible root files into their target folders (the default).
    Move {
        /// Preview the batch without moving anything.
        #[arg(long)]
        dry_run: bool,

        /// Print the batch report as JSON instead of a summary table.
        #[arg(long)]
        json: bool,
    },
    /// Interactive session: issue move and undo commands against one
    /// executor, whose undo history lives for the session.
    Shell,
}

/// Runs the CLI application.
///
/// Loads configuration, opens the vault, and dispatches the requested
/// command. With no subcommand, runs a single move batch.
pub fn run_cli(cli: Cli) -> Result<(), String> {
    let config = VaultConfig::load(cli.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    let vault =
        FsVault::open(&cli.vault).map_err(|e| format!("Error opening vault: {}", e))?;
    let mut mover = Mover::new(vault, config);

    match cli.command.unwrap_or(Command::Move {
        dry_run: false,
        json: false,
    }) {
        Command::Move {
            dry_run: true,
            json,
        } => run_dry_run(&mover, json),
        Command::Move {
            dry_run: false,
            json,
        } => run_move(&mut mover, json),
        Command::Shell => run_shell(&mut mover),
    }
}

/// Executes one live batch and prints its report.
fn run_move(mover: &mut Mover<FsVault>, json: bool) -> Result<(), String> {
    let root = mover.vault().root().to_path_buf();
    if !json {
        ConsoleNotifier::info(&format!("Moving root files of: {}", root.display()));
    }

    let report = mover
        .execute_move(&ConsoleNotifier)
        .map_err(|e| format!("Error: {}", e))?;

    if json {
        print_json(&report)?;
    } else {
        print_summary(&report, &root);
        ConsoleNotifier::success("Batch complete. Run the shell subcommand to undo interactively.");
    }
    Ok(())
}

/// Previews a batch without touching the vault.
fn run_dry_run(mover: &Mover<FsVault>, json: bool) -> Result<(), String> {
    let root = mover.vault().root().to_path_buf();
    let report = mover.plan_moves().map_err(|e| format!("Error: {}", e))?;

    if json {
        return print_json(&report);
    }

    ConsoleNotifier::dry_run_notice(&format!("Analyzing root files of: {}", root.display()));

    if report.found == 0 {
        println!("No files found to move.");
        return Ok(());
    }

    for entry in &report.moved {
        println!(" - {} → {}", entry.name, display_within(&entry.destination, &root));
    }
    for entry in &report.skipped {
        match &entry.reason {
            SkipReason::Unmapped => {}
            SkipReason::TargetMissing { target } => {
                println!(" - {} (target folder \"{}\" missing)", entry.name, target);
            }
            SkipReason::TooManyConflicts => {
                println!(" - {} (too many name conflicts)", entry.name);
            }
            SkipReason::MoveFailed { reason } => {
                println!(" - {} ({})", entry.name, reason);
            }
        }
    }

    print_summary(&report, &root);
    ConsoleNotifier::success("Dry run complete. No files were modified.");
    Ok(())
}

/// Interactive session: `move`, `undo`, `status`, `quit`.
///
/// Both batch actions run against the same executor, so undo sees every
/// move made during the session, in strict reverse order.
fn run_shell(mover: &mut Mover<FsVault>) -> Result<(), String> {
    ConsoleNotifier::info("vaultmove shell. Commands: move, undo, status, quit");

    let stdin = io::stdin();
    loop {
        print!("vaultmove> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .map_err(|e| e.to_string())?;
        if read == 0 {
            // EOF
            break;
        }

        match ShellCommand::parse(&line) {
            Some(ShellCommand::Move) => {
                if let Err(e) = mover.execute_move(&ConsoleNotifier) {
                    ConsoleNotifier::info(&format!("Error: {}", e));
                }
            }
            Some(ShellCommand::Undo) => {
                mover.undo_move(&ConsoleNotifier);
            }
            Some(ShellCommand::Status) => {
                println!("{} moves can be undone.", mover.history().len());
            }
            Some(ShellCommand::Quit) => break,
            None => {
                if !line.trim().is_empty() {
                    println!("Unknown command. Try: move, undo, status, quit");
                }
            }
        }
    }
    Ok(())
}

/// One line of shell input.
#[derive(Debug, PartialEq, Eq)]
enum ShellCommand {
    Move,
    Undo,
    Status,
    Quit,
}

impl ShellCommand {
    fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "move" => Some(Self::Move),
            "undo" => Some(Self::Undo),
            "status" => Some(Self::Status),
            "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Prints a report as pretty JSON on stdout.
fn print_json(report: &BatchReport) -> Result<(), String> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| format!("Error serializing report: {}", e))?;
    println!("{}", json);
    Ok(())
}

/// Prints the per-folder summary table for a batch report.
fn print_summary(report: &BatchReport, root: &Path) {
    let mut folder_counts: HashMap<String, usize> = HashMap::new();
    for entry in &report.moved {
        let folder = entry
            .destination
            .parent()
            .map(|p| display_within(p, root))
            .unwrap_or_else(|| "?".to_string());
        *folder_counts.entry(folder).or_insert(0) += 1;
    }

    if !folder_counts.is_empty() {
        ConsoleNotifier::summary_table(&folder_counts, report.moved_count());
    }
}

/// Renders a path relative to the vault root when possible.
fn display_within(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
