/// Batch move execution.
///
/// One batch walks every file sitting directly at the vault root, looks its
/// extension up in the configured rules, resolves a non-colliding destination
/// in the target folder, performs the rename, and records the move for undo.
/// Every failure mode is per-file: the batch always runs to completion over
/// all discovered files.
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

use crate::config::{ConfigError, VaultConfig};
use crate::resolver::{self, ResolveError};
use crate::undo::{MoveHistory, UndoReport};
use crate::vault::{Notifier, RootFile, Vault, VaultError};

/// The minimal data needed to reverse one move.
///
/// Created exactly once per successful move, consumed exactly once by undo,
/// never mutated in place. `original_name` is the name before any
/// disambiguation suffix; undo restores that name, not the suffixed one.
#[derive(Debug, Clone, Serialize)]
pub struct MoveRecord {
    /// Where the file sits now (destination folder, possibly suffixed name).
    pub current_path: PathBuf,
    /// The directory the file was moved out of.
    pub from: PathBuf,
    /// The directory the file was moved into.
    pub to: PathBuf,
    /// The filename before the move.
    pub original_name: String,
    /// When the move happened.
    pub moved_at: DateTime<Utc>,
}

impl MoveRecord {
    /// The path undo restores this file to.
    pub fn restoration_path(&self) -> PathBuf {
        self.from.join(&self.original_name)
    }
}

/// Why a file was left where it is.
#[derive(Debug, Clone, Serialize)]
pub enum SkipReason {
    /// Extension not mapped, or mapped to nothing. Expected steady state.
    Unmapped,
    /// The configured target folder does not exist or is not a directory.
    TargetMissing { target: String },
    /// Destination resolution ran out of numeric suffixes.
    TooManyConflicts,
    /// The storage layer rejected the rename.
    MoveFailed { reason: String },
}

/// One file successfully relocated in a batch.
#[derive(Debug, Clone, Serialize)]
pub struct MovedEntry {
    /// Filename before the move.
    pub name: String,
    /// Full destination path, including any disambiguation suffix.
    pub destination: PathBuf,
}

/// One file left in place in a batch.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedEntry {
    /// Filename at the root.
    pub name: String,
    /// Why it stayed.
    pub reason: SkipReason,
}

/// Outcome of one batch (or one dry-run plan).
#[derive(Debug, Serialize)]
pub struct BatchReport {
    /// Root-level files that entered the batch after filtering.
    pub found: usize,
    /// Files moved (or, in a plan, that would be moved).
    pub moved: Vec<MovedEntry>,
    /// Files left in place, with reasons.
    pub skipped: Vec<SkippedEntry>,
}

impl BatchReport {
    fn new() -> Self {
        Self {
            found: 0,
            moved: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Number of files relocated.
    pub fn moved_count(&self) -> usize {
        self.moved.len()
    }
}

/// Errors that abort a batch before any file is touched.
///
/// Once the per-file loop starts, nothing aborts it; these cover the setup
/// steps (filter compilation, root listing) only.
#[derive(Debug)]
pub enum MoveError {
    /// The vault could not be read.
    Vault(VaultError),
    /// The filter configuration could not be compiled.
    Config(ConfigError),
}

impl std::fmt::Display for MoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vault(e) => write!(f, "{}", e),
            Self::Config(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for MoveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Vault(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

impl From<VaultError> for MoveError {
    fn from(e: VaultError) -> Self {
        Self::Vault(e)
    }
}

impl From<ConfigError> for MoveError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Executes batch moves against a vault and owns the undo history.
///
/// Both `execute_move` and `undo_move` take `&mut self`, so two batches can
/// never overlap on one executor; invocations are strictly sequential.
pub struct Mover<V: Vault> {
    vault: V,
    config: VaultConfig,
    history: MoveHistory,
}

impl<V: Vault> Mover<V> {
    /// Creates an executor with the default undo-history limit.
    pub fn new(vault: V, config: VaultConfig) -> Self {
        Self {
            vault,
            config,
            history: MoveHistory::default(),
        }
    }

    /// Creates an executor whose history keeps at most `limit` records.
    pub fn with_history_limit(vault: V, config: VaultConfig, limit: usize) -> Self {
        Self {
            vault,
            config,
            history: MoveHistory::with_limit(limit),
        }
    }

    /// The undo history, oldest move first.
    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    /// The vault this executor operates on.
    pub fn vault(&self) -> &V {
        &self.vault
    }

    /// Runs one batch: move every eligible root file into its target folder.
    ///
    /// Emits progress through `notifier`: the count of files found, each
    /// per-file outcome worth surfacing, and a final tally. Files whose
    /// extension has no rule are skipped silently. Re-running a batch is a
    /// no-op for already-moved files; only newly-arrived root files are
    /// affected.
    ///
    /// # Errors
    ///
    /// Fails only during setup (unreadable root, invalid filter patterns).
    /// Per-file conditions never abort the batch.
    pub fn execute_move<N: Notifier + ?Sized>(
        &mut self,
        notifier: &N,
    ) -> Result<BatchReport, MoveError> {
        let mut report = BatchReport::new();
        let files = self.eligible_files()?;
        report.found = files.len();

        notifier.notify(&format!("Found {} root-level files.", report.found));

        for file in files {
            match self.evaluate(&file.extension) {
                Evaluation::Unmapped => {
                    report.skipped.push(SkippedEntry {
                        name: file.name,
                        reason: SkipReason::Unmapped,
                    });
                }
                Evaluation::TargetMissing { target } => {
                    notifier.warn(&format!(
                        "Folder \"{}\" not found. Skipped \"{}\".",
                        target, file.name
                    ));
                    report.skipped.push(SkippedEntry {
                        name: file.name,
                        reason: SkipReason::TargetMissing { target },
                    });
                }
                Evaluation::Target(dir) => {
                    match resolver::resolve_destination(
                        &self.vault,
                        &dir,
                        &file.stem,
                        &file.extension,
                    ) {
                        Err(e @ ResolveError::TooManyConflicts { .. }) => {
                            notifier.error(&e.to_string());
                            report.skipped.push(SkippedEntry {
                                name: file.name,
                                reason: SkipReason::TooManyConflicts,
                            });
                        }
                        Ok(destination) => match self.vault.rename(&file.path, &destination) {
                            Err(e) => {
                                notifier.error(&format!(
                                    "Error moving \"{}\": {}",
                                    file.name, e
                                ));
                                report.skipped.push(SkippedEntry {
                                    name: file.name,
                                    reason: SkipReason::MoveFailed {
                                        reason: e.to_string(),
                                    },
                                });
                            }
                            Ok(()) => {
                                notifier.notify(&format!(
                                    "Moved \"{}\" → \"{}\"",
                                    file.name,
                                    dir.display()
                                ));
                                self.history.push(MoveRecord {
                                    current_path: destination.clone(),
                                    from: file.parent,
                                    to: dir,
                                    original_name: file.name.clone(),
                                    moved_at: Utc::now(),
                                });
                                report.moved.push(MovedEntry {
                                    name: file.name,
                                    destination,
                                });
                            }
                        },
                    }
                }
            }
        }

        notifier.notify(&format!(
            "File move completed. Moved {} files.",
            report.moved_count()
        ));
        Ok(report)
    }

    /// Computes what a batch would do without touching anything.
    ///
    /// Destination resolution runs for real (pure existence probes), so the
    /// plan shows the disambiguated names a live batch would pick. No moves,
    /// no records, no notifications.
    ///
    /// # Errors
    ///
    /// Same setup failures as [`Mover::execute_move`].
    pub fn plan_moves(&self) -> Result<BatchReport, MoveError> {
        let mut report = BatchReport::new();
        let files = self.eligible_files()?;
        report.found = files.len();

        for file in files {
            match self.evaluate(&file.extension) {
                Evaluation::Unmapped => {
                    report.skipped.push(SkippedEntry {
                        name: file.name,
                        reason: SkipReason::Unmapped,
                    });
                }
                Evaluation::TargetMissing { target } => {
                    report.skipped.push(SkippedEntry {
                        name: file.name,
                        reason: SkipReason::TargetMissing { target },
                    });
                }
                Evaluation::Target(dir) => {
                    match resolver::resolve_destination(
                        &self.vault,
                        &dir,
                        &file.stem,
                        &file.extension,
                    ) {
                        Err(ResolveError::TooManyConflicts { .. }) => {
                            report.skipped.push(SkippedEntry {
                                name: file.name,
                                reason: SkipReason::TooManyConflicts,
                            });
                        }
                        Ok(destination) => {
                            report.moved.push(MovedEntry {
                                name: file.name,
                                destination,
                            });
                        }
                    }
                }
            }
        }

        Ok(report)
    }

    /// Reverses recorded moves, most-recent-first, draining the history.
    pub fn undo_move<N: Notifier + ?Sized>(&mut self, notifier: &N) -> UndoReport {
        self.history.undo_all(&self.vault, notifier)
    }

    /// Lists root files and applies the configured filters.
    fn eligible_files(&self) -> Result<Vec<RootFile>, MoveError> {
        let filters = self.config.compile_filters()?;
        let files = self.vault.list_root_files()?;
        Ok(files
            .into_iter()
            .filter(|f| filters.should_include(&f.path))
            .collect())
    }

    /// Looks up the rule for an extension and validates its target folder.
    fn evaluate(&self, extension: &str) -> Evaluation {
        let Some(target) = self.config.target_for(extension) else {
            return Evaluation::Unmapped;
        };
        let dir = self.vault.resolve_target(target);
        if !self.vault.is_directory(&dir) {
            return Evaluation::TargetMissing {
                target: target.to_string(),
            };
        }
        Evaluation::Target(dir)
    }
}

/// Result of evaluating one file's extension against the rules.
enum Evaluation {
    Unmapped,
    TargetMissing { target: String },
    Target(PathBuf),
}
