/// Undo stack for reverting batch moves.
///
/// This module holds the in-memory move history and the logic that consumes
/// it: records are popped most-recent-first and each file is renamed back to
/// `{originating directory}/{original filename}`. History lives for the
/// lifetime of the owning executor and is never persisted.
use std::collections::VecDeque;
use std::path::PathBuf;

use crate::mover::MoveRecord;
use crate::vault::{Notifier, Vault};

/// Records kept before the oldest is evicted.
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// Ordered move history, insertion order = chronological move order.
///
/// Bounded: when full, recording a new move evicts the oldest record. The
/// evicted move simply can no longer be undone; remaining records stay
/// valid.
#[derive(Debug)]
pub struct MoveHistory {
    records: VecDeque<MoveRecord>,
    limit: usize,
}

impl Default for MoveHistory {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl MoveHistory {
    /// Creates an empty history holding at most `limit` records.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            records: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Appends a record, evicting the oldest one at capacity.
    pub fn push(&mut self, record: MoveRecord) {
        if self.records.len() >= self.limit {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Removes and returns the most recent record.
    pub fn pop(&mut self) -> Option<MoveRecord> {
        self.records.pop_back()
    }

    /// Number of undoable moves.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if there is nothing to undo.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates records oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = &MoveRecord> {
        self.records.iter()
    }

    /// Reverses every recorded move, most-recent-first.
    ///
    /// Each record is consumed exactly once: a failed restoration is reported
    /// through the notifier and the loop moves on to the next record, so a
    /// partial undo is a valid terminal state. A terminal notification is
    /// emitted once the stack drains; an already-empty stack only produces
    /// the informational "no moves to undo" message.
    pub fn undo_all<V, N>(&mut self, vault: &V, notifier: &N) -> UndoReport
    where
        V: Vault + ?Sized,
        N: Notifier + ?Sized,
    {
        let mut report = UndoReport::new();

        if self.is_empty() {
            notifier.notify("No moves to undo");
            return report;
        }

        while let Some(record) = self.pop() {
            let restore_path = record.restoration_path();
            match vault.rename(&record.current_path, &restore_path) {
                Ok(()) => {
                    notifier.notify(&format!(
                        "Restored \"{}\" to \"{}\"",
                        record.original_name,
                        record.from.display()
                    ));
                    report.restored += 1;
                }
                Err(e) => {
                    notifier.warn(&format!("Undo failed for \"{}\": {}", record.original_name, e));
                    report.failed.push((record.current_path, e.to_string()));
                }
            }
        }

        notifier.notify(&format!(
            "Undo completed. Restored {} files.",
            report.restored
        ));
        report
    }
}

/// Outcome of one undo pass.
#[derive(Debug, serde::Serialize)]
pub struct UndoReport {
    /// Number of files moved back to their original location.
    pub restored: usize,
    /// Restorations that were rejected, with the reason. These records were
    /// consumed and will not be retried.
    pub failed: Vec<(PathBuf, String)>,
}

impl UndoReport {
    fn new() -> Self {
        Self {
            restored: 0,
            failed: Vec::new(),
        }
    }

    /// True if every processed record was restored.
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}
