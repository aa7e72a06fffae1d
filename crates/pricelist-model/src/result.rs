//! The result of committing a batch.

use serde::{Deserialize, Serialize};

use crate::outcome::RowError;

/// What happened to one row during commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitAction {
    /// Written as a new catalog entry.
    Inserted,
    /// Overwrote an existing entry (duplicate under `UpdateAll`, or a
    /// repeated identifier within the batch).
    Updated,
    /// Duplicate left untouched.
    Skipped,
    /// Failed validation; never written.
    Rejected,
    /// The catalog refused the write.
    Failed,
    /// The batch was cancelled before this row was reached.
    NotAttempted,
}

impl CommitAction {
    pub fn wrote(self) -> bool {
        matches!(self, Self::Inserted | Self::Updated)
    }
}

/// Per-row commit record, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCommit {
    pub row_number: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub action: CommitAction,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportCounts {
    pub imported: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Summary of a committed batch. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportResult {
    counts: ImportCounts,
    errors: Vec<RowError>,
    rows: Vec<RowCommit>,
    cancelled: bool,
}

impl ImportResult {
    /// Build a result; counts are derived from the row record and error list.
    pub fn new(rows: Vec<RowCommit>, errors: Vec<RowError>, cancelled: bool) -> Self {
        let mut counts = ImportCounts {
            errors: errors.len(),
            ..ImportCounts::default()
        };
        for row in &rows {
            match row.action {
                CommitAction::Inserted => counts.imported += 1,
                CommitAction::Updated => counts.updated += 1,
                CommitAction::Skipped => counts.skipped += 1,
                CommitAction::Rejected | CommitAction::Failed | CommitAction::NotAttempted => {}
            }
        }
        Self {
            counts,
            errors,
            rows,
            cancelled,
        }
    }

    pub fn counts(&self) -> ImportCounts {
        self.counts
    }

    pub fn imported(&self) -> usize {
        self.counts.imported
    }

    pub fn updated(&self) -> usize {
        self.counts.updated
    }

    pub fn skipped(&self) -> usize {
        self.counts.skipped
    }

    /// Per-row errors, validation failures and commit failures alike, in row order.
    pub fn errors(&self) -> &[RowError] {
        &self.errors
    }

    pub fn rows(&self) -> &[RowCommit] {
        &self.rows
    }

    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Rows whose values reached the catalog.
    pub fn written_rows(&self) -> impl Iterator<Item = &RowCommit> {
        self.rows.iter().filter(|row| row.action.wrote())
    }
}
