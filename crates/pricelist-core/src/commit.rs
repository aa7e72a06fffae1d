//! Batch commit: apply validated outcomes to a catalog.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use chrono::{Local, NaiveDate};
use pricelist_model::{
    Catalog, CatalogEntry, CatalogError, CommitAction, EntryCandidate, ImportResult, RowCommit,
    RowError, RowIssue, UpsertKind, ValidationOutcome,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::units::cost_per_oz;

/// Policy for rows whose identifier already exists in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateStrategy {
    /// Overwrite every matched entry.
    #[default]
    UpdateAll,
    /// Leave every matched entry untouched.
    SkipAll,
    /// Decide per row. Needs a caller that can ask; not supported in batch.
    ReviewEach,
}

impl DuplicateStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UpdateAll => "update_all",
            Self::SkipAll => "skip_all",
            Self::ReviewEach => "review_each",
        }
    }
}

impl fmt::Display for DuplicateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DuplicateStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "update_all" | "update" => Ok(Self::UpdateAll),
            "skip_all" | "skip" => Ok(Self::SkipAll),
            "review_each" | "review" => Ok(Self::ReviewEach),
            other => Err(format!("unknown duplicate strategy: {other}")),
        }
    }
}

#[derive(Debug, Error)]
pub enum CommitError {
    /// The strategy needs per-row decisions that a batch commit cannot make.
    #[error("duplicate strategy '{0}' is not supported for batch commit")]
    UnsupportedStrategy(DuplicateStrategy),
}

/// Cooperative cancellation for a running commit.
///
/// Clones share the flag. Rows reached after cancellation are recorded as
/// not attempted.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Writes validated rows to a catalog under a duplicate strategy.
#[derive(Debug, Clone)]
pub struct BatchCommitter {
    strategy: DuplicateStrategy,
    cancel: Option<CancelToken>,
    today: Option<NaiveDate>,
}

impl BatchCommitter {
    pub fn new(strategy: DuplicateStrategy) -> Self {
        Self {
            strategy,
            cancel: None,
            today: None,
        }
    }

    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Date stamped into `last_updated`; defaults to the local date.
    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.today = Some(date);
        self
    }

    pub fn strategy(&self) -> DuplicateStrategy {
        self.strategy
    }

    /// Commit every outcome in input order.
    ///
    /// Error rows are never written. Each candidate is looked up again in
    /// `catalog`, so the duplicate strategy and price history act on the
    /// catalog as it is at write time rather than at validation time. A
    /// failing lookup or write is recorded on its row and the batch continues.
    pub fn commit<C: Catalog + ?Sized>(
        &self,
        catalog: &mut C,
        outcomes: &[ValidationOutcome],
    ) -> Result<ImportResult, CommitError> {
        if self.strategy == DuplicateStrategy::ReviewEach {
            return Err(CommitError::UnsupportedStrategy(self.strategy));
        }
        let start = Instant::now();
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());

        let mut rows = Vec::with_capacity(outcomes.len());
        let mut errors = Vec::new();
        // identifier -> unit price written earlier in this batch
        let mut written: BTreeMap<String, f64> = BTreeMap::new();
        let mut cancelled = false;

        for outcome in outcomes {
            if !cancelled && self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                tracing::warn!(row = outcome.row_number(), "Commit cancelled");
                cancelled = true;
            }

            let candidate = match outcome {
                ValidationOutcome::Error(error) => {
                    rows.push(RowCommit {
                        row_number: error.row_number,
                        identifier: None,
                        action: CommitAction::Rejected,
                    });
                    errors.push(error.clone());
                    continue;
                }
                ValidationOutcome::Ready(candidate)
                | ValidationOutcome::Duplicate { candidate, .. } => candidate,
            };
            let identifier = candidate.entry.identifier.clone();

            if cancelled {
                rows.push(RowCommit {
                    row_number: candidate.row_number,
                    identifier: Some(identifier),
                    action: CommitAction::NotAttempted,
                });
                continue;
            }

            let existing = match catalog.find_by_identifier(&identifier) {
                Ok(existing) => existing,
                Err(err) => {
                    tracing::warn!(row = candidate.row_number, %err, "Catalog lookup failed");
                    errors.push(commit_failure(candidate, &err));
                    rows.push(RowCommit {
                        row_number: candidate.row_number,
                        identifier: Some(identifier),
                        action: CommitAction::Failed,
                    });
                    continue;
                }
            };
            let previous = written.get(&identifier).copied();
            if previous.is_none()
                && existing.is_some() != matches!(outcome, ValidationOutcome::Duplicate { .. })
            {
                tracing::debug!(
                    row = candidate.row_number,
                    %identifier,
                    "Catalog changed since validation"
                );
            }
            if existing.is_some() && previous.is_none() && self.strategy == DuplicateStrategy::SkipAll {
                rows.push(RowCommit {
                    row_number: candidate.row_number,
                    identifier: Some(identifier),
                    action: CommitAction::Skipped,
                });
                continue;
            }
            if previous.is_some() {
                tracing::warn!(row = candidate.row_number, "Identifier repeated in batch; later row wins");
            }

            let entry = prepare_entry(&candidate.entry, existing.as_ref(), previous, today);
            let unit_price = entry.unit_price;
            let action = match catalog.upsert(entry) {
                Ok(_) if previous.is_some() => CommitAction::Updated,
                Ok(UpsertKind::Inserted) => CommitAction::Inserted,
                Ok(UpsertKind::Updated) => CommitAction::Updated,
                Err(err) => {
                    tracing::warn!(row = candidate.row_number, %err, "Catalog write failed");
                    errors.push(commit_failure(candidate, &err));
                    CommitAction::Failed
                }
            };
            if action.wrote() {
                written.insert(identifier.clone(), unit_price);
            }
            rows.push(RowCommit {
                row_number: candidate.row_number,
                identifier: Some(identifier),
                action,
            });
        }

        let result = ImportResult::new(rows, errors, cancelled);
        let counts = result.counts();
        tracing::info!(
            strategy = %self.strategy,
            imported = counts.imported,
            updated = counts.updated,
            skipped = counts.skipped,
            errors = counts.errors,
            cancelled,
            duration_ms = start.elapsed().as_millis(),
            "commit complete"
        );
        Ok(result)
    }
}

fn commit_failure(candidate: &EntryCandidate, err: &CatalogError) -> RowError {
    RowError {
        row_number: candidate.row_number,
        label: candidate.entry.name.clone(),
        issues: vec![RowIssue::CommitFailed {
            message: err.to_string(),
        }],
    }
}

/// The entry to write: derived cost per ounce, price history and date.
///
/// The price before this write comes from this batch when the identifier was
/// already written, else from the catalog entry being replaced. `last_price`
/// only moves when the price changes.
fn prepare_entry(
    candidate: &CatalogEntry,
    existing: Option<&CatalogEntry>,
    batch_price: Option<f64>,
    today: NaiveDate,
) -> CatalogEntry {
    let mut entry = candidate.clone();
    entry.cost_per_oz = Some(cost_per_oz(entry.unit_price, &entry.unit));
    entry.last_updated = Some(today);

    let previous_price = batch_price.or(existing.map(|e| e.unit_price));
    entry.last_price = match previous_price {
        Some(price) if price != entry.unit_price => Some(price),
        _ => existing.and_then(|e| e.last_price),
    };
    entry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_parses_from_cli_spellings() {
        assert_eq!("update-all".parse(), Ok(DuplicateStrategy::UpdateAll));
        assert_eq!("SKIP".parse(), Ok(DuplicateStrategy::SkipAll));
        assert_eq!("review_each".parse(), Ok(DuplicateStrategy::ReviewEach));
        assert!("merge".parse::<DuplicateStrategy>().is_err());
    }

    #[test]
    fn cancel_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
