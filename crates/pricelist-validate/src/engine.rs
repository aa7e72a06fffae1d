//! Row validation and duplicate detection.
//!
//! The [`Validator`] turns normalized drafts into one [`ValidationOutcome`]
//! per row, in input order. Rows with issues become errors; clean rows are
//! looked up by identifier in the catalog and become ready or duplicate.

use std::collections::BTreeMap;

use pricelist_model::{
    CanonicalField, CanonicalSchema, Catalog, CatalogEntry, EntryCandidate, OutcomeKind,
    RowDraft, RowError, RowIssue, ValidationOutcome,
};
use serde::Serialize;

use crate::checks::{parse_price, run_all};

/// An identifier that occurs on more than one row of the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRepeat {
    pub identifier: String,
    /// Row numbers in input order. The last one wins at commit.
    pub rows: Vec<usize>,
}

/// Outcome counts for a validated batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    pub ready: usize,
    pub duplicates: usize,
    pub errors: usize,
    /// Identifiers repeated within the batch.
    pub repeats: usize,
}

/// Per-row outcomes plus batch-level observations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub outcomes: Vec<ValidationOutcome>,
    pub repeats: Vec<BatchRepeat>,
}

impl ValidationReport {
    pub fn summary(&self) -> ValidationSummary {
        let mut summary = ValidationSummary {
            repeats: self.repeats.len(),
            ..ValidationSummary::default()
        };
        for outcome in &self.outcomes {
            match outcome.kind() {
                OutcomeKind::Ready => summary.ready += 1,
                OutcomeKind::Duplicate => summary.duplicates += 1,
                OutcomeKind::Error => summary.errors += 1,
            }
        }
        summary
    }

    /// Error rows in input order.
    pub fn errors(&self) -> impl Iterator<Item = &RowError> {
        self.outcomes.iter().filter_map(ValidationOutcome::error)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }
}

/// Classifies drafts against a schema and a catalog.
///
/// Only reads from the catalog.
pub struct Validator<'a, C: Catalog + ?Sized> {
    schema: &'a CanonicalSchema,
    catalog: &'a C,
}

impl<'a, C: Catalog + ?Sized> Validator<'a, C> {
    pub fn new(schema: &'a CanonicalSchema, catalog: &'a C) -> Self {
        Self { schema, catalog }
    }

    /// Validate every draft. Output order equals input order.
    pub fn validate(&self, drafts: &[RowDraft]) -> ValidationReport {
        let outcomes: Vec<_> = drafts.iter().map(|draft| self.validate_row(draft)).collect();
        let repeats = find_repeats(&outcomes);
        for repeat in &repeats {
            tracing::warn!(
                identifier = %repeat.identifier,
                rows = ?repeat.rows,
                "Identifier appears on several rows; the last row wins"
            );
        }
        ValidationReport { outcomes, repeats }
    }

    /// Validate one draft.
    pub fn validate_row(&self, draft: &RowDraft) -> ValidationOutcome {
        let issues = run_all(self.schema, draft);
        if !issues.is_empty() {
            return reject(draft, issues);
        }

        let entry = match build_entry(draft) {
            Ok(entry) => entry,
            Err(issue) => return reject(draft, vec![issue]),
        };
        let candidate = EntryCandidate {
            row_number: draft.row_number,
            entry,
        };

        match self.catalog.find_by_identifier(&candidate.entry.identifier) {
            Ok(Some(existing)) => ValidationOutcome::Duplicate {
                candidate,
                existing,
            },
            Ok(None) => ValidationOutcome::Ready(candidate),
            Err(err) => {
                tracing::warn!(row = draft.row_number, %err, "Catalog lookup failed");
                reject(
                    draft,
                    vec![RowIssue::Catalog {
                        message: err.to_string(),
                    }],
                )
            }
        }
    }
}

fn reject(draft: &RowDraft, issues: Vec<RowIssue>) -> ValidationOutcome {
    ValidationOutcome::Error(RowError {
        row_number: draft.row_number,
        label: draft.label(),
        issues,
    })
}

/// Build the catalog entry for a draft that passed every check.
///
/// Derived fields (`cost_per_oz`, `last_price`, `last_updated`) are left for
/// the committer.
fn build_entry(draft: &RowDraft) -> Result<CatalogEntry, RowIssue> {
    let text = |field| draft.value(field).unwrap_or_default().to_string();
    let optional = |field| draft.value(field).map(str::to_string);

    let identifier = draft
        .value(CanonicalField::Identifier)
        .ok_or(RowIssue::Missing {
            field: CanonicalField::Identifier,
        })?;
    let raw_price = draft
        .value(CanonicalField::UnitPrice)
        .ok_or(RowIssue::Missing {
            field: CanonicalField::UnitPrice,
        })?;
    let unit_price = parse_price(raw_price).map_err(|reason| RowIssue::Invalid {
        field: CanonicalField::UnitPrice,
        value: raw_price.to_string(),
        reason: reason.to_string(),
    })?;

    Ok(CatalogEntry {
        name: text(CanonicalField::Name),
        identifier: identifier.to_string(),
        category: text(CanonicalField::Category),
        unit: text(CanonicalField::Unit),
        unit_price,
        location: optional(CanonicalField::Location),
        pack_size: optional(CanonicalField::PackSize),
        brand: optional(CanonicalField::Brand),
        cost_per_oz: None,
        last_price: None,
        last_updated: None,
    })
}

fn find_repeats(outcomes: &[ValidationOutcome]) -> Vec<BatchRepeat> {
    let mut rows_by_identifier: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for candidate in outcomes.iter().filter_map(ValidationOutcome::candidate) {
        rows_by_identifier
            .entry(candidate.entry.identifier.as_str())
            .or_default()
            .push(candidate.row_number);
    }
    let mut repeats: Vec<_> = rows_by_identifier
        .into_iter()
        .filter(|(_, rows)| rows.len() > 1)
        .map(|(identifier, rows)| BatchRepeat {
            identifier: identifier.to_string(),
            rows,
        })
        .collect();
    repeats.sort_by_key(|repeat| repeat.rows[0]);
    repeats
}
