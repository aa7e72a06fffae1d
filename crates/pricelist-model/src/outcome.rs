//! Per-row artefacts flowing from normalization through validation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogEntry;
use crate::field::CanonicalField;

/// Why a row cannot be imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowIssue {
    /// A field has no mapped column, an empty cell and no default.
    Missing { field: CanonicalField },
    /// A value is present but unusable.
    Invalid {
        field: CanonicalField,
        value: String,
        reason: String,
    },
    /// The catalog could not be queried for this row.
    Catalog { message: String },
    /// Writing the row to the catalog failed.
    CommitFailed { message: String },
}

impl RowIssue {
    pub fn field(&self) -> Option<CanonicalField> {
        match self {
            Self::Missing { field } | Self::Invalid { field, .. } => Some(*field),
            Self::Catalog { .. } | Self::CommitFailed { .. } => None,
        }
    }
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "missing {field}"),
            Self::Invalid {
                field,
                value,
                reason,
            } => write!(f, "invalid {field} '{value}': {reason}"),
            Self::Catalog { message } => write!(f, "catalog lookup failed: {message}"),
            Self::CommitFailed { message } => write!(f, "write failed: {message}"),
        }
    }
}

/// Normalizer output for one data row.
///
/// A draft may be incomplete; its `issues` are pre-marked by the normalizer
/// and completed by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowDraft {
    /// 1-based record number in the source file.
    pub row_number: usize,
    pub values: BTreeMap<CanonicalField, String>,
    pub issues: Vec<RowIssue>,
}

impl RowDraft {
    pub fn new(row_number: usize) -> Self {
        Self {
            row_number,
            values: BTreeMap::new(),
            issues: Vec::new(),
        }
    }

    /// Non-empty value for a field.
    pub fn value(&self, field: CanonicalField) -> Option<&str> {
        self.values
            .get(&field)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn has_issue_for(&self, field: CanonicalField) -> bool {
        self.issues.iter().any(|issue| issue.field() == Some(field))
    }

    /// Name used when reporting the row.
    pub fn label(&self) -> String {
        self.value(CanonicalField::Name)
            .unwrap_or("Unknown")
            .to_string()
    }
}

/// A fully valid row, ready to be written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryCandidate {
    pub row_number: usize,
    pub entry: CatalogEntry,
}

/// A row that will not be written, with every reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub row_number: usize,
    pub label: String,
    pub issues: Vec<RowIssue>,
}

impl RowError {
    pub fn reasons(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    /// Fields named by the issues, in issue order.
    pub fn fields(&self) -> Vec<CanonicalField> {
        self.issues.iter().filter_map(RowIssue::field).collect()
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {} ({}): {}",
            self.row_number,
            self.label,
            self.reasons().join("; ")
        )
    }
}

/// Classification of one candidate row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationOutcome {
    Ready(EntryCandidate),
    Duplicate {
        candidate: EntryCandidate,
        existing: CatalogEntry,
    },
    Error(RowError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutcomeKind {
    Ready,
    Duplicate,
    Error,
}

impl ValidationOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Ready(_) => OutcomeKind::Ready,
            Self::Duplicate { .. } => OutcomeKind::Duplicate,
            Self::Error(_) => OutcomeKind::Error,
        }
    }

    pub fn row_number(&self) -> usize {
        match self {
            Self::Ready(candidate) | Self::Duplicate { candidate, .. } => candidate.row_number,
            Self::Error(error) => error.row_number,
        }
    }

    pub fn candidate(&self) -> Option<&EntryCandidate> {
        match self {
            Self::Ready(candidate) | Self::Duplicate { candidate, .. } => Some(candidate),
            Self::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&RowError> {
        match self {
            Self::Error(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_messages_name_the_field() {
        let missing = RowIssue::Missing {
            field: CanonicalField::UnitPrice,
        };
        assert_eq!(missing.to_string(), "missing unit price");
        let invalid = RowIssue::Invalid {
            field: CanonicalField::UnitPrice,
            value: "abc".into(),
            reason: "not a number".into(),
        };
        assert_eq!(invalid.to_string(), "invalid unit price 'abc': not a number");
    }

    #[test]
    fn draft_label_falls_back_to_unknown() {
        let mut draft = RowDraft::new(3);
        assert_eq!(draft.label(), "Unknown");
        draft.values.insert(CanonicalField::Name, "  ".into());
        assert_eq!(draft.label(), "Unknown");
        draft.values.insert(CanonicalField::Name, "Chicken".into());
        assert_eq!(draft.label(), "Chicken");
    }
}
