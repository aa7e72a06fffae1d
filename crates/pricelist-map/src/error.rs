//! Error types for mapping operations.

use pricelist_model::{CanonicalField, ColumnSelector, ModelError};
use thiserror::Error;

/// Errors from building or editing a column mapping.
#[derive(Debug, Error)]
pub enum MappingError {
    /// Selector does not match any column of the current file.
    #[error("column not found: {0}")]
    ColumnNotFound(ColumnSelector),
    /// Field is not part of the configured schema.
    #[error("{0} is not part of the schema")]
    FieldNotInSchema(CanonicalField),
    /// No suggestion exists for the field.
    #[error("no suggestion for {0}")]
    NoSuggestion(CanonicalField),
    /// The mapping rejected the change (e.g. column already used).
    #[error(transparent)]
    Model(#[from] ModelError),
}
