//! Batch-level validation errors.

use pricelist_model::CanonicalField;
use thiserror::Error;

/// Required fields that resolve to neither a column nor a default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("required fields not mapped: {}", join_fields(.missing))]
pub struct MappingIncomplete {
    /// Missing fields in schema order.
    pub missing: Vec<CanonicalField>,
}

impl MappingIncomplete {
    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> String {
        let key = self.missing.first().map_or("field", |f| f.key());
        format!("Map a column with --map {key}=<column> or set a value with --default {key}=<value>.")
    }
}

fn join_fields(fields: &[CanonicalField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
