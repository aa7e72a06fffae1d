//! Required field checks.

use pricelist_model::{CanonicalSchema, RowDraft, RowIssue};

/// Every required field must have a non-empty value.
pub fn check(schema: &CanonicalSchema, draft: &RowDraft) -> Vec<RowIssue> {
    schema
        .required_fields()
        .filter(|field| draft.value(*field).is_none())
        .map(|field| RowIssue::Missing { field })
        .collect()
}
