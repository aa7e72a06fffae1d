//! Per-row validation checks.
//!
//! Each module inspects a [`RowDraft`] and returns the issues it finds. The
//! normalizer's own issues are kept; checks never report a field twice.

mod price;
mod required;

use pricelist_model::{CanonicalSchema, RowDraft, RowIssue};

pub use price::parse_price;

/// Run all checks on a draft, starting from its pre-marked issues.
pub fn run_all(schema: &CanonicalSchema, draft: &RowDraft) -> Vec<RowIssue> {
    let mut issues = draft.issues.clone();

    // 1. Required fields must carry a non-empty value
    for issue in required::check(schema, draft) {
        push_unique(&mut issues, issue);
    }

    // 2. The unit price must be a non-negative number
    for issue in price::check(draft) {
        push_unique(&mut issues, issue);
    }

    issues
}

fn push_unique(issues: &mut Vec<RowIssue>, issue: RowIssue) {
    let duplicate = issue
        .field()
        .is_some_and(|field| issues.iter().any(|i| i.field() == Some(field)));
    if !duplicate {
        issues.push(issue);
    }
}
