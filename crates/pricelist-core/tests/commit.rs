use chrono::NaiveDate;
use pricelist_core::{BatchCommitter, CancelToken, DuplicateStrategy, InMemoryCatalog};
use pricelist_model::{
    Catalog, CatalogEntry, CatalogError, CommitAction, EntryCandidate, RowError, RowIssue,
    UpsertKind, ValidationOutcome,
};
use proptest::prelude::*;

fn entry(identifier: &str, price: f64) -> CatalogEntry {
    CatalogEntry {
        name: format!("Item {identifier}"),
        identifier: identifier.to_string(),
        category: "Dry Goods".to_string(),
        unit: "each".to_string(),
        unit_price: price,
        location: None,
        pack_size: None,
        brand: None,
        cost_per_oz: None,
        last_price: None,
        last_updated: None,
    }
}

fn ready(row_number: usize, identifier: &str, price: f64) -> ValidationOutcome {
    ValidationOutcome::Ready(EntryCandidate {
        row_number,
        entry: entry(identifier, price),
    })
}

fn committer(strategy: DuplicateStrategy) -> BatchCommitter {
    BatchCommitter::new(strategy).with_date(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap())
}

/// Rejects writes for one identifier.
struct FlakyCatalog {
    inner: InMemoryCatalog,
    refuse: &'static str,
}

impl Catalog for FlakyCatalog {
    fn find_by_identifier(&self, identifier: &str) -> Result<Option<CatalogEntry>, CatalogError> {
        self.inner.find_by_identifier(identifier)
    }

    fn upsert(&mut self, entry: CatalogEntry) -> Result<UpsertKind, CatalogError> {
        if entry.identifier == self.refuse {
            return Err(CatalogError::Write {
                identifier: entry.identifier,
                message: "disk full".to_string(),
            });
        }
        self.inner.upsert(entry)
    }
}

#[test]
fn error_rows_are_rejected_and_never_written() {
    let error = RowError {
        row_number: 3,
        label: "row 3".to_string(),
        issues: vec![RowIssue::Missing {
            field: pricelist_model::CanonicalField::Name,
        }],
    };
    let outcomes = vec![ready(2, "A1", 1.0), ValidationOutcome::Error(error.clone())];
    let mut catalog = InMemoryCatalog::new();
    let result = committer(DuplicateStrategy::UpdateAll)
        .commit(&mut catalog, &outcomes)
        .unwrap();

    assert_eq!(result.imported(), 1);
    assert_eq!(result.errors(), &[error]);
    assert_eq!(result.rows()[1].action, CommitAction::Rejected);
    assert_eq!(catalog.len(), 1);
}

#[test]
fn failed_write_is_recorded_and_the_batch_continues() {
    let outcomes = vec![ready(2, "A1", 1.0), ready(3, "B2", 2.0), ready(4, "C3", 3.0)];
    let mut catalog = FlakyCatalog {
        inner: InMemoryCatalog::new(),
        refuse: "B2",
    };
    let result = committer(DuplicateStrategy::UpdateAll)
        .commit(&mut catalog, &outcomes)
        .unwrap();

    let actions: Vec<_> = result.rows().iter().map(|row| row.action).collect();
    assert_eq!(
        actions,
        vec![CommitAction::Inserted, CommitAction::Failed, CommitAction::Inserted]
    );
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].row_number, 3);
    assert!(matches!(
        result.errors()[0].issues[0],
        RowIssue::CommitFailed { .. }
    ));
    assert_eq!(catalog.inner.len(), 2);
}

#[test]
fn cancelled_commit_marks_remaining_rows() {
    let token = CancelToken::new();
    token.cancel();
    let outcomes = vec![ready(2, "A1", 1.0), ready(3, "B2", 2.0)];
    let mut catalog = InMemoryCatalog::new();
    let result = committer(DuplicateStrategy::UpdateAll)
        .with_cancel_token(token)
        .commit(&mut catalog, &outcomes)
        .unwrap();

    assert!(result.was_cancelled());
    assert!(
        result
            .rows()
            .iter()
            .all(|row| row.action == CommitAction::NotAttempted)
    );
    assert!(catalog.is_empty());
}

#[test]
fn review_each_writes_nothing() {
    let mut catalog = InMemoryCatalog::new();
    let result = committer(DuplicateStrategy::ReviewEach).commit(&mut catalog, &[ready(2, "A1", 1.0)]);
    assert!(result.is_err());
    assert!(catalog.is_empty());
}

#[test]
fn entry_added_after_validation_is_treated_as_duplicate() {
    // validated against an empty catalog; another batch wrote SKU1 since
    let outcomes = vec![ready(2, "SKU1", 9.99)];

    let mut catalog = InMemoryCatalog::from_entries([entry("SKU1", 5.99)]);
    let result = committer(DuplicateStrategy::SkipAll)
        .commit(&mut catalog, &outcomes)
        .unwrap();
    assert_eq!((result.imported(), result.updated(), result.skipped()), (0, 0, 1));
    assert_eq!(catalog.get("SKU1").unwrap().unit_price, 5.99);

    let result = committer(DuplicateStrategy::UpdateAll)
        .commit(&mut catalog, &outcomes)
        .unwrap();
    assert_eq!((result.imported(), result.updated()), (0, 1));
    let stored = catalog.get("SKU1").unwrap();
    assert_eq!(stored.unit_price, 9.99);
    assert_eq!(stored.last_price, Some(5.99));
}

#[test]
fn entry_removed_after_validation_is_inserted() {
    let existing = entry("SKU1", 5.99);
    let outcomes = vec![duplicate(2, "SKU1", 9.99, &existing)];
    let mut catalog = InMemoryCatalog::new();
    let result = committer(DuplicateStrategy::SkipAll)
        .commit(&mut catalog, &outcomes)
        .unwrap();
    assert_eq!((result.imported(), result.skipped()), (1, 0));
    assert_eq!(catalog.get("SKU1").unwrap().last_price, None);
}

fn duplicate(row_number: usize, identifier: &str, price: f64, existing: &CatalogEntry) -> ValidationOutcome {
    ValidationOutcome::Duplicate {
        candidate: EntryCandidate {
            row_number,
            entry: entry(identifier, price),
        },
        existing: existing.clone(),
    }
}

proptest! {
    #[test]
    fn strategy_decides_duplicate_writes(
        prices in proptest::collection::btree_map("[A-Z][0-9]{3}", (1u32..10_000, 1u32..10_000), 1..12),
    ) {
        let seeded: Vec<CatalogEntry> = prices
            .iter()
            .map(|(id, (old, _))| entry(id, f64::from(*old) / 100.0))
            .collect();
        let outcomes: Vec<_> = prices
            .iter()
            .zip(&seeded)
            .enumerate()
            .map(|(i, ((id, (_, new)), existing))| duplicate(i + 2, id, f64::from(*new) / 100.0, existing))
            .collect();

        let mut skipped = InMemoryCatalog::from_entries(seeded.clone());
        let result = committer(DuplicateStrategy::SkipAll).commit(&mut skipped, &outcomes).unwrap();
        prop_assert_eq!(result.skipped(), prices.len());
        prop_assert_eq!(skipped.into_entries(), InMemoryCatalog::from_entries(seeded.clone()).into_entries());

        let mut updated = InMemoryCatalog::from_entries(seeded);
        let result = committer(DuplicateStrategy::UpdateAll).commit(&mut updated, &outcomes).unwrap();
        prop_assert_eq!(result.updated(), prices.len());
        for (id, (_, new)) in &prices {
            prop_assert_eq!(updated.get(id).unwrap().unit_price, f64::from(*new) / 100.0);
        }
    }
}
