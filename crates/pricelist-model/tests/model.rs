//! Tests for pricelist-model types.

use std::fs;

use pricelist_model::{
    CanonicalField, CatalogEntry, ColumnSelector, EntryCandidate, ImportOptions, MappingTemplate,
    ModelError, RowError, RowIssue, SourceFormat, ValidationOutcome,
};

fn entry() -> CatalogEntry {
    CatalogEntry {
        name: "Chicken".to_string(),
        identifier: "SKU1".to_string(),
        category: "Protein".to_string(),
        unit: "lb".to_string(),
        unit_price: 5.99,
        location: None,
        pack_size: None,
        brand: None,
        cost_per_oz: None,
        last_price: None,
        last_updated: None,
    }
}

#[test]
fn outcome_serializes_with_status_tag() {
    let outcome = ValidationOutcome::Duplicate {
        candidate: EntryCandidate {
            row_number: 2,
            entry: entry(),
        },
        existing: entry(),
    };
    let json = serde_json::to_value(&outcome).expect("serialize outcome");
    assert_eq!(json["status"], "duplicate");
    assert_eq!(json["candidate"]["row_number"], 2);
    assert_eq!(outcome.row_number(), 2);
}

#[test]
fn row_error_lists_every_reason() {
    let error = RowError {
        row_number: 4,
        label: "Chicken".to_string(),
        issues: vec![
            RowIssue::Missing {
                field: CanonicalField::UnitPrice,
            },
            RowIssue::Missing {
                field: CanonicalField::Category,
            },
        ],
    };
    assert_eq!(
        error.fields(),
        vec![CanonicalField::UnitPrice, CanonicalField::Category]
    );
    assert_eq!(
        error.to_string(),
        "row 4 (Chicken): missing unit price; missing category"
    );
}

#[test]
fn template_body_round_trips_without_name() {
    let template = MappingTemplate::new("acme", SourceFormat::PlainHeadered)
        .with_mapping(CanonicalField::Name, ColumnSelector::Name("Item".into()))
        .with_mapping(CanonicalField::Identifier, ColumnSelector::Index(0))
        .with_default(CanonicalField::Category, "Produce");
    let json = serde_json::to_string(&template).expect("serialize template");
    let mut loaded: MappingTemplate = serde_json::from_str(&json).expect("deserialize template");
    assert!(loaded.name.is_empty());
    loaded.name = "acme".to_string();
    assert_eq!(loaded, template);
}

#[test]
fn options_load_from_json_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("import.json");
    fs::write(&path, r#"{"threshold": 85, "normalize_units": false}"#).expect("write config");

    let options = ImportOptions::from_json_file(&path).expect("load options");
    assert_eq!(options.threshold, 85);
    assert!(!options.normalize_units);
    assert!(options.sanitize_identifiers);
}

#[test]
fn options_report_bad_json_with_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ threshold: ").expect("write config");

    let err = ImportOptions::from_json_file(&path).expect_err("invalid json");
    assert!(matches!(err, ModelError::Json { .. }));
    assert!(err.to_string().contains("broken.json"));
}
