use std::collections::BTreeSet;

use pricelist_map::{ConfidenceLevel, MappingEngine, MappingSession, detect_pack_columns};
use pricelist_model::{CanonicalField, CanonicalSchema, ColumnSelector, MappingTemplate, SourceFormat};
use proptest::prelude::*;

fn headers(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

const HEADER_POOL: &[&str] = &[
    "Name", "Item", "Description", "SKU", "Item Code", "SUPC", "Category", "Type", "Unit",
    "UOM", "Price", "Unit Price", "Case Price", "Cost", "Location", "Storage", "Pack Size",
    "Brand", "Mfr", "Notes", "Qty", "", "Column_3",
];

#[test]
fn suggests_fields_for_typical_supplier_headers() {
    let engine = MappingEngine::new(CanonicalSchema::default(), 70);
    let result = engine.suggest(&headers(&[
        "Item Code",
        "Product Description",
        "Category",
        "UOM",
        "Unit Price",
        "Manufacturer",
        "Comments",
    ]));
    let mapping = result.to_mapping();
    assert_eq!(mapping.column_of(CanonicalField::Identifier), Some(0));
    assert_eq!(mapping.column_of(CanonicalField::Name), Some(1));
    assert_eq!(mapping.column_of(CanonicalField::Category), Some(2));
    assert_eq!(mapping.column_of(CanonicalField::Unit), Some(3));
    assert_eq!(mapping.column_of(CanonicalField::UnitPrice), Some(4));
    assert_eq!(mapping.column_of(CanonicalField::Brand), Some(5));
    assert!(result.unmapped_columns.contains(&6));
    assert_eq!(
        result.suggestion_for(CanonicalField::Identifier).map(|s| s.level),
        Some(ConfidenceLevel::High)
    );
}

#[test]
fn session_applies_template_over_suggestions() {
    let mut session = MappingSession::from_headers(
        CanonicalSchema::default(),
        headers(&["SUPC", "Pack", "Size", "Unit", "Desc", "Case $"]),
        70,
    );
    let template = MappingTemplate::new("sysco", SourceFormat::RowTyped)
        .with_mapping(CanonicalField::Identifier, ColumnSelector::Name("SUPC".into()))
        .with_mapping(CanonicalField::Name, ColumnSelector::Name("Desc".into()))
        .with_mapping(CanonicalField::Category, ColumnSelector::Name("Dept".into()))
        .with_price_field(ColumnSelector::Name("Case $".into()))
        .with_default(CanonicalField::Category, "Dry Goods");

    let unresolved = session.apply_template(&template);
    assert_eq!(unresolved.len(), 1);
    assert_eq!(session.mapping().column_of(CanonicalField::Name), Some(4));
    assert_eq!(session.price_column(), Some(5));
    assert_eq!(session.defaults()[&CanonicalField::Category], "Dry Goods");
    assert!(!session.missing_required().contains(&CanonicalField::Category));

    let pack = detect_pack_columns(session.headers());
    assert_eq!((pack.pack, pack.size, pack.unit), (Some(1), Some(2), Some(3)));
}

proptest! {
    #[test]
    fn assignment_is_one_to_one(
        picks in prop::collection::vec(prop::sample::select(HEADER_POOL), 0..12),
        threshold in 50u8..=100,
    ) {
        let headers: Vec<String> = picks.iter().map(|h| (*h).to_string()).collect();
        let engine = MappingEngine::new(CanonicalSchema::default(), threshold);
        let result = engine.suggest(&headers);

        let mut fields = BTreeSet::new();
        let mut columns = BTreeSet::new();
        for suggestion in &result.suggestions {
            prop_assert!(fields.insert(suggestion.field));
            prop_assert!(columns.insert(suggestion.column));
            prop_assert!(suggestion.score >= threshold);
        }
        prop_assert_eq!(result.suggestions.len() + result.unmapped_columns.len(), headers.len());
        prop_assert_eq!(
            result.suggestions.len() + result.unmapped_fields.len(),
            CanonicalSchema::default().fields.len()
        );
    }

    #[test]
    fn suggestions_are_deterministic(
        picks in prop::collection::vec(prop::sample::select(HEADER_POOL), 0..10),
    ) {
        let headers: Vec<String> = picks.iter().map(|h| (*h).to_string()).collect();
        let engine = MappingEngine::new(CanonicalSchema::default(), 70);
        prop_assert_eq!(engine.suggest(&headers).to_mapping(), engine.suggest(&headers).to_mapping());
    }
}
