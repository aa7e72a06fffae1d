//! The batch-level mapping gate.

use std::collections::BTreeMap;

use pricelist_model::{CanonicalField, CanonicalSchema, ColumnMapping};

use crate::error::MappingIncomplete;

/// Check that every required field resolves before any row is validated.
///
/// A field resolves through a mapped column or a non-blank default. The unit
/// price also resolves through the chosen price column.
pub fn check_mapping_complete(
    schema: &CanonicalSchema,
    mapping: &ColumnMapping,
    defaults: &BTreeMap<CanonicalField, String>,
    price_column: Option<usize>,
) -> Result<(), MappingIncomplete> {
    let missing: Vec<_> = schema
        .required_fields()
        .filter(|field| {
            let has_default = defaults.get(field).is_some_and(|v| !v.trim().is_empty());
            let has_price_column = *field == CanonicalField::UnitPrice && price_column.is_some();
            !(mapping.contains(*field) || has_default || has_price_column)
        })
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        tracing::debug!(missing = missing.len(), "Mapping incomplete");
        Err(MappingIncomplete { missing })
    }
}

#[cfg(test)]
mod tests {
    use pricelist_model::{MappedColumn, MappingOrigin};

    use super::*;

    fn mapped(fields: &[CanonicalField]) -> ColumnMapping {
        let mut mapping = ColumnMapping::new();
        for (index, field) in fields.iter().enumerate() {
            mapping.insert_replacing(
                *field,
                MappedColumn {
                    index,
                    header: field.key().to_string(),
                    confidence: None,
                    origin: MappingOrigin::Template,
                },
            );
        }
        mapping
    }

    #[test]
    fn lists_missing_required_fields_in_schema_order() {
        let schema = CanonicalSchema::default();
        let mapping = mapped(&[CanonicalField::Name, CanonicalField::Identifier]);
        let err = check_mapping_complete(&schema, &mapping, &BTreeMap::new(), None).unwrap_err();
        assert_eq!(
            err.missing,
            vec![
                CanonicalField::Category,
                CanonicalField::Unit,
                CanonicalField::UnitPrice
            ]
        );
        assert_eq!(
            err.to_string(),
            "required fields not mapped: category, unit, unit price"
        );
    }

    #[test]
    fn defaults_and_price_column_count() {
        let schema = CanonicalSchema::default();
        let mapping = mapped(&[CanonicalField::Name, CanonicalField::Identifier]);
        let defaults = BTreeMap::from([
            (CanonicalField::Category, "Produce".to_string()),
            (CanonicalField::Unit, "each".to_string()),
        ]);
        assert!(check_mapping_complete(&schema, &mapping, &defaults, Some(4)).is_ok());

        let blank = BTreeMap::from([
            (CanonicalField::Category, "  ".to_string()),
            (CanonicalField::Unit, "each".to_string()),
        ]);
        let err = check_mapping_complete(&schema, &mapping, &blank, Some(4)).unwrap_err();
        assert_eq!(err.missing, vec![CanonicalField::Category]);
    }
}
