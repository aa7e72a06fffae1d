use std::collections::BTreeMap;

use pricelist_model::{CanonicalField, CanonicalSchema};

use crate::utils::normalize_text;

/// Headers naming the pack-count column of row-typed files.
pub const PACK_HEADERS: [&str; 3] = ["pack", "pk", "pack count"];
/// Headers naming the item-size column of row-typed files.
pub const SIZE_HEADERS: [&str; 3] = ["size", "sz", "item size"];
/// Headers naming the unit column of row-typed files.
pub const UNIT_HEADERS: [&str; 3] = ["unit", "uom", "unit of measure"];

/// Normalized match patterns per schema field: the field key, its label
/// and every configured synonym, deduplicated in that order.
pub fn build_field_patterns(schema: &CanonicalSchema) -> BTreeMap<CanonicalField, Vec<String>> {
    let mut patterns = BTreeMap::new();
    for schema_field in &schema.fields {
        let field = schema_field.field;
        let mut values: Vec<String> = Vec::new();
        let sources = [field.key(), field.label()]
            .into_iter()
            .chain(schema_field.synonyms.iter().map(String::as_str));
        for source in sources {
            let normalized = normalize_text(source);
            if !normalized.is_empty() && !values.contains(&normalized) {
                values.push(normalized);
            }
        }
        patterns.insert(field, values);
    }
    patterns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_include_key_label_and_synonyms() {
        let patterns = build_field_patterns(&CanonicalSchema::default());
        let price = &patterns[&CanonicalField::UnitPrice];
        assert_eq!(price[0], "unit price");
        assert!(price.contains(&"case price".to_string()));
        // key and label normalize to the same text and appear once
        assert_eq!(price.iter().filter(|p| *p == "unit price").count(), 1);
    }
}
