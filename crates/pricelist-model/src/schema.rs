//! The canonical schema every supplier file is normalized into.
//!
//! The field set, the required/optional partition and the synonym patterns
//! used for column matching are configuration: [`CanonicalSchema`] is
//! deserializable and [`CanonicalSchema::default`] is only the stock setup.

use serde::{Deserialize, Serialize};

use crate::field::{CanonicalField, FieldRequirement};

/// A single schema field with its matching patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub field: CanonicalField,
    pub requirement: FieldRequirement,
    /// Column-name patterns that indicate this field (e.g. `sku`, `item_code`).
    #[serde(default)]
    pub synonyms: Vec<String>,
}

impl SchemaField {
    pub fn is_required(&self) -> bool {
        self.requirement == FieldRequirement::Required
    }
}

/// Ordered set of target fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalSchema {
    pub fields: Vec<SchemaField>,
}

impl CanonicalSchema {
    pub fn new(fields: Vec<SchemaField>) -> Self {
        Self { fields }
    }

    pub fn get(&self, field: CanonicalField) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.field == field)
    }

    pub fn contains(&self, field: CanonicalField) -> bool {
        self.get(field).is_some()
    }

    pub fn is_required(&self, field: CanonicalField) -> bool {
        self.get(field).is_some_and(SchemaField::is_required)
    }

    /// Required fields in schema order.
    pub fn required_fields(&self) -> impl Iterator<Item = CanonicalField> + '_ {
        self.fields
            .iter()
            .filter(|f| f.is_required())
            .map(|f| f.field)
    }

    /// Optional fields in schema order.
    pub fn optional_fields(&self) -> impl Iterator<Item = CanonicalField> + '_ {
        self.fields
            .iter()
            .filter(|f| !f.is_required())
            .map(|f| f.field)
    }

    /// Position of a field in the schema, used as a deterministic tie-breaker.
    pub fn position(&self, field: CanonicalField) -> usize {
        self.fields
            .iter()
            .position(|f| f.field == field)
            .unwrap_or(usize::MAX)
    }
}

fn patterns(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

impl Default for CanonicalSchema {
    fn default() -> Self {
        use CanonicalField as F;
        use FieldRequirement::{Optional, Required};

        let field = |field, requirement, synonyms: &[&str]| SchemaField {
            field,
            requirement,
            synonyms: patterns(synonyms),
        };

        Self::new(vec![
            field(
                F::Name,
                Required,
                &[
                    "name",
                    "product",
                    "desc",
                    "description",
                    "item",
                    "product_name",
                    "item_name",
                    "ingredient",
                    "product_description",
                    "item_description",
                    "prod_name",
                    "prod_desc",
                ],
            ),
            field(
                F::Identifier,
                Required,
                &[
                    "sku",
                    "supc",
                    "item_code",
                    "code",
                    "product_code",
                    "item_number",
                    "product_number",
                    "item_no",
                    "prod_code",
                    "upc",
                    "barcode",
                ],
            ),
            field(
                F::Category,
                Required,
                &[
                    "category",
                    "cat",
                    "type",
                    "group",
                    "class",
                    "classification",
                    "product_category",
                    "item_category",
                ],
            ),
            field(
                F::Unit,
                Required,
                &["unit", "uom", "measure", "unit_of_measure", "selling_unit", "base_unit"],
            ),
            field(
                F::UnitPrice,
                Required,
                &[
                    "price",
                    "cost",
                    "unit_price",
                    "case_price",
                    "split_price",
                    "unit_cost",
                    "each_price",
                    "sell_price",
                    "list_price",
                    "current_price",
                    "price_per_unit",
                    "cost_per_unit",
                ],
            ),
            field(
                F::Location,
                Optional,
                &[
                    "location",
                    "storage",
                    "area",
                    "storage_location",
                    "warehouse",
                    "bin",
                    "shelf",
                    "zone",
                ],
            ),
            field(
                F::PackSize,
                Optional,
                &[
                    "pack_size",
                    "case_size",
                    "package_size",
                    "unit_size",
                    "container_size",
                    "case_qty",
                    "pack_qty",
                    "units_per_case",
                ],
            ),
            field(
                F::Brand,
                Optional,
                &["brand", "manufacturer", "mfr", "vendor", "maker", "producer"],
            ),
        ])
    }
}
