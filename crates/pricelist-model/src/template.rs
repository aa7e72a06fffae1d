//! Reusable mapping templates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::field::CanonicalField;
use crate::grid::SourceFormat;
use crate::mapping::ColumnSelector;

/// A named, persisted mapping configuration for one supplier.
///
/// The body is stored with camelCase keys (`sourceFormat`, `columnMapping`,
/// `priceField`, `defaults`) so the file stays readable by other tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingTemplate {
    /// Template name, the store key. Not part of the stored body.
    #[serde(skip)]
    pub name: String,
    pub source_format: SourceFormat,
    #[serde(default)]
    pub column_mapping: BTreeMap<CanonicalField, ColumnSelector>,
    #[serde(default)]
    pub price_field: Option<ColumnSelector>,
    /// Values used when a field has no mapped column or an empty cell.
    #[serde(default)]
    pub defaults: BTreeMap<CanonicalField, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// RFC 3339 timestamp of the last save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
}

impl MappingTemplate {
    pub fn new(name: impl Into<String>, source_format: SourceFormat) -> Self {
        Self {
            name: name.into(),
            source_format,
            column_mapping: BTreeMap::new(),
            price_field: None,
            defaults: BTreeMap::new(),
            description: None,
            saved_at: None,
        }
    }

    #[must_use]
    pub fn with_mapping(mut self, field: CanonicalField, column: ColumnSelector) -> Self {
        self.column_mapping.insert(field, column);
        self
    }

    #[must_use]
    pub fn with_price_field(mut self, column: ColumnSelector) -> Self {
        self.price_field = Some(column);
        self
    }

    #[must_use]
    pub fn with_default(mut self, field: CanonicalField, value: impl Into<String>) -> Self {
        self.defaults.insert(field, value.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
