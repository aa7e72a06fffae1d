//! Row normalization: turn layout rows into drafts using a mapping.

use std::collections::BTreeMap;

use pricelist_map::PackColumns;
use pricelist_model::{
    CanonicalField, CanonicalSchema, ColumnMapping, DataRow, ImportOptions, RowDraft, RowIssue,
    SourceFormat, SourceLayout,
};
use pricelist_validate::parse_price;

use crate::identifier::sanitize_identifier;
use crate::redact::redact_value;
use crate::units::normalize_unit;

/// Everything the normalizer needs besides the rows themselves.
#[derive(Debug, Clone, Copy)]
pub struct NormalizeInput<'a> {
    pub mapping: &'a ColumnMapping,
    /// Column supplying the unit price; wins over the mapped unit-price column.
    pub price_column: Option<usize>,
    pub defaults: &'a BTreeMap<CanonicalField, String>,
    /// Pack / size / unit columns combined into the pack size of row-typed files.
    pub pack_columns: PackColumns,
}

/// Builds one [`RowDraft`] per data row.
#[derive(Debug, Clone)]
pub struct RowNormalizer<'a> {
    schema: &'a CanonicalSchema,
    options: &'a ImportOptions,
    log_values: bool,
}

impl<'a> RowNormalizer<'a> {
    pub fn new(schema: &'a CanonicalSchema, options: &'a ImportOptions) -> Self {
        Self {
            schema,
            options,
            log_values: false,
        }
    }

    /// Include cell values in trace events.
    #[must_use]
    pub fn with_row_logging(mut self, enabled: bool) -> Self {
        self.log_values = enabled;
        self
    }

    /// Normalize every data row. Rows are never dropped.
    pub fn normalize(&self, layout: &SourceLayout, input: &NormalizeInput<'_>) -> Vec<RowDraft> {
        let drafts: Vec<_> = layout
            .rows
            .iter()
            .map(|row| self.normalize_row(layout.format, row, input))
            .collect();
        let flagged = drafts.iter().filter(|d| !d.issues.is_empty()).count();
        tracing::debug!(rows = drafts.len(), flagged, "Normalized rows");
        drafts
    }

    fn normalize_row(
        &self,
        format: SourceFormat,
        row: &DataRow,
        input: &NormalizeInput<'_>,
    ) -> RowDraft {
        let mut draft = RowDraft::new(row.line);

        for schema_field in &self.schema.fields {
            let field = schema_field.field;
            let Some(raw) = resolve_value(format, row, input, field) else {
                if schema_field.is_required() {
                    draft.issues.push(RowIssue::Missing { field });
                }
                continue;
            };

            match self.clean(field, &raw) {
                Ok(value) => {
                    draft.values.insert(field, value);
                }
                Err(reason) => {
                    tracing::trace!(
                        row = row.line,
                        field = field.key(),
                        value = redact_value(&raw, self.log_values),
                        reason,
                        "Invalid value"
                    );
                    draft.issues.push(RowIssue::Invalid {
                        field,
                        value: raw.clone(),
                        reason: reason.to_string(),
                    });
                    draft.values.insert(field, raw);
                }
            }
        }
        draft
    }

    fn clean(&self, field: CanonicalField, raw: &str) -> Result<String, &'static str> {
        match field {
            CanonicalField::UnitPrice => parse_price(raw).map(|price| price.to_string()),
            CanonicalField::Identifier if self.options.sanitize_identifiers => {
                sanitize_identifier(raw).ok_or(IDENTIFIER_TOO_SHORT)
            }
            CanonicalField::Unit if self.options.normalize_units => {
                Ok(normalize_unit(raw).to_string())
            }
            _ => Ok(raw.to_string()),
        }
    }
}

const IDENTIFIER_TOO_SHORT: &str = "fewer than 3 valid characters";

/// Value for one field: the mapped cell, else the default, else nothing.
fn resolve_value(
    format: SourceFormat,
    row: &DataRow,
    input: &NormalizeInput<'_>,
    field: CanonicalField,
) -> Option<String> {
    if field == CanonicalField::PackSize
        && format == SourceFormat::RowTyped
        && let Some(pack) = combined_pack_size(row, input.pack_columns)
    {
        return Some(pack);
    }

    let column = match (field, input.price_column) {
        (CanonicalField::UnitPrice, Some(price_column)) => Some(price_column),
        _ => input.mapping.column_of(field),
    };
    column
        .map(|index| row.cell(index))
        .filter(|cell| !cell.is_empty())
        .or_else(|| {
            input
                .defaults
                .get(&field)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        })
        .map(str::to_string)
}

/// Space-joined non-empty pack, size and unit cells (`4 5LB LB`).
fn combined_pack_size(row: &DataRow, columns: PackColumns) -> Option<String> {
    let parts: Vec<&str> = columns
        .columns()
        .map(|index| row.cell(index))
        .filter(|cell| !cell.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}
