//! Mapping state for interactive mapping workflows.
//!
//! A [`MappingSession`] holds the engine's suggestions for one file next to
//! the mapping the caller has accepted so far, the price column and any
//! default values. It can be turned into a [`MappingTemplate`] for reuse.

use std::collections::BTreeMap;

use pricelist_model::{
    CanonicalField, CanonicalSchema, ColumnMapping, ColumnSelector, MappedColumn, MappingOrigin,
    MappingTemplate, SourceFormat,
};

use crate::apply::{UnresolvedSelector, apply_template, resolve_column};
use crate::engine::{FieldSuggestion, MappingEngine, MappingResult};
use crate::error::MappingError;
use crate::repository::timestamp_now;

/// Mapping state for a single supplier file.
#[derive(Debug, Clone)]
pub struct MappingSession {
    schema: CanonicalSchema,
    headers: Vec<String>,
    result: MappingResult,
    accepted: ColumnMapping,
    price_column: Option<usize>,
    defaults: BTreeMap<CanonicalField, String>,
}

impl MappingSession {
    /// Create a session from engine results. Nothing is accepted yet.
    pub fn new(schema: CanonicalSchema, headers: Vec<String>, result: MappingResult) -> Self {
        Self {
            schema,
            headers,
            result,
            accepted: ColumnMapping::new(),
            price_column: None,
            defaults: BTreeMap::new(),
        }
    }

    /// Create a session by running the mapping engine over `headers`.
    pub fn from_headers(schema: CanonicalSchema, headers: Vec<String>, threshold: u8) -> Self {
        let engine = MappingEngine::new(schema.clone(), threshold);
        let result = engine.suggest(&headers);
        Self::new(schema, headers, result)
    }

    pub fn schema(&self) -> &CanonicalSchema {
        &self.schema
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn result(&self) -> &MappingResult {
        &self.result
    }

    /// The accepted mapping.
    pub fn mapping(&self) -> &ColumnMapping {
        &self.accepted
    }

    pub fn price_column(&self) -> Option<usize> {
        self.price_column
    }

    pub fn defaults(&self) -> &BTreeMap<CanonicalField, String> {
        &self.defaults
    }

    pub fn suggestion_for(&self, field: CanonicalField) -> Option<&FieldSuggestion> {
        self.result.suggestion_for(field)
    }

    /// Get mapping status for a field.
    pub fn field_status(&self, field: CanonicalField) -> FieldMappingStatus {
        if self.accepted.contains(field) {
            FieldMappingStatus::Accepted
        } else if self.suggestion_for(field).is_some() {
            FieldMappingStatus::Suggested
        } else {
            FieldMappingStatus::Unmapped
        }
    }

    /// Accept the engine's suggestion for a field.
    pub fn accept_suggestion(&mut self, field: CanonicalField) -> Result<(), MappingError> {
        let suggestion = self
            .suggestion_for(field)
            .ok_or(MappingError::NoSuggestion(field))?;
        let column = MappedColumn {
            index: suggestion.column,
            header: suggestion.header.clone(),
            confidence: Some(suggestion.score),
            origin: MappingOrigin::Suggested,
        };
        self.accepted.try_insert(field, column)?;
        Ok(())
    }

    /// Accept every suggestion whose field is still open and whose column is
    /// still free. Returns how many were accepted.
    pub fn accept_all_suggestions(&mut self) -> usize {
        let fields: Vec<_> = self.result.suggestions.iter().map(|s| s.field).collect();
        let mut accepted = 0;
        for field in fields {
            if self.accepted.contains(field) {
                continue;
            }
            if self.accept_suggestion(field).is_ok() {
                accepted += 1;
            }
        }
        accepted
    }

    /// Accept a manual mapping for a field.
    ///
    /// Fails when another field already holds the column; clear that field
    /// first.
    pub fn set_column(
        &mut self,
        field: CanonicalField,
        selector: &ColumnSelector,
    ) -> Result<(), MappingError> {
        self.ensure_in_schema(field)?;
        let index = resolve_column(&self.headers, selector)?;
        let column = MappedColumn {
            index,
            header: self.headers[index].clone(),
            confidence: Some(100),
            origin: MappingOrigin::Override,
        };
        self.accepted.try_insert(field, column)?;
        Ok(())
    }

    /// Clear the mapping for a field.
    pub fn clear_field(&mut self, field: CanonicalField) -> bool {
        self.accepted.remove(field).is_some()
    }

    /// Choose the column that supplies the unit price, or clear it.
    pub fn set_price_column(&mut self, selector: Option<&ColumnSelector>) -> Result<(), MappingError> {
        self.price_column = match selector {
            Some(selector) => Some(resolve_column(&self.headers, selector)?),
            None => None,
        };
        Ok(())
    }

    /// Set the value used when a field has no column or an empty cell.
    pub fn set_default(
        &mut self,
        field: CanonicalField,
        value: impl Into<String>,
    ) -> Result<(), MappingError> {
        self.ensure_in_schema(field)?;
        let value = value.into();
        if value.trim().is_empty() {
            self.defaults.remove(&field);
        } else {
            self.defaults.insert(field, value);
        }
        Ok(())
    }

    /// Replace the accepted mapping with a template applied over the
    /// suggestions. Returns the template selectors that did not resolve.
    pub fn apply_template(&mut self, template: &MappingTemplate) -> Vec<UnresolvedSelector> {
        let application = apply_template(template, &self.headers, &self.result.to_mapping());
        self.accepted = application.mapping;
        self.price_column = application.price_column.or(self.price_column);
        self.defaults.extend(application.defaults);
        application.unresolved
    }

    /// Is the column already accepted for some field?
    pub fn is_column_used(&self, index: usize) -> bool {
        self.accepted.is_column_used(index)
    }

    /// Column indices not yet accepted for any field.
    pub fn available_columns(&self) -> Vec<usize> {
        (0..self.headers.len())
            .filter(|index| !self.accepted.is_column_used(*index))
            .collect()
    }

    /// Required fields with neither a column nor a default.
    ///
    /// The unit price also resolves through the price column.
    pub fn missing_required(&self) -> Vec<CanonicalField> {
        self.schema
            .required_fields()
            .filter(|field| !self.is_resolved(*field))
            .collect()
    }

    fn is_resolved(&self, field: CanonicalField) -> bool {
        self.accepted.contains(field)
            || self.defaults.contains_key(&field)
            || (field == CanonicalField::UnitPrice && self.price_column.is_some())
    }

    /// Get summary counts.
    pub fn summary(&self) -> MappingSummary {
        let required_total = self.schema.required_fields().count();
        let required_mapped = self
            .schema
            .required_fields()
            .filter(|field| self.is_resolved(*field))
            .count();
        MappingSummary {
            total_fields: self.schema.fields.len(),
            mapped: self.accepted.len(),
            suggested: self
                .result
                .suggestions
                .iter()
                .filter(|s| !self.accepted.contains(s.field))
                .count(),
            required_total,
            required_mapped,
        }
    }

    /// Export the accepted state as a template, stamped with the current time.
    pub fn to_template(&self, name: impl Into<String>, source_format: SourceFormat) -> MappingTemplate {
        let mut template = MappingTemplate::new(name, source_format);
        template.column_mapping = self.accepted.to_selectors();
        template.price_field = self
            .price_column
            .map(|index| ColumnSelector::Name(self.headers[index].clone()));
        template.defaults = self.defaults.clone();
        template.saved_at = Some(timestamp_now());
        template
    }

    fn ensure_in_schema(&self, field: CanonicalField) -> Result<(), MappingError> {
        if self.schema.contains(field) {
            Ok(())
        } else {
            Err(MappingError::FieldNotInSchema(field))
        }
    }
}

/// Status of a field's mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMappingStatus {
    /// Has an accepted mapping.
    Accepted,
    /// Has a suggestion but not yet accepted.
    Suggested,
    /// No mapping or suggestion.
    Unmapped,
}

/// Summary of mapping counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingSummary {
    /// Fields in the schema.
    pub total_fields: usize,
    /// Accepted mappings.
    pub mapped: usize,
    /// Pending suggestions.
    pub suggested: usize,
    pub required_total: usize,
    /// Required fields with a column, a default or (for the price) a price column.
    pub required_mapped: usize,
}

impl MappingSummary {
    pub fn is_complete(&self) -> bool {
        self.required_mapped == self.required_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(headers: &[&str]) -> MappingSession {
        MappingSession::from_headers(
            CanonicalSchema::default(),
            headers.iter().map(|h| (*h).to_string()).collect(),
            70,
        )
    }

    #[test]
    fn accepts_suggestions() {
        let mut session = session(&["Name", "SKU", "Category", "Unit", "Price", "Notes"]);
        assert_eq!(session.field_status(CanonicalField::Name), FieldMappingStatus::Suggested);
        assert_eq!(session.accept_all_suggestions(), 5);
        assert_eq!(session.field_status(CanonicalField::Name), FieldMappingStatus::Accepted);
        assert_eq!(session.field_status(CanonicalField::Brand), FieldMappingStatus::Unmapped);
        assert_eq!(session.available_columns(), vec![5]);
        assert!(session.missing_required().is_empty());
        assert!(session.summary().is_complete());
    }

    #[test]
    fn manual_column_conflicts_are_rejected() {
        let mut session = session(&["Name", "SKU", "Price"]);
        session.accept_all_suggestions();
        let err = session
            .set_column(CanonicalField::Brand, &ColumnSelector::Name("name".into()))
            .unwrap_err();
        assert!(matches!(err, MappingError::Model(_)));

        assert!(session.clear_field(CanonicalField::Name));
        session
            .set_column(CanonicalField::Brand, &ColumnSelector::Index(0))
            .unwrap();
        assert!(session.missing_required().contains(&CanonicalField::Name));
        assert_eq!(session.mapping().column_of(CanonicalField::Brand), Some(0));
    }

    #[test]
    fn defaults_and_price_column_resolve_required_fields() {
        let mut session = session(&["SUPC", "Desc", "Case $"]);
        session.accept_all_suggestions();
        session.clear_field(CanonicalField::UnitPrice);
        session
            .set_price_column(Some(&ColumnSelector::Name("Case $".into())))
            .unwrap();
        session.set_default(CanonicalField::Category, "Produce").unwrap();
        let missing = session.missing_required();
        assert!(!missing.contains(&CanonicalField::UnitPrice));
        assert!(!missing.contains(&CanonicalField::Category));
    }

    #[test]
    fn no_suggestion_is_an_error() {
        let mut session = session(&["Zzz"]);
        assert!(matches!(
            session.accept_suggestion(CanonicalField::Brand),
            Err(MappingError::NoSuggestion(CanonicalField::Brand))
        ));
    }

    #[test]
    fn exports_template_by_header_name() {
        let mut session = session(&["Name", "SKU", "Price"]);
        session.accept_all_suggestions();
        session.set_default(CanonicalField::Location, "Walk-in").unwrap();
        let template = session.to_template("acme", SourceFormat::PlainHeadered);
        assert_eq!(
            template.column_mapping[&CanonicalField::Identifier],
            ColumnSelector::Name("SKU".into())
        );
        assert_eq!(template.defaults[&CanonicalField::Location], "Walk-in");
        assert!(template.saved_at.is_some());
    }
}
