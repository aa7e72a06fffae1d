//! Combining suggestions with templates and explicit overrides.

use std::collections::BTreeMap;
use std::fmt;

use pricelist_model::{
    CanonicalField, ColumnMapping, ColumnSelector, MappedColumn, MappingOrigin, MappingTemplate,
};

use crate::error::MappingError;
use crate::patterns::{PACK_HEADERS, SIZE_HEADERS, UNIT_HEADERS};
use crate::utils::normalize_text;

/// What a template selector was meant to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorTarget {
    Field(CanonicalField),
    PriceField,
}

impl fmt::Display for SelectorTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(field) => write!(f, "{field}"),
            Self::PriceField => f.write_str("price field"),
        }
    }
}

/// A template selector that matches no column of the current file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedSelector {
    pub target: SelectorTarget,
    pub selector: ColumnSelector,
}

/// A template resolved against the headers of one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateApplication {
    pub mapping: ColumnMapping,
    pub price_column: Option<usize>,
    pub defaults: BTreeMap<CanonicalField, String>,
    /// Selectors left unmapped because they resolve to nothing.
    pub unresolved: Vec<UnresolvedSelector>,
}

/// Resolve a selector, failing with [`MappingError::ColumnNotFound`].
pub fn resolve_column(headers: &[String], selector: &ColumnSelector) -> Result<usize, MappingError> {
    selector
        .resolve(headers)
        .ok_or_else(|| MappingError::ColumnNotFound(selector.clone()))
}

/// Apply a template on top of fresh suggestions.
///
/// Every template field whose selector resolves wins. Suggestions only
/// fill fields the template leaves open, and never take a column the
/// template already claimed. Unresolved selectors are reported back and
/// left unmapped.
pub fn apply_template(
    template: &MappingTemplate,
    headers: &[String],
    suggested: &ColumnMapping,
) -> TemplateApplication {
    let mut application = TemplateApplication {
        defaults: template.defaults.clone(),
        ..TemplateApplication::default()
    };

    for (field, selector) in &template.column_mapping {
        let Some(index) = selector.resolve(headers) else {
            tracing::warn!(
                template = %template.name,
                field = field.key(),
                selector = %selector,
                "Template column not found in file"
            );
            application.unresolved.push(UnresolvedSelector {
                target: SelectorTarget::Field(*field),
                selector: selector.clone(),
            });
            continue;
        };
        let column = MappedColumn {
            index,
            header: headers[index].clone(),
            confidence: None,
            origin: MappingOrigin::Template,
        };
        if let Err(err) = application.mapping.try_insert(*field, column) {
            tracing::warn!(template = %template.name, field = field.key(), %err, "Template column ignored");
            application.unresolved.push(UnresolvedSelector {
                target: SelectorTarget::Field(*field),
                selector: selector.clone(),
            });
        }
    }

    for (field, column) in suggested.iter() {
        if application.mapping.contains(field) || application.mapping.is_column_used(column.index) {
            continue;
        }
        application.mapping.insert_replacing(field, column.clone());
    }

    if let Some(selector) = &template.price_field {
        match selector.resolve(headers) {
            Some(index) => application.price_column = Some(index),
            None => {
                tracing::warn!(
                    template = %template.name,
                    selector = %selector,
                    "Template price column not found in file"
                );
                application.unresolved.push(UnresolvedSelector {
                    target: SelectorTarget::PriceField,
                    selector: selector.clone(),
                });
            }
        }
    }

    application
}

/// Apply explicit per-field column choices.
///
/// Each override gets confidence 100 and takes its column away from any
/// other field. A selector that matches no column fails the whole call
/// before anything changes.
pub fn apply_overrides(
    mapping: &mut ColumnMapping,
    headers: &[String],
    overrides: &BTreeMap<CanonicalField, ColumnSelector>,
) -> Result<(), MappingError> {
    let resolved = overrides
        .iter()
        .map(|(field, selector)| Ok((*field, resolve_column(headers, selector)?)))
        .collect::<Result<Vec<_>, MappingError>>()?;

    for (field, index) in resolved {
        let displaced = mapping.insert_replacing(
            field,
            MappedColumn {
                index,
                header: headers[index].clone(),
                confidence: Some(100),
                origin: MappingOrigin::Override,
            },
        );
        if let Some(previous) = displaced {
            tracing::debug!(
                field = field.key(),
                displaced = previous.key(),
                column = %headers[index],
                "Override moved column"
            );
        }
    }
    Ok(())
}

/// The pack, size and unit columns of a row-typed file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackColumns {
    pub pack: Option<usize>,
    pub size: Option<usize>,
    pub unit: Option<usize>,
}

impl PackColumns {
    pub fn is_empty(&self) -> bool {
        self.pack.is_none() && self.size.is_none() && self.unit.is_none()
    }

    pub fn columns(&self) -> impl Iterator<Item = usize> {
        [self.pack, self.size, self.unit].into_iter().flatten()
    }
}

/// Find the pack / size / unit columns by exact normalized header match.
pub fn detect_pack_columns(headers: &[String]) -> PackColumns {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_text(h)).collect();
    let find = |names: &[&str]| normalized.iter().position(|h| names.contains(&h.as_str()));
    PackColumns {
        pack: find(&PACK_HEADERS),
        size: find(&SIZE_HEADERS),
        unit: find(&UNIT_HEADERS),
    }
}
