//! Column mapping types: canonical field → source column.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::field::CanonicalField;

/// Reference to a source column, by position or by header name.
///
/// Serialized untagged, so templates may hold either `3` or `"Desc"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnSelector {
    Index(usize),
    Name(String),
}

impl ColumnSelector {
    /// Resolve against the current headers. Names match case-insensitively.
    ///
    /// An all-digit name that matches no header falls back to that 0-based
    /// position.
    pub fn resolve(&self, headers: &[String]) -> Option<usize> {
        match self {
            Self::Index(index) => (*index < headers.len()).then_some(*index),
            Self::Name(name) => {
                let wanted = name.trim();
                headers
                    .iter()
                    .position(|h| h.trim().eq_ignore_ascii_case(wanted))
                    .or_else(|| {
                        wanted
                            .parse::<usize>()
                            .ok()
                            .filter(|index| *index < headers.len())
                    })
            }
        }
    }
}

impl fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "#{index}"),
            Self::Name(name) => write!(f, "'{name}'"),
        }
    }
}

impl FromStr for ColumnSelector {
    type Err = Infallible;

    /// `#N` is a column index, anything else a header name. Bare digits stay
    /// a name so a header such as `2024` can be selected; see [`Self::resolve`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let index = trimmed
            .strip_prefix('#')
            .and_then(|digits| digits.trim().parse::<usize>().ok());
        Ok(match index {
            Some(index) => Self::Index(index),
            None => Self::Name(trimmed.to_string()),
        })
    }
}

/// Where a mapping decision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingOrigin {
    /// Fuzzy suggestion from the mapping engine.
    Suggested,
    /// Loaded from a mapping template.
    Template,
    /// Explicit choice by the caller.
    Override,
}

/// The source column bound to one canonical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedColumn {
    pub index: usize,
    pub header: String,
    /// Confidence 0-100; `None` when the origin carries no score.
    pub confidence: Option<u8>,
    pub origin: MappingOrigin,
}

/// One-to-one, possibly partial mapping from canonical fields to columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    entries: BTreeMap<CanonicalField, MappedColumn>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: CanonicalField) -> Option<&MappedColumn> {
        self.entries.get(&field)
    }

    pub fn column_of(&self, field: CanonicalField) -> Option<usize> {
        self.entries.get(&field).map(|m| m.index)
    }

    pub fn contains(&self, field: CanonicalField) -> bool {
        self.entries.contains_key(&field)
    }

    /// Field currently holding the column at `index`, if any.
    pub fn field_for_column(&self, index: usize) -> Option<CanonicalField> {
        self.entries
            .iter()
            .find(|(_, m)| m.index == index)
            .map(|(field, _)| *field)
    }

    pub fn is_column_used(&self, index: usize) -> bool {
        self.field_for_column(index).is_some()
    }

    /// Bind `field` to a column, failing when another field holds that column.
    ///
    /// Re-binding a field that is already mapped replaces its old column.
    pub fn try_insert(
        &mut self,
        field: CanonicalField,
        column: MappedColumn,
    ) -> Result<(), ModelError> {
        if let Some(holder) = self.field_for_column(column.index)
            && holder != field
        {
            return Err(ModelError::ColumnAlreadyUsed {
                column: column.header,
                field: holder,
            });
        }
        self.entries.insert(field, column);
        Ok(())
    }

    /// Bind `field` to a column, taking the column away from any other field.
    ///
    /// Returns the field that lost the column.
    pub fn insert_replacing(
        &mut self,
        field: CanonicalField,
        column: MappedColumn,
    ) -> Option<CanonicalField> {
        let displaced = self
            .field_for_column(column.index)
            .filter(|holder| *holder != field);
        if let Some(holder) = displaced {
            self.entries.remove(&holder);
        }
        self.entries.insert(field, column);
        displaced
    }

    pub fn remove(&mut self, field: CanonicalField) -> Option<MappedColumn> {
        self.entries.remove(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &MappedColumn)> {
        self.entries.iter().map(|(field, column)| (*field, column))
    }

    pub fn fields(&self) -> impl Iterator<Item = CanonicalField> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Selectors by header name, the form templates are stored in.
    pub fn to_selectors(&self) -> BTreeMap<CanonicalField, ColumnSelector> {
        self.entries
            .iter()
            .map(|(field, column)| (*field, ColumnSelector::Name(column.header.clone())))
            .collect()
    }
}
