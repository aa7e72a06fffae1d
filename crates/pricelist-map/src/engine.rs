//! Mapping engine implementation.

use std::collections::{BTreeMap, BTreeSet};

use pricelist_model::{
    CanonicalField, CanonicalSchema, ColumnMapping, DEFAULT_THRESHOLD, MappedColumn,
    MappingOrigin,
};

use crate::score::{ColumnScore, ScoringEngine};

/// Confidence level categories for mapping quality assessment.
///
/// These levels help categorize mappings by their reliability:
/// - `High`: Near-certain matches that can be used without review
/// - `Medium`: Good matches that should be verified
/// - `Low`: Weak matches requiring manual confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfidenceLevel {
    /// Low confidence (≥ threshold, < medium threshold).
    Low,
    /// Medium confidence (≥ medium threshold, < high threshold).
    Medium,
    /// High confidence (≥ high threshold).
    High,
}

impl ConfidenceLevel {
    /// Returns a human-readable description of the confidence level.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::High => "high confidence - likely correct",
            Self::Medium => "medium confidence - should review",
            Self::Low => "low confidence - needs verification",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Configurable thresholds for categorizing mapping confidence.
///
/// - Below `low`: rejected (not suggested)
/// - `low` to `medium`: [`ConfidenceLevel::Low`]
/// - `medium` to `high`: [`ConfidenceLevel::Medium`]
/// - At or above `high`: [`ConfidenceLevel::High`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfidenceThresholds {
    /// Minimum score for high-quality matches (default: 95).
    pub high: u8,
    /// Minimum score for medium-quality matches (default: 80).
    pub medium: u8,
    /// Minimum score to be suggested at all (default: 70).
    pub low: u8,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self::with_threshold(DEFAULT_THRESHOLD)
    }
}

impl ConfidenceThresholds {
    /// Default high/medium boundaries with a custom suggestion threshold.
    #[must_use]
    pub fn with_threshold(low: u8) -> Self {
        Self {
            high: 95,
            medium: 80,
            low,
        }
    }

    /// Categorizes a score into a confidence level.
    ///
    /// Returns `None` if the score is below the low threshold.
    #[must_use]
    pub fn categorize(&self, score: u8) -> Option<ConfidenceLevel> {
        if score < self.low {
            None
        } else if score >= self.high {
            Some(ConfidenceLevel::High)
        } else if score >= self.medium {
            Some(ConfidenceLevel::Medium)
        } else {
            Some(ConfidenceLevel::Low)
        }
    }
}

/// A column suggested for a field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSuggestion {
    pub field: CanonicalField,
    pub column: usize,
    pub header: String,
    pub score: u8,
    pub level: ConfidenceLevel,
    /// Human-readable breakdown of the score.
    pub explanation: String,
}

/// A ranked candidate column for a field, for previews.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedColumn {
    pub column: usize,
    pub header: String,
    pub score: ColumnScore,
}

/// Result of a mapping operation.
#[derive(Debug, Clone)]
pub struct MappingResult {
    /// Accepted suggestions in assignment order (best first).
    pub suggestions: Vec<FieldSuggestion>,
    /// Every column at or above the threshold, per field, best first.
    pub candidates: BTreeMap<CanonicalField, Vec<RankedColumn>>,
    /// Schema fields without a suggested column, in schema order.
    pub unmapped_fields: Vec<CanonicalField>,
    /// Column indices not suggested for any field.
    pub unmapped_columns: Vec<usize>,
}

impl MappingResult {
    /// Suggestion for a specific field.
    pub fn suggestion_for(&self, field: CanonicalField) -> Option<&FieldSuggestion> {
        self.suggestions.iter().find(|s| s.field == field)
    }

    /// Suggestions as a column mapping with `Suggested` origin.
    pub fn to_mapping(&self) -> ColumnMapping {
        let mut mapping = ColumnMapping::new();
        for suggestion in &self.suggestions {
            mapping.insert_replacing(
                suggestion.field,
                MappedColumn {
                    index: suggestion.column,
                    header: suggestion.header.clone(),
                    confidence: Some(suggestion.score),
                    origin: MappingOrigin::Suggested,
                },
            );
        }
        mapping
    }

    /// Returns the count of suggestions at each confidence level.
    #[must_use]
    pub fn count_by_level(&self) -> BTreeMap<ConfidenceLevel, usize> {
        let mut counts = BTreeMap::new();
        for suggestion in &self.suggestions {
            *counts.entry(suggestion.level).or_insert(0) += 1;
        }
        counts
    }

    /// Returns true if all suggestions are at high confidence level.
    #[must_use]
    pub fn all_high_confidence(&self) -> bool {
        !self.suggestions.is_empty()
            && self
                .suggestions
                .iter()
                .all(|s| s.level == ConfidenceLevel::High)
    }
}

/// Engine for mapping supplier columns to canonical fields.
///
/// Every (field, column) pair is scored; pairs below the threshold are
/// dropped and the rest are assigned greedily by descending score, ties
/// broken by schema field order and then by leftmost column. Each column
/// and each field is used at most once.
///
/// ```ignore
/// let engine = MappingEngine::new(CanonicalSchema::default(), 70);
/// let result = engine.suggest(&["Name".to_string(), "SKU".to_string()]);
/// ```
#[derive(Debug, Clone)]
pub struct MappingEngine {
    scorer: ScoringEngine,
    thresholds: ConfidenceThresholds,
}

impl MappingEngine {
    pub fn new(schema: CanonicalSchema, threshold: u8) -> Self {
        Self {
            scorer: ScoringEngine::new(schema),
            thresholds: ConfidenceThresholds::with_threshold(threshold.min(100)),
        }
    }

    pub fn threshold(&self) -> u8 {
        self.thresholds.low
    }

    pub fn thresholds(&self) -> &ConfidenceThresholds {
        &self.thresholds
    }

    pub fn scorer(&self) -> &ScoringEngine {
        &self.scorer
    }

    /// Suggest a one-to-one mapping for the given headers.
    pub fn suggest(&self, headers: &[String]) -> MappingResult {
        let schema = self.scorer.schema();
        let mut pairs: Vec<_> = self
            .scorer
            .score_matrix(headers)
            .into_iter()
            .filter(|pair| pair.score.score >= self.thresholds.low)
            .collect();

        pairs.sort_by(|a, b| {
            b.score
                .score
                .cmp(&a.score.score)
                .then_with(|| schema.position(a.field).cmp(&schema.position(b.field)))
                .then_with(|| a.column.cmp(&b.column))
        });

        let mut candidates: BTreeMap<CanonicalField, Vec<RankedColumn>> = BTreeMap::new();
        for pair in &pairs {
            candidates.entry(pair.field).or_default().push(RankedColumn {
                column: pair.column,
                header: headers[pair.column].clone(),
                score: pair.score.clone(),
            });
        }

        let mut assigned_fields = BTreeSet::new();
        let mut assigned_columns = BTreeSet::new();
        let mut suggestions = Vec::new();
        for pair in pairs {
            if assigned_fields.contains(&pair.field) || assigned_columns.contains(&pair.column) {
                continue;
            }
            let Some(level) = self.thresholds.categorize(pair.score.score) else {
                continue;
            };
            assigned_fields.insert(pair.field);
            assigned_columns.insert(pair.column);
            tracing::debug!(
                field = pair.field.key(),
                column = %headers[pair.column],
                score = pair.score.score,
                "Suggested column"
            );
            suggestions.push(FieldSuggestion {
                field: pair.field,
                column: pair.column,
                header: headers[pair.column].clone(),
                score: pair.score.score,
                level,
                explanation: pair.score.explain(),
            });
        }

        let unmapped_fields = schema
            .fields
            .iter()
            .map(|f| f.field)
            .filter(|field| !assigned_fields.contains(field))
            .collect();
        let unmapped_columns = (0..headers.len())
            .filter(|column| !assigned_columns.contains(column))
            .collect();

        MappingResult {
            suggestions,
            candidates,
            unmapped_fields,
            unmapped_columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_categorize() {
        let thresholds = ConfidenceThresholds::default();
        assert_eq!(thresholds.categorize(100), Some(ConfidenceLevel::High));
        assert_eq!(thresholds.categorize(95), Some(ConfidenceLevel::High));
        assert_eq!(thresholds.categorize(90), Some(ConfidenceLevel::Medium));
        assert_eq!(thresholds.categorize(70), Some(ConfidenceLevel::Low));
        assert_eq!(thresholds.categorize(69), None);
    }

    #[test]
    fn test_simple_file_maps_exactly() {
        let engine = MappingEngine::new(CanonicalSchema::default(), 70);
        let result = engine.suggest(&headers(&["Name", "SKU", "Price"]));
        let mapping = result.to_mapping();
        assert_eq!(mapping.column_of(CanonicalField::Name), Some(0));
        assert_eq!(mapping.column_of(CanonicalField::Identifier), Some(1));
        assert_eq!(mapping.column_of(CanonicalField::UnitPrice), Some(2));
        assert!(result.unmapped_columns.is_empty());
        assert!(result.unmapped_fields.contains(&CanonicalField::Category));
        assert!(result.all_high_confidence());
    }

    #[test]
    fn test_each_column_used_once() {
        let engine = MappingEngine::new(CanonicalSchema::default(), 70);
        let result = engine.suggest(&headers(&["Price", "Price"]));
        assert_eq!(result.suggestions.len(), 1);
        assert_eq!(result.suggestions[0].column, 0);
        assert_eq!(result.unmapped_columns, vec![1]);
        assert_eq!(result.candidates[&CanonicalField::UnitPrice].len(), 2);
    }

    #[test]
    fn test_threshold_drops_weak_matches() {
        let engine = MappingEngine::new(CanonicalSchema::default(), 99);
        let result = engine.suggest(&headers(&["Categry", "SKU"]));
        assert!(result.suggestion_for(CanonicalField::Category).is_none());
        assert!(result.suggestion_for(CanonicalField::Identifier).is_some());
    }

    #[test]
    fn test_exact_match_outranks_token_match() {
        let engine = MappingEngine::new(CanonicalSchema::default(), 70);
        let result = engine.suggest(&headers(&["Unit Price"]));
        assert_eq!(result.suggestions.len(), 1);
        assert_eq!(result.suggestions[0].field, CanonicalField::UnitPrice);
    }

    #[test]
    fn test_schema_order_breaks_ties() {
        let schema: CanonicalSchema = serde_json::from_str(
            r#"{"fields":[
                {"field":"brand","requirement":"optional","synonyms":["label"]},
                {"field":"name","requirement":"required","synonyms":["label"]}
            ]}"#,
        )
        .unwrap();
        let result = MappingEngine::new(schema, 70).suggest(&headers(&["Label"]));
        assert_eq!(result.suggestions[0].field, CanonicalField::Brand);
        assert_eq!(result.unmapped_fields, vec![CanonicalField::Name]);
    }
}
