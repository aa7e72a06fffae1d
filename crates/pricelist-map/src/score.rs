//! Fuzzy matching and scoring for column-to-field mapping.
//!
//! Scores are integers from 0 to 100. An exact match of the normalized
//! header against a field pattern scores 100, a header whose tokens contain
//! every token of a pattern scores 90, and anything else falls back to the
//! normalized indel similarity of the whole header (or its best token)
//! against the pattern.

use std::collections::BTreeMap;

use pricelist_model::{CanonicalField, CanonicalSchema};
use rapidfuzz::distance::indel;

use crate::patterns::build_field_patterns;
use crate::utils::{normalize_text, tokens};

/// Score for an exact normalized match.
pub const EXACT_MATCH_SCORE: u8 = 100;
/// Score when the header contains every token of a pattern.
pub const TOKEN_MATCH_SCORE: u8 = 90;

/// Score for a single column-field pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnScore {
    /// Confidence score (0 to 100).
    pub score: u8,
    /// Breakdown of score components for explainability.
    pub explanation: Vec<ScoreComponent>,
}

impl ColumnScore {
    fn zero() -> Self {
        Self {
            score: 0,
            explanation: Vec::new(),
        }
    }

    /// Human-readable explanation of the score.
    pub fn explain(&self) -> String {
        self.explanation
            .iter()
            .map(|c| format!("{}: {:.0}% ({})", c.name, c.value * 100.0, c.description))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A component contributing to the final score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreComponent {
    /// Component name (e.g., "Name similarity").
    pub name: &'static str,
    /// Component value (0.0 to 1.0).
    pub value: f32,
    /// Human-readable description.
    pub description: String,
}

/// One scored (field, column) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPair {
    pub field: CanonicalField,
    pub column: usize,
    pub score: ColumnScore,
}

/// Engine for scoring column-to-field matches against a schema.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    schema: CanonicalSchema,
    patterns: BTreeMap<CanonicalField, Vec<String>>,
}

impl ScoringEngine {
    pub fn new(schema: CanonicalSchema) -> Self {
        let patterns = build_field_patterns(&schema);
        Self { schema, patterns }
    }

    pub fn schema(&self) -> &CanonicalSchema {
        &self.schema
    }

    /// Score a single header against a field.
    ///
    /// Returns `None` if the field is not part of the schema.
    pub fn score(&self, header: &str, field: CanonicalField) -> Option<ColumnScore> {
        let patterns = self.patterns.get(&field)?;
        Some(compute_score(header, patterns))
    }

    /// Score every header against a field, best first.
    ///
    /// Ties keep the leftmost column first.
    pub fn score_all_for_field(
        &self,
        field: CanonicalField,
        headers: &[String],
    ) -> Vec<(usize, ColumnScore)> {
        let Some(patterns) = self.patterns.get(&field) else {
            return Vec::new();
        };
        let mut scores: Vec<_> = headers
            .iter()
            .enumerate()
            .map(|(index, header)| (index, compute_score(header, patterns)))
            .collect();
        scores.sort_by(|a, b| b.1.score.cmp(&a.1.score).then(a.0.cmp(&b.0)));
        scores
    }

    /// Score every (field, column) pair, in schema order then column order.
    pub fn score_matrix(&self, headers: &[String]) -> Vec<ScoredPair> {
        let mut pairs = Vec::with_capacity(self.schema.fields.len() * headers.len());
        for schema_field in &self.schema.fields {
            let Some(patterns) = self.patterns.get(&schema_field.field) else {
                continue;
            };
            for (column, header) in headers.iter().enumerate() {
                pairs.push(ScoredPair {
                    field: schema_field.field,
                    column,
                    score: compute_score(header, patterns),
                });
            }
        }
        pairs
    }
}

fn compute_score(header: &str, patterns: &[String]) -> ColumnScore {
    let normalized = normalize_text(header);
    if normalized.is_empty() {
        return ColumnScore::zero();
    }
    let header_tokens = tokens(&normalized);

    let mut best: Option<ColumnScore> = None;
    for pattern in patterns {
        let candidate = score_pattern(header, &normalized, &header_tokens, pattern);
        let is_exact = candidate.score == EXACT_MATCH_SCORE;
        if best.as_ref().is_none_or(|b| candidate.score > b.score) {
            best = Some(candidate);
        }
        if is_exact {
            break;
        }
    }
    best.unwrap_or_else(ColumnScore::zero)
}

fn score_pattern(
    header: &str,
    normalized: &str,
    header_tokens: &[&str],
    pattern: &str,
) -> ColumnScore {
    if normalized == pattern {
        return ColumnScore {
            score: EXACT_MATCH_SCORE,
            explanation: vec![ScoreComponent {
                name: "Exact match",
                value: 1.0,
                description: format!("'{header}' matches '{pattern}'"),
            }],
        };
    }

    let pattern_tokens = tokens(pattern);
    if !pattern_tokens.is_empty() && pattern_tokens.iter().all(|t| header_tokens.contains(t)) {
        return ColumnScore {
            score: TOKEN_MATCH_SCORE,
            explanation: vec![ScoreComponent {
                name: "Token match",
                value: f32::from(TOKEN_MATCH_SCORE) / 100.0,
                description: format!("'{header}' contains '{pattern}'"),
            }],
        };
    }

    let whole = indel::normalized_similarity(normalized.chars(), pattern.chars());
    let (token, token_best) = header_tokens
        .iter()
        .map(|token| {
            (
                *token,
                indel::normalized_similarity(token.chars(), pattern.chars()),
            )
        })
        .fold(("", 0.0_f64), |acc, item| if item.1 > acc.1 { item } else { acc });

    let (similarity, description) = if token_best > whole {
        (token_best, format!("'{token}' in '{header}' vs '{pattern}'"))
    } else {
        (whole, format!("'{header}' vs '{pattern}'"))
    };
    ColumnScore {
        score: to_score(similarity),
        explanation: vec![ScoreComponent {
            name: "Name similarity",
            value: similarity as f32,
            description,
        }],
    }
}

fn to_score(similarity: f64) -> u8 {
    (similarity.clamp(0.0, 1.0) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> ScoringEngine {
        ScoringEngine::new(CanonicalSchema::default())
    }

    #[test]
    fn test_exact_match_scores_100() {
        let score = engine().score("SKU", CanonicalField::Identifier).unwrap();
        assert_eq!(score.score, 100);
        let score = engine().score("Unit_Price", CanonicalField::UnitPrice).unwrap();
        assert_eq!(score.score, 100);
    }

    #[test]
    fn test_token_containment_scores_90() {
        let score = engine().score("Storage Location Code", CanonicalField::Location).unwrap();
        assert_eq!(score.score, 90);
        assert_eq!(score.explanation[0].name, "Token match");
    }

    #[test]
    fn test_similar_names() {
        let score = engine().score("Categry", CanonicalField::Category).unwrap();
        assert!(score.score >= 85, "typo should score high, got {}", score.score);
    }

    #[test]
    fn test_unrelated_names_score_low() {
        let score = engine().score("Zzzz", CanonicalField::UnitPrice).unwrap();
        assert!(score.score < 50, "got {}", score.score);
        let empty = engine().score("   ", CanonicalField::Name).unwrap();
        assert_eq!(empty.score, 0);
    }

    #[test]
    fn test_field_outside_schema() {
        let schema = CanonicalSchema::new(Vec::new());
        assert!(ScoringEngine::new(schema).score("SKU", CanonicalField::Identifier).is_none());
    }

    #[test]
    fn test_ranking_prefers_leftmost_on_ties() {
        let headers = vec!["Price".to_string(), "Item".to_string(), "price".to_string()];
        let ranked = engine().score_all_for_field(CanonicalField::UnitPrice, &headers);
        assert_eq!(ranked[0].0, 0);
        assert_eq!(ranked[1].0, 2);
    }

    #[test]
    fn test_explainability() {
        let score = engine().score("Categry", CanonicalField::Category).unwrap();
        assert!(score.explain().contains("Name similarity"));
    }
}
