//! Column-to-field mapping for supplier price lists.
//!
//! - [`MappingEngine`] scores every header against every schema field and
//!   suggests a one-to-one mapping.
//! - [`apply_template`] and [`apply_overrides`] layer saved and explicit
//!   choices on top of the suggestions.
//! - [`MappingSession`] tracks accepted choices for interactive use.
//! - [`TemplateStore`] persists templates by name.

pub mod apply;
pub mod engine;
pub mod error;
pub mod patterns;
pub mod repository;
pub mod score;
pub mod state;
mod utils;

pub use apply::{
    PackColumns, SelectorTarget, TemplateApplication, UnresolvedSelector, apply_overrides,
    apply_template, detect_pack_columns, resolve_column,
};
pub use engine::{
    ConfidenceLevel, ConfidenceThresholds, FieldSuggestion, MappingEngine, MappingResult,
    RankedColumn,
};
pub use error::MappingError;
pub use repository::{
    InMemoryTemplateStore, JsonTemplateStore, TemplateError, TemplateStore, timestamp_now,
};
pub use score::{ColumnScore, ScoreComponent, ScoredPair, ScoringEngine};
pub use state::{FieldMappingStatus, MappingSession, MappingSummary};
pub use utils::normalize_text;
