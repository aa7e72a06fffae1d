pub mod catalog;
pub mod error;
pub mod field;
pub mod grid;
pub mod mapping;
pub mod options;
pub mod outcome;
pub mod result;
pub mod schema;
pub mod template;

pub use catalog::{Catalog, CatalogEntry, CatalogError, UpsertKind};
pub use error::{ModelError, Result};
pub use field::{CanonicalField, FieldRequirement};
pub use grid::{DataRow, MarkerAlphabet, RawGrid, RowMarker, SourceFormat, SourceLayout};
pub use mapping::{ColumnMapping, ColumnSelector, MappedColumn, MappingOrigin};
pub use options::{
    DEFAULT_MAX_INPUT_BYTES, DEFAULT_PROBE_ROWS, DEFAULT_THRESHOLD, ImportOptions,
};
pub use outcome::{EntryCandidate, OutcomeKind, RowDraft, RowError, RowIssue, ValidationOutcome};
pub use result::{CommitAction, ImportCounts, ImportResult, RowCommit};
pub use schema::{CanonicalSchema, SchemaField};
pub use template::MappingTemplate;
