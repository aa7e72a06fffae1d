//! Price-list import core: normalization, commit and orchestration.
//!
//! [`ImportJob`] drives a file through the reader, mapper, normalizer and
//! validator to an [`ImportPreview`], then commits it with a
//! [`BatchCommitter`].

pub mod catalog;
pub mod commit;
pub mod identifier;
pub mod normalize;
pub mod pipeline;
pub mod redact;
pub mod units;

pub use catalog::{InMemoryCatalog, SharedCatalog};
pub use commit::{BatchCommitter, CancelToken, CommitError, DuplicateStrategy};
pub use identifier::sanitize_identifier;
pub use normalize::{NormalizeInput, RowNormalizer};
pub use pipeline::{ImportJob, ImportPreview, PipelineError};
pub use redact::{REDACTED, redact_value};
pub use units::{cost_per_oz, normalize_unit, ounces_per_unit};
