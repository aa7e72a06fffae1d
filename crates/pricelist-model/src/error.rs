use std::path::PathBuf;

use thiserror::Error;

use crate::field::CanonicalField;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown canonical field: {0}")]
    UnknownField(String),
    #[error("column '{column}' is already mapped to {field}")]
    ColumnAlreadyUsed { column: String, field: CanonicalField },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
