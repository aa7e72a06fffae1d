//! Import configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::grid::MarkerAlphabet;
use crate::schema::CanonicalSchema;

/// Default minimum score for a mapping suggestion.
pub const DEFAULT_THRESHOLD: u8 = 70;

/// Default number of leading rows inspected by format detection.
pub const DEFAULT_PROBE_ROWS: usize = 10;

/// Default input size limit (50 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 50 * 1024 * 1024;

/// Options controlling a price-list import.
///
/// Every field has a default, so a config file only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Minimum mapping score (0-100) for a column to be suggested.
    pub threshold: u8,
    /// Rows inspected when detecting the format and the header row.
    pub probe_rows: usize,
    /// Row-kind markers of row-typed files.
    pub markers: MarkerAlphabet,
    /// Map supplier unit codes (`CS`, `LBS`) onto catalog units.
    pub normalize_units: bool,
    /// Clean identifiers (float artefacts, invalid characters, length).
    pub sanitize_identifiers: bool,
    /// Inputs larger than this are rejected before parsing.
    pub max_input_bytes: usize,
    pub schema: CanonicalSchema,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            probe_rows: DEFAULT_PROBE_ROWS,
            markers: MarkerAlphabet::default(),
            normalize_units: true,
            sanitize_identifiers: true,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            schema: CanonicalSchema::default(),
        }
    }
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON file; absent keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ModelError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold.min(100);
        self
    }

    #[must_use]
    pub fn with_normalize_units(mut self, enable: bool) -> Self {
        self.normalize_units = enable;
        self
    }

    #[must_use]
    pub fn with_sanitize_identifiers(mut self, enable: bool) -> Self {
        self.sanitize_identifiers = enable;
        self
    }

    #[must_use]
    pub fn with_max_input_bytes(mut self, limit: usize) -> Self {
        self.max_input_bytes = limit;
        self
    }
}
