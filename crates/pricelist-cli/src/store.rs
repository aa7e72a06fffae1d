//! File-backed catalog for the command-line importer.
//!
//! The catalog file is a JSON array of entries sorted by identifier. It is
//! read once when opened and rewritten atomically by [`JsonCatalog::save`].

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use pricelist_core::InMemoryCatalog;
use pricelist_model::{Catalog, CatalogEntry, CatalogError, UpsertKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to {operation} catalog file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse catalog file: {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to complete catalog save")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A catalog kept in memory and persisted to one JSON file.
#[derive(Debug)]
pub struct JsonCatalog {
    path: PathBuf,
    entries: InMemoryCatalog,
    dirty: bool,
}

impl JsonCatalog {
    /// Load the catalog at `path`. A missing or empty file is an empty catalog.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => Vec::new(),
            Ok(contents) => serde_json::from_str::<Vec<CatalogEntry>>(&contents).map_err(
                |source| StoreError::Json {
                    path: path.clone(),
                    source,
                },
            )?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(source) => {
                return Err(StoreError::Io {
                    operation: "read",
                    path,
                    source,
                });
            }
        };
        tracing::debug!(path = %path.display(), entries = entries.len(), "Loaded catalog");
        Ok(Self {
            path,
            entries: InMemoryCatalog::from_entries(entries),
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, identifier: &str) -> Option<&CatalogEntry> {
        self.entries.get(identifier)
    }

    /// Whether an upsert happened since the last load or save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write the catalog back to its file.
    pub fn save(&mut self) -> Result<(), StoreError> {
        let entries: Vec<&CatalogEntry> = self.entries.entries().collect();
        let json = serde_json::to_vec_pretty(&entries).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                operation: "create directory",
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let mut file = File::create(&temp_path).map_err(|source| StoreError::Io {
            operation: "create",
            path: temp_path.clone(),
            source,
        })?;
        file.write_all(&json)
            .and_then(|()| file.sync_all())
            .map_err(|source| StoreError::Io {
                operation: "write",
                path: temp_path.clone(),
                source,
            })?;
        fs::rename(&temp_path, &self.path).map_err(|source| StoreError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: self.path.clone(),
            source,
        })?;

        self.dirty = false;
        tracing::info!(path = %self.path.display(), entries = self.entries.len(), "Saved catalog");
        Ok(())
    }
}

impl Catalog for JsonCatalog {
    fn find_by_identifier(&self, identifier: &str) -> Result<Option<CatalogEntry>, CatalogError> {
        self.entries.find_by_identifier(identifier)
    }

    fn upsert(&mut self, entry: CatalogEntry) -> Result<UpsertKind, CatalogError> {
        let kind = self.entries.upsert(entry)?;
        self.dirty = true;
        Ok(kind)
    }
}
