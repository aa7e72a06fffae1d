//! Catalog implementations: an in-memory store and a lock-guarded wrapper.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use pricelist_model::{Catalog, CatalogEntry, CatalogError, UpsertKind};

/// Catalog held in memory, keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryCatalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.identifier.clone(), entry))
                .collect(),
        }
    }

    pub fn get(&self, identifier: &str) -> Option<&CatalogEntry> {
        self.entries.get(identifier)
    }

    /// Entries sorted by identifier.
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    pub fn into_entries(self) -> Vec<CatalogEntry> {
        self.entries.into_values().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Catalog for InMemoryCatalog {
    fn find_by_identifier(&self, identifier: &str) -> Result<Option<CatalogEntry>, CatalogError> {
        Ok(self.entries.get(identifier).cloned())
    }

    fn upsert(&mut self, entry: CatalogEntry) -> Result<UpsertKind, CatalogError> {
        match self.entries.insert(entry.identifier.clone(), entry) {
            Some(_) => Ok(UpsertKind::Updated),
            None => Ok(UpsertKind::Inserted),
        }
    }
}

/// A catalog shared between concurrent imports.
///
/// Readers (validation) run concurrently; a writer (commit) holds the
/// exclusive lock for its whole batch, so two batches never interleave
/// writes. A poisoned lock surfaces as [`CatalogError::Unavailable`].
#[derive(Debug, Default)]
pub struct SharedCatalog<C> {
    inner: Arc<RwLock<C>>,
}

impl<C> Clone for SharedCatalog<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Catalog> SharedCatalog<C> {
    pub fn new(catalog: C) -> Self {
        Self {
            inner: Arc::new(RwLock::new(catalog)),
        }
    }

    /// Run `f` with shared read access.
    pub fn read<R>(&self, f: impl FnOnce(&C) -> R) -> Result<R, CatalogError> {
        let guard = self
            .inner
            .read()
            .map_err(|_| CatalogError::Unavailable("catalog lock poisoned".into()))?;
        Ok(f(&guard))
    }

    /// Run `f` with exclusive write access.
    pub fn write<R>(&self, f: impl FnOnce(&mut C) -> R) -> Result<R, CatalogError> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| CatalogError::Unavailable("catalog lock poisoned".into()))?;
        Ok(f(&mut guard))
    }

    /// Take the catalog back once every other handle is gone.
    pub fn into_inner(self) -> Result<C, CatalogError> {
        let lock = Arc::try_unwrap(self.inner)
            .map_err(|_| CatalogError::Unavailable("catalog is still shared".into()))?;
        lock.into_inner()
            .map_err(|_| CatalogError::Unavailable("catalog lock poisoned".into()))
    }
}
