//! Catalog entries and the narrow read/write contract the import depends on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    /// Unique supplier identifier; the duplicate-detection key.
    pub identifier: String,
    pub category: String,
    pub unit: String,
    pub unit_price: f64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub pack_size: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    /// Price per ounce derived from unit price and unit.
    #[serde(default)]
    pub cost_per_oz: Option<f64>,
    /// Unit price before the most recent update.
    #[serde(default)]
    pub last_price: Option<f64>,
    #[serde(default)]
    pub last_updated: Option<NaiveDate>,
}

/// Whether an upsert created a new entry or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertKind {
    Inserted,
    Updated,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog lookup failed for '{identifier}': {message}")]
    Lookup { identifier: String, message: String },
    #[error("catalog write failed for '{identifier}': {message}")]
    Write { identifier: String, message: String },
    #[error("catalog is unavailable: {0}")]
    Unavailable(String),
}

/// The catalog collaborator.
///
/// Lookups take `&self` so validation can share the catalog with other
/// readers; writes take `&mut self`, which gives the committer exclusive
/// access for the length of a batch.
pub trait Catalog {
    fn find_by_identifier(&self, identifier: &str) -> Result<Option<CatalogEntry>, CatalogError>;

    fn upsert(&mut self, entry: CatalogEntry) -> Result<UpsertKind, CatalogError>;
}

impl<C: Catalog + ?Sized> Catalog for &mut C {
    fn find_by_identifier(&self, identifier: &str) -> Result<Option<CatalogEntry>, CatalogError> {
        (**self).find_by_identifier(identifier)
    }

    fn upsert(&mut self, entry: CatalogEntry) -> Result<UpsertKind, CatalogError> {
        (**self).upsert(entry)
    }
}
