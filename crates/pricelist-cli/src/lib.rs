//! Library parts of the `pricelist` command-line importer.

pub mod logging;
pub mod settings;
pub mod store;

pub use store::{JsonCatalog, StoreError};
