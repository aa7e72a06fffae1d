//! Validation and duplicate detection for price-list imports.
//!
//! [`check_mapping_complete`] gates a whole batch on its mapping;
//! [`Validator`] then classifies each normalized row as ready, duplicate of
//! a catalog entry, or error.

mod checks;
mod engine;
mod error;
mod gate;

pub use checks::parse_price;
pub use engine::{BatchRepeat, ValidationReport, ValidationSummary, Validator};
pub use error::MappingIncomplete;
pub use gate::check_mapping_complete;
