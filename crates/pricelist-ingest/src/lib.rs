//! Supplier price-list ingestion.
//!
//! Bytes go in, a [`pricelist_model::RawGrid`] comes out of [`read_grid`];
//! [`classify`] and [`extract_layout`] then turn the grid into headers and
//! data rows for the mapper.

pub mod classify;
pub mod encoding;
pub mod error;
pub mod header;
pub mod reader;

pub use classify::{classify, extract_layout};
pub use encoding::{Decoded, decode};
pub use error::{ParseError, Result};
pub use header::{detect_header_row, normalize_header, normalize_headers};
pub use reader::{CANDIDATE_DELIMITERS, ReadOptions, read_grid, read_grid_from_path, sniff_delimiter};
