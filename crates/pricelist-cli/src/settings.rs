//! Parsing of command-line values and option layering.

use std::path::Path;

use anyhow::{Context, Result};
use pricelist_ingest::ReadOptions;
use pricelist_model::{CanonicalField, ColumnSelector, ImportOptions};

/// Parse `field=value`, as taken by `--map` and `--default`.
///
/// The field accepts keys, labels and common aliases (`unit_price`,
/// `Unit Price`, `sku`). The value is trimmed and may contain `=`.
pub fn parse_assignment(raw: &str) -> Result<(CanonicalField, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{raw}'"))?;
    let field = field.parse::<CanonicalField>().map_err(|err| err.to_string())?;
    let value = value.trim();
    if value.is_empty() {
        return Err(format!("no value given for {field}"));
    }
    Ok((field, value.to_string()))
}

/// Parse a `--map` argument into a field and a column selector.
pub fn parse_column_assignment(raw: &str) -> Result<(CanonicalField, ColumnSelector), String> {
    let (field, value) = parse_assignment(raw)?;
    let Ok(selector) = value.parse::<ColumnSelector>();
    Ok((field, selector))
}

/// Parse a delimiter name or single character.
pub fn parse_delimiter(raw: &str) -> Result<u8, String> {
    match raw {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        "comma" => Ok(b','),
        "semicolon" => Ok(b';'),
        "pipe" => Ok(b'|'),
        other if other.len() == 1 && other.is_ascii() => Ok(other.as_bytes()[0]),
        other => Err(format!("delimiter must be a single ASCII character, got '{other}'")),
    }
}

/// Options from an optional JSON file, then command-line overrides.
pub fn load_options(config: Option<&Path>, threshold: Option<u8>) -> Result<ImportOptions> {
    let mut options = match config {
        Some(path) => ImportOptions::from_json_file(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => ImportOptions::default(),
    };
    if let Some(threshold) = threshold {
        options = options.with_threshold(threshold);
    }
    Ok(options)
}

/// Reader hints from the command line.
pub fn read_options(delimiter: Option<u8>, encoding: Option<&str>) -> ReadOptions {
    let mut read = ReadOptions::default();
    if let Some(delimiter) = delimiter {
        read = read.with_delimiter(delimiter);
    }
    if let Some(label) = encoding {
        read = read.with_encoding(label);
    }
    read
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments_accept_labels_and_aliases() {
        assert_eq!(
            parse_assignment("Unit Price=Case $"),
            Ok((CanonicalField::UnitPrice, "Case $".to_string()))
        );
        assert_eq!(
            parse_assignment("sku = a=b").map(|(field, _)| field),
            Ok(CanonicalField::Identifier)
        );
        assert!(parse_assignment("category").is_err());
        assert!(parse_assignment("category=  ").is_err());
        assert!(parse_assignment("colour=red").is_err());
    }

    #[test]
    fn column_assignments_take_indices() {
        assert_eq!(
            parse_column_assignment("name=#2"),
            Ok((CanonicalField::Name, ColumnSelector::Index(2)))
        );
        assert_eq!(
            parse_column_assignment("sku=2024"),
            Ok((CanonicalField::Identifier, ColumnSelector::Name("2024".into())))
        );
    }

    #[test]
    fn delimiters() {
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert_eq!(parse_delimiter(";"), Ok(b';'));
        assert!(parse_delimiter("::").is_err());
    }
}
