//! Delimited-text reading into a [`RawGrid`].

use std::fs;
use std::path::Path;

use csv::ReaderBuilder;
use pricelist_model::{DEFAULT_MAX_INPUT_BYTES, RawGrid};

use crate::encoding::decode;
use crate::error::{ParseError, Result};

/// Delimiters considered when none is declared, in tie-break order.
pub const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Lines inspected by delimiter sniffing.
const SNIFF_LINES: usize = 10;

/// Options for [`read_grid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// Field delimiter; sniffed when `None`.
    pub delimiter: Option<u8>,
    /// WHATWG encoding label (`utf-8`, `windows-1252`, `utf-16le`…); detected when `None`.
    pub encoding: Option<String>,
    /// Inputs larger than this are rejected.
    pub max_bytes: usize,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            encoding: None,
            max_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

impl ReadOptions {
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

/// Trim a cell and drop any stray byte-order mark.
fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

/// Parse bytes into a grid.
///
/// Cells are trimmed, fully blank rows are dropped and every kept row
/// remembers the source line it started on. No semantic interpretation
/// happens here.
pub fn read_grid(bytes: &[u8], options: &ReadOptions) -> Result<RawGrid> {
    if bytes.len() > options.max_bytes {
        return Err(ParseError::InputTooLarge {
            size: bytes.len() as u64,
            limit: options.max_bytes as u64,
        });
    }
    if bytes.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let decoded = decode(bytes, options.encoding.as_deref())?;
    let text = decoded.text.trim_start_matches('\u{feff}');
    let delimiter = options
        .delimiter
        .unwrap_or_else(|| sniff_delimiter(text));
    check_quoting(text, delimiter)?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    let mut line_numbers = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(String::is_empty) {
            continue;
        }
        let line = record
            .position()
            .map_or(index as u64 + 1, csv::Position::line);
        line_numbers.push(line as usize);
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    tracing::debug!(
        rows = rows.len(),
        encoding = decoded.encoding.name(),
        delimiter = %char::from(delimiter).escape_default(),
        "Read delimited input"
    );
    Ok(RawGrid::with_line_numbers(rows, line_numbers))
}

/// Read a file into a grid, rejecting oversized files before loading them.
pub fn read_grid_from_path(path: &Path, options: &ReadOptions) -> Result<RawGrid> {
    let io_error = |source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    };
    let size = fs::metadata(path).map_err(io_error)?.len();
    if size > options.max_bytes as u64 {
        return Err(ParseError::InputTooLarge {
            size,
            limit: options.max_bytes as u64,
        });
    }
    let bytes = fs::read(path).map_err(io_error)?;
    read_grid(&bytes, options)
}

/// Pick the candidate delimiter that occurs most often outside quotes in
/// the first lines. `,` wins ties and is the fallback when nothing matches.
pub fn sniff_delimiter(text: &str) -> u8 {
    let mut counts = [0usize; CANDIDATE_DELIMITERS.len()];
    for line in text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(SNIFF_LINES)
    {
        let mut in_quotes = false;
        for byte in line.bytes() {
            if byte == b'"' {
                in_quotes = !in_quotes;
                continue;
            }
            if in_quotes {
                continue;
            }
            if let Some(slot) = CANDIDATE_DELIMITERS.iter().position(|d| *d == byte) {
                counts[slot] += 1;
            }
        }
    }

    let mut best = 0;
    for slot in 1..counts.len() {
        if counts[slot] > counts[best] {
            best = slot;
        }
    }
    CANDIDATE_DELIMITERS[best]
}

/// Find a quoted field that is opened and never closed.
///
/// A quote only opens a field when it is the first character of the field;
/// inside a quoted field `""` is an escaped quote. Line numbers are 1-based
/// and refer to the line where the unterminated field began.
fn check_quoting(text: &str, delimiter: u8) -> Result<()> {
    let delimiter = char::from(delimiter);
    let mut line: u64 = 1;
    let mut open_line = 0;
    let mut in_quotes = false;
    let mut field_start = true;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                }
                '"' => in_quotes = false,
                '\n' => line += 1,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' if field_start => {
                in_quotes = true;
                open_line = line;
                field_start = false;
            }
            '\n' => {
                line += 1;
                field_start = true;
            }
            '\r' => field_start = true,
            c if c == delimiter => field_start = true,
            _ => field_start = false,
        }
    }

    if in_quotes {
        return Err(ParseError::MalformedQuoting { line: open_line });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_semicolons_and_tabs() {
        assert_eq!(sniff_delimiter("a;b;c\n1;2;3\n"), b';');
        assert_eq!(sniff_delimiter("a\tb\tc\n"), b'\t');
        assert_eq!(sniff_delimiter("a|b\n1|2\n"), b'|');
    }

    #[test]
    fn sniff_prefers_comma_on_tie_or_no_hit() {
        assert_eq!(sniff_delimiter("a,b;c\n"), b',');
        assert_eq!(sniff_delimiter("single\ncolumn\n"), b',');
    }

    #[test]
    fn sniff_ignores_quoted_delimiters() {
        assert_eq!(sniff_delimiter("\"a;b;c;d\",x,y\n"), b',');
    }

    #[test]
    fn quoting_accepts_escaped_and_multiline_fields() {
        check_quoting("a,\"say \"\"hi\"\"\"\nb,\"two\nlines\"\n", b',').unwrap();
        // A quote in the middle of a field is literal.
        check_quoting("5\" pan,12.00\n", b',').unwrap();
    }

    #[test]
    fn quoting_reports_opening_line() {
        let err = check_quoting("a,b\nc,\"open\nmore\n", b',').unwrap_err();
        assert!(matches!(err, ParseError::MalformedQuoting { line: 2 }));
    }
}
