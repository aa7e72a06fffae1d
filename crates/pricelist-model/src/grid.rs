//! Parsed tabular input and the layout extracted from it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered rows of string cells as read from a supplier file.
///
/// Immutable once built. Each row remembers the 1-based record number it
/// had in the source so later stages can report errors against the file the
/// user actually opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawGrid {
    rows: Vec<Vec<String>>,
    line_numbers: Vec<usize>,
}

impl RawGrid {
    /// Build a grid whose rows are numbered 1..=n.
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        let line_numbers = (1..=rows.len()).collect();
        Self { rows, line_numbers }
    }

    /// Build a grid with explicit source record numbers.
    ///
    /// # Panics
    ///
    /// Panics if `rows` and `line_numbers` differ in length.
    pub fn with_line_numbers(rows: Vec<Vec<String>>, line_numbers: Vec<usize>) -> Self {
        assert_eq!(
            rows.len(),
            line_numbers.len(),
            "every grid row needs a line number"
        );
        Self { rows, line_numbers }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Source record number of the row at `index`.
    pub fn line_number(&self, index: usize) -> Option<usize> {
        self.line_numbers.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest row, in cells.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// First cell of a row, trimmed.
    pub fn first_cell(&self, index: usize) -> Option<&str> {
        self.rows
            .get(index)
            .and_then(|row| row.first())
            .map(|cell| cell.trim())
    }
}

/// Layout family of a supplier file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// Every row starts with a row-kind marker; the field names are declared
    /// by a marker row inside the file.
    RowTyped,
    /// One header row followed by data rows.
    PlainHeadered,
}

impl SourceFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RowTyped => "row_typed",
            Self::PlainHeadered => "plain_headered",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row-kind markers used by row-typed supplier files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerAlphabet {
    /// Metadata / file header rows.
    pub header: String,
    /// The row declaring field names.
    pub field: String,
    /// Product data rows.
    pub data: String,
}

impl Default for MarkerAlphabet {
    fn default() -> Self {
        Self {
            header: "H".to_string(),
            field: "F".to_string(),
            data: "P".to_string(),
        }
    }
}

/// The kind of marker a cell carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMarker {
    Header,
    Field,
    Data,
}

impl MarkerAlphabet {
    /// Classify a cell against the alphabet (trimmed, case-insensitive).
    pub fn marker_of(&self, cell: &str) -> Option<RowMarker> {
        let cell = cell.trim();
        if cell.eq_ignore_ascii_case(self.header.trim()) {
            Some(RowMarker::Header)
        } else if cell.eq_ignore_ascii_case(self.field.trim()) {
            Some(RowMarker::Field)
        } else if cell.eq_ignore_ascii_case(self.data.trim()) {
            Some(RowMarker::Data)
        } else {
            None
        }
    }
}

/// A data row with its source record number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRow {
    pub line: usize,
    pub cells: Vec<String>,
}

impl DataRow {
    /// Trimmed cell at `index`, or `""` when the row is short.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map_or("", |c| c.trim())
    }
}

/// Column headers plus data rows, with row-kind markers already stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLayout {
    pub format: SourceFormat,
    pub headers: Vec<String>,
    pub rows: Vec<DataRow>,
}

impl SourceLayout {
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(header.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_are_case_insensitive() {
        let alphabet = MarkerAlphabet::default();
        assert_eq!(alphabet.marker_of(" h "), Some(RowMarker::Header));
        assert_eq!(alphabet.marker_of("F"), Some(RowMarker::Field));
        assert_eq!(alphabet.marker_of("p"), Some(RowMarker::Data));
        assert_eq!(alphabet.marker_of("Name"), None);
    }

    #[test]
    fn grid_reports_width_and_first_cells() {
        let grid = RawGrid::new(vec![
            vec!["H".into(), "vendor".into()],
            vec![" F ".into(), "SUPC".into(), "Desc".into()],
        ]);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.first_cell(1), Some("F"));
        assert_eq!(grid.line_number(1), Some(2));
        assert_eq!(grid.first_cell(5), None);
    }
}
