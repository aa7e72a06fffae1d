//! Format classification and layout extraction.

use pricelist_model::{DataRow, MarkerAlphabet, RawGrid, RowMarker, SourceFormat, SourceLayout};

use crate::header::{detect_header_row, normalize_headers};

/// Decide whether a grid is row-typed or plain-headered.
///
/// The first cell of each of the first `probe_rows` rows is read as a row
/// marker. The grid is row-typed when that window starts with one or more
/// header rows, then exactly one field row, then at least one data row.
/// Rows after the first data row are not inspected. Anything else,
/// including an empty grid, is plain-headered.
pub fn classify(grid: &RawGrid, markers: &MarkerAlphabet, probe_rows: usize) -> SourceFormat {
    #[derive(Clone, Copy)]
    enum Seen {
        Nothing,
        Headers,
        Field,
    }

    let mut seen = Seen::Nothing;
    for index in 0..grid.len().min(probe_rows) {
        let marker = grid
            .first_cell(index)
            .and_then(|cell| markers.marker_of(cell));
        seen = match (seen, marker) {
            (Seen::Nothing | Seen::Headers, Some(RowMarker::Header)) => Seen::Headers,
            (Seen::Headers, Some(RowMarker::Field)) => Seen::Field,
            (Seen::Field, Some(RowMarker::Data)) => return SourceFormat::RowTyped,
            _ => return SourceFormat::PlainHeadered,
        };
    }
    SourceFormat::PlainHeadered
}

/// Split a grid into headers and data rows according to its format.
///
/// Row-typed grids take their headers from the first field row and their
/// data from data-marker rows, with the marker cell stripped; other marker
/// rows are ignored. A row-typed request without a field row is read as
/// plain-headered. Every data row is padded to the header width.
pub fn extract_layout(
    grid: &RawGrid,
    format: SourceFormat,
    markers: &MarkerAlphabet,
    probe_rows: usize,
) -> SourceLayout {
    if format == SourceFormat::RowTyped
        && let Some(layout) = row_typed_layout(grid, markers)
    {
        return layout;
    }
    plain_layout(grid, probe_rows)
}

fn row_typed_layout(grid: &RawGrid, markers: &MarkerAlphabet) -> Option<SourceLayout> {
    let marker_at = |index: usize| {
        grid.first_cell(index)
            .and_then(|cell| markers.marker_of(cell))
    };
    let field_index = (0..grid.len()).find(|&index| marker_at(index) == Some(RowMarker::Field))?;
    let field_row = grid.row(field_index)?;
    let width = grid.width().saturating_sub(1);
    let headers = normalize_headers(field_row.get(1..).unwrap_or_default(), width);

    let rows = (0..grid.len())
        .filter(|&index| marker_at(index) == Some(RowMarker::Data))
        .filter_map(|index| {
            let cells = grid.row(index)?.get(1..).unwrap_or_default();
            Some(data_row(grid, index, cells, headers.len()))
        })
        .collect();

    Some(SourceLayout {
        format: SourceFormat::RowTyped,
        headers,
        rows,
    })
}

fn plain_layout(grid: &RawGrid, probe_rows: usize) -> SourceLayout {
    let header_index = detect_header_row(grid.rows(), probe_rows);
    let headers = normalize_headers(grid.row(header_index).unwrap_or_default(), grid.width());
    let rows = grid
        .rows()
        .iter()
        .enumerate()
        .skip(header_index + 1)
        .map(|(index, cells)| data_row(grid, index, cells, headers.len()))
        .collect();

    SourceLayout {
        format: SourceFormat::PlainHeadered,
        headers,
        rows,
    }
}

fn data_row(grid: &RawGrid, index: usize, cells: &[String], width: usize) -> DataRow {
    let mut cells = cells.to_vec();
    if cells.len() < width {
        cells.resize(width, String::new());
    }
    DataRow {
        line: grid.line_number(index).unwrap_or(index + 1),
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> RawGrid {
        RawGrid::new(
            rows.iter()
                .map(|row| row.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn marker_sequence_is_row_typed() {
        let g = grid(&[
            &["H", "Sysco"],
            &["H", "Week 12"],
            &["F", "SUPC", "Desc"],
            &["P", "100", "Chicken"],
        ]);
        assert_eq!(
            classify(&g, &MarkerAlphabet::default(), 10),
            SourceFormat::RowTyped
        );
    }

    #[test]
    fn missing_header_rows_is_plain() {
        let g = grid(&[&["F", "SUPC"], &["P", "100"]]);
        assert_eq!(
            classify(&g, &MarkerAlphabet::default(), 10),
            SourceFormat::PlainHeadered
        );
    }

    #[test]
    fn sequence_must_fit_probe_window() {
        let g = grid(&[&["H", "a"], &["H", "b"], &["F", "SUPC"], &["P", "100"]]);
        assert_eq!(
            classify(&g, &MarkerAlphabet::default(), 3),
            SourceFormat::PlainHeadered
        );
    }

    #[test]
    fn custom_markers_are_honoured() {
        let markers = MarkerAlphabet {
            header: "HDR".into(),
            field: "FLD".into(),
            data: "ROW".into(),
        };
        let g = grid(&[&["HDR", "x"], &["FLD", "Code"], &["ROW", "1"]]);
        assert_eq!(classify(&g, &markers, 10), SourceFormat::RowTyped);
        assert_eq!(
            classify(&g, &MarkerAlphabet::default(), 10),
            SourceFormat::PlainHeadered
        );
    }

    #[test]
    fn row_typed_layout_strips_markers() {
        let g = grid(&[
            &["H", "Sysco"],
            &["F", "SUPC", "Desc", "Case $"],
            &["P", "100", "Chicken"],
            &["T", "trailer"],
            &["P", "200", "Beef", "9.50"],
        ]);
        let layout = extract_layout(&g, SourceFormat::RowTyped, &MarkerAlphabet::default(), 10);
        assert_eq!(layout.headers, vec!["SUPC", "Desc", "Case $"]);
        assert_eq!(layout.rows.len(), 2);
        assert_eq!(layout.rows[0].cells, vec!["100", "Chicken", ""]);
        assert_eq!(layout.rows[0].line, 3);
        assert_eq!(layout.rows[1].line, 5);
    }

    #[test]
    fn plain_layout_uses_detected_header() {
        let g = grid(&[
            &["Acme price list"],
            &["Name", "SKU", "Price"],
            &["Chicken", "SKU1", "5.99"],
        ]);
        let layout = extract_layout(&g, SourceFormat::PlainHeadered, &MarkerAlphabet::default(), 10);
        assert_eq!(layout.headers, vec!["Name", "SKU", "Price"]);
        assert_eq!(layout.rows.len(), 1);
        assert_eq!(layout.rows[0].line, 3);
    }
}
