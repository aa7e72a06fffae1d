use pricelist_ingest::{ReadOptions, classify, extract_layout, read_grid};
use pricelist_model::{MarkerAlphabet, RawGrid, SourceFormat};
use proptest::prelude::*;

fn marker_grid(headers: usize, data: usize) -> RawGrid {
    let mut rows = Vec::new();
    for i in 0..headers {
        rows.push(vec!["H".to_string(), format!("meta {i}")]);
    }
    rows.push(vec!["F".to_string(), "SUPC".to_string(), "Desc".to_string()]);
    for i in 0..data {
        rows.push(vec!["P".to_string(), format!("{i}"), format!("item {i}")]);
    }
    RawGrid::new(rows)
}

proptest! {
    #[test]
    fn well_formed_marker_sequences_are_row_typed(headers in 1usize..5, data in 1usize..5) {
        let grid = marker_grid(headers, data);
        prop_assert_eq!(
            classify(&grid, &MarkerAlphabet::default(), 10),
            SourceFormat::RowTyped
        );
    }

    #[test]
    fn grids_not_starting_with_a_header_marker_are_plain(
        rows in prop::collection::vec(prop::collection::vec("[A-Za-z0-9 ]{0,6}", 1..4), 0..12)
    ) {
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .filter(|row| !row[0].trim().eq_ignore_ascii_case("h"))
            .collect();
        let grid = RawGrid::new(rows);
        prop_assert_eq!(
            classify(&grid, &MarkerAlphabet::default(), 10),
            SourceFormat::PlainHeadered
        );
    }

    #[test]
    fn layouts_pad_every_row_to_header_width(
        rows in prop::collection::vec(prop::collection::vec("[a-z]{1,4}", 1..6), 1..10)
    ) {
        let grid = RawGrid::new(rows);
        let layout = extract_layout(&grid, SourceFormat::PlainHeadered, &MarkerAlphabet::default(), 10);
        prop_assert_eq!(layout.headers.len(), grid.width());
        for row in &layout.rows {
            prop_assert_eq!(row.cells.len(), layout.headers.len());
        }
    }
}

#[test]
fn row_typed_file_reads_end_to_end() {
    let input = b"H,SYSCO,Price list\nF,SUPC,Pack,Size,Unit,Desc,Case $\nP,1234567,4,5LB,LB,Chicken breast,48.20\nP,7654321,6,#10,CN,Tomato sauce,31.00\n";
    let grid = read_grid(input, &ReadOptions::default()).expect("read grid");
    let markers = MarkerAlphabet::default();
    let format = classify(&grid, &markers, 10);
    assert_eq!(format, SourceFormat::RowTyped);

    let layout = extract_layout(&grid, format, &markers, 10);
    assert_eq!(
        layout.headers,
        vec!["SUPC", "Pack", "Size", "Unit", "Desc", "Case $"]
    );
    assert_eq!(layout.rows.len(), 2);
    assert_eq!(layout.rows[1].cell(4), "Tomato sauce");
    assert_eq!(layout.rows[1].line, 4);
}

#[test]
fn single_column_file_is_plain() {
    let grid = read_grid(b"Name\nChicken\n", &ReadOptions::default()).expect("read grid");
    assert_eq!(
        classify(&grid, &MarkerAlphabet::default(), 10),
        SourceFormat::PlainHeadered
    );
}
