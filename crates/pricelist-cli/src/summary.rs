use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use pricelist_core::ImportPreview;
use pricelist_map::{ConfidenceLevel, MappingResult, SelectorTarget};
use pricelist_model::{
    CanonicalSchema, CommitAction, ImportResult, MappingOrigin, SourceFormat, ValidationOutcome,
};

use crate::types::ImportReport;

pub fn print_report(report: &ImportReport) {
    let preview = &report.preview;
    println!("File: {}", report.file.display());
    println!("Format: {}", format_label(preview.format));
    println!("{}", mapping_table(preview));
    for unresolved in &preview.unresolved {
        eprintln!(
            "warning: template {} column {} not found",
            target_label(unresolved.target),
            unresolved.selector
        );
    }
    if let Some(table) = outcome_table(preview, report.all_rows) {
        println!();
        println!("Rows:");
        println!("{table}");
    }
    match &report.result {
        Some(result) => {
            println!();
            println!("Catalog: {}", report.catalog.display());
            println!("{}", result_table(result));
            if result.was_cancelled() {
                eprintln!("warning: import was cancelled before every row was written");
            }
            print_errors(result);
        }
        None => {
            let summary = preview.summary();
            println!();
            println!(
                "Dry run: {} ready, {} duplicates, {} errors. Catalog not changed.",
                summary.ready, summary.duplicates, summary.errors
            );
        }
    }
    if let Some(name) = &report.saved_template {
        println!("Saved template '{name}'");
    }
}

pub fn print_suggestions(
    format: SourceFormat,
    headers: &[String],
    schema: &CanonicalSchema,
    result: &MappingResult,
) {
    println!("Format: {}", format_label(format));
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Column"),
        header_cell("Score"),
        header_cell("Confidence"),
        header_cell("Other candidates"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for schema_field in &schema.fields {
        let field = schema_field.field;
        let field_cell = if schema_field.is_required() {
            Cell::new(field.label()).add_attribute(Attribute::Bold)
        } else {
            Cell::new(field.label())
        };
        let others = result
            .candidates
            .get(&field)
            .map(|ranked| {
                ranked
                    .iter()
                    .skip(1)
                    .take(3)
                    .map(|c| format!("{} ({})", c.header, c.score.score))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .filter(|joined| !joined.is_empty());
        match result.suggestion_for(field) {
            Some(suggestion) => table.add_row(vec![
                field_cell,
                Cell::new(&suggestion.header),
                Cell::new(suggestion.score),
                level_cell(suggestion.level),
                others.map_or_else(|| dim_cell("-"), Cell::new),
            ]),
            None => table.add_row(vec![
                field_cell,
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
                others.map_or_else(|| dim_cell("-"), Cell::new),
            ]),
        };
    }
    println!("{table}");
    let unmapped: Vec<&str> = result
        .unmapped_columns
        .iter()
        .filter_map(|index| headers.get(*index).map(String::as_str))
        .collect();
    if !unmapped.is_empty() {
        println!("Unmapped columns: {}", unmapped.join(", "));
    }
}

fn mapping_table(preview: &ImportPreview) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Column"),
        header_cell("Confidence"),
        header_cell("Source"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for (field, column) in preview.mapping.iter() {
        table.add_row(vec![
            Cell::new(field.label()),
            Cell::new(&column.header),
            column
                .confidence
                .map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(origin_label(column.origin)),
        ]);
    }
    if let Some(index) = preview.price_column {
        table.add_row(vec![
            Cell::new("unit price"),
            Cell::new(preview.headers.get(index).map_or("", String::as_str)),
            dim_cell("-"),
            Cell::new("price column"),
        ]);
    }
    if !preview.pack_columns.is_empty() {
        let headers: Vec<&str> = preview
            .pack_columns
            .columns()
            .filter_map(|index| preview.headers.get(index).map(String::as_str))
            .collect();
        table.add_row(vec![
            Cell::new("pack size"),
            Cell::new(headers.join(" + ")),
            dim_cell("-"),
            Cell::new("combined"),
        ]);
    }
    for (field, value) in &preview.defaults {
        table.add_row(vec![
            Cell::new(field.label()),
            Cell::new(format!("\"{value}\"")),
            dim_cell("-"),
            Cell::new("default"),
        ]);
    }
    table
}

fn outcome_table(preview: &ImportPreview, all_rows: bool) -> Option<Table> {
    let rows: Vec<&ValidationOutcome> = preview
        .outcomes()
        .iter()
        .filter(|outcome| all_rows || !matches!(outcome, ValidationOutcome::Ready(_)))
        .collect();
    if rows.is_empty() {
        return None;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Status"),
        header_cell("Identifier"),
        header_cell("Price"),
        header_cell("Detail"),
    ]);
    apply_wide_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for outcome in rows {
        let row = match outcome {
            ValidationOutcome::Ready(candidate) => vec![
                Cell::new(candidate.row_number),
                Cell::new("READY").fg(Color::Green),
                Cell::new(&candidate.entry.identifier),
                Cell::new(format!("{:.2}", candidate.entry.unit_price)),
                Cell::new(&candidate.entry.name),
            ],
            ValidationOutcome::Duplicate {
                candidate,
                existing,
            } => vec![
                Cell::new(candidate.row_number),
                Cell::new("DUPLICATE").fg(Color::Yellow),
                Cell::new(&candidate.entry.identifier),
                Cell::new(format!("{:.2}", candidate.entry.unit_price)),
                Cell::new(format!("catalog price {:.2}", existing.unit_price)),
            ],
            ValidationOutcome::Error(error) => vec![
                Cell::new(error.row_number),
                Cell::new("ERROR")
                    .fg(Color::Red)
                    .add_attribute(Attribute::Bold),
                dim_cell("-"),
                dim_cell("-"),
                Cell::new(error.reasons().join("; ")),
            ],
        };
        table.add_row(row);
    }
    Some(table)
}

fn result_table(result: &ImportResult) -> Table {
    let counts = result.counts();
    let not_attempted = result
        .rows()
        .iter()
        .filter(|row| row.action == CommitAction::NotAttempted)
        .count();
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Imported"),
        header_cell("Updated"),
        header_cell("Skipped"),
        header_cell("Errors"),
        header_cell("Not attempted"),
    ]);
    apply_table_style(&mut table);
    table.add_row(vec![
        count_cell(counts.imported, Color::Green),
        count_cell(counts.updated, Color::Green),
        count_cell(counts.skipped, Color::Yellow),
        count_cell(counts.errors, Color::Red),
        count_cell(not_attempted, Color::Yellow),
    ]);
    for index in 0..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table
}

fn print_errors(result: &ImportResult) {
    if result.errors().is_empty() {
        return;
    }
    eprintln!("Errors:");
    for error in result.errors() {
        eprintln!("- {error}");
    }
}

fn format_label(format: SourceFormat) -> &'static str {
    match format {
        SourceFormat::PlainHeadered => "plain headered",
        SourceFormat::RowTyped => "row-typed (H/F/P)",
    }
}

fn origin_label(origin: MappingOrigin) -> &'static str {
    match origin {
        MappingOrigin::Suggested => "suggested",
        MappingOrigin::Template => "template",
        MappingOrigin::Override => "override",
    }
}

fn target_label(target: SelectorTarget) -> String {
    match target {
        SelectorTarget::Field(field) => format!("'{field}'"),
        SelectorTarget::PriceField => "price".to_string(),
    }
}

fn level_cell(level: ConfidenceLevel) -> Cell {
    let color = match level {
        ConfidenceLevel::High => Color::Green,
        ConfidenceLevel::Medium => Color::Yellow,
        ConfidenceLevel::Low => Color::Red,
    };
    Cell::new(level.as_str()).fg(color)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_wide_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
