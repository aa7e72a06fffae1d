//! Header-row detection and header-name normalization.

use std::collections::{HashMap, HashSet};

#[derive(Debug, Default, Clone, Copy)]
struct RowStats {
    total: usize,
    non_empty: usize,
    numeric: usize,
    alpha: usize,
}

impl RowStats {
    fn ratio(self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 / self.total as f64
        }
    }

    fn non_empty_ratio(self) -> f64 {
        self.ratio(self.non_empty)
    }

    fn numeric_ratio(self) -> f64 {
        self.ratio(self.numeric)
    }

    fn alpha_ratio(self) -> f64 {
        self.ratio(self.alpha)
    }
}

/// Statistics over a row, measured against the grid width so that short
/// metadata rows ("Vendor: Acme") do not look fully populated.
fn row_stats(row: &[String], width: usize) -> RowStats {
    let mut stats = RowStats {
        total: width.max(row.len()),
        ..RowStats::default()
    };
    for cell in row {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            continue;
        }
        stats.non_empty += 1;
        if parse_number(trimmed) {
            stats.numeric += 1;
        }
        if trimmed.chars().any(char::is_alphabetic) {
            stats.alpha += 1;
        }
    }
    stats
}

fn parse_number(value: &str) -> bool {
    let cleaned: String = value
        .chars()
        .filter(|ch| !matches!(ch, '$' | ',' | ' '))
        .collect();
    !cleaned.is_empty() && cleaned.parse::<f64>().is_ok()
}

fn is_header_like(stats: RowStats) -> bool {
    stats.non_empty_ratio() >= 0.8 && stats.alpha_ratio() >= 0.5 && stats.numeric_ratio() <= 0.1
}

/// Index of the header row among the first `probe` rows.
///
/// Leading metadata rows are skipped: the first row that is at least 80%
/// filled, at least 50% alphabetic and at most 10% numeric wins. Falls back
/// to row 0.
pub fn detect_header_row(rows: &[Vec<String>], probe: usize) -> usize {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    rows.iter()
        .take(probe.max(1))
        .position(|row| is_header_like(row_stats(row, width)))
        .unwrap_or(0)
}

/// Collapse internal whitespace and strip a stray BOM.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize a header row into unique, non-empty column names.
///
/// The result has exactly `width` entries. Empty names become
/// `Column_<index>` (0-based position); repeated names get `_1`, `_2`… suffixes
/// in order of appearance, skipping any suffixed name the file already uses.
/// Comparison is case-insensitive.
pub fn normalize_headers(raw: &[String], width: usize) -> Vec<String> {
    let width = width.max(raw.len());
    let names: Vec<String> = (0..width)
        .map(|index| {
            raw.get(index)
                .map(String::as_str)
                .map(normalize_header)
                .unwrap_or_default()
        })
        .collect();
    let reserved: HashSet<String> = names
        .iter()
        .filter(|name| !name.is_empty())
        .map(|name| name.to_lowercase())
        .collect();

    let mut taken: HashSet<String> = HashSet::with_capacity(width);
    let mut suffixes: HashMap<String, usize> = HashMap::new();
    let mut headers = Vec::with_capacity(width);
    for (index, mut name) in names.into_iter().enumerate() {
        let generated = name.is_empty();
        if generated {
            name = format!("Column_{index}");
        }
        let key = name.to_lowercase();
        if taken.contains(&key) || (generated && reserved.contains(&key)) {
            let next = suffixes.entry(key).or_insert(1);
            loop {
                let candidate = format!("{name}_{next}");
                *next += 1;
                let candidate_key = candidate.to_lowercase();
                if !taken.contains(&candidate_key) && !reserved.contains(&candidate_key) {
                    name = candidate;
                    break;
                }
            }
        }
        taken.insert(name.to_lowercase());
        headers.push(name);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn skips_metadata_rows() {
        let rows = vec![
            row(&["Acme Foods price list"]),
            row(&["Generated", "2024-01-01"]),
            row(&["Item", "Code", "Price", "Unit"]),
            row(&["Chicken", "A100", "5.99", "lb"]),
        ];
        assert_eq!(detect_header_row(&rows, 10), 2);
    }

    #[test]
    fn numeric_rows_are_not_headers() {
        let rows = vec![row(&["1", "2", "3"]), row(&["4", "5", "6"])];
        assert_eq!(detect_header_row(&rows, 10), 0);
    }

    #[test]
    fn header_outside_probe_window_is_ignored() {
        let rows = vec![
            row(&["x"]),
            row(&["y"]),
            row(&["Name", "SKU", "Price"]),
        ];
        assert_eq!(detect_header_row(&rows, 2), 0);
    }

    #[test]
    fn fills_empty_and_dedupes_names() {
        let headers = normalize_headers(&row(&["Price", "", " Item   Name ", "price"]), 5);
        assert_eq!(
            headers,
            vec!["Price", "Column_1", "Item Name", "price_1", "Column_4"]
        );
    }

    #[test]
    fn suffixes_skip_names_already_in_the_file() {
        let headers = normalize_headers(&row(&["Price", "Price", "Price_1"]), 3);
        assert_eq!(headers, vec!["Price", "Price_2", "Price_1"]);

        let headers = normalize_headers(&row(&["", "Column_0", "Price_1", "Price_1"]), 4);
        assert_eq!(headers, vec!["Column_0_1", "Column_0", "Price_1", "Price_1_1"]);
    }
}
