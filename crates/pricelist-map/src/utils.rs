//! Utility functions for mapping operations.

/// Normalizes text for comparison by lowercasing and replacing separators with spaces.
pub fn normalize_text(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(['_', '-', '.', '/', '\\'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whitespace-separated tokens of already normalized text.
pub fn tokens(normalized: &str) -> Vec<&str> {
    normalized.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators_become_spaces() {
        assert_eq!(normalize_text("  Item_Code "), "item code");
        assert_eq!(normalize_text("Unit-Of.Measure"), "unit of measure");
        assert_eq!(normalize_text("Case $"), "case $");
        assert_eq!(tokens("item  code"), vec!["item", "code"]);
    }
}
