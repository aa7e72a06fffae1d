//! Supplier identifier cleanup.

/// Longest identifier kept after sanitizing.
pub const MAX_IDENTIFIER_LEN: usize = 20;
/// Shortest identifier accepted after sanitizing.
pub const MIN_IDENTIFIER_LEN: usize = 3;

/// Clean a supplier identifier.
///
/// - spreadsheet float artefacts are dropped (`123.0` → `123`)
/// - anything outside `[A-Za-z0-9-]` becomes `-`
/// - runs of `-` collapse and leading/trailing `-` are stripped
/// - the result is cut to [`MAX_IDENTIFIER_LEN`] characters
///
/// Returns `None` when fewer than [`MIN_IDENTIFIER_LEN`] characters remain.
pub fn sanitize_identifier(raw: &str) -> Option<String> {
    let trimmed = strip_float_suffix(raw.trim());

    let mut cleaned = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        let c = if c.is_ascii_alphanumeric() { c } else { '-' };
        if c == '-' && (cleaned.is_empty() || cleaned.ends_with('-')) {
            continue;
        }
        cleaned.push(c);
    }

    let truncated: String = cleaned.chars().take(MAX_IDENTIFIER_LEN).collect();
    let result = truncated.trim_end_matches('-');
    (result.len() >= MIN_IDENTIFIER_LEN).then(|| result.to_string())
}

fn strip_float_suffix(value: &str) -> &str {
    match value.split_once('.') {
        Some((whole, fraction))
            if !whole.is_empty()
                && whole.bytes().all(|b| b.is_ascii_digit())
                && !fraction.is_empty()
                && fraction.bytes().all(|b| b == b'0') =>
        {
            whole
        }
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_artefacts_are_dropped() {
        assert_eq!(sanitize_identifier("123.0").as_deref(), Some("123"));
        assert_eq!(sanitize_identifier("4567.000").as_deref(), Some("4567"));
        assert_eq!(sanitize_identifier("12.5").as_deref(), Some("12-5"));
    }

    #[test]
    fn invalid_characters_become_single_hyphens() {
        assert_eq!(sanitize_identifier(" AB 12//34 ").as_deref(), Some("AB-12-34"));
        assert_eq!(sanitize_identifier("--x_y--z--").as_deref(), Some("x-y-z"));
    }

    #[test]
    fn long_identifiers_are_cut() {
        let sanitized = sanitize_identifier("ABCDEFGHIJKLMNOPQRS-TUVWXYZ").unwrap();
        assert_eq!(sanitized, "ABCDEFGHIJKLMNOPQRS");
        assert!(sanitized.len() <= MAX_IDENTIFIER_LEN);
    }

    #[test]
    fn too_short_is_rejected() {
        assert_eq!(sanitize_identifier("A1"), None);
        assert_eq!(sanitize_identifier("#$%"), None);
        assert_eq!(sanitize_identifier(""), None);
    }
}
