//! Unit price checks.

use pricelist_model::{CanonicalField, RowDraft, RowIssue};

/// Parse a unit price, tolerating currency symbols, thousands separators
/// and whitespace (`$1,234.50`).
///
/// Returns the reason when the value is not a usable price.
pub fn parse_price(raw: &str) -> Result<f64, &'static str> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Err("no digits");
    }
    let value: f64 = cleaned.parse().map_err(|_| "not a number")?;
    if !value.is_finite() {
        Err("not a number")
    } else if value < 0.0 {
        Err("negative price")
    } else {
        Ok(value)
    }
}

/// A present unit price must parse.
pub fn check(draft: &RowDraft) -> Vec<RowIssue> {
    let Some(raw) = draft.value(CanonicalField::UnitPrice) else {
        return Vec::new();
    };
    match parse_price(raw) {
        Ok(_) => Vec::new(),
        Err(reason) => vec![RowIssue::Invalid {
            field: CanonicalField::UnitPrice,
            value: raw.to_string(),
            reason: reason.to_string(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_currency_formats() {
        assert_eq!(parse_price("5.99"), Ok(5.99));
        assert_eq!(parse_price(" $1,234.50 "), Ok(1234.5));
        assert_eq!(parse_price("0"), Ok(0.0));
    }

    #[test]
    fn rejects_unusable_prices() {
        assert_eq!(parse_price("abc"), Err("not a number"));
        assert_eq!(parse_price("-3.00"), Err("negative price"));
        assert_eq!(parse_price("$"), Err("no digits"));
        assert_eq!(parse_price("NaN"), Err("not a number"));
    }
}
