//! Supplier unit codes and ounce conversions.

/// Canonical unit for a supplier unit code (`CS` → `case`, `LBS` → `lb`).
///
/// Matching ignores case and surrounding whitespace. Unknown codes become
/// `each`.
pub fn normalize_unit(raw: &str) -> &'static str {
    match raw.trim().to_ascii_lowercase().as_str() {
        "cs" | "case" | "ca" | "bx" | "box" => "case",
        "lb" | "lbs" | "pound" | "pounds" | "#" => "lb",
        "oz" | "ounce" | "ounces" => "oz",
        "gal" | "gallon" | "gallons" | "gl" => "gallon",
        "qt" | "quart" | "quarts" | "qts" => "quart",
        "l" | "liter" | "litre" | "lt" | "ltr" => "liter",
        "g" | "gram" | "grams" | "gm" | "kg" | "kilo" | "kilogram" => "grams",
        _ => "each",
    }
}

/// Ounces in one canonical unit; `1.0` for units without a weight.
pub fn ounces_per_unit(unit: &str) -> f64 {
    match unit {
        "lb" => 16.0,
        "gallon" => 128.0,
        "quart" => 32.0,
        "liter" => 33.814,
        "grams" => 0.035_274,
        _ => 1.0,
    }
}

/// Unit price divided by the ounces in one unit.
pub fn cost_per_oz(unit_price: f64, unit: &str) -> f64 {
    unit_price / ounces_per_unit(unit)
}
