/// Placeholder logged instead of cell values.
pub const REDACTED: &str = "[REDACTED]";

/// Cell value for log output, or [`REDACTED`] unless row-level logging is on.
pub fn redact_value(value: &str, log_values: bool) -> &str {
    if log_values { value } else { REDACTED }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_hidden_by_default() {
        assert_eq!(redact_value("5.99", false), "[REDACTED]");
        assert_eq!(redact_value("5.99", true), "5.99");
    }
}
