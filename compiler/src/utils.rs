/// Quotes `text` as a double-quoted string literal with JSON escaping, which
/// proto string literals accept.
pub fn quote(text: &str) -> String {
    serde_json::Value::from(text).to_string()
}

/// Returns `None` for absent or blank option values.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
