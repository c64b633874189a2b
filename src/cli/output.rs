use serde::Serialize;

/// Format a result as minified JSON.
pub fn format_json<T: Serialize>(result: &T) -> String {
    serde_json::to_string(result).unwrap_or_else(|e| format_error(&e))
}

/// Format a result as indented JSON.
pub fn format_pretty<T: Serialize>(result: &T) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|e| format_error(&e))
}

/// Format an error as JSON.
pub fn format_error(err: &dyn std::fmt::Display) -> String {
    serde_json::json!({ "error": err.to_string() }).to_string()
}
