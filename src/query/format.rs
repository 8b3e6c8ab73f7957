//! SQL literal formatting shared by every generated statement.

use crate::value::{Value, TIMESTAMP_FORMAT};

/// Render a value as an inline SQL literal.
///
/// - `NULL` for null
/// - text single-quoted, embedded `'` doubled (`O'Brien` → `'O''Brien'`)
/// - timestamps as `'YYYY-MM-DD HH:MM:SS'`
/// - booleans as `TRUE` / `FALSE`
/// - numbers in their default textual form; non-finite floats quoted as
///   `'NaN'`, `'Infinity'` or `'-Infinity'`
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) if f.is_nan() => "'NaN'".to_string(),
        Value::Float(f) if f.is_infinite() && f.is_sign_positive() => "'Infinity'".to_string(),
        Value::Float(f) if f.is_infinite() => "'-Infinity'".to_string(),
        Value::Float(f) => f.to_string(),
        Value::Text(s) => quote(s),
        Value::Timestamp(ts) => format!("'{}'", ts.format(TIMESTAMP_FORMAT)),
    }
}

/// Prefix pattern for `LIKE` filters: `'<escaped>%'`
pub fn format_prefix_pattern(prefix: &str) -> String {
    format!("'{}%'", escape(prefix))
}

/// Single-quote a text literal
pub fn quote(text: &str) -> String {
    format!("'{}'", escape(text))
}

fn escape(text: &str) -> String {
    text.replace('\'', "''")
}
