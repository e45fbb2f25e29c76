//! @ai:module:intent Extract metric columns from tool output
//! @ai:module:layer domain
//! @ai:module:public_api ColumnValue, extract_columns, extract_value, format_value
//! @ai:module:stateless true

use crate::definition::ColumnSpec;

/// Placeholder for metrics that were not found.
pub const MISSING: &str = "-";

/// @ai:intent One extracted metric of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnValue {
    pub title: String,
    pub value: String,
}

/// @ai:intent Extract every column from a tool's output, in column order
/// @ai:effects pure
pub fn extract_columns(columns: &[ColumnSpec], output: &str) -> Vec<ColumnValue> {
    columns
        .iter()
        .map(|column| {
            let raw = extract_value(output, &column.text);
            let value = match (raw, column.digits) {
                (Some(raw), Some(digits)) => format_value(&raw, digits),
                (Some(raw), None) => raw,
                (None, _) => MISSING.to_string(),
            };

            ColumnValue {
                title: column.title.clone(),
                value,
            }
        })
        .collect()
}

/// @ai:intent Columns with the placeholder value, for tools that report no metrics
/// @ai:effects pure
pub fn missing_columns(columns: &[ColumnSpec]) -> Vec<ColumnValue> {
    columns
        .iter()
        .map(|column| ColumnValue {
            title: column.title.clone(),
            value: MISSING.to_string(),
        })
        .collect()
}

/// @ai:intent Value following `key` on the first line that contains it
/// @ai:post text after the first ':' past the key, cut at '(' and trimmed
/// @ai:effects pure
pub fn extract_value(output: &str, key: &str) -> Option<String> {
    let line = output.lines().find(|line| line.contains(key))?;
    let start = line.find(key)? + key.len();
    let rest = &line[start..];

    let rest = match rest.find(':') {
        Some(colon) => &rest[colon + 1..],
        None => rest,
    };
    let rest = match rest.find('(') {
        Some(paren) => &rest[..paren],
        None => rest,
    };

    Some(rest.trim().to_string())
}

/// @ai:intent Round a numeric value to `digits` fractional digits
/// @ai:post a trailing one-letter unit after a digit is dropped; non-numbers pass through
/// @ai:effects pure
pub fn format_value(value: &str, digits: usize) -> String {
    let mut number = value;

    let chars: Vec<char> = value.chars().collect();
    if chars.len() >= 2
        && !chars[chars.len() - 1].is_ascii_digit()
        && chars[chars.len() - 2].is_ascii_digit()
    {
        let last = chars[chars.len() - 1].len_utf8();
        number = &value[..value.len() - last];
    }

    match number.parse::<f64>() {
        Ok(parsed) => format!("{parsed:.digits$}"),
        Err(_) => value.to_string(),
    }
}
