//! `{{variable}}` substitution for analysis prompts.

use serde_json::{Map, Value};

use crate::error::TaskPulseError;

/// Substitute every `{{key}}` occurrence for each provided variable using
/// its string representation. Fails with `MissingVariables` listing every
/// placeholder still present after substitution.
pub fn format_template(
    template: &str,
    vars: &Map<String, Value>,
) -> Result<String, TaskPulseError> {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("{{{{{key}}}}}");
        if result.contains(&placeholder) {
            result = result.replace(&placeholder, &value_to_string(value));
        }
    }

    let remaining = scan_placeholders(&result);
    if !remaining.is_empty() {
        return Err(TaskPulseError::MissingVariables(remaining));
    }

    Ok(result)
}

/// A template is usable when it has content and its `{{` / `}}` markers
/// balance.
pub fn validate_template(template: &str) -> bool {
    if template.trim().is_empty() {
        return false;
    }
    template.matches("{{").count() == template.matches("}}").count()
}

/// Collect every `{{...}}` placeholder in a template, braces included,
/// deduplicated in order of first appearance.
fn scan_placeholders(template: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '{' && chars.peek() == Some(&'{') {
            chars.next();

            let mut name = String::new();
            let mut closed = false;
            while let Some(ch) = chars.next() {
                if ch == '}' && chars.peek() == Some(&'}') {
                    chars.next();
                    closed = true;
                    break;
                }
                name.push(ch);
            }

            let placeholder = if closed {
                format!("{{{{{name}}}}}")
            } else {
                // Unclosed — report the dangling opener as-is.
                format!("{{{{{name}")
            };

            if !found.contains(&placeholder) {
                found.push(placeholder);
            }
        }
    }

    found
}

/// Convert a JSON value to its string representation for substitution.
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
