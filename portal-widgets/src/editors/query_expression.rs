//! Placeholder editors for query-builder values. Full editing of these values
//! happens outside the property inspector; here they can only be inspected or
//! cleared.

use super::{ControlKind, EditorControl, EditorInput};
use serde_json::Value;

pub const CONFIGURED: &str = "Query Expression configured";
pub const NOT_CONFIGURED: &str = "No query expression defined (optional)";

pub fn is_configured(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

/// Value written by the clear action
pub fn cleared() -> Value {
    Value::Null
}

pub fn query_expression_editor(input: &EditorInput<'_>) -> EditorControl {
    let configured = is_configured(input.value);
    input.control(ControlKind::QueryExpression {
        configured,
        summary: if configured { CONFIGURED } else { NOT_CONFIGURED }.to_string(),
    })
}

/// Read-only view of a search model: its name and criterion names
pub fn search_model_editor(input: &EditorInput<'_>) -> EditorControl {
    let name = input
        .value
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let criteria = input
        .value
        .get("criteria")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(criterion_name).collect())
        .unwrap_or_default();
    input.control(ControlKind::SearchModel { name, criteria })
}

fn criterion_name(criterion: &Value) -> Option<String> {
    match criterion {
        Value::String(name) => Some(name.clone()),
        other => other.get("name").and_then(Value::as_str).map(str::to_string),
    }
}
