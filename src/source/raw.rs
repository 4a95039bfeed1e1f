//! The weakly-typed document tree handed over by the YAML front end.

pub use serde_json::Value as RawValue;

/// String-keyed mapping. Key order follows the source document.
pub type RawNode = serde_json::Map<String, RawValue>;

/// Looks up `key` in `node`, comparing keys case-insensitively.
pub(crate) fn get_ignore_case<'a>(node: &'a RawNode, key: &str) -> Option<&'a RawValue> {
    node.get(key).or_else(|| {
        node.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}

/// Human name of a value's shape, as used in error messages.
pub(crate) fn shape_name(value: &RawValue) -> &'static str {
    match value {
        RawValue::Object(_) => "map",
        RawValue::Array(_) => "list",
        RawValue::String(_) => "string",
        RawValue::Number(_) => "number",
        RawValue::Bool(_) => "boolean",
        RawValue::Null => "null",
    }
}

/// Renders a scalar as text. Collections and null yield `None`.
pub(crate) fn scalar_text(value: &RawValue) -> Option<String> {
    match value {
        RawValue::String(s) => Some(s.clone()),
        RawValue::Number(n) => Some(n.to_string()),
        RawValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
