//! Dot-path resolution over JSON values.

use serde_json::Value;

/// Walk a dot-path (`result.latency`, `metadata.env.region`) through a
/// JSON value. Numeric segments index into arrays. Returns `None` when any
/// segment is missing; never panics.
pub fn resolve_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    let mut current = value;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}
