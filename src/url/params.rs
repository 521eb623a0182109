//! Flatten a JSON payload into query pairs; join base url and path.

use serde_json::{Map, Value};

/// Query pairs for a GET payload. Nulls are skipped, arrays repeat the key,
/// objects are sent as JSON text.
pub fn query_pairs(payload: &Map<String, Value>) -> Vec<(String, String)> {
    let mut out = Vec::with_capacity(payload.len());
    for (k, v) in payload {
        match v {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    if let Some(s) = scalar_text(item) {
                        out.push((k.clone(), s));
                    }
                }
            }
            other => {
                if let Some(s) = scalar_text(other) {
                    out.push((k.clone(), s));
                }
            }
        }
    }
    out
}

fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(_) | Value::Object(_) => Some(v.to_string()),
    }
}

/// Join `base` and a relative `path` with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}
