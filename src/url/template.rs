//! `{param}` url templates and path-parameter substitution.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Everything except RFC 3986 unreserved characters is escaped inside a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("static placeholder regex"))
}

/// A parsed url template such as `employees/{id}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlTemplate {
    raw: String,
    placeholders: Vec<String>,
}

/// Result of substituting a payload into a template.
#[derive(Clone, Debug, PartialEq)]
pub struct Expansion {
    pub path: String,
    /// Payload keys that did not fill a placeholder; sent as query or body.
    pub remaining: Map<String, Value>,
    /// Placeholders still present in `path` after substitution.
    pub unresolved: Vec<String>,
}

impl UrlTemplate {
    /// Parse a template. Returns None when braces do not form `{name}` pairs.
    pub fn parse(raw: &str) -> Option<Self> {
        let re = placeholder_re();
        let leftover = re.replace_all(raw, "");
        if leftover.contains('{') || leftover.contains('}') {
            return None;
        }
        let mut placeholders: Vec<String> = Vec::new();
        for cap in re.captures_iter(raw) {
            let name = cap[1].to_string();
            if !placeholders.contains(&name) {
                placeholders.push(name);
            }
        }
        Some(UrlTemplate {
            raw: raw.to_string(),
            placeholders,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Substitute primitive payload values into matching placeholders. Values are
    /// percent-encoded as one path segment and never re-scanned for placeholders.
    /// Consumed keys are removed from the returned payload.
    pub fn expand(&self, payload: Map<String, Value>) -> Expansion {
        let mut filled: HashMap<String, String> = HashMap::new();
        let mut remaining = Map::new();
        for (key, value) in payload {
            match path_value(&value) {
                Some(text) if self.placeholders.contains(&key) => {
                    filled.insert(key, utf8_percent_encode(&text, PATH_SEGMENT).to_string());
                }
                _ => {
                    remaining.insert(key, value);
                }
            }
        }
        let path = placeholder_re()
            .replace_all(&self.raw, |caps: &Captures| match filled.get(&caps[1]) {
                Some(segment) => segment.clone(),
                None => caps[0].to_string(),
            })
            .into_owned();
        let unresolved = self
            .placeholders
            .iter()
            .filter(|p| !filled.contains_key(p.as_str()))
            .cloned()
            .collect();
        Expansion {
            path,
            remaining,
            unresolved,
        }
    }
}

/// Primitive JSON values render into a path segment; null, arrays and objects do not.
fn path_value(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
