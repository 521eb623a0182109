//! Build the registry from in-memory config or from a JSON file on disk.

use crate::config::resolved::{EndpointDescriptor, EndpointRegistry};
use crate::config::{validate, EndpointConfig};
use crate::error::ConfigError;
use crate::url::UrlTemplate;
use std::collections::HashMap;
use std::path::Path;

/// Build resolved registry from endpoint config (validates first).
pub fn resolve(endpoints: &[EndpointConfig]) -> Result<EndpointRegistry, ConfigError> {
    validate(endpoints)?;

    let mut out = Vec::with_capacity(endpoints.len());
    let mut by_name = HashMap::with_capacity(endpoints.len());
    for e in endpoints {
        let template = UrlTemplate::parse(&e.url).ok_or_else(|| ConfigError::MalformedTemplate {
            name: e.name.clone(),
            template: e.url.clone(),
        })?;
        by_name.insert(e.name.clone(), out.len());
        out.push(EndpointDescriptor {
            name: e.name.clone(),
            method: e.method,
            template,
        });
    }

    Ok(EndpointRegistry {
        endpoints: out,
        by_name,
    })
}

/// Read a JSON array of endpoint entries.
pub async fn load_from_path(path: impl AsRef<Path>) -> Result<Vec<EndpointConfig>, ConfigError> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "loading endpoint registry");
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&raw).map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))
}

/// Replace entries of `base` by name with those in `overrides`; new names are appended.
pub fn merge(base: Vec<EndpointConfig>, overrides: Vec<EndpointConfig>) -> Vec<EndpointConfig> {
    let mut merged = base;
    for o in overrides {
        match merged.iter_mut().find(|e| e.name == o.name) {
            Some(existing) => *existing = o,
            None => merged.push(o),
        }
    }
    merged
}
