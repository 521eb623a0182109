//! Registry validation: names present and unique, url templates well formed.

use crate::config::EndpointConfig;
use crate::error::ConfigError;
use crate::url::UrlTemplate;
use std::collections::HashSet;

pub fn validate(endpoints: &[EndpointConfig]) -> Result<(), ConfigError> {
    let mut names = HashSet::new();
    for e in endpoints {
        if e.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if !names.insert(e.name.as_str()) {
            return Err(ConfigError::DuplicateEndpoint(e.name.clone()));
        }
        if UrlTemplate::parse(&e.url).is_none() {
            return Err(ConfigError::MalformedTemplate {
                name: e.name.clone(),
                template: e.url.clone(),
            });
        }
    }
    Ok(())
}
