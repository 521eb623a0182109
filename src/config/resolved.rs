//! Resolved endpoint registry: config validated and indexed for lookup by name.

use crate::config::HttpMethod;
use crate::error::ClientError;
use crate::url::UrlTemplate;
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct EndpointDescriptor {
    pub name: String,
    pub method: HttpMethod,
    pub template: UrlTemplate,
}

/// Immutable name -> descriptor table, built once at startup.
#[derive(Clone, Debug, Default)]
pub struct EndpointRegistry {
    pub endpoints: Vec<EndpointDescriptor>,
    pub by_name: HashMap<String, usize>,
}

impl EndpointRegistry {
    pub fn get(&self, name: &str) -> Option<&EndpointDescriptor> {
        self.by_name.get(name).map(|&i| &self.endpoints[i])
    }

    /// Like [`get`](Self::get) but fails with `UnknownEndpoint` instead of returning None.
    pub fn require(&self, name: &str) -> Result<&EndpointDescriptor, ClientError> {
        self.get(name)
            .ok_or_else(|| ClientError::UnknownEndpoint(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.endpoints.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
