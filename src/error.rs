//! Typed errors for registry configuration and client calls.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("endpoint name must not be empty")]
    EmptyName,
    #[error("duplicate endpoint: {0}")]
    DuplicateEndpoint(String),
    #[error("malformed url template for {name}: {template}")]
    MalformedTemplate { name: String, template: String },
    #[error("config load: {0}")]
    Load(String),
    #[error("validation: {0}")]
    Validation(String),
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("unknown endpoint: {0}")]
    UnknownEndpoint(String),
    #[error("endpoint {endpoint} needs a value for path parameter '{param}'")]
    MissingPathParam { endpoint: String, param: String },
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("transport: {0}")]
    Transport(String),
    #[error("server error ({status}): {message}")]
    Server {
        status: StatusCode,
        message: String,
        body: serde_json::Value,
    },
    #[error("session expired: {message}")]
    SessionExpired { message: String },
    #[error("decode: {0}")]
    Decode(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("auth flow is at {actual}, expected {expected}")]
    InvalidStep {
        expected: &'static str,
        actual: &'static str,
    },
}

impl ClientError {
    /// Message suitable for a list view's `error` slot or a form banner.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Server { message, .. } | ClientError::SessionExpired { message } => {
                message.clone()
            }
            ClientError::Transport(raw) => raw.clone(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Server { status, .. } => Some(*status),
            ClientError::SessionExpired { .. } => Some(StatusCode::UNAUTHORIZED),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}
