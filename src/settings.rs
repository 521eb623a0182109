//! Process configuration from the environment (`.env` honoured) and log setup.

use crate::config::{dashboard_endpoints, load_from_path, merge, resolve, EndpointRegistry};
use crate::error::ConfigError;
use crate::session::Session;
use crate::url::join_url;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api/v1";
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(1500);

#[derive(Clone, Debug)]
pub struct Settings {
    pub api_base_url: String,
    pub image_base_url: String,
    /// Production builds log at info; everything else logs at debug.
    pub production: bool,
    /// JSON registry entries that override or extend the built-in table.
    pub endpoints_path: Option<PathBuf>,
    pub session_path: Option<PathBuf>,
    pub redirect_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            image_base_url: DEFAULT_API_BASE_URL.into(),
            production: false,
            endpoints_path: None,
            session_path: None,
            redirect_delay: DEFAULT_REDIRECT_DELAY,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup (env, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_base_url = get("API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.into());
        let image_base_url = get("IMAGE_BASE_URL").unwrap_or_else(|| api_base_url.clone());
        let production = match get("PRODUCTION") {
            Some(v) => parse_flag(&v)?,
            None => false,
        };
        let redirect_delay = match get("REDIRECT_DELAY_MS") {
            Some(v) => Duration::from_millis(v.parse().map_err(|_| {
                ConfigError::Validation(format!("REDIRECT_DELAY_MS must be a number of milliseconds, got {}", v))
            })?),
            None => DEFAULT_REDIRECT_DELAY,
        };

        Ok(Settings {
            api_base_url,
            image_base_url,
            production,
            endpoints_path: get("ENDPOINTS_PATH").map(PathBuf::from),
            session_path: get("SESSION_PATH").map(PathBuf::from),
            redirect_delay,
        })
    }

    /// Absolute url for a stored asset path.
    pub fn image_url(&self, path: &str) -> String {
        join_url(&self.image_base_url, path)
    }

    /// Built-in registry, with entries from `endpoints_path` merged over it.
    pub async fn registry(&self) -> Result<EndpointRegistry, ConfigError> {
        let mut endpoints = dashboard_endpoints();
        if let Some(path) = &self.endpoints_path {
            endpoints = merge(endpoints, load_from_path(path).await?);
        }
        resolve(&endpoints)
    }

    pub fn session(&self) -> Session {
        match &self.session_path {
            Some(path) => Session::persistent(path.clone()),
            None => Session::new(),
        }
    }
}

fn parse_flag(v: &str) -> Result<bool, ConfigError> {
    match v.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Validation(format!("PRODUCTION must be a boolean, got {}", v))),
    }
}

/// Install the global fmt subscriber. `RUST_LOG` wins over the production default.
pub fn init_tracing(settings: &Settings) {
    let default = if settings.production {
        "dashboard_sdk=info"
    } else {
        "dashboard_sdk=debug"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
