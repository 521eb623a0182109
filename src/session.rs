//! Session state shared by the dispatcher and auth flow: locale, bearer token, signed-in user.
//! Optionally persisted to a JSON file so a restart keeps the user signed in.

use crate::models::{Role, User};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ar => "ar",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Locale {
    type Err = crate::error::ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // i18n libraries store region-qualified tags such as "en-US".
        let lang = s.split(['-', '_']).next().unwrap_or_default();
        match lang.to_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "ar" => Ok(Locale::Ar),
            _ => Err(crate::error::ConfigError::Validation(format!(
                "unsupported locale: {} (expected en or ar)",
                s
            ))),
        }
    }
}

/// Read-only snapshot attached to one outgoing request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub locale: Locale,
    /// Bare token; `Bearer ` is added when the header is built.
    pub auth_token: Option<String>,
}

impl RequestContext {
    pub fn authorization(&self) -> Option<String> {
        self.auth_token.as_deref().map(|t| format!("Bearer {}", t))
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct SessionState {
    #[serde(default)]
    locale: Locale,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<User>,
    #[serde(default)]
    remembered_email: Option<String>,
}

/// Cloneable handle; all clones see the same state.
#[derive(Clone, Default)]
pub struct Session {
    state: Arc<RwLock<SessionState>>,
    path: Option<Arc<PathBuf>>,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    /// Session backed by a JSON file. An unreadable or missing file starts empty.
    pub fn persistent(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable session file");
                SessionState::default()
            }),
            Err(_) => SessionState::default(),
        };
        Session {
            state: Arc::new(RwLock::new(state)),
            path: Some(Arc::new(path)),
        }
    }

    pub fn context(&self) -> RequestContext {
        let s = self.read();
        RequestContext {
            locale: s.locale,
            auth_token: s.token.clone(),
        }
    }

    pub fn locale(&self) -> Locale {
        self.read().locale
    }

    pub fn set_locale(&self, locale: Locale) {
        self.update(|s| s.locale = locale);
    }

    pub fn sign_in(&self, token: impl Into<String>, user: Option<User>) {
        let token = token.into();
        self.update(move |s| {
            s.token = Some(token);
            s.user = user;
        });
    }

    pub fn set_user(&self, user: Option<User>) {
        self.update(move |s| s.user = user);
    }

    /// Drop token and user; locale and remembered email survive.
    pub fn clear_auth(&self) {
        self.update(|s| {
            s.token = None;
            s.user = None;
        });
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().token.is_some()
    }

    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.read().user.as_ref().map(|u| u.role == role).unwrap_or(false)
    }

    pub fn remembered_email(&self) -> Option<String> {
        self.read().remembered_email.clone()
    }

    pub fn remember_email(&self, email: Option<String>) {
        self.update(|s| s.remembered_email = email);
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Mutate and persist under the write lock so the file always holds the latest state.
    fn update(&self, f: impl FnOnce(&mut SessionState)) {
        let mut guard = self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard);
        if let Some(path) = &self.path {
            if let Err(e) = write_state(path, &guard) {
                tracing::warn!(path = %path.display(), error = %e, "failed to persist session");
            }
        }
    }
}

fn write_state(path: &PathBuf, state: &SessionState) -> std::io::Result<()> {
    let raw = serde_json::to_string_pretty(state).map_err(std::io::Error::other)?;
    std::fs::write(path, raw)
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self.read();
        f.debug_struct("Session")
            .field("locale", &s.locale)
            .field("authenticated", &s.token.is_some())
            .field("persistent", &self.path.is_some())
            .finish()
    }
}
