//! Single chokepoint turning transport and server failures into `ClientError`
//! and user-visible notifications, including the 401 session-expiry branch.

use crate::error::ClientError;
use crate::notify::{Navigator, Notification, Notifier};
use crate::session::Session;
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// 401 messages the login form expects; anything else on 401 means the session is gone.
pub const DEFAULT_EXPECTED_LOGIN_FAILURES: [&str; 2] =
    ["Incorrect username or password", "Incorrect email or password"];
pub const SIGN_IN_ROUTE: &str = "/";

const GENERIC_SERVER_ERROR: &str = "Server Error";
const GENERIC_NETWORK_ERROR: &str = "Network Error";

pub struct ErrorNormalizer {
    pub(crate) session: Session,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) navigator: Arc<dyn Navigator>,
    pub(crate) expected_login_failures: Vec<String>,
    pub(crate) redirect_delay: Duration,
    pub(crate) sign_in_route: String,
}

impl ErrorNormalizer {
    /// No response was received.
    pub fn transport(&self, err: reqwest::Error) -> ClientError {
        let raw = err.to_string();
        tracing::warn!(error = %raw, "request failed without a response");
        self.notifier.notify(Notification::error(GENERIC_NETWORK_ERROR));
        ClientError::Transport(raw)
    }

    /// A non-2xx response; `body` is the parsed JSON body or `Null`.
    pub fn server(&self, status: StatusCode, body: Value) -> ClientError {
        let message = server_message(&body);
        if status == StatusCode::UNAUTHORIZED && !self.is_expected_login_failure(&message) {
            self.expire_session(&message);
            return ClientError::SessionExpired { message };
        }
        tracing::warn!(%status, message = %message, "server rejected request");
        self.notifier.notify(Notification::error(message.clone()));
        ClientError::Server {
            status,
            message,
            body,
        }
    }

    pub fn is_expected_login_failure(&self, message: &str) -> bool {
        self.expected_login_failures.iter().any(|m| m == message)
    }

    fn expire_session(&self, message: &str) {
        tracing::warn!(message, "session expired, signing out");
        self.notifier.notify(Notification::error(message.to_string()));
        self.session.clear_auth();

        let navigator = self.navigator.clone();
        let route = self.sign_in_route.clone();
        let delay = self.redirect_delay;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    navigator.navigate(&route);
                });
            }
            Err(_) => navigator.navigate(&route),
        }
    }
}

/// `message`, else `msg`, else a generic text.
pub fn server_message(body: &Value) -> String {
    let text = |key: &str| body.get(key).and_then(Value::as_str).filter(|s| !s.is_empty());
    text("message")
        .or_else(|| text("msg"))
        .unwrap_or(GENERIC_SERVER_ERROR)
        .to_string()
}
