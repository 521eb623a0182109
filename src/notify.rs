//! Collaborator seams for user-visible toasts and route changes.

use std::sync::{Arc, Mutex};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Notification {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Notification {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }
}

/// Non-blocking toast sink.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Client-side navigation, used for the sign-in redirect on session expiry.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// Writes toasts to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, n: Notification) {
        match n.level {
            NotificationLevel::Error => tracing::warn!(message = %n.message, "notification"),
            NotificationLevel::Success | NotificationLevel::Info => {
                tracing::info!(message = %n.message, "notification")
            }
        }
    }
}

/// Keeps every toast; handy for headless consumers and tests.
#[derive(Clone, Debug, Default)]
pub struct CollectingNotifier {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        CollectingNotifier::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap_or_else(|p| p.into_inner()).push(notification);
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, route: &str) {
        tracing::debug!(route, "navigation requested without a navigator");
    }
}

/// Remembers requested routes in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingNavigator {
    routes: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        RecordingNavigator::default()
    }

    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(route.to_string());
    }
}
