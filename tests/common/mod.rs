#![allow(dead_code)]

use dashboard_sdk::notify::{CollectingNotifier, RecordingNavigator};
use dashboard_sdk::{Dispatcher, Session};
use std::sync::Arc;
use std::time::Duration;

pub struct Harness {
    pub dispatcher: Dispatcher,
    pub session: Session,
    pub notifier: CollectingNotifier,
    pub navigator: RecordingNavigator,
}

pub fn harness(base_url: &str) -> Harness {
    let session = Session::new();
    let notifier = CollectingNotifier::new();
    let navigator = RecordingNavigator::new();
    let dispatcher = Dispatcher::builder(base_url)
        .session(session.clone())
        .notifier(Arc::new(notifier.clone()))
        .navigator(Arc::new(navigator.clone()))
        .redirect_delay(Duration::ZERO)
        .build()
        .unwrap();
    Harness {
        dispatcher,
        session,
        notifier,
        navigator,
    }
}

pub fn object(v: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    match v {
        serde_json::Value::Object(m) => m,
        other => panic!("expected object, got {}", other),
    }
}
