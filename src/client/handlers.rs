//! Standard handler bindings and the user-facing notifier

use serde_json::Value;
use tracing::info;

use super::session::Session;
use crate::broadcast::{BROADCAST_MESSAGE, ECHO, EVENT_CREATED, POST_CHANGE};

/// Shows diagnostic messages to the user
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Notifier that writes to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        info!(target: "hotseat::alert", "{}", message);
    }
}

/// Whether a payload counts as empty: null, false, 0 or ""
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Strings as-is, everything else as compact JSON
pub fn render_payload(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Bind `broadcastMessage` and `echo` to the notifier
pub fn bind_connection_message(session: &Session) {
    session.on(BROADCAST_MESSAGE, show_message);
    session.on(ECHO, show_message);
}

/// Bind `postChange` and `eventCreated` to the application callback slot
pub fn bind_post_change(session: &Session) {
    session.on(POST_CHANGE, post_change);
    session.on(EVENT_CREATED, post_change);
}

fn show_message(session: &Session, payload: Option<&Value>) {
    let Some(message) = payload.filter(|v| !is_falsy(v)) else {
        return;
    };
    session
        .notifier()
        .notify(&format!("message received:{}", render_payload(message)));
}

fn post_change(session: &Session, payload: Option<&Value>) {
    session
        .post_callback()
        .deliver(payload.cloned().unwrap_or(Value::Null));
}
