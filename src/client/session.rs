//! Hub session: connection state, handler table and the application callback

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tracing::debug;

use super::config::ClientConfig;
use super::error::{ClientError, ClientResult};
use super::handlers::{bind_connection_message, bind_post_change, Notifier};
use crate::broadcast::HubMessage;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Initial state, and where a session returns after any failure
    Disconnected,
    /// Negotiate or handshake in flight
    Connecting,
    /// Handlers are live
    Connected,
}

/// A named-message handler; receives the message's first argument
pub type Handler = Arc<dyn Fn(&Session, Option<&Value>) + Send + Sync>;

/// The application's domain callback
pub type PostCallback = Arc<dyn Fn(Value) + Send + Sync>;

/// Slot for the application callback, empty until bound
#[derive(Default)]
pub struct CallbackSlot {
    callback: RwLock<Option<PostCallback>>,
}

impl CallbackSlot {
    pub fn bind<F>(&self, callback: F)
    where
        F: Fn(Value) + Send + Sync + 'static,
    {
        *self.callback.write() = Some(Arc::new(callback));
    }

    pub fn clear(&self) {
        self.callback.write().take();
    }

    pub fn is_bound(&self) -> bool {
        self.callback.read().is_some()
    }

    /// Hand `payload` to the callback; returns false (and does nothing)
    /// when the slot is empty
    pub fn deliver(&self, payload: Value) -> bool {
        // Clone out so the callback runs without the lock held
        let callback = self.callback.read().clone();
        match callback {
            Some(callback) => {
                callback(payload);
                true
            }
            None => false,
        }
    }
}

/// One client's session with the broadcast hub
pub struct Session {
    pub(super) config: ClientConfig,
    pub(super) state: watch::Sender<SessionState>,
    pub(super) endpoint: RwLock<Option<String>>,
    pub(super) outbound: Mutex<Option<mpsc::UnboundedSender<String>>>,
    handlers: RwLock<HashMap<String, Handler>>,
    notifier: Arc<dyn Notifier>,
    post_callback: CallbackSlot,
}

impl Session {
    /// Create a disconnected session with no handlers
    pub fn new(config: ClientConfig, notifier: Arc<dyn Notifier>) -> Arc<Self> {
        let (state, _) = watch::channel(SessionState::Disconnected);
        Arc::new(Self {
            config,
            state,
            endpoint: RwLock::new(None),
            outbound: Mutex::new(None),
            handlers: RwLock::new(HashMap::new()),
            notifier,
            post_callback: CallbackSlot::default(),
        })
    }

    /// Create a session with the diagnostic and `postChange` handlers bound
    pub fn with_default_handlers(config: ClientConfig, notifier: Arc<dyn Notifier>) -> Arc<Self> {
        let session = Self::new(config, notifier);
        bind_connection_message(&session);
        bind_post_change(&session);
        session
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Register `handler` for messages named `target`, replacing any previous one
    pub fn on<F>(&self, target: impl Into<String>, handler: F)
    where
        F: Fn(&Session, Option<&Value>) + Send + Sync + 'static,
    {
        self.handlers.write().insert(target.into(), Arc::new(handler));
    }

    /// Remove the handler for `target`
    pub fn off(&self, target: &str) -> bool {
        self.handlers.write().remove(target).is_some()
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Wait until the session reaches `target`
    pub async fn wait_for_state(&self, target: SessionState) {
        let mut rx = self.state.subscribe();
        let _ = rx.wait_for(|state| *state == target).await;
    }

    /// Hub URL of the current or last connection attempt
    pub fn endpoint(&self) -> Option<String> {
        self.endpoint.read().clone()
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    pub fn post_callback(&self) -> &CallbackSlot {
        &self.post_callback
    }

    pub(super) fn set_state(&self, state: SessionState) {
        let previous = self.state.send_replace(state);
        if previous != state {
            debug!(?previous, ?state, "session state changed");
        }
    }

    /// Route one inbound frame to its handler.
    ///
    /// Returns whether a handler was registered for the frame's target.
    pub fn dispatch(&self, frame: &str) -> ClientResult<bool> {
        let message = HubMessage::from_json(frame)?;
        let handler = self.handlers.read().get(&message.target).cloned();

        match handler {
            Some(handler) => {
                handler(self, message.payload());
                Ok(true)
            }
            None => {
                debug!(message_target = %message.target, "no handler for hub message");
                Ok(false)
            }
        }
    }

    /// Send a named invocation to the hub
    pub fn invoke(&self, target: &str, argument: Value) -> ClientResult<()> {
        let frame = HubMessage::new(target, vec![argument]).to_json()?;
        let outbound = self.outbound.lock();
        let tx = outbound.as_ref().ok_or(ClientError::NotConnected)?;
        tx.send(frame).map_err(|_| ClientError::NotConnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::{BROADCAST_MESSAGE, ECHO, EVENT_CREATED, POST_CHANGE};
    use crate::client::handlers::tests::RecordingNotifier;
    use serde_json::json;

    fn session() -> (Arc<Session>, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let session = Session::with_default_handlers(
            ClientConfig::direct("ws://127.0.0.1:1/api/hub"),
            notifier.clone(),
        );
        (session, notifier)
    }

    fn frame(target: &str, arguments: Vec<Value>) -> String {
        HubMessage::new(target, arguments).to_json().unwrap()
    }

    #[test]
    fn test_new_session_is_disconnected() {
        let (session, _) = session();
        assert_eq!(session.state(), SessionState::Disconnected);
        assert!(session.endpoint().is_none());
        assert!(!session.post_callback().is_bound());
    }

    #[test]
    fn test_post_change_without_callback_is_silent() {
        let (session, notifier) = session();

        let handled = session
            .dispatch(&frame(POST_CHANGE, vec![json!({"message": "hi"})]))
            .unwrap();

        assert!(handled);
        assert!(notifier.messages().is_empty());
    }

    #[test]
    fn test_post_change_reaches_bound_callback() {
        let (session, _) = session();
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        session.post_callback().bind(move |payload| sink.lock().push(payload));

        session
            .dispatch(&frame(POST_CHANGE, vec![json!({"message": "hi"})]))
            .unwrap();
        session
            .dispatch(&frame(EVENT_CREATED, vec![json!({"data": {"message": "x"}})]))
            .unwrap();

        let received = received.lock();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0]["message"], "hi");
        assert_eq!(received[1]["data"]["message"], "x");
    }

    #[test]
    fn test_cleared_callback_is_silent_again() {
        let (session, _) = session();
        session.post_callback().bind(|_| panic!("callback must not run"));
        session.post_callback().clear();

        assert!(session.dispatch(&frame(POST_CHANGE, vec![json!(1)])).unwrap());
    }

    #[test]
    fn test_falsy_diagnostic_payload_is_not_shown() {
        let (session, notifier) = session();

        for payload in [json!(null), json!(""), json!(false), json!(0)] {
            session.dispatch(&frame(BROADCAST_MESSAGE, vec![payload.clone()])).unwrap();
            session.dispatch(&frame(ECHO, vec![payload])).unwrap();
        }
        session.dispatch(&frame(ECHO, vec![])).unwrap();

        assert!(notifier.messages().is_empty());
    }

    #[test]
    fn test_diagnostic_payload_is_shown() {
        let (session, notifier) = session();

        session.dispatch(&frame(BROADCAST_MESSAGE, vec![json!("hello")])).unwrap();
        session.dispatch(&frame(ECHO, vec![json!({"a": 1})])).unwrap();

        assert_eq!(
            notifier.messages(),
            vec![
                "message received:hello".to_string(),
                r#"message received:{"a":1}"#.to_string()
            ]
        );
    }

    #[test]
    fn test_unknown_target_is_dropped() {
        let (session, notifier) = session();
        assert!(!session.dispatch(&frame("somethingElse", vec![json!("x")])).unwrap());
        assert!(notifier.messages().is_empty());
    }

    #[test]
    fn test_custom_handler_and_off() {
        let (session, _) = session();
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        session.on("custom", move |_: &Session, payload: Option<&Value>| {
            *sink.lock() = payload.cloned();
        });

        assert!(session.dispatch(&frame("custom", vec![json!(7)])).unwrap());
        assert_eq!(*seen.lock(), Some(json!(7)));

        assert!(session.off("custom"));
        assert!(!session.dispatch(&frame("custom", vec![json!(8)])).unwrap());
    }

    #[test]
    fn test_malformed_frame_is_an_error() {
        let (session, _) = session();
        assert!(matches!(session.dispatch("{not json"), Err(ClientError::Json(_))));
    }

    #[test]
    fn test_invoke_requires_connection() {
        let (session, _) = session();
        assert!(matches!(
            session.invoke(BROADCAST_MESSAGE, json!("hi")),
            Err(ClientError::NotConnected)
        ));
    }

    #[test]
    fn test_invoke_queues_frame_when_connected() {
        let (session, _) = session();
        let (tx, mut rx) = mpsc::unbounded_channel();
        *session.outbound.lock() = Some(tx);

        session.invoke(ECHO, json!("ping")).unwrap();

        let sent = HubMessage::from_json(&rx.try_recv().unwrap()).unwrap();
        assert_eq!(sent, HubMessage::new(ECHO, vec![json!("ping")]));
    }
}
