//! Real-time event publishing capability.
//!
//! The dispatcher publishes through this trait; the actual transport
//! (WebSocket/SSE layer) is an external collaborator that subscribes to the
//! broadcast implementation. Contexts without real-time push inject
//! [`NoopPublisher`] instead of checking for a transport at runtime.

use serde_json::Value;
use std::fmt;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Channel name for a specific user's live sessions.
pub fn user_channel(user_id: Uuid) -> String {
    format!("user_{user_id}")
}

/// Channel name for everyone holding a role.
pub fn role_channel(role: &str) -> String {
    format!("role_{role}")
}

/// A named event published to a channel.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedEvent {
    pub channel: String,
    pub event: String,
    pub payload: Value,
}

/// Failure to hand an event to the transport. Publishing is best-effort;
/// the dispatcher logs these and moves on.
#[derive(Debug)]
pub struct PublishError(pub String);

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "publish failed: {}", self.0)
    }
}

impl std::error::Error for PublishError {}

/// Abstract real-time publisher injected into the dispatcher at
/// construction time.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, channel: &str, event: &str, payload: Value) -> Result<(), PublishError>;
}

/// Publisher for contexts where real-time push is unavailable. Accepts and
/// discards every event.
pub struct NoopPublisher;

impl EventPublisher for NoopPublisher {
    fn publish(&self, _channel: &str, _event: &str, _payload: Value) -> Result<(), PublishError> {
        Ok(())
    }
}

/// Publisher backed by a tokio broadcast channel. The real-time transport
/// subscribes via [`BroadcastPublisher::subscribe`] and forwards events to
/// live sessions; with no subscriber connected the send fails and the
/// event is dropped.
pub struct BroadcastPublisher {
    tx: broadcast::Sender<PublishedEvent>,
}

impl BroadcastPublisher {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PublishedEvent> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastPublisher {
    fn default() -> Self {
        Self::new(256)
    }
}

impl EventPublisher for BroadcastPublisher {
    fn publish(&self, channel: &str, event: &str, payload: Value) -> Result<(), PublishError> {
        self.tx
            .send(PublishedEvent {
                channel: channel.to_string(),
                event: event.to_string(),
                payload,
            })
            .map(|_| ())
            .map_err(|_| PublishError("no live subscribers".into()))
    }
}
