use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

/// Topic used when a node is selected in the designer. Payload: `{ "id": ... }`.
pub const SELECTION_TOPIC: &str = "widget.selected";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub topic: String,
    pub message: String,
    #[serde(default)]
    pub payload: Value,
}

impl Message {
    pub fn new(topic: impl Into<String>, message: impl Into<String>, payload: Value) -> Self {
        Self {
            topic: topic.into(),
            message: message.into(),
            payload,
        }
    }
}

pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;
pub type Handler = Box<dyn FnMut(&Message) -> Result<(), HandlerError>>;

/// Returned by [`MessageBus::subscribe`]; pass back to unsubscribe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscription {
    topic: String,
    id: u64,
}

impl Subscription {
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

/// Topic-keyed publish/subscribe. Handlers run synchronously in subscription
/// order; a failing handler is logged and does not stop the others.
#[derive(Default)]
pub struct MessageBus {
    handlers: HashMap<String, Vec<(u64, Handler)>>,
    next_id: u64,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, topic: impl Into<String>, handler: F) -> Subscription
    where
        F: FnMut(&Message) -> Result<(), HandlerError> + 'static,
    {
        let topic = topic.into();
        let id = self.next_id;
        self.next_id += 1;
        self.handlers
            .entry(topic.clone())
            .or_default()
            .push((id, Box::new(handler)));
        Subscription { topic, id }
    }

    /// Returns false if the subscription was already removed
    pub fn unsubscribe(&mut self, subscription: &Subscription) -> bool {
        let Some(handlers) = self.handlers.get_mut(&subscription.topic) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|(id, _)| *id != subscription.id);
        before != handlers.len()
    }

    /// Deliver to every handler of the topic; returns how many succeeded
    pub fn publish(&mut self, message: &Message) -> usize {
        let Some(handlers) = self.handlers.get_mut(&message.topic) else {
            return 0;
        };
        let mut delivered = 0;
        for (_, handler) in handlers.iter_mut() {
            match handler(message) {
                Ok(()) => delivered += 1,
                Err(e) => warn!(topic = %message.topic, kind = %message.message, error = %e, "message handler failed"),
            }
        }
        delivered
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.handlers.get(topic).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for MessageBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let topics: Vec<(&String, usize)> = self.handlers.iter().map(|(t, h)| (t, h.len())).collect();
        f.debug_struct("MessageBus").field("topics", &topics).finish()
    }
}
