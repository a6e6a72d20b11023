//! Change notifications published by the exchange engine.
//!
//! Every subscriber gets its own unbounded channel, so a slow reader never
//! blocks the engine or other readers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use log::debug;
use tokio::sync::mpsc;
use uuid::Uuid;

use chatreplica_types::{ExchangeError, Message};

/// Lifecycle of one exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    Idle,
    Dispatching,
    Resolved,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    /// A user message was appended to the log
    UserMessage(Message),
    /// No cached reply; the completion request is in flight
    Dispatching { content: String },
    /// A bot reply was appended to the log
    Resolved { message: Message, cached: bool },
    Failed { content: String, error: ExchangeError },
    Cancelled { content: String },
}

impl ChatEvent {
    /// State the exchange is in after this event
    pub fn state(&self) -> ExchangeState {
        match self {
            ChatEvent::UserMessage(_) => ExchangeState::Idle,
            ChatEvent::Dispatching { .. } => ExchangeState::Dispatching,
            ChatEvent::Resolved { .. } => ExchangeState::Resolved,
            ChatEvent::Failed { .. } => ExchangeState::Failed,
            ChatEvent::Cancelled { .. } => ExchangeState::Cancelled,
        }
    }
}

type Subscribers = Mutex<HashMap<Uuid, mpsc::UnboundedSender<ChatEvent>>>;

fn lock(subscribers: &Subscribers) -> MutexGuard<'_, HashMap<Uuid, mpsc::UnboundedSender<ChatEvent>>> {
    subscribers.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fan-out of [`ChatEvent`]s to any number of subscribers
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Arc<Subscribers>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Subscription {
        let id = Uuid::new_v4();
        let (sender, receiver) = mpsc::unbounded_channel();
        lock(&self.subscribers).insert(id, sender);
        debug!("Subscriber {} registered", id);

        Subscription {
            id,
            receiver,
            subscribers: Arc::downgrade(&self.subscribers),
        }
    }

    /// Deliver `event` to every live subscriber; returns how many received it
    pub fn publish(&self, event: ChatEvent) -> usize {
        let mut subscribers = lock(&self.subscribers);
        subscribers.retain(|_, sender| sender.send(event.clone()).is_ok());
        subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).len()
    }
}

/// Receiving end of a subscription. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    id: Uuid,
    receiver: mpsc::UnboundedReceiver<ChatEvent>,
    subscribers: Weak<Subscribers>,
}

impl Subscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Next event; `None` once the engine is gone
    pub async fn recv(&mut self) -> Option<ChatEvent> {
        self.receiver.recv().await
    }

    /// Next event if one is already queued
    pub fn try_recv(&mut self) -> Option<ChatEvent> {
        self.receiver.try_recv().ok()
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            lock(&subscribers).remove(&self.id);
            debug!("Subscriber {} removed", self.id);
        }
    }
}
