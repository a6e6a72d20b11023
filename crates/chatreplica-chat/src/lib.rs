//! Chat exchange engine for chatreplica
//!
//! Serves repeated messages from a bounded response cache, dispatches the
//! rest through an injected `CompletionDispatcher`, keeps a bounded
//! conversation log and pushes every state change to subscribers.

pub mod cache;
pub mod config;
pub mod engine;
pub mod events;
pub mod history;

pub use cache::{CacheStats, ResponseCache};
pub use config::ChatConfig;
pub use engine::ChatExchangeEngine;
pub use events::{ChatEvent, EventBus, ExchangeState, Subscription};
pub use history::ConversationLog;
