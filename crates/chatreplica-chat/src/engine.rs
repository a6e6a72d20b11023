use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use chatreplica_llm_api::CompletionDispatcher;
use chatreplica_types::{ExchangeError, Message};

use crate::cache::{CacheStats, ResponseCache};
use crate::config::ChatConfig;
use crate::events::{ChatEvent, EventBus, Subscription};
use crate::history::ConversationLog;

/// Cache and transcript, mutated together under one lock
struct Session {
    cache: ResponseCache,
    log: ConversationLog,
}

struct EngineInner {
    dispatcher: Arc<dyn CompletionDispatcher>,
    credential: String,
    session: Mutex<Session>,
    events: EventBus,
}

/// One chat session: takes user text, answers it from the cache or the
/// completion endpoint, and records both sides in the conversation log.
///
/// The handle is cheap to clone; clones share the same session.
///
/// Replies are appended in completion order. Two sends in flight at once may
/// therefore see their bot messages land in the opposite order of the user
/// messages. Identical texts in flight at once share a single upstream call
/// (when the dispatcher coalesces, as [`RequestDispatcher`] does) but each
/// send still gets its own user and bot entries.
///
/// Events are published while the session lock is held, so subscribers see
/// them in the same order as the log.
///
/// [`RequestDispatcher`]: chatreplica_llm_api::RequestDispatcher
#[derive(Clone)]
pub struct ChatExchangeEngine {
    inner: Arc<EngineInner>,
}

impl std::fmt::Debug for ChatExchangeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatExchangeEngine")
            .field("subscribers", &self.inner.events.subscriber_count())
            .finish_non_exhaustive()
    }
}

impl ChatExchangeEngine {
    pub fn new(
        config: ChatConfig,
        dispatcher: Arc<dyn CompletionDispatcher>,
        credential: impl Into<String>,
    ) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                dispatcher,
                credential: credential.into(),
                session: Mutex::new(Session {
                    cache: ResponseCache::from_config(&config),
                    log: ConversationLog::new(config.conversation_max_length),
                }),
                events: EventBus::new(),
            }),
        }
    }

    pub fn subscribe(&self) -> Subscription {
        self.inner.events.subscribe()
    }

    /// Exchange one message and return the bot reply.
    ///
    /// Empty text is rejected without touching the log. Otherwise the user
    /// message is logged first and stays logged whatever happens next.
    pub async fn send(&self, text: &str) -> Result<Message, ExchangeError> {
        if text.is_empty() {
            debug!("Ignoring empty message");
            return Err(ExchangeError::EmptyInput);
        }

        {
            let mut session = self.inner.session.lock().await;
            let user = Message::user(text);
            session.log.append(user.clone());
            self.inner.events.publish(ChatEvent::UserMessage(user));

            if let Some(cached) = session.cache.lookup(text).map(str::to_owned) {
                debug!("Answering from cache ({} bytes)", cached.len());
                let reply = Message::bot(cached);
                session.log.append(reply.clone());
                self.inner.events.publish(ChatEvent::Resolved {
                    message: reply.clone(),
                    cached: true,
                });
                return Ok(reply);
            }

            self.inner.events.publish(ChatEvent::Dispatching {
                content: text.to_string(),
            });
        }

        let outcome = self.inner.dispatcher.issue(text, &self.inner.credential).await;

        let mut session = self.inner.session.lock().await;
        match outcome {
            Ok(content) => {
                session.cache.store(text, content.clone());
                let reply = Message::bot(content);
                session.log.append(reply.clone());
                self.inner.events.publish(ChatEvent::Resolved {
                    message: reply.clone(),
                    cached: false,
                });
                Ok(reply)
            }
            Err(error) => {
                let event = if error.is_cancelled() {
                    info!("Exchange cancelled");
                    ChatEvent::Cancelled {
                        content: text.to_string(),
                    }
                } else {
                    warn!("Exchange failed: {}", error);
                    ChatEvent::Failed {
                        content: text.to_string(),
                        error: error.clone(),
                    }
                };
                self.inner.events.publish(event);
                Err(error)
            }
        }
    }

    /// Spawn [`send`](Self::send) on the current runtime and return at once
    pub fn submit(&self, text: impl Into<String>) -> JoinHandle<Result<Message, ExchangeError>> {
        let engine = self.clone();
        let text = text.into();
        tokio::spawn(async move { engine.send(&text).await })
    }

    /// Abort the pending dispatch for `text`; false if none was in flight
    pub fn cancel(&self, text: &str) -> bool {
        self.inner.dispatcher.cancel(text)
    }

    /// Conversation log, oldest first
    pub async fn messages(&self) -> Vec<Message> {
        self.inner.session.lock().await.log.snapshot()
    }

    pub async fn cached_response(&self, text: &str) -> Option<String> {
        self.inner.session.lock().await.cache.lookup(text).map(str::to_owned)
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.inner.session.lock().await.cache.stats()
    }
}
