//! Core types and structures for chatreplica
//!
//! This crate provides the foundational types used across all chatreplica crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod env;
pub mod error;

pub use error::{ConfigError, ExchangeError};

// ============================================================================
// Constants
// ============================================================================

/// Maximum number of cached responses
pub const DEFAULT_CACHE_COUNT_LIMIT: usize = 50;

/// Maximum total size of cached responses, in bytes (10 MiB)
pub const DEFAULT_CACHE_BYTE_LIMIT: usize = 10 * 1024 * 1024;

/// Maximum number of messages kept in a conversation
pub const DEFAULT_CONVERSATION_MAX_LENGTH: usize = 100;

/// Ceiling for a single outbound completion request
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;

/// Model name sent with every completion request
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Shown to the user when the upstream account has run out of quota
pub const QUOTA_EXCEEDED_MESSAGE: &str =
    "You have exceeded your quota for the OpenAI API. Please check your plan and billing details.";

// ============================================================================
// Message Types
// ============================================================================

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "User",
            Sender::Bot => "Bot",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single exchanged message. Fields are read-only once the message exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    sender: Sender,
    content: String,
    timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(sender: Sender, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            sender,
            content: content.into(),
            timestamp,
        }
    }

    /// Message typed by the user, stamped now
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Sender::User, content, Utc::now())
    }

    /// Reply from the completion endpoint (or the cache), stamped now
    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(Sender::Bot, content, Utc::now())
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.sender, self.content)
    }
}
