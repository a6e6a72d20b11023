use std::time::Duration;
use thiserror::Error;

use crate::QUOTA_EXCEEDED_MESSAGE;

/// Everything that can go wrong while exchanging one message.
///
/// The engine never lets these escape as panics: each one is published to
/// subscribers and handed back to the caller of `send`. The type is `Clone`
/// because a single dispatch outcome may be shared between coalesced callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    #[error("message is empty")]
    EmptyInput,

    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("{0}")]
    QuotaExceeded(String),

    #[error("upstream returned status {status}: {body}")]
    UpstreamError { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("request was cancelled")]
    Cancelled,

    #[error("network error: {0}")]
    Transport(String),
}

impl ExchangeError {
    pub fn quota_exceeded() -> Self {
        ExchangeError::QuotaExceeded(QUOTA_EXCEEDED_MESSAGE.to_string())
    }

    /// HTTP status a route handler should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            ExchangeError::EmptyInput => 400,
            ExchangeError::QuotaExceeded(_) => 429,
            ExchangeError::Timeout(_) => 504,
            ExchangeError::Cancelled => 503,
            ExchangeError::UpstreamError { .. }
            | ExchangeError::MalformedResponse(_)
            | ExchangeError::Transport(_) => 502,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ExchangeError::Cancelled)
    }
}

/// Errors raised while reading configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name} must be a non-negative integer, got {value:?}")]
    InvalidNumber { name: String, value: String },
}
