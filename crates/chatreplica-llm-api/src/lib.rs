//! # chatreplica-llm-api
//!
//! Outbound side of a chat exchange: one POST to an OpenAI-compatible
//! chat-completions endpoint per cache miss.
//!
//! ## Features
//!
//! - **Single dispatch seam**: the `CompletionDispatcher` trait, injected into the engine
//! - **Deadline enforcement**: every request is aborted once its timeout elapses
//! - **Cancellation**: an in-flight request can be aborted by message content
//! - **Coalescing**: identical messages in flight share one network call
//! - **Classification**: quota exhaustion, upstream failures and malformed payloads
//!   are mapped onto `ExchangeError`
//!
//! ## Example
//!
//! ```rust,no_run
//! use chatreplica_llm_api::{CompletionDispatcher, DispatcherConfig, RequestDispatcher};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let dispatcher = RequestDispatcher::new(DispatcherConfig::from_env()?);
//!
//!     let reply = dispatcher.issue("Hello!", "your-api-key").await?;
//!     println!("Response: {}", reply);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;


// Re-export commonly used types
pub use client::{
    CompletionDispatcher,
    RequestDispatcher,
    classify_response,
};

pub use config::{
    DispatcherConfig,
    OPENAI_API_URL,
    credential_from_env,
    normalize_api_url,
};
