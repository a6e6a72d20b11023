use async_trait::async_trait;

use chatreplica_types::ExchangeError;

pub mod classify;
pub mod dispatcher;

pub use classify::classify_response;
pub use dispatcher::RequestDispatcher;

/// Dispatcher trait - the engine's only route to the network
#[async_trait]
pub trait CompletionDispatcher: Send + Sync {
    /// Send `message` upstream with `credential` as the bearer token and
    /// resolve to the extracted completion text
    async fn issue(&self, message: &str, credential: &str) -> Result<String, ExchangeError>;

    /// Abort the in-flight request for `message`, if any.
    /// Returns false when nothing was pending for that content.
    fn cancel(&self, message: &str) -> bool;
}
