use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use log::{debug, info, warn};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use chatreplica_logging::{log_request, log_response};
use chatreplica_models::ChatRequest;
use chatreplica_types::ExchangeError;

use crate::client::{classify_response, CompletionDispatcher};
use crate::config::DispatcherConfig;

type SharedDispatch = Shared<BoxFuture<'static, Result<String, ExchangeError>>>;

/// In-flight call for one message content
struct PendingRequest {
    id: Uuid,
    cancel: CancellationToken,
    deadline: Instant,
    outcome: SharedDispatch,
    waiters: usize,
}

type PendingMap = Arc<Mutex<HashMap<String, PendingRequest>>>;

fn lock(pending: &Mutex<HashMap<String, PendingRequest>>) -> MutexGuard<'_, HashMap<String, PendingRequest>> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Chat-completions client that owns every in-flight request.
///
/// Identical messages issued while one is already in flight join the
/// existing call instead of opening a second connection; all joined callers
/// observe the same outcome, including cancellation.
pub struct RequestDispatcher {
    config: DispatcherConfig,
    client: reqwest::Client,
    pending: PendingMap,
}

impl std::fmt::Debug for RequestDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestDispatcher")
            .field("config", &self.config)
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

impl RequestDispatcher {
    pub fn new(config: DispatcherConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Use a preconfigured HTTP client (proxies, TLS roots, ...)
    pub fn with_client(config: DispatcherConfig, client: reqwest::Client) -> Self {
        Self {
            config,
            client,
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Number of distinct messages currently in flight
    pub fn in_flight(&self) -> usize {
        lock(&self.pending).len()
    }

    pub fn is_pending(&self, message: &str) -> bool {
        lock(&self.pending).contains_key(message)
    }

    /// Deadline of the in-flight request for `message`
    pub fn deadline(&self, message: &str) -> Option<Instant> {
        lock(&self.pending).get(message).map(|request| request.deadline)
    }

    /// Join the pending request for `message` or start a new one
    fn join_or_start(&self, message: &str, credential: &str) -> (Uuid, CancellationToken, SharedDispatch) {
        let mut pending = lock(&self.pending);

        // A cancelled request is only waiting for its callers to let go
        if let Some(existing) = pending.get_mut(message).filter(|request| !request.cancel.is_cancelled()) {
            existing.waiters += 1;
            debug!("Joining in-flight request {} ({} waiters)", existing.id, existing.waiters);
            return (existing.id, existing.cancel.clone(), existing.outcome.clone());
        }

        let id = Uuid::new_v4();
        let cancel = CancellationToken::new();
        let deadline = Instant::now() + self.config.timeout;
        let request = ChatRequest::single_turn(self.config.model.clone(), message);

        let outcome = dispatch(
            self.client.clone(),
            self.config.clone(),
            request,
            credential.to_string(),
            cancel.clone(),
            deadline,
        )
        .boxed()
        .shared();

        info!("Dispatching request {} to {}", id, self.config.api_url);
        pending.insert(
            message.to_string(),
            PendingRequest {
                id,
                cancel: cancel.clone(),
                deadline,
                outcome: outcome.clone(),
                waiters: 1,
            },
        );

        (id, cancel, outcome)
    }
}

#[async_trait]
impl CompletionDispatcher for RequestDispatcher {
    async fn issue(&self, message: &str, credential: &str) -> Result<String, ExchangeError> {
        let (id, cancel, outcome) = self.join_or_start(message, credential);
        let mut waiter = Waiter {
            pending: self.pending.clone(),
            key: message.to_string(),
            id,
            cancel,
            released: false,
        };

        let result = outcome.await;

        // A cancel that lands before release wins even over a finished call
        if waiter.release() {
            return Err(ExchangeError::Cancelled);
        }
        result
    }

    fn cancel(&self, message: &str) -> bool {
        match lock(&self.pending).get(message) {
            Some(request) => {
                info!("Cancelling request {}", request.id);
                request.cancel.cancel();
                true
            }
            None => false,
        }
    }
}

/// One caller's claim on a pending request. Dropping it (for instance when
/// the awaiting task is aborted) gives the claim back.
struct Waiter {
    pending: PendingMap,
    key: String,
    id: Uuid,
    cancel: CancellationToken,
    released: bool,
}

impl Waiter {
    /// Give back this claim; returns whether the request was cancelled
    fn release(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.released = true;

        let mut pending = lock(&self.pending);
        let cancelled = self.cancel.is_cancelled();

        // The entry may already belong to a newer request for the same content
        if let Some(request) = pending.get_mut(&self.key).filter(|request| request.id == self.id) {
            request.waiters -= 1;
            if request.waiters == 0 {
                // Last waiter gone: make sure the connection is not kept alive
                request.cancel.cancel();
                pending.remove(&self.key);
            }
        }
        cancelled
    }
}

impl Drop for Waiter {
    fn drop(&mut self) {
        self.release();
    }
}

async fn dispatch(
    client: reqwest::Client,
    config: DispatcherConfig,
    request: ChatRequest,
    credential: String,
    cancel: CancellationToken,
    deadline: Instant,
) -> Result<String, ExchangeError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!("Request aborted by cancellation");
            Err(ExchangeError::Cancelled)
        }
        outcome = tokio::time::timeout_at(deadline, round_trip(&client, &config, &request, &credential)) => {
            match outcome {
                Ok(result) => result,
                Err(_) => {
                    warn!("Request timed out after {}ms", config.timeout.as_millis());
                    Err(ExchangeError::Timeout(config.timeout))
                }
            }
        }
    }
}

async fn round_trip(
    client: &reqwest::Client,
    config: &DispatcherConfig,
    request: &ChatRequest,
    credential: &str,
) -> Result<String, ExchangeError> {
    log_request(&config.api_url, request, credential, config.verbose);
    let started = std::time::Instant::now();

    let response = client
        .post(&config.api_url)
        .header("Authorization", format!("Bearer {}", credential))
        .header("Content-Type", "application/json")
        .json(request)
        .send()
        .await
        .map_err(transport_error)?;

    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;
    log_response(status, &body, started.elapsed(), config.verbose);

    let result = classify_response(status, &body);
    if let Err(e) = &result {
        warn!("Completion request failed: {}", e);
    }
    result
}

fn transport_error(err: reqwest::Error) -> ExchangeError {
    warn!("Transport failure: {}", err);
    ExchangeError::Transport(err.to_string())
}
