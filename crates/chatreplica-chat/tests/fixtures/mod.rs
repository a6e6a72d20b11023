#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::*;
use wiremock::{Mock, MockServer, ResponseTemplate};

use chatreplica_chat::{ChatConfig, ChatEvent, ChatExchangeEngine, Subscription};
use chatreplica_llm_api::{CompletionDispatcher, DispatcherConfig, RequestDispatcher};
use chatreplica_types::ExchangeError;

pub const TEST_API_KEY: &str = "test-api-key";
pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// In-memory dispatcher with canned outcomes per message.
///
/// Messages registered with `hold` block inside `issue` until released or
/// cancelled, which lets tests control completion order.
#[derive(Default)]
pub struct ScriptedDispatcher {
    outcomes: Mutex<HashMap<String, Result<String, ExchangeError>>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    pending: Mutex<HashMap<String, CancellationToken>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedDispatcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, message: &str, content: &str) {
        self.outcomes
            .lock()
            .unwrap()
            .insert(message.to_string(), Ok(content.to_string()));
    }

    pub fn fail(&self, message: &str, error: ExchangeError) {
        self.outcomes.lock().unwrap().insert(message.to_string(), Err(error));
    }

    /// Make `issue(message)` wait; notify the returned gate to let it finish
    pub fn hold(&self, message: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(message.to_string(), gate.clone());
        gate
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// (message, credential) for every `issue` so far
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn is_waiting(&self, message: &str) -> bool {
        self.pending.lock().unwrap().contains_key(message)
    }

    pub async fn wait_until_waiting(&self, message: &str) {
        for _ in 0..200 {
            if self.is_waiting(message) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("dispatch for {:?} never started", message);
    }
}

#[async_trait]
impl CompletionDispatcher for ScriptedDispatcher {
    async fn issue(&self, message: &str, credential: &str) -> Result<String, ExchangeError> {
        self.calls
            .lock()
            .unwrap()
            .push((message.to_string(), credential.to_string()));

        let token = CancellationToken::new();
        self.pending.lock().unwrap().insert(message.to_string(), token.clone());
        let gate = self.gates.lock().unwrap().get(message).cloned();

        if let Some(gate) = gate {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = gate.notified() => {}
            }
        }
        self.pending.lock().unwrap().remove(message);

        if token.is_cancelled() {
            return Err(ExchangeError::Cancelled);
        }
        self.outcomes
            .lock()
            .unwrap()
            .get(message)
            .cloned()
            .unwrap_or_else(|| {
                Err(ExchangeError::UpstreamError {
                    status: 404,
                    body: "no scripted reply".to_string(),
                })
            })
    }

    fn cancel(&self, message: &str) -> bool {
        match self.pending.lock().unwrap().get(message) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }
}

pub fn scripted_engine(config: ChatConfig) -> (ChatExchangeEngine, Arc<ScriptedDispatcher>) {
    let dispatcher = ScriptedDispatcher::new();
    let engine = ChatExchangeEngine::new(config, dispatcher.clone(), TEST_API_KEY);
    (engine, dispatcher)
}

/// Everything already queued on `subscription`
pub fn drain(subscription: &mut Subscription) -> Vec<ChatEvent> {
    std::iter::from_fn(|| subscription.try_recv()).collect()
}

/// Mock completion endpoint backing a real `RequestDispatcher`
pub struct CompletionMockServer {
    server: MockServer,
}

impl CompletionMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Engine wired to a dispatcher that talks to this server
    pub fn engine(&self, config: ChatConfig, timeout: Duration) -> (ChatExchangeEngine, Arc<RequestDispatcher>) {
        let dispatcher = Arc::new(RequestDispatcher::new(
            DispatcherConfig::new(&self.server.uri()).with_timeout(timeout),
        ));
        let engine = ChatExchangeEngine::new(config, dispatcher.clone(), TEST_API_KEY);
        (engine, dispatcher)
    }

    pub async fn received_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }

    pub async fn mock_completion(&self, request_content: &str, response_content: &str, delay: Duration) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .and(header("authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
            .and(body_partial_json(json!({
                "messages": [{ "role": "user", "content": request_content }]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_body(response_content))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn mock_quota_exceeded(&self) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {
                    "message": "You exceeded your current quota, please check your plan and billing details.",
                    "type": "insufficient_quota",
                    "param": null,
                    "code": "insufficient_quota"
                }
            })))
            .mount(&self.server)
            .await;
    }
}

pub fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl_test123",
        "object": "chat.completion",
        "created": 1700000000,
        "model": "gpt-3.5-turbo",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}
