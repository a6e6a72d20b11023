#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use tempfile::TempDir;
use tower::ServiceExt;

use chatreplica::chat::{ChatConfig, ChatExchangeEngine};
use chatreplica::llm_api::CompletionDispatcher;
use chatreplica::types::ExchangeError;
use chatreplica::web::{create_router, AppState};
use chatreplica::MessageStore;

/// Dispatcher answering from a fixed table of outcomes
#[derive(Default)]
pub struct CannedDispatcher {
    outcomes: Mutex<HashMap<String, Result<String, ExchangeError>>>,
}

impl CannedDispatcher {
    pub fn reply(self, message: &str, content: &str) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .insert(message.to_string(), Ok(content.to_string()));
        self
    }

    pub fn fail(self, message: &str, error: ExchangeError) -> Self {
        self.outcomes.lock().unwrap().insert(message.to_string(), Err(error));
        self
    }
}

#[async_trait]
impl CompletionDispatcher for CannedDispatcher {
    async fn issue(&self, message: &str, _credential: &str) -> Result<String, ExchangeError> {
        self.outcomes
            .lock()
            .unwrap()
            .get(message)
            .cloned()
            .unwrap_or_else(|| Err(ExchangeError::MalformedResponse("no canned reply".to_string())))
    }

    fn cancel(&self, _message: &str) -> bool {
        false
    }
}

/// Router over a canned engine and a store in a temporary directory
pub struct TestApp {
    pub state: AppState,
    pub dir: TempDir,
}

impl TestApp {
    pub fn new(dispatcher: CannedDispatcher) -> Self {
        let dir = TempDir::new().unwrap();
        Self::with_store(dispatcher, MessageStore::new(dir.path().join("messages.txt")), dir)
    }

    pub fn with_store(dispatcher: CannedDispatcher, store: MessageStore, dir: TempDir) -> Self {
        let engine = ChatExchangeEngine::new(ChatConfig::default(), Arc::new(dispatcher), "test-api-key");
        Self {
            state: AppState {
                engine,
                store: Arc::new(store),
            },
            dir,
        }
    }

    pub async fn request(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = create_router(self.state.clone()).oneshot(request).await.unwrap();
        read_json(response).await
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.request(request).await
    }
}

pub async fn read_json(response: Response<Body>) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}
