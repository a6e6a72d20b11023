#![allow(dead_code)]

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::*;
use wiremock::{Mock, MockServer, ResponseTemplate};

use chatreplica_llm_api::{normalize_api_url, DispatcherConfig, RequestDispatcher};

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_MODEL: &str = "gpt-3.5-turbo";
pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Mock server utilities for testing the completion dispatcher
pub struct CompletionMockServer {
    server: MockServer,
}

impl CompletionMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn api_url(&self) -> String {
        normalize_api_url(&self.server.uri())
    }

    /// Dispatcher pointed at this server with the given timeout
    pub fn dispatcher(&self, timeout: Duration) -> RequestDispatcher {
        RequestDispatcher::new(DispatcherConfig::new(&self.uri()).with_timeout(timeout))
    }

    pub async fn received_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }

    /// Successful completion for exactly `request_content`, expected `times` times
    pub async fn mock_success(&self, request_content: &str, response_content: &str, times: u64) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .and(header("authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "model": TEST_MODEL,
                "messages": [{
                    "role": "user",
                    "content": request_content
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(response_content)))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Successful completion that arrives after `delay`
    pub async fn mock_slow_success(&self, response_content: &str, delay: Duration) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_body(response_content))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    /// Upstream reports an exhausted quota
    pub async fn mock_quota_exceeded(&self) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(ResponseTemplate::new(429).set_body_json(test_data::quota_error()))
            .mount(&self.server)
            .await;
    }

    /// Upstream rejects the credential
    pub async fn mock_authentication_error(&self) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_json(test_data::authentication_error()))
            .mount(&self.server)
            .await;
    }

    /// Mock server error
    pub async fn mock_server_error(&self) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": "Internal server error"
            })))
            .mount(&self.server)
            .await;
    }

    /// Success status with an arbitrary raw body
    pub async fn mock_raw_success(&self, body: &str) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&self.server)
            .await;
    }
}

pub fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl_test123",
        "object": "chat.completion",
        "created": 1700000000,
        "model": TEST_MODEL,
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": content
            },
            "finish_reason": "stop"
        }],
        "usage": {
            "prompt_tokens": 10,
            "completion_tokens": 20,
            "total_tokens": 30
        }
    })
}

/// Test data generators for completion API testing
pub mod test_data {
    use serde_json::json;

    pub fn quota_error() -> serde_json::Value {
        json!({
            "error": {
                "message": "You exceeded your current quota, please check your plan and billing details.",
                "type": "insufficient_quota",
                "param": null,
                "code": "insufficient_quota"
            }
        })
    }

    pub fn authentication_error() -> serde_json::Value {
        json!({
            "error": {
                "message": "Incorrect API key provided",
                "type": "invalid_request_error",
                "param": null,
                "code": "invalid_api_key"
            }
        })
    }
}
