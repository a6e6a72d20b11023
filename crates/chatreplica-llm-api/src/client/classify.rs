use reqwest::StatusCode;

use chatreplica_logging::safe_truncate;
use chatreplica_models::{ApiErrorBody, ChatResponse};
use chatreplica_types::ExchangeError;

/// Longest upstream body excerpt carried in an `UpstreamError`
pub const MAX_ERROR_EXCERPT_CHARS: usize = 500;

/// Turn a completed HTTP exchange into completion text or a typed error
pub fn classify_response(status: StatusCode, body: &str) -> Result<String, ExchangeError> {
    if !status.is_success() {
        // Error bodies are not always JSON; only a parsed quota code is special
        if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
            if payload.is_insufficient_quota() {
                return Err(ExchangeError::quota_exceeded());
            }
        }
        return Err(ExchangeError::UpstreamError {
            status: status.as_u16(),
            body: safe_truncate(body, MAX_ERROR_EXCERPT_CHARS),
        });
    }

    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ExchangeError::MalformedResponse(format!("invalid completion payload: {}", e)))?;

    parsed
        .first_content()
        .map(str::to_owned)
        .ok_or_else(|| ExchangeError::MalformedResponse("no choices[0].message.content in response".to_string()))
}
