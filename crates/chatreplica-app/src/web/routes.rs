use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use log::{error, info};
use std::sync::Arc;

use chatreplica_chat::ChatExchangeEngine;
use chatreplica_types::ExchangeError;

use crate::store::MessageStore;
use crate::web::protocol::{HistoryResponse, ReceiveResponse, SendRequest, SendResponse};

/// Application state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub engine: ChatExchangeEngine,
    pub store: Arc<MessageStore>,
}

/// Create router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat/send", post(send_message))
        .route("/api/chat/receive", get(receive_messages))
        .route("/api/chat/history", get(history))
        .with_state(state)
}

/// POST /api/chat/send - Exchange one message
async fn send_message(
    State(state): State<AppState>,
    Json(payload): Json<SendRequest>,
) -> Result<Json<SendResponse>, AppError> {
    info!("Received message to send ({} chars)", payload.message.chars().count());

    let reply = state.engine.send(&payload.message).await?;
    state.store.append(&payload.message).await.map_err(AppError::Store)?;

    Ok(Json(SendResponse {
        response: reply.content().to_string(),
    }))
}

/// GET /api/chat/receive - List stored messages
async fn receive_messages(State(state): State<AppState>) -> Result<Json<ReceiveResponse>, AppError> {
    let messages = state.store.load().await.map_err(AppError::Internal)?;
    Ok(Json(ReceiveResponse { messages }))
}

/// GET /api/chat/history - Conversation log of the engine
async fn history(State(state): State<AppState>) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        messages: state.engine.messages().await,
    })
}

/// Error type for HTTP handlers
pub enum AppError {
    Exchange(ExchangeError),
    /// Reported to the client as a fixed save failure
    Store(anyhow::Error),
    /// Reported to the client as a bare 500
    Internal(anyhow::Error),
}

impl From<ExchangeError> for AppError {
    fn from(err: ExchangeError) -> Self {
        AppError::Exchange(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Exchange(err) => (
                StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                err.to_string(),
            ),
            AppError::Store(err) => {
                error!("Storing sent message failed: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to save message".to_string())
            }
            AppError::Internal(err) => {
                error!("Loading stored messages failed: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        let body = Json(serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
