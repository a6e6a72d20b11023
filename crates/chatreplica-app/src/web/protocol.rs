use serde::{Deserialize, Serialize};

use chatreplica_types::Message;

/// Body of `POST /api/chat/send`. A missing `message` is treated as empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendResponse {
    pub response: String,
}

/// Stored message lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiveResponse {
    pub messages: Vec<String>,
}

/// The engine's conversation log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub messages: Vec<Message>,
}
