use serde::Serialize;

use super::types::WireMessage;

/// Chat API request structure
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
}

impl ChatRequest {
    /// Single-turn request carrying only the user's message
    pub fn single_turn(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![WireMessage::user(content)],
        }
    }
}
