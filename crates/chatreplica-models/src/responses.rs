use serde::Deserialize;

/// Error code the upstream uses when the account is out of quota
pub const INSUFFICIENT_QUOTA_CODE: &str = "insufficient_quota";

/// Token usage information from API response
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

/// Chat API response structure
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatResponse {
    /// `choices[0].message.content`, if the upstream sent one
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

/// Choice structure within chat response
#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
    #[serde(default)]
    pub index: Option<i32>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Message inside a choice; content may be null for tool-only replies
#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

// ============================================================================
// Error Payloads
// ============================================================================

/// Body returned alongside a non-success status
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl ApiErrorBody {
    pub fn is_insufficient_quota(&self) -> bool {
        self.error
            .as_ref()
            .and_then(|detail| detail.code.as_deref())
            == Some(INSUFFICIENT_QUOTA_CODE)
    }
}
