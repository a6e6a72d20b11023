use chatreplica_types::env::parse_var;
use chatreplica_types::{
    ConfigError, DEFAULT_CACHE_BYTE_LIMIT, DEFAULT_CACHE_COUNT_LIMIT, DEFAULT_CONVERSATION_MAX_LENGTH,
};

/// Bounds for one chat session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatConfig {
    pub cache_count_limit: usize,
    /// Summed byte length of cached responses
    pub cache_byte_limit: usize,
    pub conversation_max_length: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            cache_count_limit: DEFAULT_CACHE_COUNT_LIMIT,
            cache_byte_limit: DEFAULT_CACHE_BYTE_LIMIT,
            conversation_max_length: DEFAULT_CONVERSATION_MAX_LENGTH,
        }
    }
}

impl ChatConfig {
    /// Read `CACHE_COUNT_LIMIT`, `CACHE_BYTE_LIMIT` and `CONVERSATION_MAX_LENGTH`
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            cache_count_limit: parse_var("CACHE_COUNT_LIMIT", DEFAULT_CACHE_COUNT_LIMIT)?,
            cache_byte_limit: parse_var("CACHE_BYTE_LIMIT", DEFAULT_CACHE_BYTE_LIMIT)?,
            conversation_max_length: parse_var("CONVERSATION_MAX_LENGTH", DEFAULT_CONVERSATION_MAX_LENGTH)?,
        })
    }
}
