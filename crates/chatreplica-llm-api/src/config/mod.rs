use std::time::Duration;

use chatreplica_types::env::{first_var, parse_var};
use chatreplica_types::{ConfigError, DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT_MS};

/// Default OpenAI API URL
pub const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Environment variables searched for the bearer credential, in order
pub const CREDENTIAL_ENV_VARS: &[&str] = &["API_KEY", "OPENAI_API_KEY", "CHATGPT_API_KEY"];

/// Settings for the outbound completion call. The credential is not part of
/// it: callers pass it through on every `issue`.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatcherConfig {
    pub api_url: String,
    pub model: String,
    pub timeout: Duration,
    /// Dump requests and responses to the console
    pub verbose: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            api_url: OPENAI_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            verbose: false,
        }
    }
}

impl DispatcherConfig {
    /// Defaults pointed at `api_url` (normalized to the completions path)
    pub fn new(api_url: &str) -> Self {
        Self {
            api_url: normalize_api_url(api_url),
            ..Self::default()
        }
    }

    /// Read `BASE_URL`, `MODEL` and `REQUEST_TIMEOUT_MS`
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = first_var(&["BASE_URL"])
            .map(|url| normalize_api_url(&url))
            .unwrap_or_else(|| OPENAI_API_URL.to_string());
        let model = first_var(&["MODEL"]).unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let timeout_ms = parse_var("REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT_MS)?;

        Ok(Self {
            api_url,
            model,
            timeout: Duration::from_millis(timeout_ms),
            verbose: false,
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Bearer credential from the environment, if any is set
pub fn credential_from_env() -> Option<String> {
    first_var(CREDENTIAL_ENV_VARS)
}

/// Normalize API URL by ensuring it has the correct path for OpenAI-compatible endpoints
pub fn normalize_api_url(url: &str) -> String {
    // If URL already contains a path with "completions", use it as-is
    if url.contains("/completions") || url.contains("/chat") {
        return url.to_string();
    }

    // If URL ends with a slash, append path without leading slash
    if url.ends_with('/') {
        format!("{}v1/chat/completions", url)
    } else {
        // Append the standard OpenAI-compatible path
        format!("{}/v1/chat/completions", url)
    }
}
