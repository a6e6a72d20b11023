// Logging module - request/response debug output
pub mod request_logger;

// Re-export request logging functions
pub use request_logger::{log_request, log_response};

/// Safely truncate a string to a maximum number of characters
pub fn safe_truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        // Reserve space for "..." suffix
        let trunc_chars = max_chars.saturating_sub(3);
        format!("{}...", s.chars().take(trunc_chars).collect::<String>())
    }
}

/// Show only the first few characters of a bearer credential
pub fn mask_credential(credential: &str) -> String {
    format!("{}***", credential.chars().take(10).collect::<String>())
}
