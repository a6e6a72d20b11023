use clap::{Parser, Subcommand};
use std::path::PathBuf;

use chatreplica_types::{
    DEFAULT_CACHE_BYTE_LIMIT, DEFAULT_CACHE_COUNT_LIMIT, DEFAULT_CONVERSATION_MAX_LENGTH, DEFAULT_MODEL,
    DEFAULT_REQUEST_TIMEOUT_MS,
};

/// CLI arguments for chatreplica
#[derive(Parser, Debug)]
#[command(name = "chatreplica")]
#[command(about = "ChatReplica - cached chat exchanges against an OpenAI-compatible endpoint")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Bearer credential for the completion endpoint
    /// (falls back to OPENAI_API_KEY, then CHATGPT_API_KEY)
    #[arg(long, global = true, env = "API_KEY", hide_env_values = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Completion endpoint, e.g. http://localhost:8080
    #[arg(long, global = true, env = "BASE_URL", value_name = "URL")]
    pub base_url: Option<String>,

    #[arg(long, global = true, env = "MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Maximum number of cached responses
    #[arg(long, global = true, env = "CACHE_COUNT_LIMIT", default_value_t = DEFAULT_CACHE_COUNT_LIMIT)]
    pub cache_count_limit: usize,

    /// Maximum total size of cached responses, in bytes
    #[arg(long, global = true, env = "CACHE_BYTE_LIMIT", default_value_t = DEFAULT_CACHE_BYTE_LIMIT)]
    pub cache_byte_limit: usize,

    #[arg(long, global = true, env = "CONVERSATION_MAX_LENGTH", default_value_t = DEFAULT_CONVERSATION_MAX_LENGTH)]
    pub conversation_max_length: usize,

    #[arg(long, global = true, env = "REQUEST_TIMEOUT_MS", default_value_t = DEFAULT_REQUEST_TIMEOUT_MS)]
    pub request_timeout_ms: u64,

    /// Dump every request and response to the console
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,

        #[arg(long, env = "PORT", default_value_t = 3000)]
        port: u16,

        /// Text file receiving one line per successfully sent message
        #[arg(long, default_value = "messages.txt")]
        messages_file: PathBuf,
    },
    /// Interactive chat in the terminal (default)
    Chat,
    /// Send one message and print the reply
    Ask {
        message: String,
    },
}
