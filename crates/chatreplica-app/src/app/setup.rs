use anyhow::{bail, Result};
use colored::Colorize;
use std::sync::Arc;
use std::time::Duration;

use chatreplica_chat::{ChatConfig, ChatExchangeEngine};
use chatreplica_llm_api::{credential_from_env, DispatcherConfig, RequestDispatcher};
use chatreplica_logging::mask_credential;

use crate::cli::Cli;

/// Application configuration derived from CLI arguments and environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub dispatcher_config: DispatcherConfig,
    pub chat_config: ChatConfig,
    pub credential: String,
}

impl AppConfig {
    /// Engine backed by a fresh `RequestDispatcher`
    pub fn build_engine(&self) -> ChatExchangeEngine {
        let dispatcher = Arc::new(RequestDispatcher::new(self.dispatcher_config.clone()));
        ChatExchangeEngine::new(self.chat_config, dispatcher, self.credential.clone())
    }
}

/// Set up application configuration from CLI arguments
pub fn setup_from_cli(cli: &Cli) -> Result<AppConfig> {
    // Precedence: --api-key > API_KEY > OPENAI_API_KEY > CHATGPT_API_KEY
    let credential = cli
        .api_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .or_else(credential_from_env);
    let Some(credential) = credential else {
        bail!("No API key configured. Pass --api-key or set API_KEY (or OPENAI_API_KEY) in the environment or .env");
    };

    let dispatcher_config = match cli.base_url.as_deref().filter(|url| !url.trim().is_empty()) {
        Some(url) => DispatcherConfig::new(url.trim()),
        None => DispatcherConfig::default(),
    }
    .with_model(cli.model.clone())
    .with_timeout(Duration::from_millis(cli.request_timeout_ms))
    .with_verbose(cli.verbose);

    let chat_config = ChatConfig {
        cache_count_limit: cli.cache_count_limit,
        cache_byte_limit: cli.cache_byte_limit,
        conversation_max_length: cli.conversation_max_length,
    };

    if cli.verbose {
        println!("{}", format!("🔧 Endpoint: {}", dispatcher_config.api_url).bright_black());
        println!("{}", format!("🔧 Model: {}", dispatcher_config.model).bright_black());
        println!("{}", format!("🔧 API key: {}", mask_credential(&credential)).bright_black());
        println!(
            "{}",
            format!(
                "🔧 Cache: {} entries / {} bytes, log: {} messages, timeout: {}ms",
                chat_config.cache_count_limit,
                chat_config.cache_byte_limit,
                chat_config.conversation_max_length,
                cli.request_timeout_ms
            )
            .bright_black()
        );
    }

    Ok(AppConfig {
        dispatcher_config,
        chat_config,
        credential,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatreplica_llm_api::OPENAI_API_URL;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_explicit_flags_build_config() {
        let cli = Cli::try_parse_from([
            "chatreplica",
            "--api-key",
            "sk-test",
            "--base-url",
            "http://localhost:8080",
            "--cache-count-limit",
            "7",
            "--request-timeout-ms",
            "1500",
        ])
        .unwrap();

        let config = setup_from_cli(&cli).unwrap();

        assert_eq!(config.credential, "sk-test");
        assert_eq!(config.dispatcher_config.api_url, "http://localhost:8080/v1/chat/completions");
        assert_eq!(config.dispatcher_config.timeout, Duration::from_millis(1500));
        assert_eq!(config.chat_config.cache_count_limit, 7);
    }

    #[test]
    fn test_default_endpoint_without_base_url() {
        let mut cli = Cli::try_parse_from(["chatreplica", "--api-key", "sk-test"]).unwrap();
        cli.base_url = None;

        let config = setup_from_cli(&cli).unwrap();

        assert_eq!(config.dispatcher_config.api_url, OPENAI_API_URL);
    }
}
