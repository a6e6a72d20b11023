use anyhow::{Context, Result};
use log::info;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use chatreplica_chat::ChatExchangeEngine;

use crate::store::MessageStore;
use crate::web::routes;

/// Web server configuration
pub struct WebServerConfig {
    pub bind_addr: SocketAddr,
    pub messages_file: PathBuf,
}

/// Web server instance
pub struct WebServer {
    config: WebServerConfig,
    engine: ChatExchangeEngine,
    store: Arc<MessageStore>,
}

impl WebServer {
    pub fn new(config: WebServerConfig, engine: ChatExchangeEngine) -> Self {
        let store = Arc::new(MessageStore::new(config.messages_file.clone()));
        Self { config, engine, store }
    }

    /// Router with CORS applied, ready to serve
    pub fn router(&self) -> axum::Router {
        let app_state = routes::AppState {
            engine: self.engine.clone(),
            store: self.store.clone(),
        };

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        routes::create_router(app_state).layer(cors)
    }

    /// Start the web server
    pub async fn start(self) -> Result<()> {
        let app = self.router();

        println!("🌐 Server is running on http://{}", self.config.bind_addr);
        println!("   API endpoints: http://{}/api/chat/{{send,receive,history}}", self.config.bind_addr);
        info!("Storing sent messages in {}", self.config.messages_file.display());

        let listener = tokio::net::TcpListener::bind(&self.config.bind_addr)
            .await
            .with_context(|| format!("Failed to bind {}", self.config.bind_addr))?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
