use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::app::setup::AppConfig;
use crate::web::server::{WebServer, WebServerConfig};

/// Run the web server
pub async fn run_web_server(app_config: AppConfig, bind: &str, port: u16, messages_file: PathBuf) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind, port))?;

    println!("🌐 Starting ChatReplica web server...");
    println!("   Address: {}", addr);
    println!("   Endpoint: {}", app_config.dispatcher_config.api_url);

    let config = WebServerConfig {
        bind_addr: addr,
        messages_file,
    };

    let server = WebServer::new(config, app_config.build_engine());
    server.start().await?;

    Ok(())
}
