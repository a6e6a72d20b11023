use anyhow::{Context, Result};
use colored::Colorize;

use crate::app::setup::AppConfig;

/// Send a single message, print the reply and exit
pub async fn run_ask_mode(app_config: AppConfig, message: String) -> Result<()> {
    let engine = app_config.build_engine();

    let reply = engine
        .send(&message)
        .await
        .context("Chat exchange failed")?;

    println!("{} {}", "Bot:".bright_blue().bold(), reply.content());
    Ok(())
}
