use colored::Colorize;
use std::time::Duration;

use chatreplica_models::ChatRequest;
use crate::{mask_credential, safe_truncate};

const MAX_LOGGED_BODY_CHARS: usize = 5000;

/// Log HTTP request details for debugging (console output)
pub fn log_request(url: &str, request: &ChatRequest, credential: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_cyan());
    println!("{}", "🔍 HTTP REQUEST DEBUG".bright_cyan().bold());
    println!("{}", "═".repeat(80).bright_cyan());

    // Parse URL to show host and port
    if let Ok(parsed_url) = reqwest::Url::parse(url) {
        println!("{}: {}", "URL".bright_yellow(), url);
        println!("{}: {}", "Host".bright_yellow(), parsed_url.host_str().unwrap_or("unknown"));
        println!("{}: {}", "Port".bright_yellow(), parsed_url.port_or_known_default()
            .map(|p| p.to_string())
            .unwrap_or_else(|| "unknown".to_string()));
    } else {
        println!("{}: {}", "URL".bright_yellow(), url);
    }

    println!("\n{}", "Headers:".bright_yellow());
    println!("  Content-Type: application/json");
    println!("  Authorization: Bearer {}", mask_credential(credential));

    println!("\n{}", "Request Body:".bright_yellow());
    match serde_json::to_string_pretty(request) {
        Ok(json) => print_body(&json),
        Err(e) => println!("{}", format!("Error serializing request: {}", e).red()),
    }

    println!("{}", "═".repeat(80).bright_cyan());
    println!();
}

/// Log HTTP response details for debugging (console output)
pub fn log_response(status: reqwest::StatusCode, body: &str, elapsed: Duration, verbose: bool) {
    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_green());
    println!("{}", "📥 HTTP RESPONSE DEBUG".bright_green().bold());
    println!("{}", "═".repeat(80).bright_green());

    let status_line = format!("{}", status);
    if status.is_success() {
        println!("{}: {}", "Status".bright_yellow(), status_line.green());
    } else {
        println!("{}: {}", "Status".bright_yellow(), status_line.red());
    }
    println!("{}: {}ms", "Elapsed".bright_yellow(), elapsed.as_millis());

    println!("\n{}", "Response Body:".bright_yellow());
    // Pretty-print JSON bodies, fall back to raw text
    match serde_json::from_str::<serde_json::Value>(body)
        .and_then(|value| serde_json::to_string_pretty(&value))
    {
        Ok(json) => print_body(&json),
        Err(_) => print_body(body),
    }

    println!("{}", "═".repeat(80).bright_green());
    println!();
}

fn print_body(body: &str) {
    // Truncate very long bodies for readability
    if body.chars().count() > MAX_LOGGED_BODY_CHARS {
        println!("{}", safe_truncate(body, MAX_LOGGED_BODY_CHARS));
        println!("\n{}", format!("... (truncated, total {} bytes)", body.len()).bright_black());
    } else {
        println!("{}", body);
    }
}
