use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::history::History;
use rustyline::DefaultEditor;

use chatreplica_chat::ChatEvent;
use chatreplica_logging::safe_truncate;
use chatreplica_types::Message;

use crate::app::setup::AppConfig;

/// Run interactive REPL mode
///
/// Lines are submitted without waiting for the reply; replies and failures
/// are printed as they arrive, so a slow request can be cancelled from the
/// prompt.
pub async fn run_repl_mode(app_config: AppConfig) -> Result<()> {
    println!("{}", "🤖 ChatReplica".bright_cyan().bold());
    println!("{}", format!("Model: {}", app_config.dispatcher_config.model).bright_black());
    println!(
        "{}",
        "Type 'exit' or 'quit' to exit, '/help' for commands\n".bright_black()
    );

    let engine = app_config.build_engine();

    let mut events = engine.subscribe();
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            print_event(&event);
        }
    });

    let mut rl = DefaultEditor::new()?;

    loop {
        let readline = rl.readline(&format!("{} ", "You:".bright_green().bold()));

        match readline {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }
                record_history(rl.history_mut(), line)?;

                if line == "exit" || line == "quit" {
                    println!("{}", "Goodbye!".bright_cyan());
                    break;
                }

                if line == "/help" {
                    println!("{} Commands:", "💡".bright_yellow());
                    println!("  /history        - Show the conversation log");
                    println!("  /cache          - Show cache occupancy");
                    println!("  /cancel <text>  - Cancel the pending request for <text>");
                    println!("  exit, quit      - Leave");
                    continue;
                }

                if line == "/history" {
                    print_history(&engine.messages().await);
                    continue;
                }

                if line == "/cache" {
                    let stats = engine.cache_stats().await;
                    println!(
                        "{} {}/{} entries, {}/{} bytes",
                        "🗄️".bright_cyan(),
                        stats.entries,
                        stats.count_limit,
                        stats.bytes,
                        stats.byte_limit
                    );
                    continue;
                }

                if let Some(text) = line.strip_prefix("/cancel ") {
                    let text = text.trim();
                    if !engine.cancel(text) {
                        eprintln!("{} Nothing pending for {:?}", "⚠️".yellow(), text);
                    }
                    continue;
                }

                // Outcome is reported by the event printer
                drop(engine.submit(line));
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".bright_black());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_cyan());
                break;
            }
            Err(err) => {
                eprintln!("{} {}", "Error:".bright_red().bold(), err);
                break;
            }
        }
    }

    printer.abort();
    Ok(())
}

/// Remember a submitted line for arrow-key recall
fn record_history(history: &mut impl History, line: &str) -> rustyline::Result<()> {
    history.add(line)?;
    Ok(())
}

fn print_event(event: &ChatEvent) {
    match event {
        ChatEvent::UserMessage(_) => {}
        ChatEvent::Dispatching { content } => {
            println!(
                "{}",
                format!("⏳ Waiting for a reply to {:?}", safe_truncate(content, 40)).bright_black()
            );
        }
        ChatEvent::Resolved { message, cached } => {
            let origin = if *cached { " (cached)" } else { "" };
            println!(
                "{} {}{}",
                "Bot:".bright_blue().bold(),
                message.content(),
                origin.bright_black()
            );
        }
        ChatEvent::Failed { content, error } => {
            eprintln!(
                "{} {} {}",
                "❌".bright_red(),
                format!("[{}]", safe_truncate(content, 40)).bright_black(),
                error
            );
        }
        ChatEvent::Cancelled { content } => {
            println!("{} Cancelled {:?}", "🛑".yellow(), safe_truncate(content, 40));
        }
    }
}

fn print_history(messages: &[Message]) {
    if messages.is_empty() {
        println!("{}", "(no messages yet)".bright_black());
        return;
    }
    for message in messages {
        let sender = if message.is_user() {
            message.sender().to_string().bright_green().bold()
        } else {
            message.sender().to_string().bright_blue().bold()
        };
        println!(
            "{} {} {}",
            message.timestamp().format("%H:%M:%S").to_string().bright_black(),
            sender,
            message.content()
        );
    }
}
