use std::sync::Arc;

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use super::startup;
use crate::ai::chat::ConversationSession;
use crate::core::AppConfig;

const HELP: &str = "\
Usage
  Type a message and press Enter, then wait for the reply.

Commands
  /reset    Clear the conversation and start over
  /history  Show the conversation so far
  /help     Show this message
  /quit     Exit (Ctrl-C and Ctrl-D work too)";

/// What the user asked for on a single line of input
#[derive(Debug, PartialEq)]
enum Input<'a> {
    Empty,
    Message(&'a str),
    Reset,
    History,
    Help,
    Quit,
    Unknown(&'a str),
}

impl<'a> Input<'a> {
    fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Input::Empty;
        }
        if !trimmed.starts_with('/') {
            return Input::Message(line);
        }
        match trimmed {
            "/reset" => Input::Reset,
            "/history" => Input::History,
            "/help" => Input::Help,
            "/quit" | "/exit" => Input::Quit,
            other => Input::Unknown(other),
        }
    }
}

pub async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    // Configuration and model problems stop us before the prompt shows
    let config = startup(AppConfig::from_env())?;
    let model = startup(config.model())?;
    let mut session = ConversationSession::new(Arc::new(model));

    let mut rl = DefaultEditor::new()?;
    println!(
        "Chatting with {}. Type /help for commands.",
        config.gemini_model
    );

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                match Input::parse(&line) {
                    Input::Empty => continue,
                    Input::Message(text) => {
                        let reply = session.send(text).await;
                        println!("{}\n", reply);
                    }
                    Input::Reset => {
                        session.reset();
                        println!("Conversation cleared.\n");
                    }
                    Input::History => {
                        println!("Started at {}\n", session.started_at_display());
                        println!("{}", session.format_history());
                    }
                    Input::Help => println!("{}\n", HELP),
                    Input::Quit => break,
                    Input::Unknown(cmd) => {
                        println!("Unknown command {}. Type /help for commands.\n", cmd);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
