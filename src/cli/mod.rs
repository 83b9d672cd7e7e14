use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};

use crate::ai::chat::ChatError;

pub mod chat;
pub mod serve;

#[derive(Subcommand)]
enum Command {
    /// Run the API server and chat page
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "2222")]
        port: String,
    },
    /// Start a chat session in the terminal
    Chat {},
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    // Handle each sub command
    match args.command {
        Some(Command::Serve { host, port }) => {
            serve::run(host, port).await?;
        }
        Some(Command::Chat {}) => {
            chat::run().await?;
        }
        None => {}
    }

    Ok(())
}

/// Setup failures end the process before any conversation starts
fn startup<T>(result: Result<T, ChatError>) -> Result<T> {
    result.map_err(|e| {
        if e.is_fatal() {
            anyhow!("Unable to start: {}", e)
        } else {
            e.into()
        }
    })
}
