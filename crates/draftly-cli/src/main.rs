mod error;

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use draftly_ai::{ChatClient, ChatConfig, Conversation, Message};
use error::report_error;

#[derive(Parser)]
#[command(name = "draftly", about = "Terminal chat with the Draftly document assistant")]
struct Cli {
    /// Completion endpoint URL
    #[arg(long, env = "DRAFTLY_API_URL")]
    api_url: String,

    /// Bearer token for the completion service
    #[arg(long, env = "DRAFTLY_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Purpose tag sent with every request
    #[arg(long, default_value = "chat")]
    purpose: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let client = ChatClient::new(ChatConfig::new(cli.api_url, cli.api_key));
    let mut conversation = Conversation::new();

    println!(
        "{} type a message, or /quit to leave.",
        "draftly".cyan().bold()
    );

    let stdin = io::stdin();
    loop {
        print!("{} ", ">".cyan().bold());
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if input == "/quit" || input == "/exit" {
            break;
        }

        conversation.push(Message::user(input));

        // Print each delta as it lands; `printed` tracks how much of the
        // growing reply is already on screen.
        let mut printed = 0;
        let result = client
            .stream_reply(&conversation, &cli.purpose, |reply| {
                print!("{}", &reply.content[printed..]);
                let _ = io::stdout().flush();
                printed = reply.content.len();
            })
            .await;

        match result {
            Ok(reply) => {
                println!();
                conversation.push(reply);
            }
            Err(err) => {
                println!();
                report_error(&err);
            }
        }
    }

    Ok(())
}
