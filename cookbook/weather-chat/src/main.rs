//! Interactive chat loop for the weather agent.
//!
//! Reads configuration from an optional TOML file argument plus environment
//! overrides, then talks to the configured OpenAI-compatible endpoint.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use weather_agent::{presets, AppConfig, ChatClient};

#[tokio::main]
async fn main() -> weather_agent::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_agent=info,weather_chat=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::from_env_or_file(path)?,
        None => AppConfig::from_env(),
    };

    let model = Arc::new(ChatClient::from_config(&config.model)?);
    let mut agent = presets::weather_agent(model);

    tracing::info!(model = %config.model.model, agent = %agent.name(), "agent ready");
    println!("Ask about the weather (type `exit` to quit).");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "you> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        match agent.respond(line).await {
            Ok(reply) => writeln!(stdout, "agent> {reply}")?,
            Err(err) => eprintln!("error: {err}"),
        }
    }

    Ok(())
}
