//! Valet application binary - composition root.
//!
//! Ties the crates together into an interactive assistant:
//! 1. Parse CLI args and load configuration from TOML
//! 2. Initialize tracing
//! 3. Wire the providers (HTTP-backed weather/news, in-memory calendar)
//! 4. Run a stdin read-eval-print loop against the dispatcher

mod cli;

use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use uuid::Uuid;

use cli::CliArgs;
use valet_chat::{Dispatcher, IntentKind};
use valet_core::{UserPreferences, ValetConfig};
use valet_providers::{LocalCalendarProvider, NewsApiProvider, OpenWeatherProvider};

#[tokio::main]
async fn main() -> valet_core::Result<()> {
    let args = CliArgs::parse();

    let config_path = args.resolve_config_path();
    let config = ValetConfig::load_or_default(&config_path);

    let log_level = args
        .resolve_log_level()
        .unwrap_or_else(|| config.general.log_level.clone());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if config.weather.api_key.is_empty() {
        tracing::warn!("No weather API key configured; weather queries will fail");
    }
    if config.news.api_key.is_empty() {
        tracing::warn!("No news API key configured; news queries will fail");
    }

    let dispatcher = Dispatcher::new(
        &config.chat,
        Arc::new(OpenWeatherProvider::new(config.weather.clone())),
        Arc::new(NewsApiProvider::new(config.news.clone())),
        Arc::new(LocalCalendarProvider::new(config.calendar.clone())),
    );

    let preferences = UserPreferences {
        location: args.location.clone(),
        units: config.weather.units,
        ..UserPreferences::default()
    };

    repl(&dispatcher, preferences).await?;
    Ok(())
}

/// Read utterances from stdin and print responses until EOF or a goodbye.
async fn repl(dispatcher: &Dispatcher, preferences: UserPreferences) -> std::io::Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut conversation_id: Option<Uuid> = None;

    stdout
        .write_all(b"Valet ready. Ask about weather, news, or your calendar (\"help\" for more).\n\n> ")
        .await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let utterance = line.trim();
        if utterance.is_empty() {
            stdout.write_all(b"> ").await?;
            stdout.flush().await?;
            continue;
        }

        let outcome = dispatcher
            .process(utterance, conversation_id, Some(preferences.clone()))
            .await;
        conversation_id = outcome.conversation_id.or(conversation_id);

        match &outcome.response {
            Some(response) => {
                stdout
                    .write_all(format!("\n{}\n", response.message).as_bytes())
                    .await?;
                if !response.suggestions.is_empty() {
                    stdout.write_all(b"\nYou could try:\n").await?;
                    for suggestion in &response.suggestions {
                        stdout
                            .write_all(format!("  - {}\n", suggestion).as_bytes())
                            .await?;
                    }
                }
            }
            None => {
                let error = outcome.error.as_deref().unwrap_or("unknown error");
                stdout
                    .write_all(format!("\nSomething went wrong: {}\n", error).as_bytes())
                    .await?;
            }
        }

        if outcome.intent == IntentKind::Goodbye {
            break;
        }

        stdout.write_all(b"\n> ").await?;
        stdout.flush().await?;
    }

    Ok(())
}
