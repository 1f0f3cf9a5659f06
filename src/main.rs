use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use chat_relay::config::{Cli, RelaySettings};
use chat_relay::server::{build_router, AppState};
use chat_relay::upstream::OpenAiClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Populate the environment from .env before clap reads it.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize tracing/logging.
    let default_filter = if cli.verbose {
        "chat_relay=debug,tower_http=debug"
    } else {
        "chat_relay=info,tower_http=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }

    info!("chat-relay v{}", env!("CARGO_PKG_VERSION"));

    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => debug!("No .env file, using process environment"),
        Err(e) => warn!(error = %e, "Failed to load .env file"),
    }

    let settings = RelaySettings::from_cli(&cli);
    if settings.api_key().is_none() {
        warn!("OPENAI_API_KEY is not set; chat requests will fail until it is configured");
    }
    info!(
        api_key_set = settings.api_key().is_some(),
        default_model = settings.default_model().unwrap_or("<unset>"),
        base_url = %cli.base_url,
        "Configuration loaded"
    );

    let client = OpenAiClient::new(cli.base_url.clone())?;
    let state = Arc::new(AppState::new(Arc::new(client), settings));

    let app = build_router(state);

    let listener = TcpListener::bind(&cli.listen).await?;
    info!("Listening on {}", cli.listen);

    axum::serve(listener, app).await?;

    Ok(())
}
