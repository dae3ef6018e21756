//! Concierge application binary - composition root.
//!
//! 1. Parse CLI flags and load configuration from TOML
//! 2. Initialize tracing
//! 3. Build the profile, responder, and mail adapters
//! 4. Serve the chat API, or run a chat session in the terminal

mod cli;
mod terminal;

use std::sync::Arc;

use clap::Parser;
use concierge_api::auth::load_or_generate_token;
use concierge_api::{AppState, Backends};
use concierge_chat::{LoggingHandoff, SessionManager, SessionServices, SharedIdentity};
use concierge_core::{ConciergeConfig, Identity};
use concierge_services::{HttpFreeTextResponder, HttpProfileLookup, MailClientHandoff};
use tracing_subscriber::EnvFilter;

use crate::cli::{expand_home, CliArgs};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = ConciergeConfig::load_or_default(&config_file);
    config.general.port = args.resolve_port(config.general.port);

    // Tracing. RUST_LOG wins over the resolved level.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Concierge v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    let profiles = Arc::new(HttpProfileLookup::new(&config.services)?);
    let responder = Arc::new(HttpFreeTextResponder::new(&config.services)?);

    if args.chat {
        let identity = Arc::new(match args.user {
            Some(uid) => SharedIdentity::signed_in(Identity::new(uid)),
            None => SharedIdentity::new(),
        });
        let manager = SessionManager::new(
            &config,
            SessionServices {
                profiles,
                responder,
                identity,
                email: Arc::new(MailClientHandoff),
            },
        );
        terminal::run(manager).await?;
        return Ok(());
    }

    // The widget host opens mailto links itself; the server only logs.
    let backends = Backends {
        profiles,
        responder,
        email: Arc::new(LoggingHandoff),
    };

    let data_dir = expand_home(&config.general.data_dir);
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        tracing::error!(path = %data_dir.display(), error = %e, "Failed to create data directory");
        return Err(e.into());
    }

    let mut state = AppState::new(config, backends);
    state.api_token = load_or_generate_token(&data_dir.join("api_token"));

    concierge_api::start_server(state).await?;

    Ok(())
}
