//! Berth - minimal user-account service

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use berth_api::{AppState, create_router};
use berth_auth::TokenCodec;
use berth_db::Database;
use berth_notify::{EmailNotifier, LogNotifier, Notifier};
use config::Config;

/// Berth - minimal user-account service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "BERTH_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "BERTH_PORT")]
    port: Option<u16>,

    /// Password-hashing pepper (overrides config)
    #[arg(long, env = "BERTH_PEPPER", hide_env_values = true)]
    pepper: Option<String>,

    /// Hex-encoded token key (overrides config)
    #[arg(long, env = "BERTH_TOKEN_KEY", hide_env_values = true)]
    token_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(&args.config)?;
    if let Some(pepper) = args.pepper {
        config.auth.pepper = pepper;
    }
    if let Some(token_key) = args.token_key {
        config.auth.token_key = token_key;
    }
    config.validate()?;

    init_logging(&config.logging.level);

    info!("Starting Berth v{}", env!("CARGO_PKG_VERSION"));

    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let db_path = format!("sqlite:{}?mode=rwc", config.database.path);
    let db = Database::new(&db_path).await?;

    // The codec owns the only copy of the key material for the rest of
    // the process lifetime.
    let codec = Arc::new(
        TokenCodec::from_hex(&config.auth.token_key)
            .map_err(|e| anyhow::anyhow!("token key rejected: {e}"))?,
    );

    let notifier: Arc<dyn Notifier> = if config.email.api_key.is_empty() {
        info!("No email API key configured; activation mail is log-only");
        Arc::new(LogNotifier)
    } else {
        Arc::new(EmailNotifier::new(
            config.email.endpoint.clone(),
            config.email.api_key.clone(),
            config.email.from_address.clone(),
        ))
    };

    let state = AppState::new(db, codec, notifier, config.auth.pepper.clone());

    let app = create_router(state).layer(TraceLayer::new_for_http());

    let bind_addr = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind_addr, port).parse()?;

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Initialize logging
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    info!("Shutdown signal received");
}
