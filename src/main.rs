//! backend-status entry point.
//!
//! Resolves configuration from an optional TOML file and the environment,
//! initializes tracing, builds the dependency probes, and serves the router
//! until SIGINT/SIGTERM.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use backend_status::config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER};
use backend_status::http::start_server;
use backend_status::probe::{MySqlProbe, S3Probe};
use backend_status::routes::create_router;
use backend_status::state::AppState;

/// Reports database and object-storage connectivity over HTTP
#[derive(Parser, Debug)]
#[command(name = "backend-status", version, about)]
struct Args {
    /// Optional TOML configuration file; environment variables override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level filter (e.g., "backend_status=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Configuration first: the log format lives in it
    let config = AppConfig::from_process_env(args.config.as_deref())?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    match config.logging.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!(
        db_host = config.database.host.as_deref().unwrap_or("<unset>"),
        db_name = config.database.name.as_deref().unwrap_or("<unset>"),
        has_db_credentials = config.database.user.is_some() && config.database.password.is_some(),
        bucket = config.storage.bucket().unwrap_or("<unset>"),
        "Loaded configuration"
    );

    let storage = S3Probe::from_env().await;
    tracing::debug!("Initialized S3 client");

    let http_config = config.http.clone();
    let state = AppState::new(config, MySqlProbe::new(), storage);
    let app = create_router(state);

    start_server(app, &http_config).await?;

    tracing::info!("Server stopped");
    Ok(())
}
