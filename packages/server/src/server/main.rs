// Main entry point for the relay server

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use extraction::{Extractor, ExtractorConfig, FileSink, HttpTransport, PatternTable};
use server_core::{
    server::{build_app, AppState, VideoStreamer},
    Config, LogFormat,
};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "server")]
#[command(about = "Privacy-preserving short-form video relay")]
#[command(version)]
struct Cli {
    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Save fetched pages for inspection (overrides DEBUG)
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    if cli.debug {
        config.debug = true;
        config.log_level = "debug".to_string();
    }
    config.validate().context("Invalid configuration")?;

    init_tracing(&config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = config.port,
        debug = config.debug,
        upstream = %config.upstream_base_url,
        "Starting reel relay"
    );

    let extractor = build_extractor(&config)?;
    let streamer = VideoStreamer::new(config.stream_user_agent.clone())
        .context("Failed to build video client")?
        .with_idle_timeout(config.upstream_timeout);
    let app = build_app(AppState::new(extractor, streamer, config.port));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on http://localhost:{}", config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_directive().into());
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn build_extractor(config: &Config) -> Result<Extractor> {
    let extractor_config = ExtractorConfig::default()
        .with_base_url(config.upstream_base_url.clone())
        .with_timeout(config.upstream_timeout)
        .with_debug(config.debug);

    let mut extractor = Extractor::new(Arc::new(HttpTransport::new()), extractor_config);

    if let Some(path) = &config.patterns_file {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read patterns file {}", path.display()))?;
        let table = PatternTable::from_json(&json)
            .with_context(|| format!("Invalid patterns file {}", path.display()))?;
        tracing::info!(path = %path.display(), "Loaded custom pattern table");
        extractor = extractor.with_patterns(Arc::new(table));
    }

    if config.debug {
        tracing::info!(dir = %config.debug_dir.display(), "Saving fetched pages");
        extractor = extractor.with_sink(Arc::new(FileSink::new(config.debug_dir.clone())));
    }

    Ok(extractor)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
