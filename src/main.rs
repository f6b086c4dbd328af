//! Demo host for the service logging toolkit.
//!
//! Loads an instrumentation config (TOML), watches it for log-level changes,
//! and serves the sample order API behind the correlation and request
//! tracing middleware.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use service_logging::config::watcher::ConfigWatcher;
use service_logging::config::{load_config, load_source, LiveConfig, TomlConfig};
use service_logging::http::HttpServer;
use service_logging::lifecycle::{signals, Shutdown};
use service_logging::logging::{LevelResolver, LoggerRegistry, TracingSink};
use service_logging::{demo, observability, InstrumentationConfig, LoggingInterceptor};

#[derive(Parser, Debug)]
#[command(name = "service-logging", version, about = "Service logging demo host")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind address
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let (mut config, source) = match &args.config {
        Some(path) => (load_config(path)?, load_source(path)?),
        None => (InstrumentationConfig::default(), TomlConfig::default()),
    };
    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }

    observability::logging::init(&config.logging);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "service-logging starting");

    let live = Arc::new(LiveConfig::new(source));
    let _watcher = match &args.config {
        Some(path) => Some(ConfigWatcher::new(path, live.clone()).run()?),
        None => None,
    };

    let registry = Arc::new(LoggerRegistry::with_sink(Arc::new(TracingSink)));
    let interceptor = LoggingInterceptor::new(registry.clone(), LevelResolver::new(live));
    let provider = demo::compose(interceptor.clone());
    let server = HttpServer::new(demo::app(provider, interceptor), &config, &registry)?;

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        correlation_header = %config.correlation.header,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move { signals::trigger_on_signal(&trigger).await });

    server.run(listener, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
