//! HTTP server setup.
//!
//! # Responsibilities
//! - Wrap an application `Router` with the instrumentation middleware
//! - Bind the server to a listener
//! - Stop accepting on the shutdown broadcast and drain in-flight requests
//!
//! # Middleware order (outermost first)
//! ```text
//! CorrelationLayer → RequestTracingLayer → TimeoutLayer → routes
//! ```
//! Correlation is outermost so the completion line is emitted inside the
//! request span and the response hook runs after tracing has finished.

use axum::Router;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;

use crate::config::loader::ConfigError;
use crate::config::schema::{InstrumentationConfig, ServerConfig};
use crate::http::correlation::CorrelationLayer;
use crate::http::request_tracing::RequestTracingLayer;
use crate::lifecycle::Shutdown;
use crate::logging::LoggerRegistry;

/// Instrument `app` with correlation, request tracing and a request timeout.
#[allow(deprecated)]
pub fn instrument(
    app: Router,
    config: &InstrumentationConfig,
    registry: &LoggerRegistry,
) -> Result<Router, ConfigError> {
    let correlation = CorrelationLayer::new(&config.correlation)?;
    let tracing = RequestTracingLayer::new(config.request_tracing.clone(), registry);

    Ok(app
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
        .layer(tracing)
        .layer(correlation))
}

/// HTTP server hosting an instrumented application.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    pub fn new(
        app: Router,
        config: &InstrumentationConfig,
        registry: &LoggerRegistry,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            router: instrument(app, config, registry)?,
            config: config.server.clone(),
        })
    }

    /// Run the server until `shutdown` fires, then drain.
    pub async fn run(self, listener: TcpListener, shutdown: &Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let mut signal = shutdown.subscribe();
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = signal.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
