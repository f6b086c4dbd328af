//! Shared utilities for integration tests.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use service_logging::config::{ConfigSource, MemoryConfig, FINISH_LOG_LEVEL_KEY, START_LOG_LEVEL_KEY};
use service_logging::logging::{LevelResolver, LogEntry, LoggerRegistry, MemorySink};
use service_logging::{InstrumentationConfig, LoggingInterceptor};

pub const TRACING_CATEGORY: &str = "service_logging::http::request_tracing::RequestTracingLayer";

/// Everything a test needs to assert on emitted entries.
pub struct Harness {
    pub sink: MemorySink,
    pub registry: Arc<LoggerRegistry>,
    #[allow(dead_code)]
    pub interceptor: LoggingInterceptor,
}

impl Harness {
    pub fn new(start: &str, finish: &str) -> Self {
        let config = MemoryConfig::new()
            .with(START_LOG_LEVEL_KEY, start)
            .with(FINISH_LOG_LEVEL_KEY, finish);
        Self::with_source(Arc::new(config))
    }

    pub fn with_source(source: Arc<dyn ConfigSource>) -> Self {
        let sink = MemorySink::new();
        let registry = Arc::new(LoggerRegistry::with_sink(Arc::new(sink.clone())));
        let interceptor = LoggingInterceptor::new(registry.clone(), LevelResolver::new(source));
        Self {
            sink,
            registry,
            interceptor,
        }
    }

    /// `app` wrapped in the instrumentation middleware.
    #[allow(dead_code)]
    pub fn instrument(&self, app: Router, config: &InstrumentationConfig) -> Router {
        service_logging::http::instrument(app, config, &self.registry).unwrap()
    }

    /// Entries from the request tracing middleware only.
    #[allow(dead_code)]
    pub fn completion_lines(&self) -> Vec<LogEntry> {
        self.sink
            .entries()
            .into_iter()
            .filter(|entry| &*entry.category == TRACING_CATEGORY)
            .collect()
    }

    /// Rendered messages from every other category.
    #[allow(dead_code)]
    pub fn call_messages(&self) -> Vec<String> {
        self.sink
            .entries()
            .into_iter()
            .filter(|entry| &*entry.category != TRACING_CATEGORY)
            .map(|entry| entry.render())
            .collect()
    }
}

#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Minimal HTTP/1.1 GET over a raw socket; returns the full response text.
#[allow(dead_code)]
pub async fn raw_get(addr: SocketAddr, path: &str, headers: &[(&str, &str)]) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let mut request = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    for (name, value) in headers {
        request.push_str(&format!("{name}: {value}\r\n"));
    }
    request.push_str("\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}
