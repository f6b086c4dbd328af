//! End-to-end: a real listener, raw HTTP, graceful shutdown.

use std::time::Duration;
use tokio::net::TcpListener;

use service_logging::demo;
use service_logging::http::HttpServer;
use service_logging::lifecycle::Shutdown;
use service_logging::InstrumentationConfig;

mod common;

use common::{raw_get, Harness};

#[tokio::test]
async fn test_server_round_trip_and_shutdown() {
    let harness = Harness::new("Information", "Information");
    let provider = demo::compose(harness.interceptor.clone());
    let app = demo::app(provider, harness.interceptor.clone());
    let server = HttpServer::new(app, &InstrumentationConfig::default(), &harness.registry).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let signal = shutdown.clone();
    let handle = tokio::spawn(async move { server.run(listener, &signal).await });

    let response = raw_get(
        addr,
        "/correlation",
        &[("x-correlation-id", "e2e-1"), (demo::DEMO_USER_HEADER, "user-1234567890")],
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.to_lowercase().contains("x-correlation-id: e2e-1"));
    assert!(response.contains(r#"{"correlation_id":"e2e-1"}"#));

    let lines = harness.completion_lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].property("AuthId"), Some("user-123"));
    assert_eq!(lines[0].property("RequestPath"), Some("/correlation"));

    shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), handle).await;
    assert!(matches!(result, Ok(Ok(Ok(())))));
}
