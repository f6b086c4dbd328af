//! Interception through the container and the demo application.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use service_logging::config::{LiveConfig, TomlConfig};
use service_logging::demo::{self, Order, OrderError, OrderService};
use service_logging::logging::{EventId, LogLevel};
use service_logging::InstrumentationConfig;

mod common;

use common::{body_json, Harness};

fn post_order(sku: &str, quantity: u32) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/orders")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({ "sku": sku, "quantity": quantity }).to_string(),
        ))
        .unwrap()
}

fn demo_app(harness: &Harness) -> axum::Router {
    let provider = demo::compose(harness.interceptor.clone());
    harness.instrument(
        demo::app(provider, harness.interceptor.clone()),
        &InstrumentationConfig::default(),
    )
}

fn levels(start: &str, finish: &str) -> TomlConfig {
    TomlConfig::parse(&format!(
        "[AppSettings.LoggingInterceptor]\nStartLogLevel = \"{start}\"\nFinishLogLevel = \"{finish}\"\n"
    ))
    .unwrap()
}

#[tokio::test]
async fn test_endpoint_and_service_calls_are_logged() {
    let harness = Harness::new("Information", "Information");
    let response = demo_app(&harness).oneshot(post_order("apple", 3)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let order: Order = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(order.sku, "apple");
    assert_eq!(order.quantity, 3);

    assert_eq!(
        harness.call_messages(),
        vec!["place_order called", "place called", "place completed", "place_order completed"]
    );

    let entries = harness.sink.entries();
    assert!(entries[0].category.ends_with("OrdersApi"));
    assert!(entries[1].category.ends_with("InMemoryOrders"));
    assert_eq!(entries[1].event_id, Some(EventId::INFORMATION));
    assert_eq!(harness.completion_lines().len(), 1);
}

#[tokio::test]
async fn test_failed_service_call_has_no_finish_entry() {
    let harness = Harness::new("Information", "Information");
    let response = demo_app(&harness).oneshot(post_order("apple", 0)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(
        harness.call_messages(),
        vec![
            "place_order called",
            "place called",
            "place_order sku=apple quantity=0 ERR_BUSINESS_RULE_FAILED quantity must be positive",
            "place_order completed",
        ]
    );
    let error = &harness.sink.entries()[2];
    assert_eq!(error.level, LogLevel::Error);
    assert_eq!(error.event_id, Some(EventId::ERROR_WITH_PARAMS));
}

#[tokio::test]
async fn test_cancel_unknown_order() {
    let harness = Harness::new("Trace", "Trace");
    let id = Uuid::new_v4();
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/orders/{id}"))
        .body(Body::empty())
        .unwrap();

    let response = demo_app(&harness).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        harness.call_messages(),
        vec!["cancel_order called", "cancel called", "cancel_order completed"]
    );
    assert!(harness.sink.entries().iter().take(3).all(|e| e.level == LogLevel::Trace));
}

#[tokio::test]
async fn test_level_changes_apply_to_next_call() {
    let live = Arc::new(LiveConfig::new(levels("Information", "None")));
    let harness = Harness::with_source(live.clone());
    let provider = demo::compose(harness.interceptor.clone());
    let orders = provider.create_scope().get::<dyn OrderService>().unwrap();

    orders.place("pear", 1).await.unwrap();
    assert_eq!(harness.call_messages(), vec!["place called"]);

    live.replace(levels("None", "Debug"));
    harness.sink.clear();
    orders.place("pear", 1).await.unwrap();
    assert_eq!(harness.call_messages(), vec!["place completed"]);
    assert_eq!(harness.sink.entries()[0].level, LogLevel::Information);
}

#[tokio::test]
async fn test_disabled_levels_log_nothing() {
    let harness = Harness::new("None", "garbage");
    let provider = demo::compose(harness.interceptor.clone());
    let orders = provider.create_scope().get::<dyn OrderService>().unwrap();

    assert_eq!(orders.place("fig", 0).await, Err(OrderError::InvalidQuantity));
    orders.place("fig", 2).await.unwrap();
    assert!(harness.sink.is_empty());
}

#[tokio::test]
async fn test_concurrent_calls_share_one_logger() {
    let harness = Harness::new("Information", "Information");
    let provider = demo::compose(harness.interceptor.clone());

    let tasks: Vec<_> = (0..50)
        .map(|i| {
            let orders = provider.create_scope().get::<dyn OrderService>().unwrap();
            tokio::spawn(async move { orders.place(&format!("sku-{i}"), 1).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(harness.sink.len(), 100);
    assert_eq!(harness.registry.len(), 1);
    let book = provider.get::<demo::OrderBook>().unwrap();
    assert_eq!(book.len(), 50);
}
