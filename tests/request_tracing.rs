//! Request completion lines.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tower::ServiceExt;

use service_logging::config::schema::NAME_IDENTIFIER_CLAIM;
use service_logging::http::Principal;
use service_logging::logging::LogLevel;
use service_logging::InstrumentationConfig;

mod common;

use common::{get as get_request, Harness};

async fn authenticate(mut request: axum::extract::Request, next: Next) -> Response {
    let principal = Principal::authenticated().with_claim(NAME_IDENTIFIER_CLAIM, "0123456789abcdef");
    request.extensions_mut().insert(principal.clone());
    let mut response = next.run(request).await;
    response.extensions_mut().insert(principal);
    response
}

async fn explode() -> &'static str {
    panic!("handler failed")
}

fn app() -> Router {
    Router::new()
        .route("/items/{id}", get(|| async { "item" }))
        .route("/boom", get(|| async { StatusCode::BAD_GATEWAY }))
        .route("/panic", get(explode))
}

#[tokio::test]
async fn test_one_line_per_request() {
    let harness = Harness::new("None", "None");
    let app = harness.instrument(app(), &InstrumentationConfig::default());

    let response = app.oneshot(get_request("/items/42?verbose=true")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let lines = harness.completion_lines();
    assert_eq!(lines.len(), 1);
    let line = &lines[0];
    assert_eq!(line.level, LogLevel::Information);
    assert!(line.event_id.is_none());
    assert_eq!(line.property("AuthId"), Some(""));
    assert_eq!(line.property("RequestMethod"), Some("GET"));
    assert_eq!(line.property("RequestPath"), Some("/items/{id}"));
    assert_eq!(line.property("QueryString"), Some("verbose=true"));
    assert_eq!(line.value("StatusCode").and_then(|v| v.as_u64()), Some(200));
    assert!(line.value("Elapsed").and_then(|v| v.as_f64()).unwrap() >= 0.0);

    let rendered = line.render();
    assert!(rendered.starts_with(" HTTP GET /items/{id} verbose=true responded 200 in "), "{rendered}");
    assert!(rendered.ends_with(" ms"));
}

#[tokio::test]
async fn test_elapsed_has_two_decimals() {
    let harness = Harness::new("None", "None");
    let app = harness.instrument(app(), &InstrumentationConfig::default());
    app.oneshot(get_request("/items/1")).await.unwrap();

    let rendered = harness.completion_lines()[0].render();
    let elapsed = rendered
        .trim_end_matches(" ms")
        .rsplit(' ')
        .next()
        .unwrap()
        .to_string();
    let (_, decimals) = elapsed.split_once('.').unwrap();
    assert_eq!(decimals.len(), 2, "{rendered}");
}

#[tokio::test]
async fn test_authenticated_caller_is_truncated() {
    let harness = Harness::new("None", "None");
    let app = harness.instrument(
        app().layer(axum::middleware::from_fn(authenticate)),
        &InstrumentationConfig::default(),
    );
    app.oneshot(get_request("/items/1")).await.unwrap();

    let lines = harness.completion_lines();
    assert_eq!(lines[0].property("AuthId"), Some("01234567"));
    assert!(lines[0].render().starts_with("01234567 HTTP GET"));
}

#[tokio::test]
async fn test_auth_id_length_is_configurable() {
    let harness = Harness::new("None", "None");
    let mut config = InstrumentationConfig::default();
    config.request_tracing.auth_id_length = 4;
    let app = harness.instrument(app().layer(axum::middleware::from_fn(authenticate)), &config);
    app.oneshot(get_request("/items/1")).await.unwrap();

    assert_eq!(harness.completion_lines()[0].property("AuthId"), Some("0123"));
}

#[tokio::test]
async fn test_server_error_logged_at_error() {
    let harness = Harness::new("None", "None");
    let app = harness.instrument(app(), &InstrumentationConfig::default());

    let response = app.oneshot(get_request("/boom")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let lines = harness.completion_lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].level, LogLevel::Error);
    assert_eq!(lines[0].value("StatusCode").and_then(|v| v.as_u64()), Some(502));
}

#[tokio::test]
async fn test_unmatched_route_uses_raw_path() {
    let harness = Harness::new("None", "None");
    let app = harness.instrument(app(), &InstrumentationConfig::default());

    let request = Request::builder()
        .method("POST")
        .uri("/nowhere")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let lines = harness.completion_lines();
    assert_eq!(lines[0].property("RequestPath"), Some("/nowhere"));
    assert_eq!(lines[0].property("RequestMethod"), Some("POST"));
    assert_eq!(lines[0].property("QueryString"), Some(""));
}

#[tokio::test]
async fn test_custom_template() {
    let harness = Harness::new("None", "None");
    let mut config = InstrumentationConfig::default();
    config.request_tracing.message_template = "{RequestMethod} {StatusCode} {Unknown}".to_string();
    let app = harness.instrument(app(), &config);
    app.oneshot(get_request("/items/1")).await.unwrap();

    assert_eq!(harness.completion_lines()[0].render(), "GET 200 {Unknown}");
}

#[tokio::test]
async fn test_panicking_handler_still_gets_a_line() {
    let harness = Harness::new("None", "None");
    let app = harness.instrument(app(), &InstrumentationConfig::default());

    let handle = tokio::spawn(async move { app.oneshot(get_request("/panic")).await });
    let joined = handle.await;
    assert!(joined.is_err_and(|e| e.is_panic()));

    let lines = harness.completion_lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].level, LogLevel::Error);
    assert_eq!(lines[0].value("StatusCode").and_then(|v| v.as_u64()), Some(500));
    assert_eq!(lines[0].property("RequestPath"), Some("/panic"));
}
