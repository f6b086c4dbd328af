//! Sample application wired the way an embedding service would wire it.
//!
//! `OrderService` is a capability-marked async interface. Its in-memory
//! implementation is registered as a scoped service; the logging rewrite
//! swaps the registration for one producing a `LoggedOrders` decorator, and
//! each request resolves the service from its own scope.

use async_trait::async_trait;
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::composition::{Implementation, ResolveError, ServiceCollection, ServiceProvider, ServiceType};
use crate::config::schema::NAME_IDENTIFIER_CLAIM;
use crate::http::{CorrelationContext, Principal};
use crate::interception::{EndpointLoggingLayer, Interceptable, Intercepted, LoggingInterceptor};
use crate::logging::{error_codes, LoggerHandle, TargetType};

/// Header the demo auth stage trusts as the caller identity.
pub const DEMO_USER_HEADER: &str = "x-demo-user";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub sku: String,
    pub quantity: u32,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum OrderError {
    #[error("quantity must be positive")]
    InvalidQuantity,

    #[error("order {0} not found")]
    NotFound(Uuid),
}

#[async_trait]
pub trait OrderService: Send + Sync {
    async fn place(&self, sku: &str, quantity: u32) -> Result<Order, OrderError>;

    async fn cancel(&self, id: Uuid) -> Result<(), OrderError>;
}

/// Shared order storage; one per provider.
#[derive(Debug, Default)]
pub struct OrderBook {
    orders: DashMap<Uuid, Order>,
}

impl OrderBook {
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

pub struct InMemoryOrders {
    book: Arc<OrderBook>,
}

impl InMemoryOrders {
    pub fn new(book: Arc<OrderBook>) -> Self {
        Self { book }
    }
}

#[async_trait]
impl OrderService for InMemoryOrders {
    async fn place(&self, sku: &str, quantity: u32) -> Result<Order, OrderError> {
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity);
        }
        let order = Order {
            id: Uuid::new_v4(),
            sku: sku.to_string(),
            quantity,
        };
        self.book.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn cancel(&self, id: Uuid) -> Result<(), OrderError> {
        self.book
            .orders
            .remove(&id)
            .map(|_| ())
            .ok_or(OrderError::NotFound(id))
    }
}

struct LoggedOrders(Intercepted<dyn OrderService>);

#[async_trait]
impl OrderService for LoggedOrders {
    async fn place(&self, sku: &str, quantity: u32) -> Result<Order, OrderError> {
        self.0
            .call_async_with_result("place", |inner| inner.place(sku, quantity))
            .await
    }

    async fn cancel(&self, id: Uuid) -> Result<(), OrderError> {
        self.0.call_async("cancel", |inner| inner.cancel(id)).await
    }
}

impl Interceptable for dyn OrderService {
    fn decorate(target: Arc<Self>, interceptor: LoggingInterceptor, implementation: TargetType) -> Arc<Self> {
        Arc::new(LoggedOrders(Intercepted::new(target, interceptor, implementation)))
    }
}

/// Register the demo services and apply the logging rewrite.
pub fn compose(interceptor: LoggingInterceptor) -> ServiceProvider {
    let mut services = ServiceCollection::new();
    services
        .add_singleton(
            ServiceType::concrete::<OrderBook>(),
            Implementation::instance(Arc::new(OrderBook::default())),
        )
        .add_scoped(
            ServiceType::interceptable::<dyn OrderService>(),
            Implementation::of::<dyn OrderService, InMemoryOrders, _>(|resolver| {
                Ok(Arc::new(InMemoryOrders::new(resolver.get::<OrderBook>()?)))
            }),
        )
        .add_logging_interceptor(interceptor);
    services.build()
}

/// Marker naming the HTTP endpoints' logger.
pub struct OrdersApi;

#[derive(Clone)]
struct AppState {
    provider: ServiceProvider,
    logger: LoggerHandle,
}

#[derive(Debug, Deserialize)]
pub struct PlaceOrder {
    pub sku: String,
    pub quantity: u32,
}

enum ApiError {
    Order(OrderError),
    Resolve(ResolveError),
}

impl From<OrderError> for ApiError {
    fn from(e: OrderError) -> Self {
        ApiError::Order(e)
    }
}

impl From<ResolveError> for ApiError {
    fn from(e: ResolveError) -> Self {
        ApiError::Resolve(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Order(OrderError::InvalidQuantity) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            ApiError::Order(OrderError::NotFound(_)) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Resolve(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Order(e) => e.fmt(f),
            ApiError::Resolve(e) => e.fmt(f),
        }
    }
}

/// The demo application routes, without instrumentation middleware.
pub fn app(provider: ServiceProvider, interceptor: LoggingInterceptor) -> Router {
    let logger = interceptor.registry().get_for::<OrdersApi>();
    let endpoint = |name: &'static str| {
        EndpointLoggingLayer::new(TargetType::of::<OrdersApi>(), name, interceptor.clone())
    };

    Router::new()
        .route(
            "/orders",
            post(place_order).route_layer(endpoint("place_order")),
        )
        .route(
            "/orders/{id}",
            axum::routing::delete(cancel_order).route_layer(endpoint("cancel_order")),
        )
        .route("/correlation", get(correlation_id))
        .layer(axum::middleware::from_fn(demo_auth))
        .with_state(AppState { provider, logger })
}

async fn place_order(
    State(state): State<AppState>,
    Json(request): Json<PlaceOrder>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let orders = state.provider.create_scope().get::<dyn OrderService>()?;
    match orders.place(&request.sku, request.quantity).await {
        Ok(order) => Ok((StatusCode::CREATED, Json(order))),
        Err(e) => {
            let parameters = format!("sku={} quantity={}", request.sku, request.quantity);
            state.logger.log_as_error(
                "place_order",
                Some(&parameters),
                error_codes::BUSINESS_RULE_FAILURE,
                &e.to_string(),
                None,
            );
            Err(e.into())
        }
    }
}

async fn cancel_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let orders = state.provider.create_scope().get::<dyn OrderService>()?;
    orders.cancel(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn correlation_id(context: CorrelationContext) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "correlation_id": context.id() }))
}

/// Stand-in authentication: trusts [`DEMO_USER_HEADER`] as the caller id.
async fn demo_auth(mut request: Request, next: Next) -> Response {
    let principal = request
        .headers()
        .get(DEMO_USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|user| Principal::authenticated().with_claim(NAME_IDENTIFIER_CLAIM, user));

    if let Some(principal) = &principal {
        request.extensions_mut().insert(principal.clone());
    }
    let mut response = next.run(request).await;
    if let Some(principal) = principal {
        response.extensions_mut().insert(principal);
    }
    response
}
