//! Start/finish logging for individual HTTP endpoints.
//!
//! Applied with `Router::route_layer` so it wraps the handler only:
//!
//! ```ignore
//! Router::new()
//!     .route("/orders/{id}", get(get_order))
//!     .route_layer(EndpointLoggingLayer::new(TargetType::of::<OrdersApi>(), "get_order", interceptor))
//! ```

use axum::http::Request;
use futures_util::future::BoxFuture;
use std::borrow::Cow;
use std::task::{Context, Poll};
use tower::{Layer, Service};

use crate::interception::interceptor::LoggingInterceptor;
use crate::interception::invocation::Invocation;
use crate::logging::TargetType;

/// Layer logging "called"/"completed" around an endpoint handler.
#[derive(Clone, Debug)]
pub struct EndpointLoggingLayer {
    invocation: Invocation,
    interceptor: LoggingInterceptor,
}

impl EndpointLoggingLayer {
    pub fn new(
        target: TargetType,
        endpoint: impl Into<Cow<'static, str>>,
        interceptor: LoggingInterceptor,
    ) -> Self {
        Self {
            invocation: Invocation::new(target, endpoint),
            interceptor,
        }
    }
}

impl<S> Layer<S> for EndpointLoggingLayer {
    type Service = EndpointLogging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        EndpointLogging {
            inner,
            invocation: self.invocation.clone(),
            interceptor: self.interceptor.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct EndpointLogging<S> {
    inner: S,
    invocation: Invocation,
    interceptor: LoggingInterceptor,
}

impl<S, B> Service<Request<B>> for EndpointLogging<S>
where
    S: Service<Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Response: Send + 'static,
    S::Error: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<S::Response, S::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        // Take the service that was driven to readiness.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let invocation = self.invocation.clone();
        let interceptor = self.interceptor.clone();

        Box::pin(async move {
            interceptor
                .intercept_async_with_result(&invocation, move || inner.call(request))
                .await
        })
    }
}
