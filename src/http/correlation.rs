//! Correlation identifier middleware.
//!
//! # Responsibilities
//! - Adopt the inbound correlation header, or generate a UUID when it is
//!   missing or empty
//! - Expose the identifier to the rest of the pipeline ([`CorrelationContext`])
//! - Reflect it into the response exactly once, just before the response
//!   leaves the middleware
//!
//! # Design Decisions
//! - The response hook is a consumed-on-use value; it runs at most once and
//!   is the only place this middleware touches response headers
//! - If a downstream stage already set the header on the response, that
//!   value becomes the authoritative identifier instead of being overwritten
//! - Everything logged while the request is in flight is inside a span
//!   carrying `correlation_id`

use arc_swap::ArcSwap;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Request, Response, StatusCode};
use futures_util::future::BoxFuture;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::Instrument;
use uuid::Uuid;

use crate::config::loader::ConfigError;
use crate::config::schema::CorrelationConfig;
use crate::config::validation::ValidationError;

/// The request's correlation identifier, shared by every stage.
///
/// Cloning shares the same slot; an update made by the response hook is
/// visible through every clone.
#[derive(Clone)]
pub struct CorrelationContext {
    id: Arc<ArcSwap<String>>,
}

impl CorrelationContext {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Arc::new(ArcSwap::from_pointee(id.into())),
        }
    }

    /// The current identifier.
    pub fn id(&self) -> String {
        self.id.load().as_ref().clone()
    }

    fn replace(&self, id: String) {
        self.id.store(Arc::new(id));
    }
}

impl std::fmt::Debug for CorrelationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CorrelationContext").field(&self.id()).finish()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CorrelationContext {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CorrelationContext>()
            .cloned()
            .ok_or((StatusCode::INTERNAL_SERVER_ERROR, "Correlation middleware not installed"))
    }
}

/// Usable inbound value: present, UTF-8 and non-empty.
fn inbound_id(headers: &HeaderMap, header: &HeaderName) -> Option<String> {
    headers
        .get(header)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Canonical dashed lowercase-hex UUID.
pub fn generate_id() -> String {
    Uuid::new_v4().hyphenated().to_string()
}

/// Fires once, immediately before the response is handed back up the stack.
struct OnResponseStarting {
    context: CorrelationContext,
    header: HeaderName,
}

impl OnResponseStarting {
    fn fire(self, headers: &mut HeaderMap) {
        match headers.get(&self.header).map(|value| value.to_str()) {
            None => match HeaderValue::from_str(&self.context.id()) {
                Ok(value) => {
                    headers.insert(self.header, value);
                }
                Err(e) => tracing::warn!(error = %e, "Correlation id is not a valid header value"),
            },
            Some(Ok(downstream)) if !downstream.is_empty() => {
                self.context.replace(downstream.to_string());
            }
            Some(_) => {}
        }
    }
}

/// Layer installing [`CorrelationContext`] on every request.
#[derive(Clone, Debug)]
pub struct CorrelationLayer {
    header: HeaderName,
    include_in_response: bool,
}

impl CorrelationLayer {
    pub fn new(config: &CorrelationConfig) -> Result<Self, ConfigError> {
        let header = HeaderName::from_bytes(config.header.as_bytes()).map_err(|_| {
            ConfigError::Validation(vec![ValidationError::InvalidHeader(config.header.clone())])
        })?;
        Ok(Self {
            header,
            include_in_response: config.include_in_response,
        })
    }
}

impl<S> Layer<S> for CorrelationLayer {
    type Service = Correlation<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Correlation {
            inner,
            header: self.header.clone(),
            include_in_response: self.include_in_response,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Correlation<S> {
    inner: S,
    header: HeaderName,
    include_in_response: bool,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for Correlation<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<S::Response, S::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<ReqBody>) -> Self::Future {
        let id = match inbound_id(request.headers(), &self.header) {
            Some(id) => id,
            None => {
                let id = generate_id();
                if let Ok(value) = HeaderValue::from_str(&id) {
                    request.headers_mut().insert(self.header.clone(), value);
                }
                id
            }
        };
        let context = CorrelationContext::new(id.clone());
        request.extensions_mut().insert(context.clone());

        let on_starting = self.include_in_response.then(|| OnResponseStarting {
            context: context.clone(),
            header: self.header.clone(),
        });

        let span = tracing::info_span!("request", correlation_id = %id);
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(
            async move {
                let mut response = inner.call(request).await?;
                if let Some(hook) = on_starting {
                    hook.fire(response.headers_mut());
                }
                response.extensions_mut().insert(context);
                Ok(response)
            }
            .instrument(span),
        )
    }
}
