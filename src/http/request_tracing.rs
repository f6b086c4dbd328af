//! Request completion logging.
//!
//! # Responsibilities
//! - Time the whole inner pipeline
//! - Emit exactly one structured line per request, on success or failure
//! - Identify the caller by a truncated claim value
//!
//! # Design Decisions
//! - Authentication is not performed here; an upstream stage inserts a
//!   [`Principal`] into request extensions (or response extensions, which
//!   take precedence when both are present)
//! - The path is the matched route template when axum has one, otherwise
//!   the raw request path
//! - A panic below this layer is logged as a 500 and then resumed; turning
//!   it into a response is left to whatever sits above

use axum::extract::MatchedPath;
use axum::http::{Request, Response, StatusCode};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde_json::Value;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};

use crate::config::schema::RequestTracingConfig;
use crate::logging::{LogEntry, LogLevel, LoggerHandle, LoggerRegistry};

/// The authenticated caller, as established by an upstream auth stage.
#[derive(Debug, Clone, Default)]
pub struct Principal {
    authenticated: bool,
    claims: HashMap<String, String>,
}

impl Principal {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated() -> Self {
        Self {
            authenticated: true,
            claims: HashMap::new(),
        }
    }

    pub fn with_claim(mut self, claim: impl Into<String>, value: impl Into<String>) -> Self {
        self.claims.insert(claim.into(), value.into());
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn claim(&self, claim: &str) -> Option<&str> {
        self.claims.get(claim).map(String::as_str)
    }
}

/// First `length` characters of the claim value; empty when anonymous or
/// when the claim is missing.
pub fn auth_id(principal: Option<&Principal>, claim: &str, length: usize) -> String {
    principal
        .filter(|p| p.is_authenticated())
        .and_then(|p| p.claim(claim))
        .map(|value| value.chars().take(length).collect())
        .unwrap_or_default()
}

/// Completion line level: Error for server errors, Information otherwise.
pub fn completion_level(status: StatusCode) -> LogLevel {
    if status.is_server_error() {
        LogLevel::Error
    } else {
        LogLevel::Information
    }
}

struct RequestInfo {
    method: String,
    path: String,
    query: String,
    principal: Option<Principal>,
    started: Instant,
}

#[derive(Clone)]
struct Settings {
    config: Arc<RequestTracingConfig>,
    logger: LoggerHandle,
}

impl Settings {
    fn emit(&self, info: RequestInfo, status: StatusCode, principal: Option<&Principal>) {
        let elapsed_ms = info.started.elapsed().as_secs_f64() * 1000.0;
        let principal = principal.or(info.principal.as_ref());
        let entry = LogEntry::new(
            completion_level(status),
            None,
            Arc::from(self.logger.category()),
            self.config.message_template.clone(),
        )
        .with(
            "AuthId",
            auth_id(principal, &self.config.auth_id_claim, self.config.auth_id_length),
        )
        .with("RequestMethod", info.method)
        .with("RequestPath", info.path)
        .with("QueryString", info.query)
        .with("StatusCode", status.as_u16())
        .with("Elapsed", Value::from(elapsed_ms));
        self.logger.log(entry);
    }
}

/// Layer emitting one completion line per request.
#[derive(Clone)]
pub struct RequestTracingLayer {
    settings: Settings,
}

impl RequestTracingLayer {
    pub fn new(config: RequestTracingConfig, registry: &LoggerRegistry) -> Self {
        Self {
            settings: Settings {
                config: Arc::new(config),
                logger: registry.get_for::<RequestTracingLayer>(),
            },
        }
    }
}

impl std::fmt::Debug for RequestTracingLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestTracingLayer")
            .field("config", &self.settings.config)
            .finish()
    }
}

impl<S> Layer<S> for RequestTracingLayer {
    type Service = RequestTracing<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestTracing {
            inner,
            settings: self.settings.clone(),
        }
    }
}

#[derive(Clone)]
pub struct RequestTracing<S> {
    inner: S,
    settings: Settings,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestTracing<S>
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

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let info = RequestInfo {
            method: request.method().to_string(),
            path: request
                .extensions()
                .get::<MatchedPath>()
                .map(|matched| matched.as_str().to_string())
                .unwrap_or_else(|| request.uri().path().to_string()),
            query: request.uri().query().unwrap_or_default().to_string(),
            principal: request.extensions().get::<Principal>().cloned(),
            started: Instant::now(),
        };
        let settings = self.settings.clone();
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            match AssertUnwindSafe(inner.call(request)).catch_unwind().await {
                Ok(Ok(response)) => {
                    let principal = response.extensions().get::<Principal>();
                    settings.emit(info, response.status(), principal);
                    Ok(response)
                }
                Ok(Err(e)) => {
                    settings.emit(info, StatusCode::INTERNAL_SERVER_ERROR, None);
                    Err(e)
                }
                Err(panic) => {
                    settings.emit(info, StatusCode::INTERNAL_SERVER_ERROR, None);
                    std::panic::resume_unwind(panic)
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::NAME_IDENTIFIER_CLAIM;

    #[test]
    fn test_auth_id_truncates_claim() {
        let principal = Principal::authenticated().with_claim(NAME_IDENTIFIER_CLAIM, "0123456789abcdef");
        assert_eq!(auth_id(Some(&principal), NAME_IDENTIFIER_CLAIM, 8), "01234567");
    }

    #[test]
    fn test_auth_id_shorter_than_length() {
        let principal = Principal::authenticated().with_claim(NAME_IDENTIFIER_CLAIM, "abc");
        assert_eq!(auth_id(Some(&principal), NAME_IDENTIFIER_CLAIM, 8), "abc");
    }

    #[test]
    fn test_auth_id_empty_when_anonymous() {
        let principal = Principal::anonymous().with_claim(NAME_IDENTIFIER_CLAIM, "0123456789");
        assert_eq!(auth_id(Some(&principal), NAME_IDENTIFIER_CLAIM, 8), "");
        assert_eq!(auth_id(None, NAME_IDENTIFIER_CLAIM, 8), "");
        assert_eq!(auth_id(Some(&Principal::authenticated()), NAME_IDENTIFIER_CLAIM, 8), "");
    }

    #[test]
    fn test_completion_level() {
        assert_eq!(completion_level(StatusCode::OK), LogLevel::Information);
        assert_eq!(completion_level(StatusCode::NOT_FOUND), LogLevel::Information);
        assert_eq!(completion_level(StatusCode::BAD_GATEWAY), LogLevel::Error);
    }
}
