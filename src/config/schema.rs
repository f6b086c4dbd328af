//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files and
//! every field has a default, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Default response/request header carrying the correlation identifier.
pub const DEFAULT_CORRELATION_HEADER: &str = "x-correlation-id";

/// Default request completion template.
pub const DEFAULT_MESSAGE_TEMPLATE: &str = "{AuthId:l} HTTP {RequestMethod:l} {RequestPath:l} {QueryString:l} responded {StatusCode} in {Elapsed:0.00} ms";

/// Claim holding the authenticated user's identifier.
pub const NAME_IDENTIFIER_CLAIM: &str =
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier";

/// Root configuration for the instrumentation layer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct InstrumentationConfig {
    /// Subscriber setup for the demo host and embedding applications.
    pub logging: LoggingConfig,

    /// Correlation identifier handling.
    pub correlation: CorrelationConfig,

    /// Request completion logging.
    pub request_tracing: RequestTracingConfig,

    /// Demo host listener settings.
    pub server: ServerConfig,
}

/// Subscriber configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    pub filter: String,

    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

/// Correlation middleware options.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorrelationConfig {
    /// Header read from requests and written to responses.
    pub header: String,

    /// Reflect the identifier into the response headers.
    pub include_in_response: bool,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            header: DEFAULT_CORRELATION_HEADER.to_string(),
            include_in_response: true,
        }
    }
}

/// Request tracing middleware options.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RequestTracingConfig {
    /// Completion message template.
    pub message_template: String,

    /// Claim type whose value identifies the user.
    pub auth_id_claim: String,

    /// Number of leading characters of the claim value to log.
    pub auth_id_length: usize,
}

impl Default for RequestTracingConfig {
    fn default() -> Self {
        Self {
            message_template: DEFAULT_MESSAGE_TEMPLATE.to_string(),
            auth_id_claim: NAME_IDENTIFIER_CLAIM.to_string(),
            auth_id_length: 8,
        }
    }
}

/// Listener configuration for the demo host.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}
