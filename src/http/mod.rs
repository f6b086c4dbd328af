//! HTTP middleware and hosting.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → correlation.rs (adopt or generate id, open request span)
//!     → request_tracing.rs (start timer)
//!     → application routes (EndpointLoggingLayer per handler, optional)
//!     → request_tracing.rs (one completion line)
//!     → correlation.rs (response hook writes or adopts the header)
//!     → client
//! ```

pub mod correlation;
pub mod request_tracing;
pub mod server;

pub use correlation::{CorrelationContext, CorrelationLayer};
pub use request_tracing::{Principal, RequestTracingLayer};
pub use server::{instrument, HttpServer};
