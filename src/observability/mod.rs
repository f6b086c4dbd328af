//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! interceptors / middleware
//!     → LogEntry (template + properties)
//!     → LogSink (TracingSink by default)
//!     → tracing events inside the request span (correlation_id)
//!     → logging.rs subscriber (pretty or JSON on stdout)
//! ```

pub mod logging;
