//! Service logging toolkit.
//!
//! Cross-cutting instrumentation for axum/tower services: structured log
//! entries with stable event ids, method-level start/finish interception
//! driven by live configuration, a registration rewrite that wraps
//! capability-marked services in logging decorators, and HTTP middleware
//! for correlation ids and request completion lines.
//!
//! # Architecture Overview
//!
//! ```text
//!     request ──▶ CorrelationLayer ──▶ RequestTracingLayer ──▶ routes
//!                   (x-correlation-id)    (one completion line)   │
//!                                                                 ▼
//!                                                     ServiceScope::get::<dyn Api>()
//!                                                                 │
//!                                                     decorator ─▶ LoggingInterceptor
//!                                                                 │      │
//!                                                      implementation    ▼
//!                                                                  LoggerRegistry ─▶ LogSink
//!                                                                        ▲
//!                                             LevelResolver ◀── LiveConfig ◀── ConfigWatcher
//! ```

// Core subsystems
pub mod composition;
pub mod config;
pub mod interception;
pub mod logging;

// Hosting
pub mod http;
pub mod lifecycle;
pub mod observability;

pub mod demo;

pub use composition::{ServiceCollection, ServiceProvider};
pub use config::schema::InstrumentationConfig;
pub use http::HttpServer;
pub use interception::LoggingInterceptor;
pub use lifecycle::Shutdown;
pub use logging::{Logger, LoggerRegistry};
