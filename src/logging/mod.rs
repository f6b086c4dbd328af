//! Structured logging core.
//!
//! # Data Flow
//! ```text
//! caller (interceptor, middleware, application code)
//!     → registry.rs (one Logger per target type)
//!     → logger.rs (emitter: template + properties + EventId)
//!     → sink.rs (tracing, memory, or host-provided)
//! ```
//!
//! # Design Decisions
//! - Entries are message templates with named properties, rendered lazily
//! - Method names are passed explicitly by the call site
//! - Exception text is normalized to a single line before it leaves the core

pub mod entry;
pub mod events;
pub mod level;
pub mod logger;
pub mod registry;
pub mod resolver;
pub mod sink;
pub mod template;

pub use entry::{Exception, ExceptionFields, LogEntry};
pub use events::{error_codes, EventId, LogEvent};
pub use level::LogLevel;
pub use logger::{Logger, LoggerHandle, TargetType};
pub use registry::{LoggerFactory, LoggerRegistry, SinkLoggerFactory};
pub use resolver::LevelResolver;
pub use sink::{LogSink, MemorySink, TracingSink};
