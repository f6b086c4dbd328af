//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → InstrumentationConfig (typed middleware options)
//!     → TomlConfig (flat key/value source for log levels)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new source
//!     → atomic swap inside LiveConfig
//!     → next level lookup observes new values
//! ```
//!
//! # Design Decisions
//! - Middleware options are fixed at startup; only level keys hot-reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod source;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, load_source, parse_config, ConfigError};
pub use schema::{
    CorrelationConfig, InstrumentationConfig, LoggingConfig, RequestTracingConfig, ServerConfig,
};
pub use source::{
    ConfigSource, LiveConfig, MemoryConfig, TomlConfig, FINISH_LOG_LEVEL_KEY, START_LOG_LEVEL_KEY,
};
