//! Start/finish level lookup.

use std::fmt;
use std::sync::Arc;

use crate::config::source::{ConfigSource, FINISH_LOG_LEVEL_KEY, START_LOG_LEVEL_KEY};
use crate::logging::level::LogLevel;

/// Reads the configured call-start and call-finish levels.
///
/// Every call goes to the configuration source; nothing is cached, so a
/// reloaded source is picked up immediately.
#[derive(Clone)]
pub struct LevelResolver {
    config: Arc<dyn ConfigSource>,
}

impl LevelResolver {
    pub fn new(config: Arc<dyn ConfigSource>) -> Self {
        Self { config }
    }

    /// Parse the value under `key`; missing or unparseable values give `None`.
    pub fn resolve(&self, key: &str) -> LogLevel {
        self.config
            .get(key)
            .and_then(|value| value.parse().ok())
            .unwrap_or(LogLevel::None)
    }

    pub fn start_level(&self) -> LogLevel {
        self.resolve(START_LOG_LEVEL_KEY)
    }

    pub fn finish_level(&self) -> LogLevel {
        self.resolve(FINISH_LOG_LEVEL_KEY)
    }
}

impl fmt::Debug for LevelResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelResolver").finish_non_exhaustive()
    }
}
