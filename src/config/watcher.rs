//! Configuration file watcher for hot reload.
//!
//! Only the key/value source is reloaded. Log levels are read on every
//! intercepted call, so a changed `StartLogLevel` takes effect on the next
//! call without a restart.

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::loader::load_source;
use crate::config::source::LiveConfig;

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    live: Arc<LiveConfig>,
}

impl ConfigWatcher {
    pub fn new(path: &Path, live: Arc<LiveConfig>) -> Self {
        Self {
            path: path.to_path_buf(),
            live,
        }
    }

    /// Reload the file once; on failure the current document is kept.
    pub fn reload(&self) -> bool {
        reload_into(&self.path, &self.live)
    }

    /// Start watching the file. Dropping the returned watcher stops it.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let live = self.live.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("Config file change detected, reloading...");
                        reload_into(&path, &live);
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

fn reload_into(path: &Path, live: &LiveConfig) -> bool {
    match load_source(path) {
        Ok(next) => {
            live.replace(next);
            true
        }
        Err(e) => {
            tracing::error!("Failed to reload config: {}. Keeping current configuration.", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::source::{ConfigSource, TomlConfig, START_LOG_LEVEL_KEY};

    #[test]
    fn test_reload_keeps_previous_on_error() {
        let path = std::env::temp_dir().join(format!("service-logging-watch-{}.toml", std::process::id()));
        std::fs::write(&path, "[AppSettings.LoggingInterceptor]\nStartLogLevel = \"Trace\"\n").unwrap();

        let live = Arc::new(LiveConfig::new(TomlConfig::default()));
        let watcher = ConfigWatcher::new(&path, live.clone());

        assert!(watcher.reload());
        assert_eq!(live.get(START_LOG_LEVEL_KEY).as_deref(), Some("Trace"));

        std::fs::write(&path, "not = = toml").unwrap();
        assert!(!watcher.reload());
        assert_eq!(live.get(START_LOG_LEVEL_KEY).as_deref(), Some("Trace"));

        std::fs::remove_file(&path).unwrap_or_default();
    }
}
