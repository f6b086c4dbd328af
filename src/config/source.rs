//! Key/value configuration lookup.
//!
//! # Responsibilities
//! - Answer `get(key)` for `:`-separated key paths
//! - Flatten TOML documents into that key space
//! - Allow the active document to be swapped at runtime
//!
//! # Design Decisions
//! - Keys are case-insensitive (`AppSettings:LoggingInterceptor:StartLogLevel`
//!   and `appsettings:logginginterceptor:startloglevel` are the same key)
//! - Lookups are uncached by callers, so `get` stays a hash lookup

use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::loader::ConfigError;

pub const START_LOG_LEVEL_KEY: &str = "AppSettings:LoggingInterceptor:StartLogLevel";
pub const FINISH_LOG_LEVEL_KEY: &str = "AppSettings:LoggingInterceptor:FinishLogLevel";

/// Source of configuration values.
pub trait ConfigSource: Send + Sync + 'static {
    fn get(&self, key: &str) -> Option<String>;
}

fn normalize(key: &str) -> String {
    key.to_ascii_lowercase()
}

/// In-memory configuration, mostly for tests and programmatic setup.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfig {
    values: HashMap<String, String>,
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.values.insert(normalize(key), value.into());
        self
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(&normalize(key))
    }
}

impl ConfigSource for MemoryConfig {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(&normalize(key)).cloned()
    }
}

/// A TOML document flattened into `:`-joined key paths.
///
/// Tables contribute path segments, arrays contribute their index, and
/// scalars are stored in their display form.
#[derive(Debug, Clone, Default)]
pub struct TomlConfig {
    values: HashMap<String, String>,
}

impl TomlConfig {
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = content.parse()?;
        Ok(Self::from_table(&table))
    }

    pub fn from_table(table: &toml::Table) -> Self {
        let mut values = HashMap::new();
        for (key, value) in table {
            flatten(key, value, &mut values);
        }
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn flatten(path: &str, value: &toml::Value, out: &mut HashMap<String, String>) {
    match value {
        toml::Value::Table(table) => {
            for (key, value) in table {
                flatten(&format!("{path}:{key}"), value, out);
            }
        }
        toml::Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                flatten(&format!("{path}:{index}"), value, out);
            }
        }
        toml::Value::String(s) => {
            out.insert(normalize(path), s.clone());
        }
        other => {
            out.insert(normalize(path), other.to_string());
        }
    }
}

impl ConfigSource for TomlConfig {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(&normalize(key)).cloned()
    }
}

/// A configuration whose backing document can be replaced while readers
/// keep calling `get`.
#[derive(Debug)]
pub struct LiveConfig {
    current: ArcSwap<TomlConfig>,
}

impl LiveConfig {
    pub fn new(initial: TomlConfig) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
        }
    }

    /// Swap in a new document. Readers see either the old or the new one.
    pub fn replace(&self, next: TomlConfig) {
        self.current.store(Arc::new(next));
    }

    pub fn snapshot(&self) -> Arc<TomlConfig> {
        self.current.load_full()
    }
}

impl ConfigSource for LiveConfig {
    fn get(&self, key: &str) -> Option<String> {
        self.current.load().get(key)
    }
}

impl<T: ConfigSource + ?Sized> ConfigSource for Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_config_is_case_insensitive() {
        let config = MemoryConfig::new().with(START_LOG_LEVEL_KEY, "Trace");
        assert_eq!(
            config.get("appsettings:logginginterceptor:startloglevel").as_deref(),
            Some("Trace")
        );
        assert_eq!(config.get(FINISH_LOG_LEVEL_KEY), None);
    }

    #[test]
    fn test_toml_flattening() {
        let config = TomlConfig::parse(
            r#"
            [AppSettings.LoggingInterceptor]
            StartLogLevel = "Information"
            FinishLogLevel = "Trace"

            [correlation]
            include_in_response = false
            headers = ["a", "b"]
            "#,
        )
        .unwrap();

        assert_eq!(config.get(START_LOG_LEVEL_KEY).as_deref(), Some("Information"));
        assert_eq!(config.get(FINISH_LOG_LEVEL_KEY).as_deref(), Some("Trace"));
        assert_eq!(config.get("correlation:include_in_response").as_deref(), Some("false"));
        assert_eq!(config.get("correlation:headers:1").as_deref(), Some("b"));
    }

    #[test]
    fn test_live_config_replace() {
        let live = LiveConfig::new(TomlConfig::parse("a = \"1\"").unwrap());
        assert_eq!(live.get("a").as_deref(), Some("1"));

        live.replace(TomlConfig::parse("a = \"2\"").unwrap());
        assert_eq!(live.get("A").as_deref(), Some("2"));
    }
}
