//! Log sinks: where rendered entries go.
//!
//! Storage and transport belong to the host; a sink only hands the entry on.

use std::sync::{Arc, Mutex};

use crate::logging::entry::LogEntry;
use crate::logging::level::LogLevel;

/// Destination for structured log entries.
pub trait LogSink: Send + Sync + 'static {
    fn emit(&self, entry: LogEntry);
}

/// Forwards entries to the `tracing` ecosystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, entry: LogEntry) {
        let message = entry.render();
        let category = &*entry.category;
        let event_id = entry.event_id.map(|id| id.value());
        let properties = entry.properties_json();

        macro_rules! forward {
            ($level:expr) => {
                tracing::event!(
                    $level,
                    category,
                    event_id,
                    properties = %properties,
                    "{}",
                    message
                )
            };
        }

        match entry.level {
            LogLevel::Trace => forward!(tracing::Level::TRACE),
            LogLevel::Debug => forward!(tracing::Level::DEBUG),
            LogLevel::Information => forward!(tracing::Level::INFO),
            LogLevel::Warning => forward!(tracing::Level::WARN),
            LogLevel::Error | LogLevel::Critical => forward!(tracing::Level::ERROR),
            LogLevel::None => {}
        }
    }
}

/// Keeps entries in memory. Used by tests and by hosts that batch entries.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    /// Rendered messages, in emission order.
    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(LogEntry::render).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogEntry>> {
        // A panic while pushing cannot leave the Vec half-written.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LogSink for MemorySink {
    fn emit(&self, entry: LogEntry) {
        self.lock().push(entry);
    }
}
