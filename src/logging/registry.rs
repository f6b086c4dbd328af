//! Logger registry: one logger per target type for the life of the registry.

use dashmap::DashMap;
use std::sync::{Arc, OnceLock};

use crate::logging::logger::{Logger, LoggerHandle, TargetType};
use crate::logging::sink::LogSink;

/// Builds the logger for a target type the first time it is requested.
pub trait LoggerFactory: Send + Sync + 'static {
    fn create_logger(&self, target: TargetType) -> Logger;
}

impl<F> LoggerFactory for F
where
    F: Fn(TargetType) -> Logger + Send + Sync + 'static,
{
    fn create_logger(&self, target: TargetType) -> Logger {
        self(target)
    }
}

/// Factory naming each logger after its target type and writing to one sink.
pub struct SinkLoggerFactory {
    sink: Arc<dyn LogSink>,
}

impl SinkLoggerFactory {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }
}

impl LoggerFactory for SinkLoggerFactory {
    fn create_logger(&self, target: TargetType) -> Logger {
        Logger::new(target.name(), self.sink.clone())
    }
}

/// Cache of loggers keyed by target type.
///
/// The map only stores a once-cell per type; construction runs outside the
/// shard lock, and concurrent first callers for the same type block on the
/// cell and observe the single constructed instance. Entries are never
/// evicted.
pub struct LoggerRegistry {
    factory: Box<dyn LoggerFactory>,
    loggers: DashMap<TargetType, Arc<OnceLock<LoggerHandle>>>,
}

impl LoggerRegistry {
    pub fn new(factory: impl LoggerFactory) -> Self {
        Self {
            factory: Box::new(factory),
            loggers: DashMap::new(),
        }
    }

    /// Registry whose loggers all write to `sink`.
    pub fn with_sink(sink: Arc<dyn LogSink>) -> Self {
        Self::new(SinkLoggerFactory::new(sink))
    }

    pub fn get(&self, target: TargetType) -> LoggerHandle {
        let cell = self.loggers.entry(target).or_default().clone();
        cell.get_or_init(|| {
            tracing::trace!(target_type = target.name(), "Creating logger");
            Arc::new(self.factory.create_logger(target))
        })
        .clone()
    }

    pub fn get_for<T: ?Sized + 'static>(&self) -> LoggerHandle {
        self.get(TargetType::of::<T>())
    }

    /// Number of target types seen so far.
    pub fn len(&self) -> usize {
        self.loggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.is_empty()
    }
}

impl std::fmt::Debug for LoggerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerRegistry")
            .field("loggers", &self.loggers.len())
            .finish()
    }
}
