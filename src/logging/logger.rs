//! Logger handles and the structured emitter API.
//!
//! Every entry carries the calling method name explicitly, an optional
//! parameter snapshot, and the [`EventId`] of its category.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::logging::entry::{Exception, LogEntry};
use crate::logging::events::EventId;
use crate::logging::level::LogLevel;
use crate::logging::sink::LogSink;

const CALLED: &str = "called";
const COMPLETED: &str = "completed";

const TEMPLATE: &str = "{Method} {Message}";
const TEMPLATE_WITH_PARAMS: &str = "{Method} {Parameters} {Message}";
const ERROR_TEMPLATE: &str = "{Method} {ErrorCode} {Message}";
const ERROR_TEMPLATE_WITH_PARAMS: &str = "{Method} {Parameters} {ErrorCode} {Message}";
const EXCEPTION_TEMPLATE: &str = "{Method} {ErrorCode} {Message} {ExceptionMessage} {StackTrace}";
const EXCEPTION_TEMPLATE_WITH_PARAMS: &str =
    "{Method} {Parameters} {ErrorCode} {Message} {ExceptionMessage} {StackTrace}";

/// Identity of a logical logging target, usually a component implementation.
///
/// Equality and hashing use the `TypeId` only.
#[derive(Clone, Copy)]
pub struct TargetType {
    id: TypeId,
    name: &'static str,
}

impl TargetType {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TargetType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TargetType {}

impl Hash for TargetType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A logger bound to one category.
pub struct Logger {
    category: Arc<str>,
    sink: Arc<dyn LogSink>,
}

/// Shared handle returned by the registry.
pub type LoggerHandle = Arc<Logger>;

impl Logger {
    pub fn new(category: impl Into<Arc<str>>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            category: category.into(),
            sink,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Hand a fully built entry to the sink.
    pub fn log(&self, entry: LogEntry) {
        if entry.level == LogLevel::None {
            return;
        }
        self.sink.emit(entry);
    }

    pub(crate) fn entry(
        &self,
        level: LogLevel,
        event_id: Option<EventId>,
        template: impl Into<std::borrow::Cow<'static, str>>,
    ) -> LogEntry {
        LogEntry::new(level, event_id, self.category.clone(), template)
    }

    /// Log the start of `method` at the configured phase level.
    pub fn log_method_started(&self, level: LogLevel, method: &str, parameters: Option<&str>) {
        self.log_phase(level, method, parameters, CALLED);
    }

    /// Log the completion of `method` at the configured phase level.
    pub fn log_method_completed(&self, level: LogLevel, method: &str, parameters: Option<&str>) {
        self.log_phase(level, method, parameters, COMPLETED);
    }

    fn log_phase(&self, level: LogLevel, method: &str, parameters: Option<&str>, message: &str) {
        match level.phase_level() {
            Some(LogLevel::Trace) => self.log_as_trace(method, parameters, message),
            Some(_) => self.log_as_information(method, parameters, message),
            None => {}
        }
    }

    pub fn log_as_trace(&self, method: &str, parameters: Option<&str>, message: &str) {
        self.log(self.plain(LogLevel::Trace, EventId::TRACE, method, parameters, message));
    }

    pub fn log_as_information(&self, method: &str, parameters: Option<&str>, message: &str) {
        self.log(self.plain(LogLevel::Information, EventId::INFORMATION, method, parameters, message));
    }

    /// Warning entry. An attached exception is carried as properties but is
    /// not part of the message template.
    pub fn log_as_warning(
        &self,
        method: &str,
        parameters: Option<&str>,
        message: &str,
        exception: Option<&Exception>,
    ) {
        let mut entry = self.plain(LogLevel::Warning, EventId::WARNING, method, parameters, message);
        if let Some(exception) = exception {
            let fields = exception.decompose();
            entry = entry
                .with("ExceptionMessage", fields.message)
                .with("InnerException", fields.inner)
                .with("StackTrace", fields.stack_trace);
        }
        self.log(entry);
    }

    /// Error entry tagged with `error_code`, optionally decomposing an exception.
    pub fn log_as_error(
        &self,
        method: &str,
        parameters: Option<&str>,
        error_code: &str,
        message: &str,
        exception: Option<&Exception>,
    ) {
        let (event_id, template) = match (exception.is_some(), parameters.is_some()) {
            (false, false) => (EventId::ERROR, ERROR_TEMPLATE),
            (false, true) => (EventId::ERROR_WITH_PARAMS, ERROR_TEMPLATE_WITH_PARAMS),
            (true, false) => (EventId::EXCEPTION, EXCEPTION_TEMPLATE),
            (true, true) => (EventId::EXCEPTION_WITH_PARAMS, EXCEPTION_TEMPLATE_WITH_PARAMS),
        };

        let mut entry = self.entry(LogLevel::Error, Some(event_id), template).with("Method", method);
        if let Some(parameters) = parameters {
            entry = entry.with("Parameters", parameters);
        }
        entry = entry.with("ErrorCode", error_code).with("Message", message);

        if let Some(exception) = exception {
            let fields = exception.decompose();
            entry = entry
                .with("ExceptionMessage", fields.message)
                .with("InnerException", fields.inner)
                .with("StackTrace", fields.stack_trace);
        }
        self.log(entry);
    }

    fn plain(
        &self,
        level: LogLevel,
        event_id: EventId,
        method: &str,
        parameters: Option<&str>,
        message: &str,
    ) -> LogEntry {
        match parameters {
            Some(parameters) => self
                .entry(level, Some(event_id), TEMPLATE_WITH_PARAMS)
                .with("Method", method)
                .with("Parameters", parameters)
                .with("Message", message),
            None => self
                .entry(level, Some(event_id), TEMPLATE)
                .with("Method", method)
                .with("Message", message),
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").field("category", &self.category).finish()
    }
}
