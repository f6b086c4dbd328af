//! Structured log entries and exception decomposition.

use serde_json::Value;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::borrow::Cow;
use std::sync::Arc;

use crate::logging::events::EventId;
use crate::logging::level::LogLevel;
use crate::logging::template;

pub const NO_INNER_EXCEPTION: &str = "No Inner Exception";
pub const NO_STACK_TRACE: &str = "No Stack Trace";

/// A single structured log record: a message template plus named properties.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub event_id: Option<EventId>,
    /// Logger category, normally the target type name.
    pub category: Arc<str>,
    pub template: Cow<'static, str>,
    pub properties: Vec<(&'static str, Value)>,
}

impl LogEntry {
    pub fn new(
        level: LogLevel,
        event_id: Option<EventId>,
        category: Arc<str>,
        template: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            level,
            event_id,
            category,
            template: template.into(),
            properties: Vec::new(),
        }
    }

    pub fn with(mut self, name: &'static str, value: impl Into<Value>) -> Self {
        self.properties.push((name, value.into()));
        self
    }

    /// String value of a property, if present and a string.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(Value::as_str)
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    /// The message with every placeholder substituted.
    pub fn render(&self) -> String {
        template::render(&self.template, &self.properties)
    }

    /// Properties as a JSON object, for sinks that ship structured payloads.
    pub fn properties_json(&self) -> Value {
        Value::Object(
            self.properties
                .iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect(),
        )
    }
}

/// Error detail attached to warning and error entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exception {
    message: String,
    inner: Option<String>,
    stack_trace: Option<String>,
}

impl Exception {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            inner: None,
            stack_trace: None,
        }
    }

    pub fn with_inner(mut self, inner: impl Into<String>) -> Self {
        self.inner = Some(inner.into());
        self
    }

    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = Some(stack_trace.into());
        self
    }

    /// Build from an error value; the first `source()` becomes the inner exception.
    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        Self {
            message: error.to_string(),
            inner: error.source().map(ToString::to_string),
            stack_trace: None,
        }
    }

    /// Like [`Exception::from_error`], also capturing a backtrace when
    /// `RUST_BACKTRACE`/`RUST_LIB_BACKTRACE` enable it.
    pub fn capture(error: &(dyn std::error::Error + 'static)) -> Self {
        let backtrace = Backtrace::capture();
        let mut exception = Self::from_error(error);
        if backtrace.status() == BacktraceStatus::Captured {
            exception.stack_trace = Some(backtrace.to_string());
        }
        exception
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn inner(&self) -> Option<&str> {
        self.inner.as_deref()
    }

    pub fn stack_trace(&self) -> Option<&str> {
        self.stack_trace.as_deref()
    }

    /// Decompose into single-line fields safe for line-oriented transports.
    pub fn decompose(&self) -> ExceptionFields {
        ExceptionFields {
            message: escape_line_breaks(&self.message),
            inner: self
                .inner
                .as_deref()
                .map(escape_line_breaks)
                .unwrap_or_else(|| NO_INNER_EXCEPTION.to_string()),
            stack_trace: self
                .stack_trace
                .as_deref()
                .map(escape_line_breaks)
                .unwrap_or_else(|| NO_STACK_TRACE.to_string()),
        }
    }
}

impl<E: std::error::Error + 'static> From<&E> for Exception {
    fn from(error: &E) -> Self {
        Exception::from_error(error)
    }
}

/// The three normalized exception fields written on an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionFields {
    pub message: String,
    pub inner: String,
    pub stack_trace: String,
}

/// Replace every line break (`\r\n`, `\n` or `\r`) with the two characters `\n`.
pub fn escape_line_breaks(s: &str) -> String {
    s.replace("\r\n", "\\n").replace(['\n', '\r'], "\\n")
}
