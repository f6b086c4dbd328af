//! Event ids, error codes and the catalogue of well-known failure events.

use serde::Serialize;
use std::fmt;

/// Category tag attached to every entry the emitter writes.
///
/// Values are fixed for the life of the process so downstream sinks can
/// filter and route on them. `EXCEPTION` and `EXCEPTION_WITH_PARAMS` share a
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EventId(pub u16);

impl EventId {
    pub const TRACE: EventId = EventId(103);
    pub const INFORMATION: EventId = EventId(104);
    pub const WARNING: EventId = EventId(105);
    pub const ERROR: EventId = EventId(106);
    pub const ERROR_WITH_PARAMS: EventId = EventId(107);
    pub const EXCEPTION: EventId = EventId(108);
    pub const EXCEPTION_WITH_PARAMS: EventId = EventId(108);

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error codes tagging a failure class on error entries.
pub mod error_codes {
    pub const UNHANDLED_EXCEPTION: &str = "ERR_UNHANDLED_EXCEPTION";
    pub const BUSINESS_RULE_FAILURE: &str = "ERR_BUSINESS_RULE_FAILED";
    pub const API_UNSUCCESSFUL: &str = "ERR_API_FAILED";
    pub const API_FAULTED_OR_CANCELLED: &str = "ERR_API_FAULTED_OR_CANCELLED";
    pub const EMPTY_LOGS: &str = "ERR_EMPTY_LOG_EVENT_REQUEST";
}

/// An error code paired with its canonical description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogEvent {
    pub code: &'static str,
    pub description: &'static str,
}

impl LogEvent {
    pub const UNHANDLED_EXCEPTION: LogEvent = LogEvent {
        code: error_codes::UNHANDLED_EXCEPTION,
        description: "An unhandled exception occurred in the application.",
    };

    pub const API_UNSUCCESSFUL: LogEvent = LogEvent {
        code: error_codes::API_UNSUCCESSFUL,
        description: "API call didn't return a successful status code",
    };

    pub const ONE_OR_MORE_API_UNSUCCESSFUL: LogEvent = LogEvent {
        code: error_codes::API_UNSUCCESSFUL,
        description: "One or more API call(s) didn't return a successful status code",
    };

    pub const ONE_OR_MORE_API_FAULTED_OR_CANCELLED: LogEvent = LogEvent {
        code: error_codes::API_FAULTED_OR_CANCELLED,
        description: "One or more parallel API call(s) was cancelled or faulted",
    };

    pub const BUSINESS_RULE_FAILURE: LogEvent = LogEvent {
        code: error_codes::BUSINESS_RULE_FAILURE,
        description: "A condition or a business rule failed",
    };

    pub const EMPTY_LOGS: LogEvent = LogEvent {
        code: error_codes::EMPTY_LOGS,
        description: "No logs found",
    };
}
