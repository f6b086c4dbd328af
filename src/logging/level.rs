//! Log level enumeration and parsing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a structured log entry.
///
/// `None` is the "disabled" level: a phase configured with it emits nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Information,
    Warning,
    Error,
    Critical,
    None,
}

impl LogLevel {
    pub const ALL: [LogLevel; 7] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Information,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
        LogLevel::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "Trace",
            LogLevel::Debug => "Debug",
            LogLevel::Information => "Information",
            LogLevel::Warning => "Warning",
            LogLevel::Error => "Error",
            LogLevel::Critical => "Critical",
            LogLevel::None => "None",
        }
    }

    /// The level a method start/finish entry is actually written at.
    ///
    /// Only `Trace` and `Information` are distinguished; `None` suppresses the
    /// entry and every other level collapses to `Information`.
    pub fn phase_level(&self) -> Option<LogLevel> {
        match self {
            LogLevel::None => None,
            LogLevel::Trace => Some(LogLevel::Trace),
            _ => Some(LogLevel::Information),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a [`LogLevel`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level: {0:?}")]
pub struct ParseLevelError(pub String);

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        LogLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseLevelError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Trace".parse::<LogLevel>(), Ok(LogLevel::Trace));
        assert_eq!("trace".parse::<LogLevel>(), Ok(LogLevel::Trace));
        assert_eq!("INFORMATION".parse::<LogLevel>(), Ok(LogLevel::Information));
        assert_eq!(" warning ".parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert!("bogus".parse::<LogLevel>().is_err());
        assert!("".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_phase_level_collapses() {
        assert_eq!(LogLevel::None.phase_level(), None);
        assert_eq!(LogLevel::Trace.phase_level(), Some(LogLevel::Trace));
        assert_eq!(LogLevel::Information.phase_level(), Some(LogLevel::Information));
        for level in [LogLevel::Debug, LogLevel::Warning, LogLevel::Error, LogLevel::Critical] {
            assert_eq!(level.phase_level(), Some(LogLevel::Information));
        }
    }
}
