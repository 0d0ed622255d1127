//! Log level definitions

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log call, and the verbosity threshold of a handler.
///
/// Levels are ordered from quietest to most verbose. A handler whose
/// threshold is `T` accepts a call at level `L` iff `T >= L`, so `Disabled`
/// accepts nothing and `Trace` accepts everything. A call made at `Disabled`
/// is never accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Level {
    #[default]
    #[serde(rename = "")]
    Disabled = 0,
    Panic = 1,
    Fatal = 2,
    Error = 3,
    Warn = 4,
    Info = 5,
    Debug = 6,
    Trace = 7,
}

impl Level {
    pub const ALL: [Level; 8] = [
        Level::Disabled,
        Level::Panic,
        Level::Fatal,
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Debug,
        Level::Trace,
    ];

    /// Canonical lowercase name; `Disabled` is the empty string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Disabled => "",
            Level::Panic => "panic",
            Level::Fatal => "fatal",
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Trace => "trace",
        }
    }

    /// Three-letter code used by the console encoder.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Level::Trace => "TRC",
            Level::Debug => "DBG",
            Level::Info => "INF",
            Level::Warn => "WRN",
            Level::Error => "ERR",
            Level::Panic => "PNC",
            Level::Fatal => "FTL",
            Level::Disabled => "???",
        }
    }

    /// Syslog-style severity used by GELF.
    pub fn gelf_severity(&self) -> i32 {
        match self {
            Level::Trace | Level::Debug => 7,
            Level::Info => 6,
            Level::Warn => 4,
            Level::Error => 3,
            Level::Panic => 2,
            Level::Fatal => 1,
            Level::Disabled => 7,
        }
    }

    /// Whether a threshold of `self` lets a call at `level` through.
    #[inline]
    pub fn enables(&self, level: Level) -> bool {
        level != Level::Disabled && *self >= level
    }

    pub(crate) fn from_u8(value: u8) -> Level {
        match value {
            1 => Level::Panic,
            2 => Level::Fatal,
            3 => Level::Error,
            4 => Level::Warn,
            5 => Level::Info,
            6 => Level::Debug,
            7 => Level::Trace,
            _ => Level::Disabled,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Level::Trace),
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "panic" => Ok(Level::Panic),
            "fatal" => Ok(Level::Fatal),
            "" => Ok(Level::Disabled),
            _ => Err(LoggerError::invalid_level(s)),
        }
    }
}

/// Parse a level name. The empty string means [`Level::Disabled`].
pub fn parse_level(text: &str) -> Result<Level, LoggerError> {
    text.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("fatal").unwrap(), Level::Fatal);
        assert_eq!(parse_level("panic").unwrap(), Level::Panic);
        assert_eq!(parse_level("error").unwrap(), Level::Error);
        assert_eq!(parse_level("warn").unwrap(), Level::Warn);
        assert_eq!(parse_level("info").unwrap(), Level::Info);
        assert_eq!(parse_level("debug").unwrap(), Level::Debug);
        assert_eq!(parse_level("trace").unwrap(), Level::Trace);
        assert_eq!(parse_level("").unwrap(), Level::Disabled);
        assert_eq!(parse_level("TRACE").unwrap(), Level::Trace);
    }

    #[test]
    fn test_parse_invalid_level() {
        let err = parse_level("verbose").unwrap_err();
        assert!(matches!(err, LoggerError::InvalidLevel(ref s) if s == "verbose"));
    }

    #[test]
    fn test_threshold_filtering() {
        let threshold = Level::Info;
        for level in [Level::Info, Level::Warn, Level::Error, Level::Fatal, Level::Panic] {
            assert!(threshold.enables(level), "{:?} should pass", level);
        }
        assert!(!threshold.enables(Level::Debug));
        assert!(!threshold.enables(Level::Trace));
        assert!(!Level::Disabled.enables(Level::Panic));
        assert!(!Level::Trace.enables(Level::Disabled));
    }

    #[test]
    fn test_abbreviations_and_severity() {
        assert_eq!(Level::Warn.abbreviation(), "WRN");
        assert_eq!(Level::Disabled.abbreviation(), "???");
        assert_eq!(Level::Debug.gelf_severity(), 7);
        assert_eq!(Level::Fatal.gelf_severity(), 1);
    }

    #[test]
    fn test_u8_round_trip() {
        for level in Level::ALL {
            assert_eq!(Level::from_u8(level as u8), level);
        }
        assert_eq!(Level::from_u8(42), Level::Disabled);
    }

    #[test]
    fn test_serde_uses_names() {
        assert_eq!(serde_json::to_string(&Level::Warn).unwrap(), "\"warn\"");
        assert_eq!(serde_json::to_string(&Level::Disabled).unwrap(), "\"\"");
        let level: Level = serde_json::from_str("\"debug\"").unwrap();
        assert_eq!(level, Level::Debug);
    }
}
