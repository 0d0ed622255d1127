//! Logging macros for ergonomic log message formatting.
//!
//! The message is built with `format_args!`, so nothing is formatted when no
//! handler accepts the level. Call-site fields go in a leading
//! `fields: [...]` list.
//!
//! # Examples
//!
//! ```
//! use pine_logger::{info, Field, Logger, MemorySink};
//!
//! let sink = MemorySink::new();
//! let logger = Logger::builder().output(sink.clone()).build();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // With fields
//! info!(logger, fields: [Field::int("port", port)], "listening");
//! assert!(sink.contents().ends_with(" INF listening port=8080\n"));
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use pine_logger::{Field, Level, Logger};
/// # let logger = Logger::builder().build();
/// use pine_logger::log;
/// log!(logger, Level::Info, "Simple message");
/// log!(logger, Level::Error, "Error code: {}", 500);
/// log!(logger, Level::Warn, fields: [Field::int("code", 429)], "throttled");
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, fields: [$($field:expr),* $(,)?], $($arg:tt)+) => {
        $logger.log($level, format_args!($($arg)+), [$($field),*])
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log(
            $level,
            format_args!($($arg)+),
            ::core::iter::empty::<$crate::Field>(),
        )
    };
}

/// Log a trace-level message.
///
/// # Examples
///
/// ```
/// # use pine_logger::{Level, Logger};
/// # let logger = Logger::builder().level(Level::Trace).build();
/// use pine_logger::trace;
/// trace!(logger, "Entering function: calculate()");
/// trace!(logger, "Variable value: {}", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use pine_logger::{Field, Logger};
/// # let logger = Logger::builder().build();
/// use pine_logger::error;
/// let err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml");
/// error!(logger, fields: [Field::err(err)], "Failed to load {}", "config");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

/// Log a fatal-level message. The process keeps running.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Fatal, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Field, Level, Logger, MemorySink};

    fn logger(sink: &MemorySink) -> Logger {
        Logger::builder()
            .level(Level::Trace)
            .output(sink.clone())
            .build()
    }

    #[test]
    fn test_log_macro() {
        let sink = MemorySink::new();
        let logger = logger(&sink);
        log!(logger, Level::Info, "Test message");
        log!(logger, Level::Warn, "Value: {}", 42);
        let contents = sink.contents();
        assert!(contents.contains(" INF Test message\n"));
        assert!(contents.contains(" WRN Value: 42\n"));
    }

    #[test]
    fn test_level_macros() {
        let sink = MemorySink::new();
        let logger = logger(&sink);
        trace!(logger, "trace {}", 1);
        debug!(logger, "debug {}", 2);
        info!(logger, "info {}", 3);
        warn!(logger, "warn {}", 4);
        error!(logger, "error {}", 5);
        fatal!(logger, "fatal {}", 6);

        let lines: Vec<String> = sink.contents().lines().map(str::to_string).collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].ends_with(" TRC trace 1"));
        assert!(lines[5].ends_with(" FTL fatal 6"));
    }

    #[test]
    fn test_macro_fields() {
        let sink = MemorySink::new();
        let logger = logger(&sink);
        info!(
            logger,
            fields: [Field::int("b", 2), Field::int("a", 1),],
            "user {} logged in",
            "alice"
        );
        assert!(sink.contents().ends_with(" INF user alice logged in a=1 b=2\n"));
    }

    #[test]
    fn test_macro_with_expressions() {
        let sink = MemorySink::new();
        let logger = logger(&sink);
        let user = "bob";
        let count = 5;
        info!(logger, "User {} has {} items", user, count);
        assert!(sink.contents().ends_with(" INF User bob has 5 items\n"));
    }
}
