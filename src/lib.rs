//! # Pine Logger
//!
//! A structured logger: typed key/value fields, a human-readable console
//! format and GELF shipping over a reconnecting TCP connection.
//!
//! ## Features
//!
//! - **Typed fields**: strings, integers, floats, times, errors and any
//!   `Serialize` value
//! - **Multiple handlers**: each with its own live-adjustable level
//! - **Thread safe**: one write lock per logger family, lines never interleave
//! - **Low churn**: entries and encode buffers are pooled
//! - **Stack traces**: attached from errors wrapped in [`TracedError`]
//!
//! ## Example
//!
//! ```
//! use pine_logger::prelude::*;
//!
//! let sink = MemorySink::new();
//! let logger = Logger::builder()
//!     .level(Level::Info)
//!     .output(sink.clone())
//!     .fields([Field::string("service", "billing")])
//!     .build();
//!
//! let request = logger.with([Field::int("request_id", 7)]);
//! request.info("charged", [Field::float64("amount", 12.5)]);
//!
//! assert!(sink
//!     .contents()
//!     .ends_with(" INF charged amount=1.25E+01 request_id=7 service=billing\n"));
//! ```

pub mod core;
pub mod encoders;
pub mod handlers;
pub mod macros;
pub mod transport;

pub mod prelude {
    pub use crate::core::{
        Clock, Field, FixedClock, Handler, Level, LevelValue, Logger, LoggerBuilder, LoggerError,
        MemorySink, Output, Result, TimestampFormat, TracedError,
    };
}

pub use crate::core::{
    buffer_pool, find_stack_trace, format_rfc3339_nanos, parse_level, Buffer, Caller, Clock,
    EnvConfig, Entry, Field, FieldValue, FixedClock, Frame, Handler, Level, LevelValue, LogScope,
    Logger, LoggerBuilder, LoggerError, LoggerMetrics, MemorySink, Output, Pool, Pooled, Recycle,
    Result, SharedError, StackTrace, SystemClock, TimestampFormat, ToJson, TracedError,
    DEFAULT_ENTRY_POOL_CAPACITY, ERROR_KEY,
};
pub use encoders::{ConsoleConfig, ConsoleEncoder, Encoder, GelfEncoder};
pub use handlers::{ConsoleHandler, GelfHandler};
pub use transport::{TcpWriter, Transport};
