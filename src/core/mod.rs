//! Core logger types and traits

pub mod clock;
pub mod config;
pub mod entry;
pub mod error;
pub mod field;
pub mod handler;
pub mod level;
pub mod level_value;
pub mod logger;
pub mod metrics;
pub mod output;
pub mod pool;
pub mod stacktrace;
pub mod timestamp;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::EnvConfig;
pub use entry::{Caller, Entry};
pub use error::{LoggerError, Result};
pub use field::{Field, FieldValue, SharedError, ToJson, ERROR_KEY};
pub use handler::Handler;
pub use level::{parse_level, Level};
pub use level_value::LevelValue;
pub use logger::{LogScope, Logger, LoggerBuilder, DEFAULT_ENTRY_POOL_CAPACITY};
pub use metrics::LoggerMetrics;
pub use output::{MemorySink, Output};
pub use pool::{buffer_pool, Buffer, Pool, Pooled, Recycle};
pub use stacktrace::{find_stack_trace, Frame, StackTrace, TracedError};
pub use timestamp::{format_rfc3339_nanos, TimestampFormat};
