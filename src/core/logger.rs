//! Main logger implementation

use super::{
    clock::{Clock, SystemClock},
    config::EnvConfig,
    entry::{Caller, Entry},
    error::{LoggerError, Result},
    field::Field,
    handler::Handler,
    level::Level,
    level_value::LevelValue,
    metrics::LoggerMetrics,
    output::Output,
    pool::Pool,
    stacktrace::find_stack_trace,
    timestamp::TimestampFormat,
};
use crate::encoders::{ConsoleConfig, ConsoleEncoder, GelfEncoder};
use crate::handlers::{ConsoleHandler, GelfHandler};
use crate::transport::{TcpWriter, Transport, DEFAULT_MAX_RECONNECT, DEFAULT_RECONNECT_DELAY};
use parking_lot::Mutex;
use std::any::Any;
use std::fmt::{self, Write as _};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

/// Idle entries kept per logger family
pub const DEFAULT_ENTRY_POOL_CAPACITY: usize = 256;

/// Structured logger
///
/// Every call builds one [`Entry`] and hands it to each handler whose level
/// accepts the call, one logger family at a time: loggers derived with
/// [`Logger::with`] share a single write lock, so lines from concurrent
/// callers never interleave. Sink failures are reported to the error
/// output and never reach the caller.
///
/// # Example
///
/// ```
/// use pine_logger::{Field, Level, Logger, MemorySink};
///
/// let sink = MemorySink::new();
/// let logger = Logger::builder()
///     .level(Level::Info)
///     .output(sink.clone())
///     .build();
///
/// logger.info("started", [Field::int("workers", 4)]);
/// logger.debug("not shown", []);
/// assert!(sink.contents().ends_with(" INF started workers=4\n"));
/// ```
pub struct Logger {
    handlers: Vec<Box<dyn Handler>>,
    /// Sticky fields, unique by key
    fields: Vec<Field>,
    clock: Arc<dyn Clock>,
    err_out: Option<Output>,
    stack_trace_level: LevelValue,
    lock: Arc<Mutex<()>>,
    entries: Arc<Pool<Entry>>,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Logger configured from the `PINE_*` environment variables.
    #[must_use]
    pub fn new() -> Self {
        LoggerBuilder::from_env().build()
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Log `message` at `level` with call-site `fields`.
    ///
    /// Sticky fields are appended after the call-site fields. Nothing is
    /// allocated when no handler accepts `level`.
    #[track_caller]
    pub fn log(
        &self,
        level: Level,
        message: impl fmt::Display,
        fields: impl IntoIterator<Item = Field>,
    ) {
        if !self.is_enabled(level) {
            self.metrics.record_disabled();
            return;
        }
        let caller = Caller::here();

        let mut entry = self.entries.get();
        entry.set_header(level, self.clock.now());
        let _ = write!(entry.message_mut(), "{}", message);
        entry.set_caller(Some(caller));
        entry.fields_mut().extend(fields);

        // One stack per entry: the first traced error in call order wins.
        if self.stack_trace_level.is_enabled(level) {
            let stack = entry
                .fields()
                .iter()
                .filter_map(Field::error)
                .find_map(|err| find_stack_trace(err))
                .cloned();
            entry.set_stack(stack);
        }

        entry.fields_mut().extend(self.fields.iter().cloned());

        let _guard = self.lock.lock();
        for handler in &self.handlers {
            if handler.is_enabled(level) {
                self.dispatch(handler.as_ref(), &entry);
            }
        }
    }

    #[track_caller]
    pub fn trace(&self, message: impl fmt::Display, fields: impl IntoIterator<Item = Field>) {
        self.log(Level::Trace, message, fields);
    }

    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display, fields: impl IntoIterator<Item = Field>) {
        self.log(Level::Debug, message, fields);
    }

    #[track_caller]
    pub fn info(&self, message: impl fmt::Display, fields: impl IntoIterator<Item = Field>) {
        self.log(Level::Info, message, fields);
    }

    #[track_caller]
    pub fn warn(&self, message: impl fmt::Display, fields: impl IntoIterator<Item = Field>) {
        self.log(Level::Warn, message, fields);
    }

    #[track_caller]
    pub fn error(&self, message: impl fmt::Display, fields: impl IntoIterator<Item = Field>) {
        self.log(Level::Error, message, fields);
    }

    /// Log at `Panic` level. Does not unwind.
    #[track_caller]
    pub fn panic(&self, message: impl fmt::Display, fields: impl IntoIterator<Item = Field>) {
        self.log(Level::Panic, message, fields);
    }

    /// Log at `Fatal` level. Does not exit.
    #[track_caller]
    pub fn fatal(&self, message: impl fmt::Display, fields: impl IntoIterator<Item = Field>) {
        self.log(Level::Fatal, message, fields);
    }

    /// Whether any handler currently accepts `level`.
    pub fn is_enabled(&self, level: Level) -> bool {
        self.handlers.iter().any(|handler| handler.is_enabled(level))
    }

    /// Derived logger with `fields` added to the sticky fields.
    ///
    /// A sticky field replaces an existing one with the same key. The
    /// derived logger shares handlers' levels and sinks, the write lock, the
    /// entry pool and the metrics; `self` is left untouched.
    #[must_use]
    pub fn with(&self, fields: impl IntoIterator<Item = Field>) -> Logger {
        let mut logger = self.clone();
        for field in fields {
            logger.set_field(field);
        }
        logger
    }

    /// Fields for the next level call only.
    ///
    /// ```
    /// use pine_logger::{Field, Logger, MemorySink};
    ///
    /// let sink = MemorySink::new();
    /// let logger = Logger::builder().output(sink.clone()).build();
    /// logger.with_fields([Field::string("job", "sync")]).warn("slow");
    /// assert!(sink.contents().ends_with(" WRN slow job=sync\n"));
    /// ```
    pub fn with_fields(&self, fields: impl IntoIterator<Item = Field>) -> LogScope<'_> {
        LogScope {
            logger: self,
            fields: fields.into_iter().collect(),
        }
    }

    /// Close every handler. GELF handlers close their connection.
    pub fn close(&self) {
        let _guard = self.lock.lock();
        for handler in &self.handlers {
            if let Err(err) = handler.close() {
                self.report(format_args!("{} close error: {}", handler.name(), err));
            }
        }
    }

    pub fn flush(&self) {
        let _guard = self.lock.lock();
        for handler in &self.handlers {
            if let Err(err) = handler.flush() {
                self.report(format_args!("{} flush error: {}", handler.name(), err));
            }
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Threshold at and above which error stacks are attached.
    pub fn stack_trace_level(&self) -> &LevelValue {
        &self.stack_trace_level
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    fn set_field(&mut self, field: Field) {
        match self.fields.iter_mut().find(|f| f.key() == field.key()) {
            Some(slot) => *slot = field,
            None => self.fields.push(field),
        }
    }

    /// Write `entry` to one handler with panic isolation.
    fn dispatch(&self, handler: &dyn Handler, entry: &Entry) {
        let result = panic::catch_unwind(AssertUnwindSafe(|| handler.write(entry)));

        match result {
            Ok(Ok(())) => {
                self.metrics.record_write_succeeded();
            }
            Ok(Err(err)) => {
                self.metrics.record_write_failed();
                self.report(format_args!(
                    "{} write error: {}",
                    TimestampFormat::Millis.format(entry.time()),
                    err
                ));
            }
            Err(panic_info) => {
                self.metrics.record_write_failed();
                let err = LoggerError::handler_panicked(handler.name(), panic_message(&*panic_info));
                self.report(format_args!(
                    "{} write error: {}",
                    TimestampFormat::Millis.format(entry.time()),
                    err
                ));
            }
        }
    }

    fn report(&self, line: fmt::Arguments<'_>) {
        if let Some(err_out) = &self.err_out {
            err_out.write_line(line);
        }
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

impl Clone for Logger {
    /// Same family: handlers are re-created around shared levels and sinks.
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.iter().map(|h| h.clone_handler()).collect(),
            fields: self.fields.clone(),
            clock: Arc::clone(&self.clock),
            err_out: self.err_out.clone(),
            stack_trace_level: self.stack_trace_level.clone(),
            lock: Arc::clone(&self.lock),
            entries: Arc::clone(&self.entries),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field(
                "handlers",
                &self.handlers.iter().map(|h| h.name()).collect::<Vec<_>>(),
            )
            .field("fields", &self.fields)
            .field("stack_trace_level", &self.stack_trace_level)
            .finish_non_exhaustive()
    }
}

/// Fields waiting for a level call, from [`Logger::with_fields`].
pub struct LogScope<'a> {
    logger: &'a Logger,
    fields: Vec<Field>,
}

impl LogScope<'_> {
    #[track_caller]
    pub fn log(&self, level: Level, message: impl fmt::Display) {
        self.logger.log(level, message, self.fields.iter().cloned());
    }

    #[track_caller]
    pub fn trace(&self, message: impl fmt::Display) {
        self.log(Level::Trace, message);
    }

    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log(Level::Debug, message);
    }

    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) {
        self.log(Level::Info, message);
    }

    #[track_caller]
    pub fn warn(&self, message: impl fmt::Display) {
        self.log(Level::Warn, message);
    }

    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) {
        self.log(Level::Error, message);
    }

    #[track_caller]
    pub fn panic(&self, message: impl fmt::Display) {
        self.log(Level::Panic, message);
    }

    #[track_caller]
    pub fn fatal(&self, message: impl fmt::Display) {
        self.log(Level::Fatal, message);
    }
}

/// Builder for [`Logger`]
///
/// Defaults: console at `Debug` on stderr without colors, diagnostics on
/// stderr, stack traces from `Error`, system clock, GELF off.
pub struct LoggerBuilder {
    level: LevelValue,
    console: ConsoleConfig,
    output: Option<Output>,
    err_out: Option<Output>,
    stack_trace_level: LevelValue,
    clock: Arc<dyn Clock>,
    fields: Vec<Field>,
    gelf_enabled: bool,
    gelf_address: String,
    gelf_level: Option<LevelValue>,
    gelf_extra_fields: Vec<Field>,
    gelf_hostname: Option<String>,
    gelf_transport: Option<Arc<dyn Transport>>,
    max_reconnect: u32,
    reconnect_delay: Duration,
    handlers: Vec<Box<dyn Handler>>,
    entry_pool_capacity: usize,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            level: LevelValue::new(Level::Debug),
            console: ConsoleConfig::default(),
            output: None,
            err_out: Some(Output::stderr()),
            stack_trace_level: LevelValue::new(Level::Error),
            clock: Arc::new(SystemClock),
            fields: Vec::new(),
            gelf_enabled: false,
            gelf_address: String::new(),
            gelf_level: None,
            gelf_extra_fields: Vec::new(),
            gelf_hostname: None,
            gelf_transport: None,
            max_reconnect: DEFAULT_MAX_RECONNECT,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            handlers: Vec::new(),
            entry_pool_capacity: DEFAULT_ENTRY_POOL_CAPACITY,
        }
    }

    /// Builder seeded from the `PINE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_config(EnvConfig::from_env())
    }

    pub fn from_config(config: EnvConfig) -> Self {
        Self::new()
            .level(config.level)
            .colors(config.use_colors)
            .gelf_enabled(config.gelf_enabled)
            .gelf_address(config.gelf_address)
            .gelf_level(config.gelf_level)
            .gelf_extra_fields(config.gelf_extra_fields)
    }

    /// Console verbosity
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: Level) -> Self {
        self.level = LevelValue::new(level);
        self
    }

    /// Console verbosity controlled through a shared cell
    #[must_use = "builder methods return a new value"]
    pub fn level_value(mut self, level: LevelValue) -> Self {
        self.level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn colors(mut self, use_colors: bool) -> Self {
        self.console.use_colors = use_colors;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn force_quote(mut self, force_quote: bool) -> Self {
        self.console.force_quote = force_quote;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn quote_empty_fields(mut self, quote_empty_fields: bool) -> Self {
        self.console.quote_empty_fields = quote_empty_fields;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn disable_quote(mut self, disable_quote: bool) -> Self {
        self.console.disable_quote = disable_quote;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn disable_sorting(mut self, disable_sorting: bool) -> Self {
        self.console.disable_sorting = disable_sorting;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn report_caller(mut self, report_caller: bool) -> Self {
        self.console.report_caller = report_caller;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.console.timestamp_format = format;
        self
    }

    /// Attach error stacks to calls at `level` and more severe.
    /// `Level::Disabled` turns stack capture off.
    #[must_use = "builder methods return a new value"]
    pub fn stack_trace_level(mut self, level: Level) -> Self {
        self.stack_trace_level = LevelValue::new(level);
        self
    }

    /// Console output; stderr when not set.
    #[must_use = "builder methods return a new value"]
    pub fn output(mut self, output: impl Into<Output>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Where write and close failures are reported; stderr when not set.
    #[must_use = "builder methods return a new value"]
    pub fn error_output(mut self, output: impl Into<Output>) -> Self {
        self.err_out = Some(output.into());
        self
    }

    /// Drop write and close failures silently.
    #[must_use = "builder methods return a new value"]
    pub fn no_error_output(mut self) -> Self {
        self.err_out = None;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Sticky fields; a later field replaces an earlier one with the same key.
    #[must_use = "builder methods return a new value"]
    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        for field in fields {
            match self.fields.iter_mut().find(|f| f.key() == field.key()) {
                Some(slot) => *slot = field,
                None => self.fields.push(field),
            }
        }
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn gelf_enabled(mut self, enabled: bool) -> Self {
        self.gelf_enabled = enabled;
        self
    }

    /// GELF `host:port`
    #[must_use = "builder methods return a new value"]
    pub fn gelf_address(mut self, address: impl Into<String>) -> Self {
        self.gelf_address = address.into();
        self
    }

    /// GELF verbosity; defaults to the console level at build time.
    #[must_use = "builder methods return a new value"]
    pub fn gelf_level(mut self, level: Level) -> Self {
        self.gelf_level = Some(LevelValue::new(level));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn gelf_level_value(mut self, level: LevelValue) -> Self {
        self.gelf_level = Some(level);
        self
    }

    /// Fields added to every GELF message.
    #[must_use = "builder methods return a new value"]
    pub fn gelf_extra_fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.gelf_extra_fields.extend(fields);
        self
    }

    /// Override the local hostname reported in GELF messages.
    #[must_use = "builder methods return a new value"]
    pub fn gelf_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.gelf_hostname = Some(hostname.into());
        self
    }

    /// Retry policy of the GELF TCP connection
    #[must_use = "builder methods return a new value"]
    pub fn gelf_reconnect(mut self, max_reconnect: u32, delay: Duration) -> Self {
        self.max_reconnect = max_reconnect;
        self.reconnect_delay = delay;
        self
    }

    /// Ship GELF messages over `transport` instead of TCP.
    #[must_use = "builder methods return a new value"]
    pub fn gelf_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.gelf_transport = Some(transport);
        self
    }

    /// Add a custom handler after the built-in ones.
    #[must_use = "builder methods return a new value"]
    pub fn handler<H: Handler + 'static>(mut self, handler: H) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn entry_pool_capacity(mut self, capacity: usize) -> Self {
        self.entry_pool_capacity = capacity;
        self
    }

    /// Build, rejecting an enabled GELF handler without an address.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` when GELF is enabled with neither an address
    /// nor a transport.
    pub fn try_build(self) -> Result<Logger> {
        self.validate()?;
        Ok(self.assemble())
    }

    /// Build. An invalid GELF setup is reported to the error output and the
    /// GELF handler is left out.
    pub fn build(mut self) -> Logger {
        if let Err(err) = self.validate() {
            if let Some(err_out) = &self.err_out {
                err_out.write_line(format_args!(
                    "{} config error: {}",
                    TimestampFormat::Millis.format(&self.clock.now()),
                    err
                ));
            }
            self.gelf_enabled = false;
        }
        self.assemble()
    }

    fn validate(&self) -> Result<()> {
        if self.gelf_enabled && self.gelf_transport.is_none() && self.gelf_address.is_empty() {
            return Err(LoggerError::config("gelf", "address is empty"));
        }
        Ok(())
    }

    fn assemble(self) -> Logger {
        let mut handlers: Vec<Box<dyn Handler>> = Vec::with_capacity(self.handlers.len() + 2);
        handlers.push(Box::new(ConsoleHandler::new(
            self.level.clone(),
            ConsoleEncoder::from_config(self.console),
            self.output.unwrap_or_else(Output::stderr),
        )));

        if self.gelf_enabled {
            let level = self
                .gelf_level
                .unwrap_or_else(|| LevelValue::new(self.level.get()));
            let mut encoder = GelfEncoder::new(self.gelf_extra_fields);
            if let Some(hostname) = self.gelf_hostname {
                encoder = encoder.with_hostname(hostname);
            }
            let transport: Arc<dyn Transport> = match self.gelf_transport {
                Some(transport) => transport,
                None => Arc::new(
                    TcpWriter::new(self.gelf_address)
                        .with_max_reconnect(self.max_reconnect)
                        .with_reconnect_delay(self.reconnect_delay),
                ),
            };
            handlers.push(Box::new(GelfHandler::new(level, encoder, transport)));
        }

        handlers.extend(self.handlers);

        Logger {
            handlers,
            fields: self.fields,
            clock: self.clock,
            err_out: self.err_out,
            stack_trace_level: self.stack_trace_level,
            lock: Arc::new(Mutex::new(())),
            entries: Arc::new(Pool::new(self.entry_pool_capacity)),
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FixedClock, Frame, MemorySink, TracedError};
    use chrono::{TimeZone, Utc};
    use std::io;

    fn clock() -> FixedClock {
        FixedClock(
            Utc.with_ymd_and_hms(2022, 8, 10, 21, 29, 59)
                .unwrap()
                .fixed_offset()
                + chrono::Duration::milliseconds(123),
        )
    }

    fn logger(sink: &MemorySink) -> LoggerBuilder {
        Logger::builder().output(sink.clone()).clock(clock())
    }

    struct PanickingHandler;

    impl Handler for PanickingHandler {
        fn is_enabled(&self, _level: Level) -> bool {
            true
        }

        fn write(&self, _entry: &Entry) -> Result<()> {
            panic!("handler exploded");
        }

        fn clone_handler(&self) -> Box<dyn Handler> {
            Box::new(PanickingHandler)
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    struct FailingCloseHandler;

    impl Handler for FailingCloseHandler {
        fn is_enabled(&self, _level: Level) -> bool {
            false
        }

        fn write(&self, _entry: &Entry) -> Result<()> {
            Ok(())
        }

        fn close(&self) -> Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "already gone").into())
        }

        fn clone_handler(&self) -> Box<dyn Handler> {
            Box::new(FailingCloseHandler)
        }

        fn name(&self) -> &str {
            "gelf"
        }
    }

    #[test]
    fn test_builder_defaults() {
        let logger = Logger::builder().build();
        assert!(logger.is_enabled(Level::Debug));
        assert!(!logger.is_enabled(Level::Trace));
        assert_eq!(logger.stack_trace_level().get(), Level::Error);
        assert!(logger.fields().is_empty());
    }

    #[test]
    fn test_disabled_call_is_counted() {
        let sink = MemorySink::new();
        let logger = logger(&sink).level(Level::Info).build();
        logger.debug("hidden", []);
        assert_eq!(sink.contents(), "");
        assert_eq!(logger.metrics().disabled_calls(), 1);
        assert_eq!(logger.metrics().writes_succeeded(), 0);
    }

    #[test]
    fn test_sticky_fields_replace_by_key() {
        let sink = MemorySink::new();
        let logger = logger(&sink)
            .fields([Field::string("a", "1"), Field::string("a", "2")])
            .build();
        let derived = logger.with([Field::string("a", "3"), Field::string("b", "4")]);

        assert_eq!(logger.fields().len(), 1);
        assert_eq!(derived.fields().len(), 2);

        logger.info("m", []);
        derived.info("m", []);
        assert_eq!(
            sink.contents(),
            "2022-08-10T21:29:59.123Z INF m a=2\n2022-08-10T21:29:59.123Z INF m a=3 b=4\n"
        );
    }

    #[test]
    fn test_stack_threshold() {
        let sink = MemorySink::new();
        let logger = logger(&sink).stack_trace_level(Level::Error).build();
        let err = || {
            Field::err(TracedError::with_frames(
                io::Error::new(io::ErrorKind::Other, "boom"),
                vec![Frame::new("work", "job.rs", 5)],
            ))
        };

        logger.warn("below threshold", [err()]);
        assert!(!sink.contents().contains("stack="));

        logger.error("at threshold", [err()]);
        assert!(sink.contents().contains("stack="));
    }

    #[test]
    fn test_first_traced_error_supplies_the_stack() {
        let sink = MemorySink::new();
        let logger = logger(&sink).stack_trace_level(Level::Error).build();
        let traced = |func: &'static str, line| {
            TracedError::with_frames(
                io::Error::new(io::ErrorKind::Other, func),
                vec![Frame::new(func, "job.rs", line)],
            )
        };

        logger.error(
            "two failures",
            [
                Field::err(io::Error::new(io::ErrorKind::Other, "plain")),
                Field::err(traced("fetch", 5)),
                Field::err(traced("store", 9)),
            ],
        );

        let line = sink.contents();
        assert_eq!(line.matches("stack=").count(), 1, "{}", line);
        assert!(line.contains("\\\"func\\\":\\\"fetch\\\""), "{}", line);
        assert!(!line.contains("\\\"func\\\":\\\"store\\\""), "{}", line);
    }

    #[test]
    fn test_write_failure_is_reported_not_returned() {
        struct Broken;
        impl io::Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let errors = MemorySink::new();
        let logger = Logger::builder()
            .output(Output::new(Broken))
            .error_output(errors.clone())
            .clock(clock())
            .build();
        logger.info("lost", []);

        assert_eq!(
            errors.contents(),
            "2022-08-10T21:29:59.123Z write error: IO error: disk on fire\n"
        );
        assert_eq!(logger.metrics().writes_failed(), 1);
    }

    #[test]
    fn test_panicking_handler_is_isolated() {
        let sink = MemorySink::new();
        let errors = MemorySink::new();
        let logger = logger(&sink)
            .error_output(errors.clone())
            .handler(PanickingHandler)
            .build();

        logger.info("survives", []);
        assert!(sink.contents().ends_with(" INF survives\n"));
        assert!(errors
            .contents()
            .contains("write error: handler 'panicking' panicked: handler exploded"));
        assert_eq!(logger.metrics().writes_succeeded(), 1);
        assert_eq!(logger.metrics().writes_failed(), 1);
    }

    #[test]
    fn test_close_errors_are_reported() {
        let errors = MemorySink::new();
        let logger = Logger::builder()
            .output(MemorySink::new())
            .error_output(errors.clone())
            .handler(FailingCloseHandler)
            .build();
        logger.close();
        assert_eq!(errors.contents(), "gelf close error: IO error: already gone\n");
    }

    #[test]
    fn test_gelf_without_address() {
        let err = Logger::builder().gelf_enabled(true).try_build().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let errors = MemorySink::new();
        let logger = Logger::builder()
            .output(MemorySink::new())
            .error_output(errors.clone())
            .clock(clock())
            .gelf_enabled(true)
            .build();
        assert_eq!(logger.handlers.len(), 1);
        assert!(errors.contents().contains("config error: Invalid configuration for gelf"));
    }

    #[test]
    fn test_log_scope() {
        let sink = MemorySink::new();
        let logger = logger(&sink).fields([Field::string("s", "sticky")]).build();
        let scope = logger.with_fields([Field::int("n", 1)]);
        scope.info("first");
        scope.error("second");
        assert_eq!(
            sink.contents(),
            "2022-08-10T21:29:59.123Z INF first n=1 s=sticky\n\
             2022-08-10T21:29:59.123Z ERR second n=1 s=sticky\n"
        );
    }

    #[test]
    fn test_panic_and_fatal_only_log() {
        let sink = MemorySink::new();
        let logger = logger(&sink).build();
        logger.panic("p", []);
        logger.fatal("f", []);
        assert_eq!(
            sink.contents(),
            "2022-08-10T21:29:59.123Z PNC p\n2022-08-10T21:29:59.123Z FTL f\n"
        );
    }
}
