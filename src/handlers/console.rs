//! Handler writing encoded lines to a local writer

use crate::core::{buffer_pool, Entry, Handler, Level, LevelValue, Output, Result};
use crate::encoders::{ConsoleEncoder, Encoder};

/// Writes each accepted entry to an [`Output`] with a single write call.
///
/// # Example
///
/// ```
/// use pine_logger::{ConsoleEncoder, ConsoleHandler, Handler, Level, LevelValue, MemorySink, Output};
///
/// let sink = MemorySink::new();
/// let handler = ConsoleHandler::new(
///     LevelValue::new(Level::Info),
///     ConsoleEncoder::new(),
///     Output::new(sink.clone()),
/// );
/// assert!(handler.is_enabled(Level::Warn));
/// assert!(!handler.is_enabled(Level::Debug));
/// ```
pub struct ConsoleHandler {
    level: LevelValue,
    encoder: Box<dyn Encoder>,
    output: Output,
}

impl ConsoleHandler {
    pub fn new(level: LevelValue, encoder: impl Encoder + 'static, output: Output) -> Self {
        Self {
            level,
            encoder: Box::new(encoder),
            output,
        }
    }

    /// Console encoder with default settings, writing to stderr.
    pub fn stderr(level: LevelValue) -> Self {
        Self::new(level, ConsoleEncoder::new(), Output::stderr())
    }

    pub fn level(&self) -> &LevelValue {
        &self.level
    }
}

impl Handler for ConsoleHandler {
    fn is_enabled(&self, level: Level) -> bool {
        self.level.is_enabled(level)
    }

    fn write(&self, entry: &Entry) -> Result<()> {
        let mut buf = buffer_pool().get();
        self.encoder.encode(entry, &mut buf)?;
        self.output.write_payload(&buf)
    }

    fn flush(&self) -> Result<()> {
        self.output.flush()
    }

    fn clone_handler(&self) -> Box<dyn Handler> {
        Box::new(Self {
            level: self.level.clone(),
            encoder: self.encoder.clone_encoder(),
            output: self.output.clone(),
        })
    }

    fn name(&self) -> &str {
        "console"
    }
}
