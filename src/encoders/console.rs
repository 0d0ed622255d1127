//! Human-readable line encoder
//!
//! `<timestamp> <LVL> [<file:line> ]<message>[ <key>=<value>]*\n`

use super::Encoder;
use crate::core::{Entry, Field, Level, Result, TimestampFormat};
use colored::Color;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::io::{self, Write};

const RESET: &[u8] = b"\x1b[0m";

thread_local! {
    static FIELD_ORDER: Cell<Vec<usize>> = const { Cell::new(Vec::new()) };
}

/// ANSI style of one painted segment.
#[derive(Debug, Clone, Copy)]
enum Style {
    Fg(Color),
    BoldFg(Color),
    Bold,
}

impl Style {
    fn for_level(level: Level) -> Self {
        match level {
            Level::Trace => Style::Fg(Color::Magenta),
            Level::Debug => Style::Fg(Color::Yellow),
            Level::Info => Style::Fg(Color::Green),
            Level::Warn => Style::Fg(Color::Red),
            Level::Error | Level::Fatal | Level::Panic => Style::BoldFg(Color::Red),
            Level::Disabled => Style::Bold,
        }
    }

    fn write_open(self, buf: &mut Vec<u8>) -> io::Result<()> {
        match self {
            Style::Fg(color) => write!(buf, "\x1b[{}m", color.to_fg_str()),
            Style::BoldFg(color) => write!(buf, "\x1b[1;{}m", color.to_fg_str()),
            Style::Bold => buf.write_all(b"\x1b[1m"),
        }
    }
}

/// Formatting switches of a [`ConsoleEncoder`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// ANSI colors for timestamp, level and keys
    pub use_colors: bool,
    /// Quote every value
    pub force_quote: bool,
    /// Quote empty values
    pub quote_empty_fields: bool,
    /// Never quote, unless forced
    pub disable_quote: bool,
    /// Print `file:line` before the message
    pub report_caller: bool,
    /// Keep call order, grouped by key, instead of sorting keys
    pub disable_sorting: bool,
    pub timestamp_format: TimestampFormat,
}

/// Console line encoder
///
/// # Example
///
/// ```
/// use pine_logger::{ConsoleEncoder, Encoder, Entry, Field, Level};
/// use chrono::{TimeZone, Utc};
///
/// let time = Utc.with_ymd_and_hms(2022, 8, 10, 21, 29, 59).unwrap().fixed_offset();
/// let entry = Entry::new(Level::Info, time, "hello")
///     .with_fields([Field::string("user", "alice")]);
///
/// let mut buf = Vec::new();
/// ConsoleEncoder::new().encode(&entry, &mut buf).unwrap();
/// assert_eq!(buf, b"2022-08-10T21:29:59.000Z INF hello user=alice\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConsoleEncoder {
    config: ConsoleConfig,
}

impl ConsoleEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: ConsoleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.config.use_colors = use_colors;
        self
    }

    #[must_use]
    pub fn with_force_quote(mut self, force_quote: bool) -> Self {
        self.config.force_quote = force_quote;
        self
    }

    #[must_use]
    pub fn with_quote_empty_fields(mut self, quote_empty_fields: bool) -> Self {
        self.config.quote_empty_fields = quote_empty_fields;
        self
    }

    #[must_use]
    pub fn with_disable_quote(mut self, disable_quote: bool) -> Self {
        self.config.disable_quote = disable_quote;
        self
    }

    #[must_use]
    pub fn with_report_caller(mut self, report_caller: bool) -> Self {
        self.config.report_caller = report_caller;
        self
    }

    #[must_use]
    pub fn with_disable_sorting(mut self, disable_sorting: bool) -> Self {
        self.config.disable_sorting = disable_sorting;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.config.timestamp_format = format;
        self
    }

    /// Runs `body` between the escape codes of `style` when colors are on,
    /// whatever the output is attached to.
    fn painted<F>(&self, buf: &mut Vec<u8>, style: Style, body: F) -> io::Result<()>
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        if !self.config.use_colors {
            return body(buf);
        }
        style.write_open(buf)?;
        body(buf)?;
        buf.extend_from_slice(RESET);
        Ok(())
    }

    fn write_level(&self, buf: &mut Vec<u8>, level: Level) -> io::Result<()> {
        self.painted(buf, Style::for_level(level), |buf| {
            buf.write_all(level.abbreviation().as_bytes())
        })
    }

    /// Whether `text` has to be written as a quoted string.
    pub fn needs_quoting(&self, text: &str) -> bool {
        if self.config.force_quote {
            return true;
        }
        if self.config.quote_empty_fields && text.is_empty() {
            return true;
        }
        if self.config.disable_quote {
            return false;
        }
        !text.chars().all(is_bare_char)
    }

    fn append_field(&self, buf: &mut Vec<u8>, field: &Field) -> Result<()> {
        let Some(value) = field.render()? else {
            return Ok(());
        };

        let style = if field.is_error() {
            Style::Fg(Color::Red)
        } else {
            Style::Fg(Color::Cyan)
        };

        buf.push(b' ');
        self.painted(buf, style, |buf| buf.write_all(field.key().as_bytes()))?;
        buf.push(b'=');
        if self.needs_quoting(&value) {
            serde_json::to_writer(&mut *buf, &*value)?;
        } else {
            buf.extend_from_slice(value.as_bytes());
        }
        Ok(())
    }
}

fn is_bare_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '.' | '_' | '/' | '@' | '^' | '+')
}

fn field_at<'a>(fields: &'a [Field], extra: Option<&'a Field>, index: usize) -> Option<&'a Field> {
    fields.get(index).or(extra)
}

/// Fills `order` with field indices in output order. Index `fields.len()`
/// stands for `extra`.
///
/// Sorted: stable by key, so duplicates keep call order. Unsorted: grouped by
/// key in first-seen order.
fn order_fields(order: &mut Vec<usize>, fields: &[Field], extra: Option<&Field>, sort: bool) {
    let key = |index: usize| field_at(fields, extra, index).map_or("", Field::key);
    order.clear();
    order.extend(0..fields.len() + usize::from(extra.is_some()));
    if sort {
        order.sort_by(|&a, &b| key(a).cmp(key(b)));
    } else {
        let first_seen = |index: usize| {
            (0..index)
                .find(|&other| key(other) == key(index))
                .unwrap_or(index)
        };
        order.sort_by_key(|&index| first_seen(index));
    }
}

impl Encoder for ConsoleEncoder {
    fn encode(&self, entry: &Entry, buf: &mut Vec<u8>) -> Result<()> {
        let format = self.config.timestamp_format;
        self.painted(buf, Style::Fg(Color::BrightBlack), |buf| {
            format.write_to(entry.time(), buf)
        })?;
        buf.push(b' ');
        self.write_level(buf, entry.level())?;
        if self.config.report_caller {
            if let Some(caller) = entry.caller() {
                write!(buf, " {}", caller)?;
            }
        }
        buf.push(b' ');
        buf.extend_from_slice(entry.message().as_bytes());

        let stack = entry
            .stack()
            .map(|stack| stack.to_json().map(|frames| Field::json("stack", frames)))
            .transpose()?;

        // Reentrant calls (a field rendering that logs) find the slot empty
        // and grow their own vector.
        let mut order = FIELD_ORDER.try_with(Cell::take).unwrap_or_default();
        let fields = entry.fields();
        order_fields(&mut order, fields, stack.as_ref(), !self.config.disable_sorting);
        let written = order.iter().try_for_each(|&index| {
            match field_at(fields, stack.as_ref(), index) {
                Some(field) => self.append_field(buf, field),
                None => Ok(()),
            }
        });
        let _ = FIELD_ORDER.try_with(|slot| slot.set(order));
        written?;

        buf.push(b'\n');
        Ok(())
    }

    fn clone_encoder(&self) -> Box<dyn Encoder> {
        Box::new(self.clone())
    }
}
