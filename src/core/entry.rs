//! The record built for one log call

use super::field::Field;
use super::level::Level;
use super::pool::Recycle;
use super::stacktrace::{short_file, StackTrace};
use chrono::{DateTime, FixedOffset, Utc};
use std::fmt;
use std::panic::Location;

/// Source location of a log call, file shortened to its base name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub file: &'static str,
    pub line: u32,
}

impl Caller {
    pub fn new(file: &'static str, line: u32) -> Self {
        Self {
            file: short_file(file),
            line,
        }
    }

    /// Location of the nearest caller not marked `#[track_caller]`.
    #[track_caller]
    pub fn here() -> Self {
        Self::from(Location::caller())
    }
}

impl From<&'static Location<'static>> for Caller {
    fn from(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line())
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One in-flight log call.
///
/// The logger fills an entry from its pool, hands the same entry to every
/// accepting handler and recycles it afterwards. Fields are the call-site
/// fields followed by the logger's sticky fields.
#[derive(Debug)]
pub struct Entry {
    level: Level,
    time: DateTime<FixedOffset>,
    message: String,
    caller: Option<Caller>,
    stack: Option<StackTrace>,
    fields: Vec<Field>,
}

impl Default for Entry {
    fn default() -> Self {
        Self {
            level: Level::Disabled,
            time: DateTime::<Utc>::default().fixed_offset(),
            message: String::new(),
            caller: None,
            stack: None,
            fields: Vec::new(),
        }
    }
}

impl Entry {
    pub fn new(level: Level, time: DateTime<FixedOffset>, message: impl Into<String>) -> Self {
        Self {
            level,
            time,
            message: message.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_caller(mut self, caller: Caller) -> Self {
        self.caller = Some(caller);
        self
    }

    #[must_use]
    pub fn with_stack(mut self, stack: StackTrace) -> Self {
        self.stack = Some(stack);
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn time(&self) -> &DateTime<FixedOffset> {
        &self.time
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn caller(&self) -> Option<Caller> {
        self.caller
    }

    pub fn stack(&self) -> Option<&StackTrace> {
        self.stack.as_ref()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub(crate) fn set_header(&mut self, level: Level, time: DateTime<FixedOffset>) {
        self.level = level;
        self.time = time;
    }

    pub(crate) fn message_mut(&mut self) -> &mut String {
        &mut self.message
    }

    pub(crate) fn set_caller(&mut self, caller: Option<Caller>) {
        self.caller = caller;
    }

    pub(crate) fn set_stack(&mut self, stack: Option<StackTrace>) {
        self.stack = stack;
    }

    pub(crate) fn fields_mut(&mut self) -> &mut Vec<Field> {
        &mut self.fields
    }
}

impl Recycle for Entry {
    fn recycle(&mut self) {
        self.level = Level::Disabled;
        self.message.clear();
        self.caller = None;
        self.stack = None;
        self.fields.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stacktrace::Frame;

    #[test]
    fn test_caller_is_shortened() {
        let caller = Caller::new("/home/me/project/src/handlers/console.rs", 17);
        assert_eq!(caller.to_string(), "console.rs:17");
    }

    #[test]
    fn test_caller_here_points_at_this_file() {
        let caller = Caller::here();
        assert_eq!(caller.file, "entry.rs");
        assert!(caller.line > 0);
    }

    #[test]
    fn test_entry_builder() {
        let time = DateTime::<Utc>::default().fixed_offset();
        let entry = Entry::new(Level::Info, time, "hello")
            .with_caller(Caller::new("main.rs", 3))
            .with_stack(StackTrace::new(vec![Frame::new("main", "main.rs", 3)]))
            .with_fields([Field::int("a", 1), Field::int("a", 2)]);

        assert_eq!(entry.level(), Level::Info);
        assert_eq!(entry.message(), "hello");
        assert_eq!(entry.caller().unwrap().line, 3);
        assert_eq!(entry.stack().unwrap().frames().len(), 1);
        assert_eq!(entry.fields().len(), 2);
    }

    #[test]
    fn test_recycle_clears_everything() {
        let mut entry = Entry::new(Level::Warn, Utc::now().fixed_offset(), "message")
            .with_caller(Caller::new("main.rs", 3))
            .with_fields([Field::bool("b", true)]);
        let capacity = entry.fields.capacity();

        entry.recycle();
        assert_eq!(entry.level(), Level::Disabled);
        assert!(entry.message().is_empty());
        assert!(entry.caller().is_none());
        assert!(entry.stack().is_none());
        assert!(entry.fields().is_empty());
        assert_eq!(entry.fields.capacity(), capacity);
    }
}
