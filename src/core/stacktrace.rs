//! Stack traces carried by errors
//!
//! A stack is attached to an error by wrapping it in [`TracedError`]. When an
//! error field is logged at a level the logger's stack-trace threshold admits,
//! the error's `source()` chain is walked and the first `TracedError` found
//! donates its frames to the entry.

use serde::Serialize;
use std::backtrace::Backtrace;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// One call-site frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub function: String,
    pub file: String,
    pub line: u32,
}

impl Frame {
    pub fn new(function: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            function: function.into(),
            file: file.into(),
            line,
        }
    }
}

/// Ordered frames, innermost first. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackTrace {
    frames: Arc<[Frame]>,
}

#[derive(Serialize)]
struct FrameJson<'a> {
    func: &'a str,
    line: String,
    source: &'a str,
}

impl StackTrace {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames: frames.into(),
        }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Structured form rendered by the console encoder's `stack` field:
    /// one `{"func", "line", "source"}` object per frame.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        let frames: Vec<FrameJson<'_>> = self
            .frames
            .iter()
            .map(|frame| FrameJson {
                func: &frame.function,
                line: frame.line.to_string(),
                source: &frame.file,
            })
            .collect();
        serde_json::to_value(frames)
    }
}

impl fmt::Display for StackTrace {
    /// `function\n\tfile:line` per frame, frames separated by newlines.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, frame) in self.frames.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}\n\t{}:{}", frame.function, frame.file, frame.line)?;
        }
        Ok(())
    }
}

/// An error that carries the stack it was created on.
///
/// Display and `source()` are forwarded to the wrapped error, so wrapping
/// does not change how the error reads in a log line.
///
/// # Example
///
/// ```
/// use pine_logger::{find_stack_trace, Frame, TracedError};
///
/// let err = TracedError::with_frames(
///     std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
///     vec![Frame::new("flush", "store.rs", 42)],
/// );
/// assert_eq!(err.to_string(), "disk full");
/// assert_eq!(find_stack_trace(&err).unwrap().frames().len(), 1);
/// ```
pub struct TracedError {
    inner: Box<dyn Error + Send + Sync + 'static>,
    stack: StackTrace,
}

impl TracedError {
    /// Wrap `err` and capture the current stack.
    ///
    /// Frames are only as good as the debug info of the build; a stripped
    /// binary yields an empty stack.
    pub fn capture(err: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        let backtrace = Backtrace::force_capture();
        let frames = parse_backtrace(&backtrace.to_string());
        Self {
            inner: err.into(),
            stack: StackTrace::new(frames),
        }
    }

    /// Wrap `err` with an explicit list of frames.
    pub fn with_frames(
        err: impl Into<Box<dyn Error + Send + Sync + 'static>>,
        frames: Vec<Frame>,
    ) -> Self {
        Self {
            inner: err.into(),
            stack: StackTrace::new(frames),
        }
    }

    pub fn stack_trace(&self) -> &StackTrace {
        &self.stack
    }

    pub fn inner(&self) -> &(dyn Error + Send + Sync + 'static) {
        &*self.inner
    }
}

impl fmt::Display for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl fmt::Debug for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracedError")
            .field("inner", &self.inner)
            .field("frames", &self.stack.frames.len())
            .finish()
    }
}

impl Error for TracedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&*self.inner)
    }
}

/// Walk `err` and its `source()` chain; return the first stack found.
pub fn find_stack_trace<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a StackTrace> {
    let mut current = Some(err);
    while let Some(link) = current {
        if let Some(traced) = link.downcast_ref::<TracedError>() {
            return Some(traced.stack_trace());
        }
        current = link.source();
    }
    None
}

/// Turn the text form of a `std::backtrace::Backtrace` into frames.
///
/// The text alternates `N: function` lines with optional `at file:line:col`
/// lines. Frames without a location and frames belonging to the capture
/// machinery itself are dropped.
fn parse_backtrace(text: &str) -> Vec<Frame> {
    let mut frames = Vec::new();
    let mut pending: Option<&str> = None;

    for line in text.lines() {
        let line = line.trim();
        if let Some(location) = line.strip_prefix("at ") {
            let Some(function) = pending.take() else {
                continue;
            };
            if let Some((file, line_no)) = split_location(location) {
                frames.push(Frame::new(function, short_file(file), line_no));
            }
        } else if let Some((index, function)) = line.split_once(": ") {
            if index.chars().all(|c| c.is_ascii_digit()) {
                pending = Some(function);
            }
        }
    }

    // Drop everything up to and including the capture call.
    if let Some(pos) = frames
        .iter()
        .position(|frame| frame.function.contains("TracedError::capture"))
    {
        frames.drain(..=pos);
    }
    frames.retain(|frame| {
        !frame.function.starts_with("std::")
            && !frame.function.starts_with("core::")
            && !frame.function.starts_with("__")
    });
    frames
}

/// `path/to/file.rs:12:5` → (`path/to/file.rs`, 12)
fn split_location(location: &str) -> Option<(&str, u32)> {
    let mut parts = location.rsplitn(3, ':');
    let _column = parts.next()?;
    let line = parts.next()?.parse().ok()?;
    let file = parts.next()?;
    Some((file, line))
}

/// Base name of a source path.
pub fn short_file(file: &str) -> &str {
    file.rsplit(['/', '\\']).next().unwrap_or(file)
}
