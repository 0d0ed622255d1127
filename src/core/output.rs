//! Shared byte sinks
//!
//! A handler's output and the logger's diagnostic writer are both
//! [`Output`]s: a cloneable handle to one `Write` behind a mutex. Clones of a
//! handler keep writing to the same sink.

use super::error::{LoggerError, Result};
use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

#[derive(Clone)]
pub struct Output {
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Output {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Write all of `payload`, continuing after partial writes.
    ///
    /// A sink that stops accepting bytes fails with `ShortWrite`.
    pub fn write_payload(&self, payload: &[u8]) -> Result<()> {
        let mut writer = self.writer.lock();
        write_fully(&mut *writer, payload).map_err(|(written, err)| {
            if err.kind() == io::ErrorKind::WriteZero {
                LoggerError::short_write(written, payload.len())
            } else {
                LoggerError::IoError(err)
            }
        })
    }

    /// Write one diagnostic line. Failures are ignored: there is nowhere
    /// left to report them.
    pub fn write_line(&self, line: fmt::Arguments<'_>) {
        let mut writer = self.writer.lock();
        let _ = writer.write_fmt(line);
        let _ = writer.write_all(b"\n");
    }

    pub fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }
}

/// `write_all` that reports how many bytes went out before a failure.
pub(crate) fn write_fully<W: Write + ?Sized>(
    writer: &mut W,
    payload: &[u8],
) -> std::result::Result<(), (usize, io::Error)> {
    let mut written = 0;
    while written < payload.len() {
        match writer.write(&payload[written..]) {
            Ok(0) => {
                return Err((
                    written,
                    io::Error::new(io::ErrorKind::WriteZero, "sink accepted no bytes"),
                ))
            }
            Ok(n) => written += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err((written, err)),
        }
    }
    Ok(())
}

impl<W: Write + Send + 'static> From<W> for Output {
    fn from(writer: W) -> Self {
        Self::new(writer)
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output").finish_non_exhaustive()
    }
}

/// In-memory sink whose contents can be read back. Clones share the buffer.
///
/// # Example
///
/// ```
/// use pine_logger::{MemorySink, Output};
///
/// let sink = MemorySink::new();
/// let output = Output::new(sink.clone());
/// output.write_payload(b"line\n").unwrap();
/// assert_eq!(sink.contents(), "line\n");
/// ```
#[derive(Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.buffer.lock().clone()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
