//! Reconnecting TCP writer
//!
//! Frames are written to a plain TCP stream, sequentially, with no handshake
//! or acknowledgement. A failed write is retried on a fresh connection up to
//! `max_reconnect` times, waiting `reconnect_delay` before each re-dial.

use super::Transport;
use crate::core::output::write_fully;
use crate::core::{LoggerError, Result};
use parking_lot::Mutex;
use std::io;
use std::net::{Shutdown, TcpStream};
use std::thread;
use std::time::Duration;

pub const DEFAULT_MAX_RECONNECT: u32 = 3;
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
enum ConnState {
    Disconnected,
    Connected(TcpStream),
    Closed,
}

/// TCP writer that re-dials after failures
///
/// # Example
///
/// ```no_run
/// use pine_logger::transport::{TcpWriter, Transport};
/// use std::time::Duration;
///
/// let writer = TcpWriter::new("127.0.0.1:12201")
///     .with_max_reconnect(5)
///     .with_reconnect_delay(Duration::from_millis(200));
/// writer.send(b"{\"short_message\":\"hi\"}\n\0").unwrap();
/// writer.close().unwrap();
/// ```
#[derive(Debug)]
pub struct TcpWriter {
    address: String,
    max_reconnect: u32,
    reconnect_delay: Duration,
    write_timeout: Option<Duration>,
    state: Mutex<ConnState>,
}

impl TcpWriter {
    /// Writer for `host:port`. Nothing is dialed until the first write or
    /// an explicit [`connect`](Self::connect).
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            max_reconnect: DEFAULT_MAX_RECONNECT,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            write_timeout: Some(DEFAULT_WRITE_TIMEOUT),
            state: Mutex::new(ConnState::Disconnected),
        }
    }

    #[must_use]
    pub fn with_max_reconnect(mut self, max_reconnect: u32) -> Self {
        self.max_reconnect = max_reconnect;
        self
    }

    #[must_use]
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// `None` blocks until the kernel accepts the bytes.
    #[must_use]
    pub fn with_write_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.write_timeout = timeout;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn is_connected(&self) -> bool {
        matches!(*self.state.lock(), ConnState::Connected(_))
    }

    /// Dial if not connected yet. A no-op on a live connection.
    ///
    /// # Errors
    ///
    /// `TransportClosed` after [`close`](Transport::close), or the dial error.
    pub fn connect(&self) -> Result<()> {
        let mut state = self.state.lock();
        match *state {
            ConnState::Connected(_) => Ok(()),
            ConnState::Closed => Err(LoggerError::TransportClosed),
            ConnState::Disconnected => {
                *state = ConnState::Connected(self.dial()?);
                Ok(())
            }
        }
    }

    /// Write one frame, re-dialing after failures. A frame cut short by a
    /// failure is sent again whole on the new connection.
    ///
    /// # Errors
    ///
    /// - `ReconnectExhausted` when every attempt failed to write
    /// - `ReconnectFailed` when the last re-dial failed too
    pub fn write(&self, payload: &[u8]) -> Result<()> {
        let mut state = self.state.lock();
        match *state {
            ConnState::Closed => return Err(LoggerError::TransportClosed),
            ConnState::Disconnected => *state = ConnState::Connected(self.dial()?),
            ConnState::Connected(_) => {}
        }

        let mut dial_error: Option<io::Error> = None;
        let mut attempt = 0;
        loop {
            let result = match &mut *state {
                ConnState::Connected(stream) => {
                    write_fully(stream, payload).map_err(|(_, err)| err)
                }
                _ => Err(io::Error::new(
                    io::ErrorKind::NotConnected,
                    "connection was lost, will attempt reconnect",
                )),
            };

            let write_error = match result {
                Ok(()) => return Ok(()),
                Err(err) => err,
            };
            // Never append to a stream that may hold part of a frame.
            *state = ConnState::Disconnected;

            if attempt >= self.max_reconnect {
                return Err(match dial_error {
                    Some(dial) => LoggerError::ReconnectFailed {
                        write: write_error,
                        dial,
                    },
                    None => LoggerError::ReconnectExhausted {
                        attempts: self.max_reconnect,
                        source: write_error,
                    },
                });
            }
            attempt += 1;

            thread::sleep(self.reconnect_delay);
            match self.dial() {
                Ok(stream) => {
                    *state = ConnState::Connected(stream);
                    dial_error = None;
                }
                Err(err) => {
                    *state = ConnState::Disconnected;
                    dial_error = Some(err);
                }
            }
        }
    }

    fn dial(&self) -> io::Result<TcpStream> {
        let stream = TcpStream::connect(&self.address)?;
        stream.set_write_timeout(self.write_timeout)?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}

impl Transport for TcpWriter {
    fn send(&self, payload: &[u8]) -> Result<()> {
        self.write(payload)
    }

    fn close(&self) -> Result<()> {
        let mut state = self.state.lock();
        match std::mem::replace(&mut *state, ConnState::Closed) {
            ConnState::Connected(stream) => match stream.shutdown(Shutdown::Both) {
                Err(err) if err.kind() != io::ErrorKind::NotConnected => Err(err.into()),
                _ => Ok(()),
            },
            ConnState::Disconnected | ConnState::Closed => Ok(()),
        }
    }
}
