//! Handler shipping GELF messages over a transport

use crate::core::{buffer_pool, Entry, Handler, Level, LevelValue, Result};
use crate::encoders::{Encoder, GelfEncoder};
use crate::transport::Transport;
use std::sync::Arc;

pub struct GelfHandler {
    level: LevelValue,
    encoder: GelfEncoder,
    transport: Arc<dyn Transport>,
}

impl GelfHandler {
    pub fn new(level: LevelValue, encoder: GelfEncoder, transport: Arc<dyn Transport>) -> Self {
        Self {
            level,
            encoder,
            transport,
        }
    }

    pub fn level(&self) -> &LevelValue {
        &self.level
    }
}

impl Handler for GelfHandler {
    fn is_enabled(&self, level: Level) -> bool {
        self.level.is_enabled(level)
    }

    fn write(&self, entry: &Entry) -> Result<()> {
        let mut buf = buffer_pool().get();
        self.encoder.encode(entry, &mut buf)?;
        self.transport.send(&buf)
    }

    fn close(&self) -> Result<()> {
        self.transport.close()
    }

    fn clone_handler(&self) -> Box<dyn Handler> {
        Box::new(Self {
            level: self.level.clone(),
            encoder: self.encoder.clone(),
            transport: Arc::clone(&self.transport),
        })
    }

    fn name(&self) -> &str {
        "gelf"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Field, LoggerError};
    use chrono::{TimeZone, Utc};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        frames: Mutex<Vec<Vec<u8>>>,
        closed: Mutex<u32>,
    }

    impl Transport for RecordingTransport {
        fn send(&self, payload: &[u8]) -> Result<()> {
            if *self.closed.lock() > 0 {
                return Err(LoggerError::TransportClosed);
            }
            self.frames.lock().push(payload.to_vec());
            Ok(())
        }

        fn close(&self) -> Result<()> {
            *self.closed.lock() += 1;
            Ok(())
        }
    }

    fn entry() -> Entry {
        let time = Utc.with_ymd_and_hms(2022, 8, 10, 21, 29, 59).unwrap().fixed_offset();
        Entry::new(Level::Warn, time, "hello").with_fields([Field::string("k", "v")])
    }

    #[test]
    fn test_write_sends_one_frame() {
        let transport = Arc::new(RecordingTransport::default());
        let handler = GelfHandler::new(
            LevelValue::new(Level::Info),
            GelfEncoder::new(Vec::new()).with_hostname("h"),
            transport.clone(),
        );
        handler.write(&entry()).unwrap();

        let frames = transport.frames.lock();
        assert_eq!(frames.len(), 1);
        assert!(frames[0].ends_with(b"\n\0"));
        let message: serde_json::Value =
            serde_json::from_slice(&frames[0][..frames[0].len() - 2]).unwrap();
        assert_eq!(message["_k"], "v");
        assert_eq!(message["level"], 4);
    }

    #[test]
    fn test_clones_share_the_transport() {
        let transport = Arc::new(RecordingTransport::default());
        let handler = GelfHandler::new(
            LevelValue::new(Level::Info),
            GelfEncoder::new(Vec::new()).with_hostname("h"),
            transport.clone(),
        );
        let clone = handler.clone_handler();
        clone.write(&entry()).unwrap();
        handler.close().unwrap();

        assert_eq!(transport.frames.lock().len(), 1);
        assert!(clone.write(&entry()).is_err());
        assert_eq!(handler.name(), "gelf");
    }
}
