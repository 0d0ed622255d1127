//! GELF 1.1 encoder
//!
//! One JSON object per entry, terminated by `\n` and a NUL byte. Fields go
//! into `_`-prefixed additional keys; structured values stay structured.

use super::Encoder;
use crate::core::{Entry, Field, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::sync::Arc;

pub const GELF_VERSION: &str = "1.1";

/// Field key that overrides the `host` of a message.
pub const HOST_KEY: &str = "host";

#[derive(Serialize)]
struct Message<'a> {
    version: &'static str,
    host: &'a str,
    short_message: &'a str,
    timestamp: f64,
    level: i32,
}

/// GELF encoder with a fixed set of extra fields added to every message.
///
/// # Example
///
/// ```
/// use pine_logger::{Encoder, Entry, Field, GelfEncoder, Level};
/// use chrono::{TimeZone, Utc};
///
/// let time = Utc.with_ymd_and_hms(2022, 8, 10, 21, 29, 59).unwrap().fixed_offset();
/// let entry = Entry::new(Level::Warn, time, "disk almost full");
/// let encoder = GelfEncoder::new(vec![Field::string("app", "pine")]).with_hostname("web-1");
///
/// let mut buf = Vec::new();
/// encoder.encode(&entry, &mut buf).unwrap();
/// assert!(buf.ends_with(b"}\n\0"));
/// ```
#[derive(Debug, Clone)]
pub struct GelfEncoder {
    extra_fields: Vec<Field>,
    hostname: Arc<str>,
}

impl GelfEncoder {
    /// Encoder reporting the local hostname.
    pub fn new(extra_fields: Vec<Field>) -> Self {
        Self {
            extra_fields,
            hostname: local_hostname().into(),
        }
    }

    #[must_use]
    pub fn with_hostname(mut self, hostname: impl Into<Arc<str>>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn extra_fields(&self) -> &[Field] {
        &self.extra_fields
    }

    /// First `host` field of the entry, then a configured `host` extra, then
    /// the hostname.
    fn host<'a>(&'a self, entry: &'a Entry) -> Result<Cow<'a, str>> {
        let field = entry
            .fields()
            .iter()
            .chain(self.extra_fields.iter())
            .find(|field| field.key() == HOST_KEY);
        if let Some(field) = field {
            if let Some(host) = field.render()? {
                return Ok(host);
            }
        }
        Ok(Cow::Borrowed(&*self.hostname))
    }

    fn additional_fields(&self, entry: &Entry) -> Result<Map<String, Value>> {
        let mut extra = Map::new();

        // Entry fields come before extras; the first field with a key wins.
        for field in entry.fields().iter().chain(self.extra_fields.iter()) {
            if field.key() == HOST_KEY {
                continue;
            }
            let key = format!("_{}", field.key());
            if extra.contains_key(&key) {
                continue;
            }
            if let Some(value) = field.render_json()? {
                extra.insert(key, value);
            }
        }

        if let Some(caller) = entry.caller() {
            extra
                .entry("_caller")
                .or_insert_with(|| Value::String(caller.to_string()));
            extra
                .entry("_file")
                .or_insert_with(|| Value::String(caller.file.to_string()));
            extra
                .entry("_line")
                .or_insert_with(|| Value::from(caller.line));
        }

        if let Some(stack) = entry.stack() {
            extra.insert("_stack".to_string(), Value::String(stack.to_string()));
        }

        Ok(extra)
    }
}

impl Encoder for GelfEncoder {
    fn encode(&self, entry: &Entry, buf: &mut Vec<u8>) -> Result<()> {
        let host = self.host(entry)?;
        let extra = self.additional_fields(entry)?;

        let message = Message {
            version: GELF_VERSION,
            host: &host,
            short_message: entry.message(),
            timestamp: entry.time().timestamp_millis() as f64 / 1000.0,
            level: entry.level().gelf_severity(),
        };
        serde_json::to_writer(&mut *buf, &message)?;

        if !extra.is_empty() {
            // {"version":..,"level":6} + {"_a":..} -> {"version":..,"level":6,"_a":..}
            buf.pop();
            let start = buf.len();
            serde_json::to_writer(&mut *buf, &extra)?;
            buf[start] = b',';
        }

        buf.extend_from_slice(b"\n\0");
        Ok(())
    }

    fn clone_encoder(&self) -> Box<dyn Encoder> {
        Box::new(self.clone())
    }
}

/// Name of this machine, empty when it cannot be determined.
pub fn local_hostname() -> String {
    #[cfg(unix)]
    {
        if let Ok(name) = nix::unistd::gethostname() {
            if let Ok(name) = name.into_string() {
                return name;
            }
        }
    }
    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .unwrap_or_default()
}
