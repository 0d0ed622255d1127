//! Timestamp formatting utilities
//!
//! All timestamps are `DateTime<FixedOffset>` so that the offset a clock
//! reports survives into the output. A zero offset renders as `Z`.

use chrono::{DateTime, Datelike, FixedOffset, SecondsFormat, Timelike};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Timestamp precision used for the leading column of console lines
///
/// # Examples
///
/// ```
/// use pine_logger::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let ts = Utc.with_ymd_and_hms(2022, 8, 10, 21, 29, 59).unwrap().fixed_offset();
/// assert_eq!(TimestampFormat::Millis.format(&ts), "2022-08-10T21:29:59.000Z");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// RFC 3339 with milliseconds: `2022-08-10T21:29:59.123Z`
    #[default]
    Millis,

    /// RFC 3339 with microseconds: `2022-08-10T21:29:59.123456Z`
    Micros,

    /// RFC 3339 with nanoseconds: `2022-08-10T21:29:59.123456789Z`
    Nanos,
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<FixedOffset>) -> String {
        let precision = match self {
            TimestampFormat::Millis => SecondsFormat::Millis,
            TimestampFormat::Micros => SecondsFormat::Micros,
            TimestampFormat::Nanos => SecondsFormat::Nanos,
        };
        datetime.to_rfc3339_opts(precision, true)
    }

    /// Same text as [`format`](Self::format), written straight into `out`.
    pub fn write_to<W: Write + ?Sized>(
        &self,
        datetime: &DateTime<FixedOffset>,
        out: &mut W,
    ) -> io::Result<()> {
        write!(
            out,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            datetime.year(),
            datetime.month(),
            datetime.day(),
            datetime.hour(),
            datetime.minute(),
            datetime.second()
        )?;
        // Leap seconds are carried as nanos >= 1e9.
        let nanos = datetime.nanosecond() % 1_000_000_000;
        match self {
            TimestampFormat::Millis => write!(out, ".{:03}", nanos / 1_000_000)?,
            TimestampFormat::Micros => write!(out, ".{:06}", nanos / 1_000)?,
            TimestampFormat::Nanos => write!(out, ".{:09}", nanos)?,
        }

        let offset = datetime.offset().local_minus_utc();
        if offset == 0 {
            return out.write_all(b"Z");
        }
        let sign = if offset < 0 { '-' } else { '+' };
        let minutes = offset.unsigned_abs() / 60;
        write!(out, "{}{:02}:{:02}", sign, minutes / 60, minutes % 60)
    }
}

/// RFC 3339 with nanoseconds, trailing fractional zeros trimmed.
///
/// `21:29:59.123400000Z` renders as `21:29:59.1234Z` and a whole second
/// drops the fraction entirely.
pub fn format_rfc3339_nanos(datetime: &DateTime<FixedOffset>) -> String {
    let full = datetime.to_rfc3339_opts(SecondsFormat::Nanos, true);
    let Some(dot) = full.find('.') else {
        return full;
    };
    let digits_end = full[dot + 1..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(full.len(), |offset| dot + 1 + offset);
    let fraction = full[dot + 1..digits_end].trim_end_matches('0');

    let mut out = String::with_capacity(full.len());
    out.push_str(&full[..dot]);
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out.push_str(&full[digits_end..]);
    out
}
