//! Typed key/value fields attached to log calls

use super::error::Result;
use super::timestamp::format_rfc3339_nanos;
use chrono::{DateTime, FixedOffset, TimeZone};
use serde::Serialize;
use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Shared error payload of an error field.
pub type SharedError = Arc<dyn Error + Send + Sync + 'static>;

/// A value that can be turned into JSON when the field is encoded.
///
/// Implemented for every `Serialize` type; serialization is deferred until
/// encode time so a failure surfaces as an encode error.
pub trait ToJson: Send + Sync {
    fn to_json(&self) -> serde_json::Result<serde_json::Value>;
}

impl<T: Serialize + Send + Sync> ToJson for T {
    fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

/// Payload of a [`Field`].
#[derive(Clone)]
pub enum FieldValue {
    String(Cow<'static, str>),
    Int(i64),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Bool(bool),
    Time(DateTime<FixedOffset>),
    /// `None` renders nothing at all.
    Error(Option<SharedError>),
    Json(Arc<dyn ToJson>),
    Display(Arc<dyn fmt::Display + Send + Sync>),
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => f.debug_tuple("String").field(s).finish(),
            FieldValue::Int(v) => f.debug_tuple("Int").field(v).finish(),
            FieldValue::Int8(v) => f.debug_tuple("Int8").field(v).finish(),
            FieldValue::Int16(v) => f.debug_tuple("Int16").field(v).finish(),
            FieldValue::Int32(v) => f.debug_tuple("Int32").field(v).finish(),
            FieldValue::Int64(v) => f.debug_tuple("Int64").field(v).finish(),
            FieldValue::Float32(v) => f.debug_tuple("Float32").field(v).finish(),
            FieldValue::Float64(v) => f.debug_tuple("Float64").field(v).finish(),
            FieldValue::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            FieldValue::Time(v) => f.debug_tuple("Time").field(v).finish(),
            FieldValue::Error(Some(e)) => f.debug_tuple("Error").field(&e.to_string()).finish(),
            FieldValue::Error(None) => f.write_str("Error(None)"),
            FieldValue::Json(_) => f.write_str("Json(..)"),
            FieldValue::Display(v) => f.debug_tuple("Display").field(&v.to_string()).finish(),
        }
    }
}

/// One typed key/value pair.
///
/// Keys are not required to be unique within a call; every field is kept.
///
/// # Example
///
/// ```
/// use pine_logger::Field;
///
/// let fields = [
///     Field::string("user", "alice"),
///     Field::int("attempt", 3),
///     Field::bool("cached", false),
/// ];
/// assert_eq!(fields[1].key(), "attempt");
/// ```
#[derive(Debug, Clone)]
pub struct Field {
    key: Cow<'static, str>,
    value: FieldValue,
}

/// Key used by [`Field::err`].
pub const ERROR_KEY: &str = "error";

impl Field {
    pub fn new(key: impl Into<Cow<'static, str>>, value: FieldValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn string(key: impl Into<Cow<'static, str>>, value: impl Into<Cow<'static, str>>) -> Self {
        Self::new(key, FieldValue::String(value.into()))
    }

    pub fn int(key: impl Into<Cow<'static, str>>, value: i64) -> Self {
        Self::new(key, FieldValue::Int(value))
    }

    pub fn int8(key: impl Into<Cow<'static, str>>, value: i8) -> Self {
        Self::new(key, FieldValue::Int8(value))
    }

    pub fn int16(key: impl Into<Cow<'static, str>>, value: i16) -> Self {
        Self::new(key, FieldValue::Int16(value))
    }

    pub fn int32(key: impl Into<Cow<'static, str>>, value: i32) -> Self {
        Self::new(key, FieldValue::Int32(value))
    }

    pub fn int64(key: impl Into<Cow<'static, str>>, value: i64) -> Self {
        Self::new(key, FieldValue::Int64(value))
    }

    pub fn float32(key: impl Into<Cow<'static, str>>, value: f32) -> Self {
        Self::new(key, FieldValue::Float32(value))
    }

    pub fn float64(key: impl Into<Cow<'static, str>>, value: f64) -> Self {
        Self::new(key, FieldValue::Float64(value))
    }

    pub fn bool(key: impl Into<Cow<'static, str>>, value: bool) -> Self {
        Self::new(key, FieldValue::Bool(value))
    }

    pub fn time<Tz: TimeZone>(key: impl Into<Cow<'static, str>>, value: DateTime<Tz>) -> Self {
        Self::new(key, FieldValue::Time(value.fixed_offset()))
    }

    /// Error field under the key `error`.
    pub fn err(err: impl Error + Send + Sync + 'static) -> Self {
        Self::new(ERROR_KEY, FieldValue::Error(Some(Arc::new(err))))
    }

    /// Error field that renders nothing when `err` is `None`.
    pub fn err_opt<E: Error + Send + Sync + 'static>(err: Option<E>) -> Self {
        Self::new(
            ERROR_KEY,
            FieldValue::Error(err.map(|e| Arc::new(e) as SharedError)),
        )
    }

    /// Error field from a boxed error, e.g. the error half of a
    /// `Result<_, Box<dyn Error + Send + Sync>>`.
    pub fn boxed_err(err: Box<dyn Error + Send + Sync + 'static>) -> Self {
        Self::new(ERROR_KEY, FieldValue::Error(Some(Arc::from(err))))
    }

    /// Structured value, serialized as JSON when encoded.
    pub fn json<T: Serialize + Send + Sync + 'static>(
        key: impl Into<Cow<'static, str>>,
        value: T,
    ) -> Self {
        Self::new(key, FieldValue::Json(Arc::new(value)))
    }

    /// Arbitrary value rendered through its `Display` impl.
    pub fn display<T: fmt::Display + Send + Sync + 'static>(
        key: impl Into<Cow<'static, str>>,
        value: T,
    ) -> Self {
        Self::new(key, FieldValue::Display(Arc::new(value)))
    }

    /// Arbitrary value rendered through its `Debug` impl.
    pub fn debug<T: fmt::Debug + Send + Sync + 'static>(
        key: impl Into<Cow<'static, str>>,
        value: T,
    ) -> Self {
        Self::new(key, FieldValue::Display(Arc::new(DebugAsDisplay(value))))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn is_error(&self) -> bool {
        matches!(self.value, FieldValue::Error(_))
    }

    /// The error payload of an error field, if any.
    pub fn error(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        match &self.value {
            FieldValue::Error(Some(err)) => Some(&**err),
            _ => None,
        }
    }

    /// Text form of the value. `Ok(None)` means the field renders nothing.
    ///
    /// # Errors
    ///
    /// Fails when a JSON field cannot be serialized.
    pub fn render(&self) -> Result<Option<Cow<'_, str>>> {
        let text = match &self.value {
            FieldValue::String(s) => Cow::Borrowed(s.as_ref()),
            FieldValue::Int(v) | FieldValue::Int64(v) => Cow::Owned(v.to_string()),
            FieldValue::Int8(v) => Cow::Owned(v.to_string()),
            FieldValue::Int16(v) => Cow::Owned(v.to_string()),
            FieldValue::Int32(v) => Cow::Owned(v.to_string()),
            FieldValue::Float32(v) => Cow::Owned(format_float(&format!("{:E}", v))),
            FieldValue::Float64(v) => Cow::Owned(format_float(&format!("{:E}", v))),
            FieldValue::Bool(v) => Cow::Borrowed(if *v { "true" } else { "false" }),
            FieldValue::Time(v) => Cow::Owned(format_rfc3339_nanos(v)),
            FieldValue::Error(None) => return Ok(None),
            FieldValue::Error(Some(err)) => Cow::Owned(err.to_string()),
            FieldValue::Json(v) => Cow::Owned(serde_json::to_string(&v.to_json()?)?),
            FieldValue::Display(v) => Cow::Owned(v.to_string()),
        };
        Ok(Some(text))
    }

    /// JSON form used by structured encoders: JSON fields stay structured,
    /// everything else is the rendered text.
    pub(crate) fn render_json(&self) -> Result<Option<serde_json::Value>> {
        match &self.value {
            FieldValue::Json(v) => Ok(Some(v.to_json()?)),
            _ => Ok(self
                .render()?
                .map(|text| serde_json::Value::String(text.into_owned()))),
        }
    }
}

struct DebugAsDisplay<T>(T);

impl<T: fmt::Debug> fmt::Display for DebugAsDisplay<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

/// Rewrite Rust's `{:E}` output (`6.1E0`) into `6.1E+00`.
///
/// `{:E}` already picks the shortest digits that round-trip at the source
/// width, so only the exponent needs a sign and two-digit padding.
fn format_float(scientific: &str) -> String {
    let Some((mantissa, exponent)) = scientific.split_once('E') else {
        return match scientific {
            "inf" => "+Inf".to_string(),
            "-inf" => "-Inf".to_string(),
            other => other.to_string(),
        };
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{}E{}{:0>2}", mantissa, sign, digits)
}
