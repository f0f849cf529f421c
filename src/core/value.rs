use crate::core::Kind;
use crate::wire::text;
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde_json::Value as JsonValue;
use std::fmt;
use uuid::Uuid;

/// Opaque concurrency tag surfaced by the service (e.g. `W/"datetime'...'"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ETag(String);

impl ETag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ETag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A field value in its in-memory form, one variant per [`Kind`].
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Int64(i64),
    UInt64(u64),
    Double(f64),
    Boolean(bool),
    Guid(Uuid),
    DateTimeOffset(DateTime<FixedOffset>),
    DateTime(NaiveDateTime),
    String(String),
    Int32(i32),
    /// Symbolic member name of the declared enumeration.
    Enum(String),
    Binary(Vec<u8>),
    ETag(ETag),
}

impl TypedValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Int64(_) => "Int64",
            Self::UInt64(_) => "UInt64",
            Self::Double(_) => "Double",
            Self::Boolean(_) => "Boolean",
            Self::Guid(_) => "Guid",
            Self::DateTimeOffset(_) => "DateTimeOffset",
            Self::DateTime(_) => "DateTime",
            Self::String(_) => "String",
            Self::Int32(_) => "Int32",
            Self::Enum(_) => "Enum",
            Self::Binary(_) => "Binary",
            Self::ETag(_) => "ETag",
        }
    }

    /// Variant-level check; enum membership is checked by the encoder.
    pub fn is_kind(&self, kind: &Kind) -> bool {
        matches!(
            (self, kind),
            (Self::Int64(_), Kind::Int64)
                | (Self::UInt64(_), Kind::UInt64)
                | (Self::Double(_), Kind::Double)
                | (Self::Boolean(_), Kind::Boolean)
                | (Self::Guid(_), Kind::Guid)
                | (Self::DateTimeOffset(_), Kind::DateTimeOffset)
                | (Self::DateTime(_), Kind::DateTime)
                | (Self::String(_), Kind::String)
                | (Self::Int32(_), Kind::Int32)
                | (Self::Enum(_), Kind::Enum(_))
                | (Self::Binary(_), Kind::Binary)
                | (Self::ETag(_), Kind::ETag)
        )
    }

    /// Zero value handed out when a non-nullable field reads as absent.
    pub fn default_for(kind: &Kind) -> Self {
        match kind {
            Kind::Int64 => Self::Int64(0),
            Kind::UInt64 => Self::UInt64(0),
            Kind::Double => Self::Double(0.0),
            Kind::Boolean => Self::Boolean(false),
            Kind::Guid => Self::Guid(Uuid::nil()),
            Kind::DateTimeOffset => Self::DateTimeOffset(NaiveDateTime::default().and_utc().fixed_offset()),
            Kind::DateTime => Self::DateTime(NaiveDateTime::default()),
            Kind::String => Self::String(String::new()),
            Kind::Int32 => Self::Int32(0),
            Kind::Enum(e) => Self::Enum(e.first_member().unwrap_or_default().to_string()),
            Kind::Binary => Self::Binary(Vec::new()),
            Kind::ETag => Self::ETag(ETag::default()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Enum(s) => Some(s),
            Self::ETag(tag) => Some(tag.as_str()),
            _ => None,
        }
    }

    /// JSON rendering used for reports; not the wire form.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Int64(i) => JsonValue::from(*i),
            Self::UInt64(u) => JsonValue::from(*u),
            Self::Double(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or_else(|| JsonValue::String(text::format_double(*f))),
            Self::Boolean(b) => JsonValue::Bool(*b),
            Self::Guid(u) => JsonValue::String(u.to_string()),
            Self::DateTimeOffset(dt) => JsonValue::String(text::format_datetime_offset(dt)),
            Self::DateTime(dt) => JsonValue::String(text::format_datetime(dt)),
            Self::String(s) | Self::Enum(s) => JsonValue::String(s.clone()),
            Self::Int32(i) => JsonValue::from(*i),
            Self::Binary(bytes) => JsonValue::String(text::encode_base64(bytes)),
            Self::ETag(tag) => JsonValue::String(tag.as_str().to_string()),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int64(i) => write!(f, "{}", i),
            Self::UInt64(u) => write!(f, "{}", u),
            Self::Double(d) => write!(f, "{}", text::format_double(*d)),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Guid(u) => write!(f, "{}", u),
            Self::DateTimeOffset(dt) => write!(f, "{}", text::format_datetime_offset(dt)),
            Self::DateTime(dt) => write!(f, "{}", text::format_datetime(dt)),
            Self::String(s) | Self::Enum(s) => write!(f, "{}", s),
            Self::Int32(i) => write!(f, "{}", i),
            Self::Binary(bytes) => write!(f, "{}", text::encode_base64(bytes)),
            Self::ETag(tag) => write!(f, "{}", tag),
        }
    }
}

impl From<i64> for TypedValue {
    fn from(i: i64) -> Self {
        Self::Int64(i)
    }
}

impl From<u64> for TypedValue {
    fn from(u: u64) -> Self {
        Self::UInt64(u)
    }
}

impl From<i32> for TypedValue {
    fn from(i: i32) -> Self {
        Self::Int32(i)
    }
}

impl From<f64> for TypedValue {
    fn from(f: f64) -> Self {
        Self::Double(f)
    }
}

impl From<bool> for TypedValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<Uuid> for TypedValue {
    fn from(u: Uuid) -> Self {
        Self::Guid(u)
    }
}

impl From<DateTime<FixedOffset>> for TypedValue {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::DateTimeOffset(dt)
    }
}

impl From<NaiveDateTime> for TypedValue {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

impl From<String> for TypedValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<Vec<u8>> for TypedValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Binary(bytes)
    }
}

impl From<ETag> for TypedValue {
    fn from(tag: ETag) -> Self {
        Self::ETag(tag)
    }
}
