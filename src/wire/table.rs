//! Wire-type table
//!
//! Maps every value kind to the annotation token written next to it and the
//! sentinel string that stands in for a missing value. Encode and decode
//! both read from here; nothing else knows these strings.

use crate::core::{EnumType, Kind};

pub const EDM_BINARY: &str = "Edm.Binary";
pub const EDM_INT64: &str = "Edm.Int64";
pub const EDM_DOUBLE: &str = "Edm.Double";
pub const EDM_GUID: &str = "Edm.Guid";
pub const EDM_DATETIME: &str = "Edm.DateTime";

/// Generic sentinel; read as absence for every kind that has a sentinel.
pub const STRING_NULL: &str = "String.Null";
pub const DATETIME_NULL: &str = "DateTime.Null";
pub const BINARY_NULL: &str = "Binary.Null";
pub const BOOLEAN_NULL: &str = "Boolean.Null";
pub const DOUBLE_NULL: &str = "Double.Null";
pub const GUID_NULL: &str = "Guid.Null";
pub const INT_NULL: &str = "Int.Null";
pub const LONG_NULL: &str = "Long.Null";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireType {
    /// Token written under the annotation key; `None` for implicit wire types.
    pub annotation: Option<&'static str>,
    /// Placeholder for an absent value; `None` means a native null is written.
    pub sentinel: Option<&'static str>,
}

impl WireType {
    const fn new(annotation: Option<&'static str>, sentinel: Option<&'static str>) -> Self {
        Self {
            annotation,
            sentinel,
        }
    }
}

pub fn wire_type(kind: &Kind) -> WireType {
    match kind {
        Kind::Int64 => WireType::new(Some(EDM_INT64), Some(LONG_NULL)),
        Kind::UInt64 => WireType::new(Some(EDM_INT64), None),
        Kind::Double => WireType::new(Some(EDM_DOUBLE), Some(DOUBLE_NULL)),
        Kind::Boolean => WireType::new(None, Some(BOOLEAN_NULL)),
        Kind::Guid => WireType::new(Some(EDM_GUID), Some(GUID_NULL)),
        Kind::DateTimeOffset => WireType::new(Some(EDM_DATETIME), None),
        Kind::DateTime => WireType::new(Some(EDM_DATETIME), Some(DATETIME_NULL)),
        Kind::String => WireType::new(None, Some(STRING_NULL)),
        Kind::Int32 => WireType::new(None, Some(INT_NULL)),
        Kind::Enum(_) => WireType::new(None, None),
        Kind::Binary => WireType::new(Some(EDM_BINARY), Some(BINARY_NULL)),
        Kind::ETag => WireType::new(None, None),
    }
}

/// True when `text` is read back as absence for `kind`.
pub fn is_null_sentinel(kind: &Kind, text: &str) -> bool {
    match wire_type(kind).sentinel {
        Some(sentinel) => text == sentinel || text == STRING_NULL,
        None => false,
    }
}

/// One row per kind, in a stable order, for listings.
pub fn entries() -> Vec<(Kind, WireType)> {
    [
        Kind::Int64,
        Kind::UInt64,
        Kind::Double,
        Kind::Boolean,
        Kind::Guid,
        Kind::DateTimeOffset,
        Kind::DateTime,
        Kind::String,
        Kind::Int32,
        Kind::Enum(EnumType::new("*")),
        Kind::Binary,
        Kind::ETag,
    ]
    .into_iter()
    .map(|kind| {
        let wire = wire_type(&kind);
        (kind, wire)
    })
    .collect()
}
