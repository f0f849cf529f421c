use super::BinderConfig;
use crate::core::{BindError, ETag, EnumType, FieldDescriptor, Kind, Result, TypedValue};
use crate::wire::{PropertyBag, WireValue, table, text};
use tracing::trace;
use uuid::Uuid;

/// Outcome of reading one field from a bag.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// The key is not in the bag.
    Missing,
    /// Stored as a native null or a null sentinel. Non-nullable fields carry
    /// their kind's zero value in `default`.
    Null { default: Option<TypedValue> },
    Value(TypedValue),
}

impl Decoded {
    pub fn is_absent(&self) -> bool {
        !matches!(self, Self::Value(_))
    }

    /// The decoded value; `None` whenever the field is absent.
    pub fn value(&self) -> Option<&TypedValue> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<TypedValue> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// The decoded value, or the zero value of a non-nullable absent field.
    pub fn value_or_default(&self) -> Option<&TypedValue> {
        match self {
            Self::Value(value) => Some(value),
            Self::Null { default } => default.as_ref(),
            Self::Missing => None,
        }
    }
}

pub(super) fn decode_field(
    config: &BinderConfig,
    field: &FieldDescriptor,
    bag: &PropertyBag,
) -> Result<Decoded> {
    let key = config.lookup_key(field.name());
    if key != field.name() {
        trace!(field = field.name(), key, "reading remapped key");
    }

    let Some(raw) = bag.get(key) else {
        return Ok(Decoded::Missing);
    };

    if raw.is_null() {
        return Ok(null_for(field));
    }

    if let WireValue::String(s) = raw {
        if table::is_null_sentinel(field.kind(), s) {
            trace!(field = field.name(), sentinel = s.as_str(), "null sentinel");
            return Ok(null_for(field));
        }
    }

    decode_value(field, raw).map(Decoded::Value)
}

fn null_for(field: &FieldDescriptor) -> Decoded {
    let default = if field.nullable() {
        None
    } else {
        Some(TypedValue::default_for(field.kind()))
    };
    Decoded::Null { default }
}

/// Rebuild a present, non-sentinel wire value as the field's declared kind.
pub(crate) fn decode_value(field: &FieldDescriptor, raw: &WireValue) -> Result<TypedValue> {
    let kind = field.kind();
    let malformed = |reason: String| BindError::malformed(field.name(), kind, reason);
    let mismatch = || BindError::mismatch(field.name(), kind, raw.type_name());

    let value = match (kind, raw) {
        (Kind::Binary, WireValue::String(s)) => {
            TypedValue::Binary(text::decode_base64(s).map_err(malformed)?)
        }
        (Kind::Binary, WireValue::Binary(bytes)) => TypedValue::Binary(bytes.clone()),

        (Kind::Int64, WireValue::String(s)) => {
            TypedValue::Int64(text::parse_integer(s).map_err(malformed)?)
        }
        (Kind::Int64, WireValue::Int(i)) => TypedValue::Int64(*i),

        (Kind::UInt64, WireValue::String(s)) => {
            TypedValue::UInt64(text::parse_integer(s).map_err(malformed)?)
        }
        (Kind::UInt64, WireValue::Int(i)) => TypedValue::UInt64(
            u64::try_from(*i).map_err(|_| malformed(format!("{} is negative", i)))?,
        ),

        (Kind::Double, WireValue::String(s)) => {
            TypedValue::Double(text::parse_double(s).map_err(malformed)?)
        }
        (Kind::Double, WireValue::Double(f)) => TypedValue::Double(*f),
        (Kind::Double, WireValue::Int(i)) => TypedValue::Double(*i as f64),

        (Kind::Boolean, WireValue::Bool(b)) => TypedValue::Boolean(*b),
        (Kind::Boolean, WireValue::String(s)) => {
            TypedValue::Boolean(text::parse_bool(s).map_err(malformed)?)
        }

        (Kind::Guid, WireValue::String(s)) => TypedValue::Guid(
            Uuid::parse_str(s.trim()).map_err(|e| malformed(format!("invalid UUID '{}': {}", s, e)))?,
        ),

        (Kind::DateTimeOffset, WireValue::String(s)) => {
            TypedValue::DateTimeOffset(text::parse_datetime_offset(s).map_err(malformed)?)
        }

        (Kind::DateTime, WireValue::String(s)) => {
            TypedValue::DateTime(text::parse_datetime(s).map_err(malformed)?)
        }

        (Kind::String, WireValue::String(s)) => TypedValue::String(s.clone()),

        (Kind::Int32, WireValue::Int(i)) => TypedValue::Int32(
            i32::try_from(*i).map_err(|_| malformed(format!("{} is out of range", i)))?,
        ),
        (Kind::Int32, WireValue::String(s)) => {
            TypedValue::Int32(text::parse_integer(s).map_err(malformed)?)
        }

        (Kind::Enum(enum_type), WireValue::String(s)) => {
            TypedValue::Enum(resolve_enum(field, enum_type, s)?)
        }
        (Kind::Enum(enum_type), WireValue::Int(i)) => {
            TypedValue::Enum(resolve_enum(field, enum_type, &i.to_string())?)
        }

        (Kind::ETag, WireValue::String(s)) => TypedValue::ETag(ETag::new(s.clone())),

        _ => return Err(mismatch()),
    };

    Ok(value)
}

fn resolve_enum(field: &FieldDescriptor, enum_type: &EnumType, text: &str) -> Result<String> {
    enum_type
        .resolve(text)
        .map(str::to_string)
        .ok_or_else(|| BindError::UnknownEnumMember {
            field: field.name().to_string(),
            enum_name: enum_type.name.clone(),
            member: text.to_string(),
        })
}
