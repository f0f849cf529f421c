use super::BinderConfig;
use crate::core::{BindError, FieldDescriptor, Kind, Result, TypedValue};
use crate::wire::{WireValue, table, text};
use tracing::{debug, warn};

/// Entries produced for one field, primary entry first.
pub type BagEntries = Vec<(String, WireValue)>;

pub(super) fn encode_field(
    config: &BinderConfig,
    field: &FieldDescriptor,
    value: Option<&TypedValue>,
) -> Result<BagEntries> {
    if config.is_reserved(field.name()) {
        debug!(field = field.name(), "skipping server-managed field");
        return Ok(Vec::new());
    }

    let wire = table::wire_type(field.kind());

    let Some(value) = value else {
        let placeholder = match wire.sentinel {
            Some(sentinel) => WireValue::String(sentinel.to_string()),
            None => WireValue::Null,
        };
        return Ok(vec![(field.name().to_string(), placeholder)]);
    };

    check_kind(field, value)?;
    check_range(field, value)?;

    let primary = to_wire(value);
    if reads_back_absent(field.kind(), &primary) {
        warn!(
            field = field.name(),
            value = %primary,
            "value collides with the field's null sentinel and will read back as absent"
        );
    }

    let mut entries = Vec::with_capacity(2);
    entries.push((field.name().to_string(), primary));
    if let Some(token) = wire.annotation {
        entries.push((
            field.annotation_key().to_string(),
            WireValue::String(token.to_string()),
        ));
    }

    Ok(entries)
}

fn check_kind(field: &FieldDescriptor, value: &TypedValue) -> Result<()> {
    if !value.is_kind(field.kind()) {
        return Err(BindError::mismatch(
            field.name(),
            field.kind(),
            value.kind_name(),
        ));
    }

    if let (Kind::Enum(enum_type), TypedValue::Enum(symbol)) = (field.kind(), value) {
        if !enum_type.contains(symbol) {
            return Err(BindError::UnknownEnumMember {
                field: field.name().to_string(),
                enum_name: enum_type.name.clone(),
                member: symbol.clone(),
            });
        }
    }

    Ok(())
}

fn reads_back_absent(kind: &Kind, wire: &WireValue) -> bool {
    matches!(wire, WireValue::String(s) if table::is_null_sentinel(kind, s))
}

fn check_range(field: &FieldDescriptor, value: &TypedValue) -> Result<()> {
    let checked = match value {
        TypedValue::DateTimeOffset(dt) => text::check_datetime_offset(dt),
        TypedValue::DateTime(dt) => text::check_datetime(dt),
        _ => Ok(()),
    };
    checked.map_err(|reason| BindError::malformed(field.name(), field.kind(), reason))
}

/// 64-bit integers and enum members travel as text; the wire's numeric
/// types cannot carry the full range or a symbol.
fn to_wire(value: &TypedValue) -> WireValue {
    match value {
        TypedValue::Int64(i) => WireValue::String(i.to_string()),
        TypedValue::UInt64(u) => WireValue::String(u.to_string()),
        TypedValue::Enum(symbol) => WireValue::String(symbol.clone()),
        TypedValue::Double(f) => WireValue::Double(*f),
        TypedValue::Boolean(b) => WireValue::Bool(*b),
        TypedValue::Int32(i) => WireValue::Int(i64::from(*i)),
        TypedValue::String(s) => WireValue::String(s.clone()),
        TypedValue::Guid(u) => WireValue::String(u.hyphenated().to_string()),
        TypedValue::DateTimeOffset(dt) => WireValue::String(text::format_datetime_offset(dt)),
        TypedValue::DateTime(dt) => WireValue::String(text::format_datetime(dt)),
        TypedValue::Binary(bytes) => WireValue::Binary(bytes.clone()),
        TypedValue::ETag(tag) => WireValue::String(tag.as_str().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EnumType;
    use chrono::{FixedOffset, NaiveDate, TimeZone};

    fn encode(field: &FieldDescriptor, value: Option<TypedValue>) -> Result<BagEntries> {
        encode_field(&BinderConfig::default(), field, value.as_ref())
    }

    #[test]
    fn test_int64_written_as_string_with_annotation() {
        let field = FieldDescriptor::new("Age", Kind::Int64);
        let entries = encode(&field, Some(TypedValue::Int64(1_000_000_000_000))).unwrap();

        assert_eq!(
            entries,
            vec![
                ("Age".to_string(), WireValue::String("1000000000000".into())),
                ("Age@odata.type".to_string(), WireValue::String("Edm.Int64".into())),
            ]
        );
    }

    #[test]
    fn test_absent_values_get_no_annotation() {
        let field = FieldDescriptor::new("Age", Kind::Int64);
        let entries = encode(&field, None).unwrap();
        assert_eq!(entries, vec![("Age".to_string(), WireValue::String("Long.Null".into()))]);

        let field = FieldDescriptor::new("Seen", Kind::DateTimeOffset);
        let entries = encode(&field, None).unwrap();
        assert_eq!(entries, vec![("Seen".to_string(), WireValue::Null)]);
    }

    #[test]
    fn test_reserved_fields_are_skipped() {
        let field = FieldDescriptor::new("Timestamp", Kind::DateTimeOffset);
        let value = TypedValue::default_for(&Kind::DateTimeOffset);
        assert!(encode(&field, Some(value)).unwrap().is_empty());
    }

    #[test]
    fn test_kind_mismatch_is_rejected() {
        let field = FieldDescriptor::new("Age", Kind::Int64);
        let err = encode(&field, Some(TypedValue::Int32(3))).unwrap_err();
        assert!(matches!(err, BindError::KindMismatch { .. }));
    }

    #[test]
    fn test_enum_member_is_checked() {
        let color = EnumType::new("Color").member("Red").member("Green");
        let field = FieldDescriptor::new("Color", Kind::Enum(color));

        let entries = encode(&field, Some(TypedValue::Enum("Green".into()))).unwrap();
        assert_eq!(entries, vec![("Color".to_string(), WireValue::String("Green".into()))]);

        let err = encode(&field, Some(TypedValue::Enum("Purple".into()))).unwrap_err();
        assert!(matches!(err, BindError::UnknownEnumMember { member, .. } if member == "Purple"));
    }

    #[test]
    fn test_unrepresentable_timestamps_are_rejected() {
        let seen = FieldDescriptor::new("Seen", Kind::DateTimeOffset);
        let odd_offset = FixedOffset::east_opt(3630).unwrap();
        let value = odd_offset.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let err = encode(&seen, Some(TypedValue::DateTimeOffset(value))).unwrap_err();
        assert!(matches!(err, BindError::MalformedValue { ref field, .. } if field == "Seen"));

        let created = FieldDescriptor::new("Created", Kind::DateTime);
        let far = NaiveDate::from_ymd_opt(10000, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let err = encode(&created, Some(TypedValue::DateTime(far))).unwrap_err();
        assert!(matches!(err, BindError::MalformedValue { .. }));
    }

    #[test]
    fn test_sentinel_collision_is_per_kind() {
        let text = |s: &str| WireValue::String(s.to_string());

        assert!(reads_back_absent(&Kind::String, &text("String.Null")));
        assert!(reads_back_absent(&Kind::Int64, &text("Long.Null")));
        assert!(!reads_back_absent(&Kind::String, &text("Double.Null")));
        assert!(!reads_back_absent(&Kind::ETag, &text("String.Null")));

        let tier = EnumType::new("Tier").member("String.Null");
        assert!(!reads_back_absent(&Kind::Enum(tier), &text("String.Null")));
    }
}
