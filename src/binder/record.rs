use super::decode::{Decoded, decode_value};
use crate::core::{BindError, EntitySchema, Result, TypedValue};
use crate::wire::WireValue;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;

/// A record as the caller holds it: field name -> value, `None` for absent.
pub type Record = HashMap<String, Option<TypedValue>>;

/// Per-field decode results, in schema order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedRecord {
    fields: Vec<(String, Decoded)>,
}

impl DecodedRecord {
    pub(super) fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    pub(super) fn push(&mut self, name: String, decoded: Decoded) {
        self.fields.push((name, decoded));
    }

    pub fn get(&self, name: &str) -> Option<&Decoded> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, decoded)| decoded)
    }

    pub fn value(&self, name: &str) -> Option<&TypedValue> {
        self.get(name).and_then(Decoded::value)
    }

    /// Unknown names count as absent.
    pub fn is_absent(&self, name: &str) -> bool {
        self.get(name).is_none_or(Decoded::is_absent)
    }

    pub fn absent_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, decoded)| decoded.is_absent())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Present values as a JSON object. Absent fields are `null`, including
    /// non-nullable ones; their defaults stay on [`Decoded::value_or_default`].
    pub fn to_json(&self) -> JsonValue {
        let obj: Map<String, JsonValue> = self
            .fields
            .iter()
            .map(|(name, decoded)| {
                let value = decoded.value().map_or(JsonValue::Null, TypedValue::to_json);
                (name.clone(), value)
            })
            .collect();
        JsonValue::Object(obj)
    }

    /// Present values only, consuming the result.
    pub fn into_record(self) -> Record {
        self.fields
            .into_iter()
            .map(|(name, decoded)| (name, decoded.into_value()))
            .collect()
    }
}

/// Read a typed record from plain JSON, using each field's declared kind.
///
/// The JSON uses the same literal forms as the wire (numbers or decimal text
/// for integers, RFC 3339 timestamps, base64 for binary) but is never checked
/// for sentinels: `null` is the only way to say absent.
pub fn parse_record(schema: &EntitySchema, json: &JsonValue) -> Result<Record> {
    let obj = json
        .as_object()
        .ok_or_else(|| BindError::InvalidBag("Expected JSON object".into()))?;

    let mut record = Record::with_capacity(obj.len());
    for (name, value) in obj {
        let field = schema
            .get_field(name)
            .ok_or_else(|| BindError::UnknownField(name.clone()))?;

        let wire = WireValue::from_json(value)?;
        let typed = if wire.is_null() {
            None
        } else {
            Some(decode_value(field, &wire)?)
        };
        record.insert(name.clone(), typed);
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FieldDescriptor, Kind};
    use serde_json::json;

    fn schema() -> EntitySchema {
        EntitySchema::new(vec![
            FieldDescriptor::new("Name", Kind::String),
            FieldDescriptor::new("Age", Kind::Int64),
            FieldDescriptor::new("Blob", Kind::Binary),
        ])
        .unwrap()
    }

    #[test]
    fn test_parse_record() {
        let record = parse_record(
            &schema(),
            &json!({"Name": "Alice", "Age": 34, "Blob": "QUJD"}),
        )
        .unwrap();

        assert_eq!(record["Name"], Some(TypedValue::String("Alice".into())));
        assert_eq!(record["Age"], Some(TypedValue::Int64(34)));
        assert_eq!(record["Blob"], Some(TypedValue::Binary(b"ABC".to_vec())));
    }

    #[test]
    fn test_parse_record_keeps_sentinel_text() {
        let record = parse_record(&schema(), &json!({"Name": "String.Null", "Age": null})).unwrap();
        assert_eq!(record["Name"], Some(TypedValue::String("String.Null".into())));
        assert_eq!(record["Age"], None);
    }

    #[test]
    fn test_parse_record_rejects_unknown_fields() {
        let err = parse_record(&schema(), &json!({"Height": 180})).unwrap_err();
        assert!(matches!(err, BindError::UnknownField(name) if name == "Height"));
    }

    #[test]
    fn test_decoded_record_accessors() {
        let mut decoded = DecodedRecord::with_capacity(2);
        decoded.push("Name".into(), Decoded::Value(TypedValue::String("Bob".into())));
        decoded.push(
            "Age".into(),
            Decoded::Null {
                default: Some(TypedValue::Int64(0)),
            },
        );

        assert_eq!(decoded.value("Name"), Some(&TypedValue::String("Bob".into())));
        assert!(decoded.is_absent("Age"));
        assert!(decoded.is_absent("Missing"));
        assert_eq!(decoded.absent_fields(), vec!["Age"]);
        assert_eq!(decoded.to_json(), json!({"Name": "Bob", "Age": null}));
        assert_eq!(
            decoded.get("Age").and_then(Decoded::value_or_default),
            Some(&TypedValue::Int64(0))
        );
    }
}
