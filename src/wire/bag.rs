use super::text;
use crate::core::{BindError, Result};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use std::collections::hash_map;
use std::fmt;

/// A single value as it travels in the property bag.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    Binary(Vec<u8>),
}

impl WireValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::Binary(_) => "binary",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn from_json(json: &JsonValue) -> Result<Self> {
        match json {
            JsonValue::Null => Ok(Self::Null),
            JsonValue::Bool(b) => Ok(Self::Bool(*b)),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Self::Double(f))
                } else {
                    Err(BindError::InvalidBag(format!("Unsupported number {}", n)))
                }
            }
            JsonValue::String(s) => Ok(Self::String(s.clone())),
            JsonValue::Array(_) | JsonValue::Object(_) => Err(BindError::InvalidBag(format!(
                "Nested value {} is not allowed in a flat property bag",
                json
            ))),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Int(i) => JsonValue::from(*i),
            Self::Double(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or_else(|| JsonValue::String(text::format_double(*f))),
            Self::String(s) => JsonValue::String(s.clone()),
            Self::Binary(bytes) => JsonValue::String(text::encode_base64(bytes)),
        }
    }
}

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Double(d) => write!(f, "{}", text::format_double(*d)),
            Self::String(s) => write!(f, "{:?}", s),
            Self::Binary(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

impl From<&str> for WireValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for WireValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for WireValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for WireValue {
    fn from(f: f64) -> Self {
        Self::Double(f)
    }
}

impl From<bool> for WireValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Flat, unordered mapping from wire key to wire value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyBag {
    entries: HashMap<String, WireValue>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<WireValue>) -> Option<WireValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&WireValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, WireValue> {
        self.entries.iter()
    }

    pub fn from_json(json: &JsonValue) -> Result<Self> {
        let obj = json
            .as_object()
            .ok_or_else(|| BindError::InvalidBag("Expected JSON object".into()))?;

        obj.iter()
            .map(|(key, value)| Ok((key.clone(), WireValue::from_json(value)?)))
            .collect()
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        let json: JsonValue = serde_json::from_str(input)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> JsonValue {
        let obj: Map<String, JsonValue> = self
            .entries
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect();
        JsonValue::Object(obj)
    }
}

impl FromIterator<(String, WireValue)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (String, WireValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Extend<(String, WireValue)> for PropertyBag {
    fn extend<I: IntoIterator<Item = (String, WireValue)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl IntoIterator for PropertyBag {
    type Item = (String, WireValue);
    type IntoIter = hash_map::IntoIter<String, WireValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a PropertyBag {
    type Item = (&'a String, &'a WireValue);
    type IntoIter = hash_map::Iter<'a, String, WireValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bag_from_json() {
        let bag = PropertyBag::from_json(&json!({
            "Name": "Alice",
            "Age": "34",
            "Age@odata.type": "Edm.Int64",
            "Score": 0.5,
            "Count": 3,
            "Active": true,
            "Nickname": null
        }))
        .unwrap();

        assert_eq!(bag.len(), 7);
        assert_eq!(bag.get("Name"), Some(&WireValue::String("Alice".into())));
        assert_eq!(bag.get("Score"), Some(&WireValue::Double(0.5)));
        assert_eq!(bag.get("Count"), Some(&WireValue::Int(3)));
        assert_eq!(bag.get("Active"), Some(&WireValue::Bool(true)));
        assert!(bag.get("Nickname").unwrap().is_null());
    }

    #[test]
    fn test_bag_rejects_nesting() {
        assert!(matches!(
            PropertyBag::from_json(&json!({"a": {"b": 1}})),
            Err(BindError::InvalidBag(_))
        ));
        assert!(matches!(
            PropertyBag::from_json(&json!([1, 2])),
            Err(BindError::InvalidBag(_))
        ));
    }

    #[test]
    fn test_bag_to_json() {
        let mut bag = PropertyBag::new();
        bag.insert("Blob", WireValue::Binary(b"ABC".to_vec()));
        bag.insert("Ratio", f64::INFINITY);
        bag.insert("Score", 0.0);

        assert_eq!(
            bag.to_json(),
            json!({"Blob": "QUJD", "Ratio": "INF", "Score": 0.0})
        );
    }
}
