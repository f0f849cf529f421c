use crate::core::{BindError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Client-facing name of the concurrency tag field.
pub const ETAG_FIELD: &str = "ETag";

/// Client-facing name of the server-maintained last-modified field.
pub const TIMESTAMP_FIELD: &str = "Timestamp";

/// Key under which the service returns the concurrency tag.
pub const ETAG_WIRE_KEY: &str = "odata.etag";

/// Binder configuration
///
/// Holds the two pieces of data the binder needs beyond the wire-type table:
/// which fields are server-managed (never written), and which fields are read
/// from a different wire key than their own name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinderConfig {
    /// Fields skipped entirely on encode
    pub reserved_fields: Vec<String>,

    /// Field name -> wire key consulted on decode
    pub remaps: HashMap<String, String>,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            reserved_fields: vec![ETAG_FIELD.to_string(), TIMESTAMP_FIELD.to_string()],
            remaps: HashMap::from([(ETAG_FIELD.to_string(), ETAG_WIRE_KEY.to_string())]),
        }
    }
}

impl BinderConfig {
    /// Create the default configuration (`ETag`/`Timestamp` reserved, `ETag` remapped)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration with no reserved fields and no remaps
    pub fn empty() -> Self {
        Self {
            reserved_fields: Vec::new(),
            remaps: HashMap::new(),
        }
    }

    /// Mark a field as server-managed
    pub fn reserved_field(mut self, name: &str) -> Self {
        if !self.is_reserved(name) {
            self.reserved_fields.push(name.to_string());
        }
        self
    }

    /// Read `field` from `wire_key` instead of its own name
    pub fn remap(mut self, field: &str, wire_key: &str) -> Self {
        self.remaps.insert(field.to_string(), wire_key.to_string());
        self
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_fields.iter().any(|reserved| reserved == name)
    }

    /// Wire key to consult when decoding `name`
    pub fn lookup_key<'a>(&'a self, name: &'a str) -> &'a str {
        self.remaps.get(name).map(String::as_str).unwrap_or(name)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(empty) = self.reserved_fields.iter().find(|name| name.is_empty()) {
            return Err(BindError::Config(format!(
                "reserved field name must not be empty (got {:?})",
                empty
            )));
        }

        for (field, wire_key) in &self.remaps {
            if field.is_empty() || wire_key.is_empty() {
                return Err(BindError::Config(format!(
                    "remap '{}' -> '{}' has an empty side",
                    field, wire_key
                )));
            }
            if field == wire_key {
                return Err(BindError::Config(format!(
                    "remap '{}' points at itself",
                    field
                )));
            }
        }

        Ok(())
    }

    /// Parse and validate a JSON configuration
    ///
    /// Missing keys fall back to the defaults.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let input = std::fs::read_to_string(path).map_err(|e| {
            BindError::Config(format!("cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_json_str(&input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BinderConfig::new();
        assert!(config.is_reserved("ETag"));
        assert!(config.is_reserved("Timestamp"));
        assert!(!config.is_reserved("Name"));
        assert_eq!(config.lookup_key("ETag"), "odata.etag");
        assert_eq!(config.lookup_key("Name"), "Name");
    }

    #[test]
    fn test_builder() {
        let config = BinderConfig::empty()
            .reserved_field("Version")
            .reserved_field("Version")
            .remap("Version", "odata.version");

        assert_eq!(config.reserved_fields, vec!["Version".to_string()]);
        assert_eq!(config.lookup_key("Version"), "odata.version");
        assert_eq!(config.lookup_key("ETag"), "ETag");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json() {
        let config = BinderConfig::from_json_str(r#"{"reserved_fields": ["Rev"]}"#).unwrap();
        assert_eq!(config.reserved_fields, vec!["Rev".to_string()]);
        assert_eq!(config.lookup_key("ETag"), "odata.etag");

        let err = BinderConfig::from_json_str(r#"{"remaps": {"A": "A"}}"#).unwrap_err();
        assert!(matches!(err, BindError::Config(_)));

        let err = BinderConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, BindError::Json(_)));
    }
}
