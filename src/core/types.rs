use super::{BindError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Separator appended to a field name to form its type-annotation key.
pub const ANNOTATION_SUFFIX: &str = "@odata.type";

/// In-memory value kinds the binder knows how to project onto the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Int64,
    UInt64,
    Double,
    Boolean,
    Guid,
    DateTimeOffset,
    DateTime,
    String,
    Int32,
    Enum(EnumType),
    Binary,
    ETag,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int64 => write!(f, "Int64"),
            Self::UInt64 => write!(f, "UInt64"),
            Self::Double => write!(f, "Double"),
            Self::Boolean => write!(f, "Boolean"),
            Self::Guid => write!(f, "Guid"),
            Self::DateTimeOffset => write!(f, "DateTimeOffset"),
            Self::DateTime => write!(f, "DateTime"),
            Self::String => write!(f, "String"),
            Self::Int32 => write!(f, "Int32"),
            Self::Enum(e) => write!(f, "Enum({})", e.name),
            Self::Binary => write!(f, "Binary"),
            Self::ETag => write!(f, "ETag"),
        }
    }
}

/// A symbolic enumeration: member names paired with their numeric values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
    pub members: Vec<(String, i64)>,
}

impl EnumType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Add a member; its numeric value follows the previous member.
    pub fn member(mut self, symbol: impl Into<String>) -> Self {
        let next = self.members.last().map(|(_, v)| v + 1).unwrap_or(0);
        self.members.push((symbol.into(), next));
        self
    }

    pub fn member_with_value(mut self, symbol: impl Into<String>, value: i64) -> Self {
        self.members.push((symbol.into(), value));
        self
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.members.iter().any(|(name, _)| name == symbol)
    }

    /// Resolve wire text to a member symbol.
    ///
    /// Accepts the exact symbolic name, or the decimal rendering of a
    /// member's numeric value.
    pub fn resolve(&self, text: &str) -> Option<&str> {
        let text = text.trim();
        if let Some((name, _)) = self.members.iter().find(|(name, _)| name == text) {
            return Some(name);
        }

        let numeric: i64 = text.parse().ok()?;
        self.members
            .iter()
            .find(|(_, value)| *value == numeric)
            .map(|(name, _)| name.as_str())
    }

    pub fn first_member(&self) -> Option<&str> {
        self.members.first().map(|(name, _)| name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldType {
    pub kind: Kind,
    pub nullable: bool,
}

impl FieldType {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            nullable: true,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "{}?", self.kind)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

/// Static metadata describing one record field.
///
/// The annotation key is derived from the name once, at construction, and
/// never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FieldDef", into = "FieldDef")]
pub struct FieldDescriptor {
    name: String,
    field_type: FieldType,
    annotation_key: String,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: Kind) -> Self {
        let name = name.into();
        let annotation_key = format!("{}{}", name, ANNOTATION_SUFFIX);
        Self {
            name,
            field_type: FieldType::new(kind),
            annotation_key,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.field_type = self.field_type.not_null();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn kind(&self) -> &Kind {
        &self.field_type.kind
    }

    pub fn nullable(&self) -> bool {
        self.field_type.nullable
    }

    pub fn annotation_key(&self) -> &str {
        &self.annotation_key
    }
}

fn default_nullable() -> bool {
    true
}

/// Serialized shape of a field descriptor (the annotation key is derived).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FieldDef {
    name: String,
    kind: Kind,
    #[serde(default = "default_nullable")]
    nullable: bool,
}

impl From<FieldDef> for FieldDescriptor {
    fn from(def: FieldDef) -> Self {
        let field = FieldDescriptor::new(def.name, def.kind);
        if def.nullable { field } else { field.not_null() }
    }
}

impl From<FieldDescriptor> for FieldDef {
    fn from(field: FieldDescriptor) -> Self {
        Self {
            name: field.name,
            kind: field.field_type.kind,
            nullable: field.field_type.nullable,
        }
    }
}

/// Ordered set of field descriptors for one record type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SchemaDef", into = "SchemaDef")]
pub struct EntitySchema {
    fields: Vec<FieldDescriptor>,
}

impl EntitySchema {
    pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !seen.insert(field.name()) {
                return Err(BindError::DuplicateField(field.name().to_string()));
            }
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn find_field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name() == name)
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.find_field_index(name).map(|idx| &self.fields[idx])
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SchemaDef {
    fields: Vec<FieldDescriptor>,
}

impl TryFrom<SchemaDef> for EntitySchema {
    type Error = BindError;

    fn try_from(def: SchemaDef) -> Result<Self> {
        EntitySchema::new(def.fields)
    }
}

impl From<EntitySchema> for SchemaDef {
    fn from(schema: EntitySchema) -> Self {
        Self {
            fields: schema.fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_key_is_derived_from_name() {
        let field = FieldDescriptor::new("Age", Kind::Int64);
        assert_eq!(field.annotation_key(), "Age@odata.type");
        assert!(field.nullable());
        assert!(!field.not_null().nullable());
    }

    #[test]
    fn test_enum_resolution() {
        let color = EnumType::new("Color")
            .member("Red")
            .member("Green")
            .member_with_value("Blue", 10);

        assert_eq!(color.resolve("Green"), Some("Green"));
        assert_eq!(color.resolve("10"), Some("Blue"));
        assert_eq!(color.resolve("1"), Some("Green"));
        assert_eq!(color.resolve("green"), None);
        assert_eq!(color.resolve("7"), None);
        assert_eq!(color.first_member(), Some("Red"));
    }

    #[test]
    fn test_schema_rejects_duplicates() {
        let err = EntitySchema::new(vec![
            FieldDescriptor::new("Name", Kind::String),
            FieldDescriptor::new("Name", Kind::Int32),
        ])
        .unwrap_err();
        assert!(matches!(err, BindError::DuplicateField(name) if name == "Name"));
    }

    #[test]
    fn test_schema_from_json() {
        let schema = EntitySchema::from_json_str(
            r#"{"fields":[
                {"name":"Age","kind":"Int64"},
                {"name":"Score","kind":"Double","nullable":false},
                {"name":"Color","kind":{"Enum":{"name":"Color","members":[["Red",0],["Blue",1]]}}}
            ]}"#,
        )
        .unwrap();

        assert_eq!(schema.field_count(), 3);
        assert!(schema.get_field("Age").unwrap().nullable());
        assert!(!schema.get_field("Score").unwrap().nullable());
        assert_eq!(
            schema.get_field("Color").unwrap().annotation_key(),
            "Color@odata.type"
        );
        assert!(matches!(schema.get_field("Color").unwrap().kind(), Kind::Enum(_)));
    }
}
