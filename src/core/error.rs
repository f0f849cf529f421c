use thiserror::Error;

#[derive(Error, Debug)]
pub enum BindError {
    #[error("Malformed value for field '{field}' ({kind}): {reason}")]
    MalformedValue {
        field: String,
        kind: String,
        reason: String,
    },

    #[error("Kind mismatch for field '{field}': expected {expected}, got {actual}")]
    KindMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Field '{field}': '{member}' is not a member of enum {enum_name}")]
    UnknownEnumMember {
        field: String,
        enum_name: String,
        member: String,
    },

    #[error("Field '{0}' is not part of the schema")]
    UnknownField(String),

    #[error("Field '{0}' is declared more than once")]
    DuplicateField(String),

    #[error("Invalid property bag: {0}")]
    InvalidBag(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(String),
}

pub type Result<T> = std::result::Result<T, BindError>;

impl BindError {
    pub(crate) fn malformed(field: &str, kind: impl ToString, reason: impl ToString) -> Self {
        Self::MalformedValue {
            field: field.to_string(),
            kind: kind.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn mismatch(field: &str, expected: impl ToString, actual: impl ToString) -> Self {
        Self::KindMismatch {
            field: field.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

impl From<serde_json::Error> for BindError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
