pub mod error;
pub mod types;
pub mod value;

pub use error::{BindError, Result};
pub use types::{ANNOTATION_SUFFIX, EntitySchema, EnumType, FieldDescriptor, FieldType, Kind};
pub use value::{ETag, TypedValue};
