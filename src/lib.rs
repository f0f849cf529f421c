// ============================================================================
// tablebind Library
// ============================================================================

//! Bidirectional binder between typed record fields and the flat property bag
//! used by OData-style table storage.
//!
//! ```
//! use tablebind::{Binder, FieldDescriptor, Kind, PropertyBag, TypedValue};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let binder = Binder::shared();
//! let age = FieldDescriptor::new("Age", Kind::Int64);
//!
//! let mut bag = PropertyBag::new();
//! binder.encode_into(&age, Some(&TypedValue::Int64(1_000_000_000_000)), &mut bag)?;
//! assert_eq!(bag.get("Age").and_then(|v| v.as_str()), Some("1000000000000"));
//! assert_eq!(bag.get("Age@odata.type").and_then(|v| v.as_str()), Some("Edm.Int64"));
//!
//! let decoded = binder.decode(&age, &bag)?;
//! assert_eq!(decoded.value(), Some(&TypedValue::Int64(1_000_000_000_000)));
//! # Ok(())
//! # }
//! ```

pub mod binder;
pub mod core;
pub mod wire;

// Re-export main types for convenience
pub use binder::{Binder, BinderConfig, Decoded, DecodedRecord, Record};
pub use crate::core::{
    ANNOTATION_SUFFIX, BindError, ETag, EntitySchema, EnumType, FieldDescriptor, FieldType, Kind,
    Result, TypedValue,
};
pub use wire::{PropertyBag, WireValue};
