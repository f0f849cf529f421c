//! Type Binder
//!
//! Converts between typed field values and property-bag entries.
//!
//! - `config.rs` - Reserved fields and key remaps
//! - `encode.rs` - Typed value -> bag entries
//! - `decode.rs` - Bag entry -> typed value or absence
//! - `record.rs` - Whole-record helpers built on the two above

mod config;
mod decode;
mod encode;
mod record;

pub use config::{BinderConfig, ETAG_FIELD, ETAG_WIRE_KEY, TIMESTAMP_FIELD};
pub use decode::Decoded;
pub use encode::BagEntries;
pub use record::{DecodedRecord, Record, parse_record};

use crate::core::{BindError, EntitySchema, FieldDescriptor, Result, TypedValue};
use crate::wire::PropertyBag;
use lazy_static::lazy_static;
use std::sync::Arc;
use tracing::debug;

lazy_static! {
    static ref SHARED_BINDER: Binder = Binder::default();
}

/// Stateless converter between typed values and property-bag entries.
///
/// Cloning is cheap; the configuration is shared and never mutated.
#[derive(Debug, Clone, Default)]
pub struct Binder {
    config: Arc<BinderConfig>,
}

impl Binder {
    pub fn new(config: BinderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    /// Process-wide binder with the default configuration.
    pub fn shared() -> &'static Binder {
        &SHARED_BINDER
    }

    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    /// Produce the bag entries for one field; `None` encodes absence.
    pub fn encode(&self, field: &FieldDescriptor, value: Option<&TypedValue>) -> Result<BagEntries> {
        encode::encode_field(&self.config, field, value)
    }

    /// Encode one field straight into `bag`.
    pub fn encode_into(
        &self,
        field: &FieldDescriptor,
        value: Option<&TypedValue>,
        bag: &mut PropertyBag,
    ) -> Result<()> {
        let entries = self.encode(field, value)?;
        bag.extend(entries);
        Ok(())
    }

    pub fn decode(&self, field: &FieldDescriptor, bag: &PropertyBag) -> Result<Decoded> {
        decode::decode_field(&self.config, field, bag)
    }

    /// Encode every schema field of `record`.
    ///
    /// Schema fields the record does not mention are encoded as absent.
    pub fn encode_record(&self, schema: &EntitySchema, record: &Record) -> Result<PropertyBag> {
        if let Some(unknown) = record.keys().find(|name| schema.get_field(name).is_none()) {
            return Err(BindError::UnknownField(unknown.clone()));
        }

        let mut bag = PropertyBag::new();
        for field in schema.fields() {
            let value = record.get(field.name()).and_then(Option::as_ref);
            self.encode_into(field, value, &mut bag)?;
        }

        debug!(
            fields = schema.field_count(),
            entries = bag.len(),
            "encoded record"
        );
        Ok(bag)
    }

    pub fn decode_record(&self, schema: &EntitySchema, bag: &PropertyBag) -> Result<DecodedRecord> {
        let mut decoded = DecodedRecord::with_capacity(schema.field_count());
        for field in schema.fields() {
            decoded.push(field.name().to_string(), self.decode(field, bag)?);
        }

        debug!(
            fields = decoded.len(),
            absent = decoded.absent_fields().len(),
            "decoded record"
        );
        Ok(decoded)
    }
}
