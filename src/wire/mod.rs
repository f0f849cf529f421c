//! Wire Format Module
//!
//! Everything that knows how the storage service spells values:
//!
//! - `bag.rs` - Flat property bag and its JSON form
//! - `table.rs` - Annotation tokens and null sentinels per kind
//! - `text.rs` - Invariant text forms (numbers, timestamps, base64)

mod bag;
pub mod table;
pub mod text;

pub use bag::{PropertyBag, WireValue};
pub use table::{WireType, wire_type};
