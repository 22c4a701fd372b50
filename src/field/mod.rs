//! Field descriptors and spec normalization
//!
//! Descriptors are built from a key and partial settings. Settings are merged
//! over the kind's defaults and checked against its declared shape before the
//! descriptor exists.
//!
//! # Design Principles
//!
//! - The type is the `FieldSpecs` variant; specs of another type cannot be attached
//! - Descriptors are plain values; copying a field is `Clone`
//! - Every shape violation is reported, not just the first

mod date;
mod descriptor;
mod errors;
mod kind;
mod shape;
mod specs;
mod wrapped;

pub use date::{parse_date, parse_date_str};
pub use descriptor::FieldDescriptor;
pub use errors::{FieldError, FieldResult, ShapeViolation};
pub use kind::FieldKind;
pub use shape::{check_spec_shape, declared_shape, Slot, SlotDef};
pub use specs::{
    BooleanSpecs, DateSpecs, EmailSpecs, FieldSpecs, JsonSpecs, KindSpecs, NumberSpecs,
    RelationSpecs, SelectSpecs, StringSpecs, UrlSpecs, DEFAULT_JSON_MAX_SIZE,
};
pub use wrapped::{
    auto_created_at, auto_fields, auto_id, auto_updated_at, WrappedField, RECORD_ID_LENGTH,
};

pub(crate) use shape::json_type_name;
pub(crate) use wrapped::integral_order;
