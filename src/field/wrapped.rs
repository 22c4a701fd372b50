//! Wrapped fields: a descriptor plus its identity and position in a collection

use serde::Serialize;
use serde_json::Value;

use super::descriptor::FieldDescriptor;
use super::errors::{FieldError, FieldResult};
use super::shape::json_type_name;
use super::specs::{DateSpecs, StringSpecs};

/// Length of record ids referenced by relation fields and held in `_id`.
pub const RECORD_ID_LENGTH: usize = 24;

/// A field descriptor placed in a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedField {
    /// Opaque id, unique within the collection
    pub id: String,
    /// Display and processing position
    pub order: i64,
    /// Built-in field maintained by the storage layer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_auto: Option<bool>,
    pub item: FieldDescriptor,
}

impl WrappedField {
    pub fn new(id: impl Into<String>, order: i64, item: FieldDescriptor) -> Self {
        Self {
            id: id.into(),
            order,
            is_auto: None,
            item,
        }
    }

    /// Returns the key of the wrapped descriptor
    pub fn key(&self) -> &str {
        &self.item.key
    }

    /// Reads a stored wrapped field (`{id, order, isAuto?, item}`).
    ///
    /// # Errors
    ///
    /// Returns `FieldError::Malformed` if the wrapper does not have the expected
    /// shape, or any error of `FieldDescriptor::from_value` for the item.
    pub fn from_value(value: &Value) -> FieldResult<Self> {
        let obj = value.as_object().ok_or_else(|| {
            FieldError::Malformed(format!("wrapped field must be an object, got {}", json_type_name(value)))
        })?;

        let id = obj
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| FieldError::Malformed("wrapped field 'id' must be a string".into()))?;

        let order = obj
            .get("order")
            .and_then(integral_order)
            .ok_or_else(|| FieldError::Malformed("wrapped field 'order' must be an integer".into()))?;

        let is_auto = match obj.get("isAuto") {
            None => None,
            Some(Value::Bool(b)) => Some(*b),
            Some(other) => {
                return Err(FieldError::Malformed(format!(
                    "wrapped field 'isAuto' must be a bool, got {}",
                    json_type_name(other)
                )))
            }
        };

        let item = obj
            .get("item")
            .ok_or_else(|| FieldError::Malformed("wrapped field 'item' is missing".into()))?;

        Ok(Self {
            id: id.to_string(),
            order,
            is_auto,
            item: FieldDescriptor::from_value(item)?,
        })
    }

    /// Returns the wrapped field as a JSON object
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Reads a stored `order`. Integral floats such as `2.0` are accepted; other
/// numbers are not.
pub(crate) fn integral_order(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

// =============================================================================
// Auto fields
// =============================================================================

fn auto_field(id: &str, order: i64, item: FieldDescriptor) -> WrappedField {
    WrappedField {
        id: id.to_string(),
        order,
        is_auto: Some(true),
        item,
    }
}

/// Record id column, always first.
pub fn auto_id() -> WrappedField {
    let specs = StringSpecs {
        length_min: Some(RECORD_ID_LENGTH as f64),
        length_max: Some(RECORD_ID_LENGTH as f64),
        may_be_empty: false,
        pattern: None,
    };
    auto_field("autofield-id", -1001, FieldDescriptor::new("_id", specs).with_title("ID"))
}

/// Creation timestamp column.
pub fn auto_created_at() -> WrappedField {
    let specs = DateSpecs {
        min: None,
        max: None,
        may_be_empty: true,
    };
    auto_field(
        "autofield-createdat",
        1001,
        FieldDescriptor::new("createdAt", specs).with_title("Created At"),
    )
}

/// Last-update timestamp column.
pub fn auto_updated_at() -> WrappedField {
    let specs = DateSpecs {
        min: None,
        max: None,
        may_be_empty: false,
    };
    auto_field(
        "autofield-updatedat",
        1002,
        FieldDescriptor::new("updatedAt", specs).with_title("Updated At"),
    )
}

/// All auto fields, in order.
pub fn auto_fields() -> Vec<WrappedField> {
    vec![auto_id(), auto_created_at(), auto_updated_at()]
}
