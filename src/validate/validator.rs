//! Cross-field validator for wrapped field collections
//!
//! Per field:
//! - unique: `item.key` occurs once among all string keys
//! - wrapper: `id` string, `order` integer, `isAuto` absent or bool, `item` object
//! - base: `key`, `type`, `title` are strings
//! - specs: the specs fit the declared shape of the field's type
//!
//! All checks run on every field; nothing short-circuits. Wrapper and base
//! checks ignore extra keys. The specs check does not.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::field::{check_spec_shape, integral_order, FieldKind, WrappedField};

use super::errors::{SchemaValidationError, ValidationResult};
use super::report::{FieldChecks, ValidationReport};

/// Validates collections of wrapped fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldValidator;

impl FieldValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validates raw wrapped fields.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError` carrying the full report if any check
    /// fails on any field.
    pub fn validate_all(&self, fields: &[Value]) -> ValidationResult<()> {
        let report = self.report(fields);
        if report.ok() {
            debug!(fields = fields.len(), "field collection is valid");
            return Ok(());
        }

        warn!(
            fields = fields.len(),
            failing = report.errors().len(),
            "field collection failed validation"
        );
        Err(SchemaValidationError::new(report))
    }

    /// Validates typed wrapped fields.
    ///
    /// Typed fields always pass the wrapper, base and specs checks, so only
    /// key uniqueness can fail.
    pub fn validate_fields(&self, fields: &[WrappedField]) -> ValidationResult<()> {
        let values: Vec<Value> = fields.iter().map(WrappedField::to_value).collect();
        self.validate_all(&values)
    }

    /// Runs every check on every field without failing.
    pub fn report(&self, fields: &[Value]) -> ValidationReport {
        let keys: Vec<Option<&str>> = fields.iter().map(item_key).collect();

        let mut occurrences: HashMap<&str, usize> = HashMap::new();
        for key in keys.iter().flatten() {
            *occurrences.entry(*key).or_default() += 1;
        }

        let checks = fields
            .iter()
            .zip(&keys)
            .enumerate()
            .map(|(index, (field, &key))| {
                let item = field.get("item").and_then(Value::as_object);
                FieldChecks {
                    index,
                    key: key.map(str::to_string),
                    unique: key.map_or(true, |k| occurrences.get(k).copied() == Some(1)),
                    wrapper: wrapper_ok(field),
                    base: item.is_some_and(base_ok),
                    specs: item.is_some_and(specs_ok),
                }
            })
            .collect();

        ValidationReport::new(checks)
    }
}

fn item_key(field: &Value) -> Option<&str> {
    field.get("item")?.get("key")?.as_str()
}

fn wrapper_ok(field: &Value) -> bool {
    let Some(obj) = field.as_object() else {
        return false;
    };

    obj.get("id").is_some_and(Value::is_string)
        && obj.get("order").and_then(integral_order).is_some()
        && obj.get("isAuto").map_or(true, Value::is_boolean)
        && obj.get("item").is_some_and(Value::is_object)
}

fn base_ok(item: &Map<String, Value>) -> bool {
    ["key", "type", "title"]
        .iter()
        .all(|name| item.get(*name).is_some_and(Value::is_string))
}

fn specs_ok(item: &Map<String, Value>) -> bool {
    let Some(kind) = item
        .get("type")
        .and_then(Value::as_str)
        .and_then(|tag| tag.parse::<FieldKind>().ok())
    else {
        return false;
    };

    match item.get("specs") {
        Some(specs) => check_spec_shape(kind, specs).is_ok(),
        None => false,
    }
}
