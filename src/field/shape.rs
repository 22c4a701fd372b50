//! Declared spec shapes and the structural check against them
//!
//! Shape rules:
//! - Specs must be a JSON object
//! - Only declared keys are allowed
//! - Required keys must be present
//! - Each value must fit its slot (primitive type and domain)
//!
//! The check reports every violation, not just the first one.

use regex::Regex;
use serde_json::Value;

use super::date::parse_date;
use super::errors::ShapeViolation;
use super::kind::FieldKind;

/// What a single spec key may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// true / false
    Bool,
    /// Any string
    String,
    /// Number or null
    NumberOrNull,
    /// Number >= 0
    NonNegativeNumber,
    /// Compilable regular expression or null
    RegexOrNull,
    /// Date (see `field::date`) or null
    DateOrNull,
    /// Array of strings
    StringList,
}

impl Slot {
    /// Human-readable description used in violations
    pub fn expected(&self) -> &'static str {
        match self {
            Slot::Bool => "bool",
            Slot::String => "string",
            Slot::NumberOrNull => "number or null",
            Slot::NonNegativeNumber => "non-negative number",
            Slot::RegexOrNull => "regular expression or null",
            Slot::DateOrNull => "date or null",
            Slot::StringList => "array of strings",
        }
    }

    /// Returns a description of what was found when `value` does not fit.
    fn mismatch(&self, value: &Value) -> Option<String> {
        let fits = match self {
            Slot::Bool => value.is_boolean(),
            Slot::String => value.is_string(),
            Slot::NumberOrNull => value.is_null() || value.is_number(),
            Slot::NonNegativeNumber => value.as_f64().is_some_and(|n| n >= 0.0),
            Slot::RegexOrNull => match value {
                Value::Null => true,
                Value::String(pattern) => {
                    if let Err(e) = Regex::new(pattern) {
                        return Some(format!("invalid pattern ({})", e));
                    }
                    true
                }
                _ => false,
            },
            Slot::DateOrNull => value.is_null() || parse_date(value).is_some(),
            Slot::StringList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        };

        if fits {
            return None;
        }

        Some(match (self, value) {
            (Slot::NonNegativeNumber, Value::Number(n)) => n.to_string(),
            (Slot::DateOrNull, Value::String(s)) => format!("unparseable date '{}'", s),
            (Slot::StringList, Value::Array(_)) => "array with non-string element".to_string(),
            _ => json_type_name(value).to_string(),
        })
    }
}

/// One declared key of a spec shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotDef {
    pub name: &'static str,
    pub slot: Slot,
    pub required: bool,
}

const fn slot(name: &'static str, slot: Slot, required: bool) -> SlotDef {
    SlotDef { name, slot, required }
}

const BOOLEAN_SHAPE: &[SlotDef] = &[slot("onlyTrue", Slot::Bool, true)];

const STRING_SHAPE: &[SlotDef] = &[
    slot("lengthMin", Slot::NumberOrNull, true),
    slot("lengthMax", Slot::NumberOrNull, true),
    slot("mayBeEmpty", Slot::Bool, false),
    slot("pattern", Slot::RegexOrNull, false),
];

const NUMBER_SHAPE: &[SlotDef] = &[
    slot("min", Slot::NumberOrNull, true),
    slot("max", Slot::NumberOrNull, true),
    slot("mayBeEmpty", Slot::Bool, false),
];

const DATE_SHAPE: &[SlotDef] = &[
    slot("min", Slot::DateOrNull, false),
    slot("max", Slot::DateOrNull, false),
    slot("mayBeEmpty", Slot::Bool, false),
];

const DOMAIN_SHAPE: &[SlotDef] = &[
    slot("allowedDomains", Slot::StringList, false),
    slot("exceptDomains", Slot::StringList, false),
    slot("mayBeEmpty", Slot::Bool, false),
];

const JSON_SHAPE: &[SlotDef] = &[
    slot("maxSize", Slot::NonNegativeNumber, true),
    slot("mayBeEmpty", Slot::Bool, false),
];

const SELECT_SHAPE: &[SlotDef] = &[
    slot("allowedValues", Slot::StringList, false),
    slot("multiple", Slot::Bool, false),
    slot("mayBeEmpty", Slot::Bool, false),
];

const RELATION_SHAPE: &[SlotDef] = &[
    slot("collection", Slot::String, false),
    slot("multiple", Slot::Bool, false),
    slot("mayBeEmpty", Slot::Bool, false),
];

/// Returns the declared shape of the specs of `kind`.
pub fn declared_shape(kind: FieldKind) -> &'static [SlotDef] {
    match kind {
        FieldKind::Boolean => BOOLEAN_SHAPE,
        FieldKind::String => STRING_SHAPE,
        FieldKind::Number => NUMBER_SHAPE,
        FieldKind::Date => DATE_SHAPE,
        FieldKind::Email | FieldKind::Url => DOMAIN_SHAPE,
        FieldKind::Json => JSON_SHAPE,
        FieldKind::Select => SELECT_SHAPE,
        FieldKind::Relation => RELATION_SHAPE,
    }
}

/// Checks `specs` against the declared shape of `kind`.
///
/// # Errors
///
/// Returns every violation found: non-object specs, undeclared keys,
/// missing required keys and values that do not fit their slot.
pub fn check_spec_shape(kind: FieldKind, specs: &Value) -> Result<(), Vec<ShapeViolation>> {
    let obj = specs
        .as_object()
        .ok_or_else(|| vec![ShapeViolation::not_an_object(json_type_name(specs))])?;

    let shape = declared_shape(kind);
    let mut violations = Vec::new();

    for key in obj.keys() {
        if !shape.iter().any(|def| def.name == key) {
            violations.push(ShapeViolation::extra_field(key.as_str()));
        }
    }

    for def in shape {
        match obj.get(def.name) {
            Some(value) => {
                if let Some(actual) = def.slot.mismatch(value) {
                    violations.push(ShapeViolation::new(def.name, def.slot.expected(), actual));
                }
            }
            None if def.required => violations.push(ShapeViolation::missing_field(def.name)),
            None => {}
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Returns the JSON type name for violation messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
