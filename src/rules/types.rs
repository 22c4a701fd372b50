//! Compiled rule sets

use serde::Serialize;
use serde_json::Value;

use super::predicate::Predicate;

/// Primitive type a value is checked against before any rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PrimitiveType {
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "string")]
    String,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "array-of-string")]
    ArrayOfString,
}

/// Sparse set of constraints. Unset members are not serialized.
///
/// `min`/`max` bound a number or a string length. Infinite bounds serialize
/// as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Value must equal this literal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is: Option<Value>,
    /// Value must differ from this literal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_not: Option<Value>,
    /// Value (or each element) must be one of these
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Element type of an array value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub each_type: Option<PrimitiveType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<Predicate>,
}

impl Rules {
    /// Returns `true` if no member is set
    pub fn is_empty(&self) -> bool {
        self.min.is_none()
            && self.max.is_none()
            && self.is.is_none()
            && self.is_not.is_none()
            && self.enum_values.is_none()
            && self.each_type.is_none()
            && self.custom.is_none()
    }
}

/// Compiled constraints of one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleSet {
    #[serde(rename = "type")]
    pub kind: PrimitiveType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Rules>,
}

impl RuleSet {
    /// Builds a rule set, dropping `rules` when nothing is set.
    pub fn new(kind: PrimitiveType, rules: Rules) -> Self {
        Self {
            kind,
            rules: (!rules.is_empty()).then_some(rules),
        }
    }

    /// Returns the custom predicate, if any
    pub fn custom(&self) -> Option<&Predicate> {
        self.rules.as_ref().and_then(|rules| rules.custom.as_ref())
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
