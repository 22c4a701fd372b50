//! Field error types
//!
//! Error codes:
//! - FIELD_SPEC_SHAPE (settings do not match the declared spec shape)
//! - FIELD_UNSUPPORTED_TYPE (unknown type tag)
//! - FIELD_MALFORMED (stored descriptor cannot be read)
//! - FIELD_SPEC_KIND_MISMATCH (specs replaced with specs of another kind)
//! - FIELD_UNKNOWN_ID (collection has no field with the given id)

use std::fmt;

use thiserror::Error;

use super::kind::FieldKind;

/// One structural problem found while checking a spec against its shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeViolation {
    /// Spec field name (e.g. "maxSize")
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ShapeViolation {
    pub fn new(field: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, "field to be present", "missing")
    }

    pub fn extra_field(field: impl Into<String>) -> Self {
        Self::new(field, "no undeclared fields", "extra field present")
    }

    pub fn not_an_object(actual: impl Into<String>) -> Self {
        Self::new("$specs", "object", actual)
    }
}

impl fmt::Display for ShapeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': expected {}, got {}", self.field, self.expected, self.actual)
    }
}

fn join_violations(violations: &[ShapeViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for field operations
pub type FieldResult<T> = Result<T, FieldError>;

/// Field construction and bookkeeping errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    /// Merged settings do not match the declared shape of the spec
    #[error("Invalid settings for {kind} field: {}", join_violations(.violations))]
    SpecShape {
        kind: FieldKind,
        violations: Vec<ShapeViolation>,
    },

    /// Type tag is not one of the nine field kinds
    #[error("Unsupported config type: {0}")]
    UnsupportedType(String),

    /// Stored descriptor or wrapper could not be read
    #[error("Malformed field: {0}")]
    Malformed(String),

    /// Specs of one kind were supplied for a field of another kind
    #[error("Specs of type {actual} cannot replace specs of type {expected}")]
    SpecKindMismatch { expected: FieldKind, actual: FieldKind },

    /// No field with this id in the collection
    #[error("Field not found: {0}")]
    UnknownId(String),
}

impl FieldError {
    /// Returns the string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            FieldError::SpecShape { .. } => "FIELD_SPEC_SHAPE",
            FieldError::UnsupportedType(_) => "FIELD_UNSUPPORTED_TYPE",
            FieldError::Malformed(_) => "FIELD_MALFORMED",
            FieldError::SpecKindMismatch { .. } => "FIELD_SPEC_KIND_MISMATCH",
            FieldError::UnknownId(_) => "FIELD_UNKNOWN_ID",
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            FieldError::UnknownId(_) => 404,
            _ => 400,
        }
    }

    /// Returns the shape violations for a `SpecShape` error
    pub fn violations(&self) -> &[ShapeViolation] {
        match self {
            FieldError::SpecShape { violations, .. } => violations,
            _ => &[],
        }
    }
}
