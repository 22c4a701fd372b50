//! Cross-field validation of wrapped field collections
//!
//! The validator checks raw field collections before they are compiled or
//! stored. Failures are collected into a `ValidationReport`; nothing stops at
//! the first failing field.

mod errors;
mod report;
mod validator;

pub use errors::{SchemaValidationError, ValidationResult};
pub use report::{CheckKind, FieldChecks, FieldFailure, FieldLabel, ValidationReport};
pub use validator::FieldValidator;
