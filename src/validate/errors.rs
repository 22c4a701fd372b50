//! Schema validation errors

use thiserror::Error;

use super::report::ValidationReport;

/// Result type for validation
pub type ValidationResult<T> = Result<T, SchemaValidationError>;

/// A field collection failed one or more checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Schema validation failed. {errors_string}")]
pub struct SchemaValidationError {
    report: ValidationReport,
    errors_string: String,
}

impl SchemaValidationError {
    pub fn new(report: ValidationReport) -> Self {
        let errors_string = report.errors_string();
        Self {
            report,
            errors_string,
        }
    }

    /// Full report, including passing fields
    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    pub fn errors_string(&self) -> &str {
        &self.errors_string
    }

    pub fn code(&self) -> &'static str {
        "SCHEMA_VALIDATION_FAILED"
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        400
    }
}
