//! Rule compiler errors

use thiserror::Error;

use crate::field::FieldError;

/// Result type for compiler operations
pub type CompileResult<T> = Result<T, CompileError>;

/// Rule compiler errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// A field carries a type tag no handler exists for
    #[error("Unsupported config type: {0}")]
    UnsupportedType(String),

    #[error(transparent)]
    Field(FieldError),
}

impl From<FieldError> for CompileError {
    fn from(err: FieldError) -> Self {
        match err {
            FieldError::UnsupportedType(tag) => CompileError::UnsupportedType(tag),
            other => CompileError::Field(other),
        }
    }
}

impl CompileError {
    pub fn code(&self) -> &'static str {
        match self {
            CompileError::UnsupportedType(_) => "UNSUPPORTED_TYPE",
            CompileError::Field(err) => err.code(),
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            CompileError::UnsupportedType(_) => 400,
            CompileError::Field(err) => err.status_code(),
        }
    }
}
