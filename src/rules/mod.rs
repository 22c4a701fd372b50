//! Rule compilation
//!
//! Field descriptors compile into `{type, rules}` rule sets consumed by a
//! downstream value checker. Checks no static rule can express are carried as
//! named `Predicate`s.

mod compiler;
mod errors;
mod predicate;
mod types;

pub use compiler::RuleCompiler;
pub use errors::{CompileError, CompileResult};
pub use predicate::{
    is_record_id, CompiledPattern, Outcome, Predicate, DATE_OUT_OF_RANGE,
    EMAIL_DOMAIN_NOT_ALLOWED, INVALID_DATE, INVALID_EMAIL, INVALID_ID, INVALID_IDS, INVALID_JSON,
    INVALID_PATTERN, INVALID_URL, JSON_TOO_LARGE, PATTERN_MISMATCH, URL_DOMAIN_NOT_ALLOWED,
};
pub use types::{PrimitiveType, RuleSet, Rules};
