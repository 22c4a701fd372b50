//! fieldrules - Table field descriptors, rule compilation and schema validation
//!
//! - `field`: descriptors, typed specs and the declared spec shapes
//! - `rules`: compiles descriptors into `{type, rules}` rule sets
//! - `validate`: cross-field validation of raw field collections
//! - `collection`: ordered, editable field collections

pub mod collection;
pub mod config;
pub mod field;
pub mod rules;
pub mod validate;

pub use collection::FieldCollection;
pub use config::{CollectionConfig, CompilerConfig, Config, ConfigError};
pub use field::{FieldDescriptor, FieldError, FieldKind, FieldSpecs, WrappedField};
pub use rules::{CompileError, Outcome, Predicate, PrimitiveType, RuleCompiler, RuleSet, Rules};
pub use validate::{FieldValidator, SchemaValidationError, ValidationReport};
