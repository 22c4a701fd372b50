//! Rule compiler
//!
//! Turns wrapped fields into a key → rule set mapping. Compilation of typed
//! fields cannot fail; only raw input can carry an unknown type tag.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::config::CompilerConfig;
use crate::field::{
    json_type_name, BooleanSpecs, DateSpecs, EmailSpecs, FieldError, FieldSpecs, JsonSpecs,
    NumberSpecs, RelationSpecs, SelectSpecs, StringSpecs, UrlSpecs, WrappedField,
};

use super::errors::CompileResult;
use super::predicate::Predicate;
use super::types::{PrimitiveType, RuleSet, Rules};

/// Compiles field descriptors into rule sets.
#[derive(Debug, Clone, Default)]
pub struct RuleCompiler {
    config: CompilerConfig,
}

impl RuleCompiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compiles every field, keyed by `item.key`.
    ///
    /// When a key occurs twice, the later field wins.
    pub fn compile(&self, fields: &[WrappedField]) -> BTreeMap<String, RuleSet> {
        let mut compiled = BTreeMap::new();
        for field in fields {
            debug!(key = %field.key(), kind = %field.item.kind(), "compiling field rules");
            compiled.insert(field.key().to_string(), self.compile_specs(&field.item.specs));
        }
        compiled
    }

    /// Compiles raw wrapped fields (a JSON array).
    ///
    /// # Errors
    ///
    /// - `CompileError::UnsupportedType` if any field has an unknown type tag
    /// - `CompileError::Field` if the input is otherwise malformed
    pub fn compile_value(&self, fields: &Value) -> CompileResult<BTreeMap<String, RuleSet>> {
        let items = fields.as_array().ok_or_else(|| {
            FieldError::Malformed(format!("fields must be an array, got {}", json_type_name(fields)))
        })?;

        let wrapped = items
            .iter()
            .map(WrappedField::from_value)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.compile(&wrapped))
    }

    /// Compiles the specs of one field.
    pub fn compile_specs(&self, specs: &FieldSpecs) -> RuleSet {
        match specs {
            FieldSpecs::Boolean(specs) => boolean_rules(specs),
            FieldSpecs::String(specs) => string_rules(specs),
            FieldSpecs::Number(specs) => number_rules(specs),
            FieldSpecs::Date(specs) => date_rules(specs),
            FieldSpecs::Email(specs) => email_rules(specs),
            FieldSpecs::Json(specs) => self.json_rules(specs),
            FieldSpecs::Select(specs) => select_rules(specs),
            FieldSpecs::Url(specs) => self.url_rules(specs),
            FieldSpecs::Relation(specs) => relation_rules(specs),
        }
    }

    fn json_rules(&self, specs: &JsonSpecs) -> RuleSet {
        let max_size = self
            .config
            .enforce_json_max_size
            .then_some(specs.max_size as u64);

        RuleSet::new(
            PrimitiveType::String,
            Rules {
                is_not: forbid_empty_string(specs.may_be_empty),
                custom: Some(Predicate::Json { max_size }),
                ..Default::default()
            },
        )
    }

    fn url_rules(&self, specs: &UrlSpecs) -> RuleSet {
        let has_lists = !specs.allowed_domains.is_empty() || !specs.except_domains.is_empty();

        RuleSet::new(
            PrimitiveType::String,
            Rules {
                is_not: forbid_empty_string(specs.may_be_empty),
                custom: has_lists.then(|| Predicate::url(specs, self.config.strip_www_prefix)),
                ..Default::default()
            },
        )
    }
}

fn forbid_empty_string(may_be_empty: bool) -> Option<Value> {
    (!may_be_empty).then(|| Value::String(String::new()))
}

fn boolean_rules(specs: &BooleanSpecs) -> RuleSet {
    RuleSet::new(
        PrimitiveType::Boolean,
        Rules {
            is: specs.only_true.then_some(Value::Bool(true)),
            ..Default::default()
        },
    )
}

fn string_rules(specs: &StringSpecs) -> RuleSet {
    RuleSet::new(
        PrimitiveType::String,
        Rules {
            min: specs.length_min,
            max: specs.length_max,
            is_not: forbid_empty_string(specs.may_be_empty),
            custom: specs
                .pattern
                .as_ref()
                .map(|pattern| Predicate::pattern(pattern.as_str())),
            ..Default::default()
        },
    )
}

fn number_rules(specs: &NumberSpecs) -> RuleSet {
    RuleSet::new(
        PrimitiveType::Number,
        Rules {
            min: Some(specs.min),
            max: Some(specs.max),
            is_not: (!specs.may_be_empty).then(|| Value::from(0)),
            ..Default::default()
        },
    )
}

fn date_rules(specs: &DateSpecs) -> RuleSet {
    let bounded = specs.min.is_some() || specs.max.is_some();

    RuleSet::new(
        PrimitiveType::Date,
        Rules {
            is_not: (!specs.may_be_empty).then_some(Value::Null),
            custom: bounded.then_some(Predicate::DateRange {
                min: specs.min,
                max: specs.max,
            }),
            ..Default::default()
        },
    )
}

fn email_rules(specs: &EmailSpecs) -> RuleSet {
    let has_lists = !specs.allowed_domains.is_empty() || !specs.except_domains.is_empty();

    RuleSet::new(
        PrimitiveType::String,
        Rules {
            is_not: forbid_empty_string(specs.may_be_empty),
            custom: (specs.may_be_empty || has_lists).then(|| Predicate::email(specs)),
            ..Default::default()
        },
    )
}

fn select_rules(specs: &SelectSpecs) -> RuleSet {
    let mut values: Vec<String> = Vec::with_capacity(specs.allowed_values.len() + 1);
    for value in &specs.allowed_values {
        if !values.contains(value) {
            values.push(value.clone());
        }
    }

    if specs.multiple {
        return RuleSet::new(
            PrimitiveType::ArrayOfString,
            Rules {
                enum_values: (!values.is_empty()).then_some(values),
                each_type: Some(PrimitiveType::String),
                is_not: forbid_empty_string(specs.may_be_empty),
                ..Default::default()
            },
        );
    }

    if specs.may_be_empty {
        if !values.iter().any(String::is_empty) {
            values.push(String::new());
        }
    } else {
        values.retain(|value| !value.is_empty());
    }

    RuleSet::new(
        PrimitiveType::String,
        Rules {
            enum_values: Some(values),
            is_not: forbid_empty_string(specs.may_be_empty),
            ..Default::default()
        },
    )
}

fn relation_rules(specs: &RelationSpecs) -> RuleSet {
    if specs.multiple {
        RuleSet::new(
            PrimitiveType::ArrayOfString,
            Rules {
                each_type: Some(PrimitiveType::String),
                is_not: forbid_empty_string(specs.may_be_empty),
                custom: Some(Predicate::RecordIdList),
                ..Default::default()
            },
        )
    } else {
        RuleSet::new(
            PrimitiveType::String,
            Rules {
                is_not: forbid_empty_string(specs.may_be_empty),
                custom: Some(Predicate::RecordId {
                    allow_empty: specs.may_be_empty,
                }),
                ..Default::default()
            },
        )
    }
}
