//! Validation report

use std::fmt;

use serde::Serialize;

/// One of the four checks run on every field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    /// Key occurs once across the collection
    Unique,
    /// `{id, order, isAuto?, item}` envelope
    Wrapper,
    /// `key`, `type`, `title` of the descriptor
    Base,
    /// Type-specific specs against the declared shape
    Specs,
}

impl CheckKind {
    pub const ALL: [CheckKind; 4] = [
        CheckKind::Unique,
        CheckKind::Wrapper,
        CheckKind::Base,
        CheckKind::Specs,
    ];

    /// Message reported when this check fails
    pub fn message(&self) -> &'static str {
        match self {
            CheckKind::Unique => "Field key is not unique",
            CheckKind::Wrapper => "Field wrapper failed validation",
            CheckKind::Base => "Base settings failed validation",
            CheckKind::Specs => "Specifications failed validation",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckKind::Unique => "unique",
            CheckKind::Wrapper => "wrapper",
            CheckKind::Base => "base",
            CheckKind::Specs => "specs",
        };
        write!(f, "{}", name)
    }
}

/// Identifies a field in a report.
///
/// Fields without a string key are identified by their input position, which
/// renders unquoted (`#2`) so it never reads like a key such as `"#2"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum FieldLabel {
    Key(String),
    Index(usize),
}

impl fmt::Display for FieldLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldLabel::Key(key) => write!(f, "\"{}\"", key),
            FieldLabel::Index(index) => write!(f, "#{}", index),
        }
    }
}

/// Check results of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChecks {
    /// Position in the input
    pub index: usize,
    /// `item.key`, when it is a string
    pub key: Option<String>,
    pub unique: bool,
    pub wrapper: bool,
    pub base: bool,
    pub specs: bool,
}

impl FieldChecks {
    pub fn label(&self) -> FieldLabel {
        match &self.key {
            Some(key) => FieldLabel::Key(key.clone()),
            None => FieldLabel::Index(self.index),
        }
    }

    pub fn passed(&self, check: CheckKind) -> bool {
        match check {
            CheckKind::Unique => self.unique,
            CheckKind::Wrapper => self.wrapper,
            CheckKind::Base => self.base,
            CheckKind::Specs => self.specs,
        }
    }

    pub fn ok(&self) -> bool {
        self.unique && self.wrapper && self.base && self.specs
    }

    /// Failed checks, in check order
    pub fn failed(&self) -> impl Iterator<Item = CheckKind> + '_ {
        CheckKind::ALL.into_iter().filter(|check| !self.passed(*check))
    }
}

/// A single failed check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldFailure {
    pub label: FieldLabel,
    pub check: CheckKind,
    pub message: String,
}

/// Outcome of validating a field collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    fields: Vec<FieldChecks>,
    failures: Vec<FieldFailure>,
}

impl ValidationReport {
    /// Builds a report from per-field results, in input order.
    pub fn new(fields: Vec<FieldChecks>) -> Self {
        let failures = fields
            .iter()
            .flat_map(|checks| {
                checks.failed().map(|check| FieldFailure {
                    label: checks.label(),
                    check,
                    message: check.message().to_string(),
                })
            })
            .collect();

        Self { fields, failures }
    }

    /// `true` if every check of every field passed
    pub fn ok(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn fields(&self) -> &[FieldChecks] {
        &self.fields
    }

    pub fn failures(&self) -> &[FieldFailure] {
        &self.failures
    }

    /// Failure messages grouped by label.
    ///
    /// Keys keep the position of their first occurrence. When two fields
    /// share a key, the later field's results replace the earlier ones.
    /// Keyless fields each get their own entry.
    pub fn errors(&self) -> Vec<(FieldLabel, Vec<String>)> {
        let mut grouped: Vec<(FieldLabel, Vec<String>)> = Vec::new();

        for checks in &self.fields {
            let label = checks.label();
            let messages: Vec<String> = checks.failed().map(|c| c.message().to_string()).collect();
            match grouped.iter().position(|(seen, _)| *seen == label) {
                Some(index) => grouped[index].1 = messages,
                None => grouped.push((label, messages)),
            }
        }

        grouped.retain(|(_, messages)| !messages.is_empty());
        grouped
    }

    /// Renders the errors as `"<key>": <msg>,<msg>;` per failing key, or
    /// `#<index>: ...;` for a keyless field.
    pub fn errors_string(&self) -> String {
        self.errors()
            .iter()
            .map(|(label, messages)| format!("{}: {};", label, messages.join(",")))
            .collect()
    }
}
