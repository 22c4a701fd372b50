//! Field kinds
//!
//! Nine kinds are supported:
//! - boolean, string, number, date
//! - email, url (domain-restricted strings)
//! - json (JSON text)
//! - select (one or many values from a fixed list)
//! - relation (one or many record ids of another collection)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::FieldError;

/// Type tag of a field descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Boolean,
    String,
    Number,
    Date,
    Email,
    Json,
    Select,
    Url,
    Relation,
}

impl FieldKind {
    /// Every kind, in declaration order.
    pub const ALL: [FieldKind; 9] = [
        FieldKind::Boolean,
        FieldKind::String,
        FieldKind::Number,
        FieldKind::Date,
        FieldKind::Email,
        FieldKind::Json,
        FieldKind::Select,
        FieldKind::Url,
        FieldKind::Relation,
    ];

    /// Returns the type tag
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Boolean => "boolean",
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Email => "email",
            FieldKind::Json => "json",
            FieldKind::Select => "select",
            FieldKind::Url => "url",
            FieldKind::Relation => "relation",
        }
    }

    /// Title given to new fields of this kind
    pub fn default_title(&self) -> &'static str {
        match self {
            FieldKind::Boolean => "Да/Нет",
            FieldKind::String => "Текст",
            FieldKind::Number => "Число",
            FieldKind::Date => "Дата",
            FieldKind::Email => "Email",
            FieldKind::Json => "JSON",
            FieldKind::Select => "Список",
            FieldKind::Url => "URL",
            FieldKind::Relation => "Связанные записи",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| FieldError::UnsupportedType(s.to_string()))
    }
}
