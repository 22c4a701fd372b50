//! Type-specific field specs
//!
//! Every spec struct:
//! - has a default for every field
//! - serializes with camelCase keys
//! - is built from partial settings by merging them over the defaults,
//!   checking the merged object against the declared shape, then deserializing

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::date;
use super::errors::{FieldError, FieldResult, ShapeViolation};
use super::kind::FieldKind;
use super::shape::{check_spec_shape, json_type_name};

/// Default JSON payload limit: 10 MiB.
pub const DEFAULT_JSON_MAX_SIZE: f64 = 10.0 * 1024.0 * 1024.0;

/// A spec struct belonging to exactly one field kind.
pub trait KindSpecs: Serialize + DeserializeOwned + Default + Into<FieldSpecs> {
    /// Kind this spec belongs to
    const KIND: FieldKind;

    /// Merges partial settings over the defaults and checks the result.
    ///
    /// `null` and `{}` both yield the defaults.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::SpecShape` if the merged settings do not match
    /// the declared shape of `Self::KIND`.
    fn from_partial(settings: &Value) -> FieldResult<Self> {
        let mut merged = match serde_json::to_value(Self::default()) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };

        match settings {
            Value::Null => {}
            Value::Object(overrides) => {
                for (key, value) in overrides {
                    merged.insert(key.clone(), value.clone());
                }
            }
            other => {
                return Err(FieldError::SpecShape {
                    kind: Self::KIND,
                    violations: vec![ShapeViolation::not_an_object(json_type_name(other))],
                })
            }
        }

        from_checked_value(Self::KIND, Value::Object(merged))
    }
}

/// Shape-checks `value` and deserializes it without applying defaults first.
fn from_checked_value<S: DeserializeOwned>(kind: FieldKind, value: Value) -> FieldResult<S> {
    check_spec_shape(kind, &value).map_err(|violations| FieldError::SpecShape { kind, violations })?;

    serde_json::from_value(value).map_err(|e| FieldError::SpecShape {
        kind,
        violations: vec![ShapeViolation::new("$specs", format!("{} specs", kind), e.to_string())],
    })
}

/// Serde adapters that write infinite number bounds as `null`.
mod bound {
    use serde::{Deserialize, Deserializer, Serializer};

    fn write<S: Serializer>(value: f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(value)
        } else {
            serializer.serialize_none()
        }
    }

    pub mod lower {
        use super::*;

        pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
            write(*value, serializer)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
            Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NEG_INFINITY))
        }
    }

    pub mod upper {
        use super::*;

        pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
            write(*value, serializer)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
            Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
        }
    }
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Spec structs
// =============================================================================

/// Specs of a boolean field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanSpecs {
    /// Only `true` is an acceptable value (consent checkboxes)
    #[serde(default)]
    pub only_true: bool,
}

/// Specs of a free-text field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringSpecs {
    #[serde(default)]
    pub length_min: Option<f64>,
    #[serde(default)]
    pub length_max: Option<f64>,
    #[serde(default = "default_true")]
    pub may_be_empty: bool,
    /// Regular expression that must match somewhere in the value.
    /// Write `^...$` to constrain the whole value.
    #[serde(default)]
    pub pattern: Option<String>,
}

impl Default for StringSpecs {
    fn default() -> Self {
        Self {
            length_min: None,
            length_max: None,
            may_be_empty: true,
            pattern: None,
        }
    }
}

/// Specs of a numeric field. Unset bounds are infinite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberSpecs {
    #[serde(default = "neg_infinity", with = "bound::lower")]
    pub min: f64,
    #[serde(default = "pos_infinity", with = "bound::upper")]
    pub max: f64,
    #[serde(default = "default_true")]
    pub may_be_empty: bool,
}

fn neg_infinity() -> f64 {
    f64::NEG_INFINITY
}

fn pos_infinity() -> f64 {
    f64::INFINITY
}

impl Default for NumberSpecs {
    fn default() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
            may_be_empty: true,
        }
    }
}

/// Specs of a date field. Bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateSpecs {
    #[serde(default, with = "date::optional")]
    pub min: Option<DateTime<Utc>>,
    #[serde(default, with = "date::optional")]
    pub max: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub may_be_empty: bool,
}

impl Default for DateSpecs {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            may_be_empty: true,
        }
    }
}

/// Specs of an email field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSpecs {
    /// When non-empty, only these domains are accepted
    #[serde(default)]
    pub allowed_domains: Vec<String>,
    /// Domains that are always rejected
    #[serde(default)]
    pub except_domains: Vec<String>,
    #[serde(default = "default_true")]
    pub may_be_empty: bool,
}

impl Default for EmailSpecs {
    fn default() -> Self {
        Self {
            allowed_domains: Vec::new(),
            except_domains: Vec::new(),
            may_be_empty: true,
        }
    }
}

/// Specs of a URL field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlSpecs {
    /// When non-empty, only these hosts are accepted
    #[serde(default)]
    pub allowed_domains: Vec<String>,
    /// Hosts that are always rejected
    #[serde(default)]
    pub except_domains: Vec<String>,
    #[serde(default = "default_true")]
    pub may_be_empty: bool,
}

impl Default for UrlSpecs {
    fn default() -> Self {
        Self {
            allowed_domains: Vec::new(),
            except_domains: Vec::new(),
            may_be_empty: true,
        }
    }
}

/// Specs of a JSON text field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSpecs {
    /// Size limit in bytes
    #[serde(default = "default_json_max_size")]
    pub max_size: f64,
    #[serde(default = "default_true")]
    pub may_be_empty: bool,
}

fn default_json_max_size() -> f64 {
    DEFAULT_JSON_MAX_SIZE
}

impl Default for JsonSpecs {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_JSON_MAX_SIZE,
            may_be_empty: true,
        }
    }
}

/// Specs of a select field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectSpecs {
    #[serde(default)]
    pub allowed_values: Vec<String>,
    /// Field holds a list of values instead of one
    #[serde(default)]
    pub multiple: bool,
    #[serde(default = "default_true")]
    pub may_be_empty: bool,
}

impl Default for SelectSpecs {
    fn default() -> Self {
        Self {
            allowed_values: Vec::new(),
            multiple: false,
            may_be_empty: true,
        }
    }
}

/// Specs of a relation field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationSpecs {
    /// Name of the referenced collection
    #[serde(default)]
    pub collection: String,
    /// Field holds a list of ids instead of one
    #[serde(default)]
    pub multiple: bool,
    #[serde(default = "default_true")]
    pub may_be_empty: bool,
}

impl Default for RelationSpecs {
    fn default() -> Self {
        Self {
            collection: String::new(),
            multiple: false,
            may_be_empty: true,
        }
    }
}

macro_rules! kind_specs {
    ($($specs:ident => $variant:ident),* $(,)?) => {
        $(
            impl KindSpecs for $specs {
                const KIND: FieldKind = FieldKind::$variant;
            }

            impl From<$specs> for FieldSpecs {
                fn from(specs: $specs) -> Self {
                    FieldSpecs::$variant(specs)
                }
            }
        )*
    };
}

kind_specs! {
    BooleanSpecs => Boolean,
    StringSpecs => String,
    NumberSpecs => Number,
    DateSpecs => Date,
    EmailSpecs => Email,
    JsonSpecs => Json,
    SelectSpecs => Select,
    UrlSpecs => Url,
    RelationSpecs => Relation,
}

// =============================================================================
// Closed sum over the nine spec structs
// =============================================================================

/// Specs of a field; the variant is the field's type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldSpecs {
    Boolean(BooleanSpecs),
    String(StringSpecs),
    Number(NumberSpecs),
    Date(DateSpecs),
    Email(EmailSpecs),
    Json(JsonSpecs),
    Select(SelectSpecs),
    Url(UrlSpecs),
    Relation(RelationSpecs),
}

impl FieldSpecs {
    /// Returns the kind these specs belong to
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldSpecs::Boolean(_) => FieldKind::Boolean,
            FieldSpecs::String(_) => FieldKind::String,
            FieldSpecs::Number(_) => FieldKind::Number,
            FieldSpecs::Date(_) => FieldKind::Date,
            FieldSpecs::Email(_) => FieldKind::Email,
            FieldSpecs::Json(_) => FieldKind::Json,
            FieldSpecs::Select(_) => FieldKind::Select,
            FieldSpecs::Url(_) => FieldKind::Url,
            FieldSpecs::Relation(_) => FieldKind::Relation,
        }
    }

    /// Default specs of `kind`
    pub fn default_for(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Boolean => BooleanSpecs::default().into(),
            FieldKind::String => StringSpecs::default().into(),
            FieldKind::Number => NumberSpecs::default().into(),
            FieldKind::Date => DateSpecs::default().into(),
            FieldKind::Email => EmailSpecs::default().into(),
            FieldKind::Json => JsonSpecs::default().into(),
            FieldKind::Select => SelectSpecs::default().into(),
            FieldKind::Url => UrlSpecs::default().into(),
            FieldKind::Relation => RelationSpecs::default().into(),
        }
    }

    /// Merges partial settings over the defaults of `kind`.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::SpecShape` if the merged settings do not match
    /// the declared shape.
    pub fn from_partial(kind: FieldKind, settings: &Value) -> FieldResult<Self> {
        fn partial<S: KindSpecs>(settings: &Value) -> FieldResult<FieldSpecs> {
            S::from_partial(settings).map(Into::into)
        }

        match kind {
            FieldKind::Boolean => partial::<BooleanSpecs>(settings),
            FieldKind::String => partial::<StringSpecs>(settings),
            FieldKind::Number => partial::<NumberSpecs>(settings),
            FieldKind::Date => partial::<DateSpecs>(settings),
            FieldKind::Email => partial::<EmailSpecs>(settings),
            FieldKind::Json => partial::<JsonSpecs>(settings),
            FieldKind::Select => partial::<SelectSpecs>(settings),
            FieldKind::Url => partial::<UrlSpecs>(settings),
            FieldKind::Relation => partial::<RelationSpecs>(settings),
        }
    }

    /// Reads stored specs of `kind`. Required keys must be present.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::SpecShape` if `value` does not match the declared shape.
    pub fn from_value(kind: FieldKind, value: &Value) -> FieldResult<Self> {
        fn stored<S: KindSpecs>(value: &Value) -> FieldResult<FieldSpecs> {
            from_checked_value::<S>(S::KIND, value.clone()).map(Into::into)
        }

        match kind {
            FieldKind::Boolean => stored::<BooleanSpecs>(value),
            FieldKind::String => stored::<StringSpecs>(value),
            FieldKind::Number => stored::<NumberSpecs>(value),
            FieldKind::Date => stored::<DateSpecs>(value),
            FieldKind::Email => stored::<EmailSpecs>(value),
            FieldKind::Json => stored::<JsonSpecs>(value),
            FieldKind::Select => stored::<SelectSpecs>(value),
            FieldKind::Url => stored::<UrlSpecs>(value),
            FieldKind::Relation => stored::<RelationSpecs>(value),
        }
    }

    /// Returns the specs as a JSON object
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
