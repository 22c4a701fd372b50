//! Field descriptors and their constructors
//!
//! A descriptor is the canonical `{key, type, title, specs}` record of one
//! table column. The type is carried by the `FieldSpecs` variant, so a
//! descriptor can never hold specs of another type.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;

use super::errors::{FieldError, FieldResult};
use super::kind::FieldKind;
use super::shape::json_type_name;
use super::specs::{
    BooleanSpecs, DateSpecs, EmailSpecs, FieldSpecs, JsonSpecs, KindSpecs, NumberSpecs,
    RelationSpecs, SelectSpecs, StringSpecs, UrlSpecs,
};

/// Canonical description of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Column key, unique within a collection
    pub key: String,
    /// Display title
    pub title: String,
    /// Type-specific specs
    pub specs: FieldSpecs,
}

impl FieldDescriptor {
    /// Creates a descriptor from typed specs with the default title of their kind.
    pub fn new(key: impl Into<String>, specs: impl Into<FieldSpecs>) -> Self {
        let specs = specs.into();
        Self {
            key: key.into(),
            title: specs.kind().default_title().to_string(),
            specs,
        }
    }

    /// Replaces the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Returns the field type
    pub fn kind(&self) -> FieldKind {
        self.specs.kind()
    }

    /// Creates a descriptor from a type tag and partial settings.
    ///
    /// # Errors
    ///
    /// - `FieldError::UnsupportedType` if `type_tag` is not a known kind
    /// - `FieldError::SpecShape` if the merged settings do not fit the kind
    pub fn create(key: impl Into<String>, type_tag: &str, settings: &Value) -> FieldResult<Self> {
        let kind: FieldKind = type_tag.parse()?;
        let specs = FieldSpecs::from_partial(kind, settings)?;
        Ok(Self::new(key, specs))
    }

    fn from_partial<S: KindSpecs>(key: impl Into<String>, settings: &Value) -> FieldResult<Self> {
        Ok(Self::new(key, S::from_partial(settings)?))
    }

    /// Creates a boolean field.
    pub fn boolean(key: impl Into<String>, settings: &Value) -> FieldResult<Self> {
        Self::from_partial::<BooleanSpecs>(key, settings)
    }

    /// Creates a string field.
    pub fn string(key: impl Into<String>, settings: &Value) -> FieldResult<Self> {
        Self::from_partial::<StringSpecs>(key, settings)
    }

    /// Creates a number field.
    pub fn number(key: impl Into<String>, settings: &Value) -> FieldResult<Self> {
        Self::from_partial::<NumberSpecs>(key, settings)
    }

    /// Creates a date field.
    pub fn date(key: impl Into<String>, settings: &Value) -> FieldResult<Self> {
        Self::from_partial::<DateSpecs>(key, settings)
    }

    /// Creates an email field.
    pub fn email(key: impl Into<String>, settings: &Value) -> FieldResult<Self> {
        Self::from_partial::<EmailSpecs>(key, settings)
    }

    /// Creates a JSON field.
    pub fn json(key: impl Into<String>, settings: &Value) -> FieldResult<Self> {
        Self::from_partial::<JsonSpecs>(key, settings)
    }

    /// Creates a select field.
    pub fn select(key: impl Into<String>, settings: &Value) -> FieldResult<Self> {
        Self::from_partial::<SelectSpecs>(key, settings)
    }

    /// Creates a URL field.
    pub fn url(key: impl Into<String>, settings: &Value) -> FieldResult<Self> {
        Self::from_partial::<UrlSpecs>(key, settings)
    }

    /// Creates a relation field.
    pub fn relation(key: impl Into<String>, settings: &Value) -> FieldResult<Self> {
        Self::from_partial::<RelationSpecs>(key, settings)
    }

    /// Reads a stored descriptor (`{key, type, title, specs}`).
    ///
    /// # Errors
    ///
    /// - `FieldError::Malformed` if `key`, `type` or `title` is missing or not a string
    /// - `FieldError::UnsupportedType` for an unknown type tag
    /// - `FieldError::SpecShape` if the specs do not fit the type
    pub fn from_value(value: &Value) -> FieldResult<Self> {
        let obj = value.as_object().ok_or_else(|| {
            FieldError::Malformed(format!("descriptor must be an object, got {}", json_type_name(value)))
        })?;

        let text = |name: &str| -> FieldResult<String> {
            obj.get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| FieldError::Malformed(format!("descriptor '{}' must be a string", name)))
        };

        let key = text("key")?;
        let kind: FieldKind = text("type")?.parse()?;
        let title = text("title")?;
        let specs = FieldSpecs::from_value(kind, obj.get("specs").unwrap_or(&Value::Null))?;

        Ok(Self { key, title, specs })
    }

    /// Returns the descriptor as a JSON object
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for FieldDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FieldDescriptor", 4)?;
        state.serialize_field("key", &self.key)?;
        state.serialize_field("type", &self.kind())?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("specs", &self.specs)?;
        state.end()
    }
}
