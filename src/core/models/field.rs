//! Form field definitions and the compiled form schema

use super::lenient::{boolish, lenient_int, null_as_empty, optional_field_id, scalar_string};
use crate::core::error::{FieldError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Identifier linking a schema field to its custom-field value records.
///
/// The middleware sends these as strings or numbers; both normalise to the same key,
/// so `42` and `"42"` address the same field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    /// Create an identifier from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the normalised identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read an identifier from a JSON scalar. Empty strings, `null` and non-scalars yield `None`.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(Self(s.trim().to_string())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<i64> for FieldId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for FieldId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Self::from_json(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid field id: {raw}")))
    }
}

/// Declared input type of a field
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldType {
    /// Free text
    Text,
    /// Whole numbers
    Numeric,
    /// Single choice rendered as radio buttons
    Radio,
    /// Comma-coded multiple choice
    Checkbox,
    /// Single choice rendered as a drop-down
    Dropdown,
    /// Any type this crate has no dedicated handling for
    Other(String),
    /// No type given
    #[default]
    Unspecified,
}

impl FieldType {
    /// Canonical lowercase name
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Numeric => "numeric",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Dropdown => "dropdown",
            Self::Other(name) => name,
            Self::Unspecified => "",
        }
    }

    /// Whether stored values are option codes that should render via option labels
    #[must_use]
    pub const fn has_options(&self) -> bool {
        matches!(self, Self::Radio | Self::Dropdown)
    }
}

impl From<&str> for FieldType {
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "" => Self::Unspecified,
            "text" => Self::Text,
            "numeric" | "number" => Self::Numeric,
            "radio" => Self::Radio,
            "checkbox" => Self::Checkbox,
            "dropdown" | "drop_down" | "drop-down" => Self::Dropdown,
            _ => Self::Other(name.trim().to_string()),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map_or(Self::Unspecified, Self::from))
    }
}

/// How a field's value is read out of its source.
///
/// Chosen once per field when the schema is compiled, from
/// `(isMultiSelect, maxSelections, type)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Multi-select allowing more than one choice; a scalar is wrapped in a list
    MultiSelect,
    /// Comma-separated codes split into a list
    Checkbox,
    /// Integer coercion
    Numeric,
    /// String coercion
    Text,
    /// Option code normalised to lowercase words
    Radio,
    /// Value used as stored
    Passthrough,
}

impl FieldKind {
    /// Pick the resolution strategy for a field definition
    #[must_use]
    pub const fn classify(field_type: &FieldType, is_multi_select: bool, max_selections: i64) -> Self {
        if is_multi_select && max_selections > 1 {
            return Self::MultiSelect;
        }
        match field_type {
            FieldType::Checkbox => Self::Checkbox,
            FieldType::Numeric => Self::Numeric,
            FieldType::Text => Self::Text,
            FieldType::Radio => Self::Radio,
            FieldType::Dropdown | FieldType::Other(_) | FieldType::Unspecified => Self::Passthrough,
        }
    }
}

/// A selectable option of a radio, drop-down or checkbox field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    /// Label key shown to the user
    #[serde(default, deserialize_with = "scalar_string")]
    pub label: String,
    /// Stored value
    #[serde(default, deserialize_with = "scalar_string")]
    pub value: String,
}

impl FieldOption {
    /// Create an option
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Schema entry describing one form field, as served by the form-read endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Attribute name; also the key in resolved form values
    pub name: String,

    /// Identifier of the custom-field value store entry (absent for most core fields)
    #[serde(
        default,
        deserialize_with = "optional_field_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub field_id: Option<FieldId>,

    /// Declared input type
    #[serde(rename = "type", default)]
    pub field_type: FieldType,

    /// Whether several values may be chosen
    #[serde(default, deserialize_with = "boolish")]
    pub is_multi_select: bool,

    /// Upper bound on chosen values for multi-selects
    #[serde(default, deserialize_with = "lenient_int")]
    pub max_selections: i64,

    /// Stored on the primary profile record rather than in the custom-field store
    #[serde(default, deserialize_with = "boolish")]
    pub core_field: bool,

    /// Default value for the edit form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Display position; `0` marks fields hidden from read-only views
    #[serde(default, deserialize_with = "lenient_int")]
    pub order: i64,

    /// Label key
    #[serde(default, deserialize_with = "scalar_string")]
    pub label: String,

    /// Choices for option-backed fields
    #[serde(default, deserialize_with = "null_as_empty")]
    pub options: Vec<FieldOption>,

    /// Value already carried by the schema entry, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl FieldDefinition {
    /// Create a custom (non-core) field definition with no id, options or default
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_id: None,
            field_type,
            is_multi_select: false,
            max_selections: 0,
            core_field: false,
            default: None,
            order: 0,
            label: String::new(),
            options: Vec::new(),
            value: None,
        }
    }

    /// Set the custom-field identifier
    #[must_use]
    pub fn with_field_id(mut self, id: impl Into<FieldId>) -> Self {
        self.field_id = Some(id.into());
        self
    }

    /// Mark as a core profile attribute
    #[must_use]
    pub const fn core(mut self) -> Self {
        self.core_field = true;
        self
    }

    /// Mark as multi-select with the given selection limit
    #[must_use]
    pub const fn multi_select(mut self, max_selections: i64) -> Self {
        self.is_multi_select = true;
        self.max_selections = max_selections;
        self
    }

    /// Set the default value
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Set the display order
    #[must_use]
    pub const fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    /// Set the label key
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the option list
    #[must_use]
    pub fn with_options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = options;
        self
    }

    /// Set the value already carried by the schema entry
    #[must_use]
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Resolution strategy for this definition
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        FieldKind::classify(&self.field_type, self.is_multi_select, self.max_selections)
    }
}

/// A field definition paired with its precomputed resolution strategy
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    /// The definition as served
    pub definition: FieldDefinition,
    /// Strategy chosen at compile time
    pub kind: FieldKind,
}

impl From<FieldDefinition> for SchemaField {
    fn from(definition: FieldDefinition) -> Self {
        let kind = definition.kind();
        Self { definition, kind }
    }
}

/// Compiled form schema: field definitions in served order, each with its strategy
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormSchema {
    fields: Vec<SchemaField>,
}

impl FormSchema {
    /// Compile a schema from definitions
    #[must_use]
    pub fn new(definitions: Vec<FieldDefinition>) -> Self {
        Self {
            fields: definitions.into_iter().map(SchemaField::from).collect(),
        }
    }

    /// Parse a form-read response.
    ///
    /// Accepts a bare array of definitions, an object with a `fields` array, or the
    /// middleware envelope `{"result": {"fields": [...]}}`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidInput`] when no field sequence can be found or a
    /// definition is structurally invalid (e.g. missing `name`).
    pub fn from_value(value: Value) -> Result<Self> {
        let fields = match value {
            Value::Array(items) => items,
            Value::Object(mut map) => {
                let inner = match map.remove("result") {
                    Some(Value::Object(mut result)) => result.remove("fields"),
                    _ => map.remove("fields"),
                };
                match inner {
                    Some(Value::Array(items)) => items,
                    Some(other) => {
                        return Err(FieldError::invalid(format!(
                            "schema `fields` must be an array, got {}",
                            json_kind(&other)
                        )))
                    }
                    None => return Err(FieldError::invalid("schema has no `fields` member")),
                }
            }
            other => {
                return Err(FieldError::invalid(format!(
                    "schema must be an object or array, got {}",
                    json_kind(&other)
                )))
            }
        };

        let definitions = fields
            .into_iter()
            .enumerate()
            .map(|(idx, item)| {
                serde_json::from_value::<FieldDefinition>(item)
                    .map_err(|e| FieldError::invalid(format!("schema field #{idx}: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(definitions))
    }

    /// Parse a form-read response from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Json`] for malformed JSON and [`FieldError::InvalidInput`]
    /// for a structurally invalid schema.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Fields in schema order
    #[must_use]
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// Iterate over the definitions in schema order
    pub fn definitions(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().map(|f| &f.definition)
    }

    /// Look up a field by name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.definition.name == name)
    }

    /// Number of fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<FieldDefinition> for FormSchema {
    fn from_iter<I: IntoIterator<Item = FieldDefinition>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
