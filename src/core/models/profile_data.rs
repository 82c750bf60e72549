//! Raw profile data: core attributes plus custom-field value records

use super::lenient::{null_as_empty, optional_field_id};
use super::FieldId;
use crate::core::error::{FieldError, Result};
use crate::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry from the custom-field value store
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldRecord {
    /// Identifier matching [`FieldDefinition::field_id`](super::FieldDefinition::field_id)
    #[serde(default, deserialize_with = "optional_field_id")]
    pub field_id: Option<FieldId>,
    /// Field name, when the backend includes it
    #[serde(default)]
    pub name: Option<String>,
    /// Label key (e.g. `STATE`, `BOARD`)
    #[serde(default)]
    pub label: Option<String>,
    /// Stored value
    #[serde(default)]
    pub value: Option<Value>,
    /// Selected entries for multi-value fields; strings or `{id, value}` objects
    #[serde(default, deserialize_with = "null_as_empty")]
    pub selected_values: Vec<Value>,
    /// Comma-joined option codes
    #[serde(default)]
    pub code: Option<Value>,
}

impl CustomFieldRecord {
    /// Create an empty record for a field id
    pub fn new(field_id: impl Into<FieldId>) -> Self {
        Self {
            field_id: Some(field_id.into()),
            ..Self::default()
        }
    }

    /// Set the stored value
    #[must_use]
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Set the option code
    #[must_use]
    pub fn with_code(mut self, code: Value) -> Self {
        self.code = Some(code);
        self
    }

    /// Set the label key
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the field name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the selected entries
    #[must_use]
    pub fn with_selected_values(mut self, selected: Vec<Value>) -> Self {
        self.selected_values = selected;
        self
    }

    /// Selected entries as text. Object entries contribute their `value` member.
    #[must_use]
    pub fn selected_value_strings(&self) -> Vec<String> {
        self.selected_values
            .iter()
            .filter_map(|entry| match entry {
                Value::Object(map) => map.get("value").and_then(scalar_text),
                other => scalar_text(other),
            })
            .collect()
    }

    /// `value` when set, otherwise the selected entries joined with `,`
    #[must_use]
    pub fn effective_value(&self) -> Option<Value> {
        match &self.value {
            Some(value) if !value.is_null() => Some(value.clone()),
            _ => {
                let selected = self.selected_value_strings();
                if selected.is_empty() {
                    None
                } else {
                    Some(Value::String(selected.join(",")))
                }
            }
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Raw value sources for one profile
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileData {
    /// Attributes stored on the primary profile record
    pub core: Map<String, Value>,
    /// Custom-field value records, in served order
    pub custom_fields: Vec<CustomFieldRecord>,
    /// Number of custom-field records dropped because they could not be read
    pub skipped_records: usize,
}

impl ProfileData {
    /// Build from already materialised sources
    #[must_use]
    pub const fn new(core: Map<String, Value>, custom_fields: Vec<CustomFieldRecord>) -> Self {
        Self {
            core,
            custom_fields,
            skipped_records: 0,
        }
    }

    /// Parse a profile-read response.
    ///
    /// Accepts the middleware envelope `{"result": {"userData": {...}}}`, a bare
    /// `{"userData": {...}}`, or the user-data object itself. `customFields` is split
    /// off into records; every other member is a core attribute. Records that cannot be
    /// read are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidInput`] when the user data is not an object.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut user_data = unwrap_user_data(value)?;

        let mut skipped = 0;
        let custom_fields = match user_data.remove("customFields") {
            Some(Value::Array(items)) => items
                .into_iter()
                .enumerate()
                .filter_map(|(idx, item)| {
                    serde_json::from_value::<CustomFieldRecord>(item)
                        .map_err(|e| {
                            warn!("Skipping malformed custom field record #{idx}: {e}");
                            skipped += 1;
                        })
                        .ok()
                })
                .collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                warn!("Ignoring customFields: expected an array, got {other}");
                Vec::new()
            }
        };

        Ok(Self {
            core: user_data,
            custom_fields,
            skipped_records: skipped,
        })
    }

    /// Parse a profile-read response from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Json`] for malformed JSON and [`FieldError::InvalidInput`]
    /// when the user data is not an object.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Core attribute by name; `null` counts as missing
    #[must_use]
    pub fn core_attribute(&self, name: &str) -> Option<&Value> {
        self.core.get(name).filter(|v| !v.is_null())
    }

    /// First custom-field record with the given id
    #[must_use]
    pub fn record(&self, field_id: &FieldId) -> Option<&CustomFieldRecord> {
        self.custom_fields
            .iter()
            .find(|r| r.field_id.as_ref() == Some(field_id))
    }

    /// First custom-field record with the given label key
    #[must_use]
    pub fn record_by_label(&self, label: &str) -> Option<&CustomFieldRecord> {
        find_by_label(&self.custom_fields, label)
    }
}

/// First record in `records` with the given label key
#[must_use]
pub fn find_by_label<'a>(records: &'a [CustomFieldRecord], label: &str) -> Option<&'a CustomFieldRecord> {
    records.iter().find(|r| r.label.as_deref() == Some(label))
}

fn unwrap_user_data(value: Value) -> Result<Map<String, Value>> {
    let Value::Object(mut map) = value else {
        return Err(FieldError::invalid("profile source must be a JSON object"));
    };
    if let Some(result) = map.remove("result") {
        return unwrap_user_data(result);
    }
    match map.remove("userData") {
        Some(Value::Object(user_data)) => Ok(user_data),
        Some(_) => Err(FieldError::invalid("`userData` must be a JSON object")),
        None => Ok(map),
    }
}
