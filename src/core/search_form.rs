//! Search form definitions: JSON-schema-like properties plus a UI order list

use crate::core::error::{FieldError, Result};
use crate::core::models::FieldOption;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key of the order list inside a UI schema
pub const UI_ORDER_KEY: &str = "ui:order";

/// How to read a remote option list out of a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionMapping {
    /// Dotted path to the option array, e.g. `result.values`
    pub option_obj: String,
    /// Member holding each option's label
    #[serde(default = "default_label_key")]
    pub label: String,
    /// Member holding each option's value
    #[serde(default = "default_value_key")]
    pub value: String,
}

fn default_label_key() -> String {
    "label".to_string()
}

fn default_value_key() -> String {
    "value".to_string()
}

/// Remote endpoint that supplies a property's options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionSource {
    /// Endpoint URL
    pub url: String,
    /// HTTP method
    #[serde(default)]
    pub method: Option<String>,
    /// Request body
    #[serde(default)]
    pub payload: Option<Value>,
    /// Where the options sit in the response
    pub options: OptionMapping,
    /// When to call (`initial` or on dependency change)
    #[serde(default)]
    pub call_type: Option<String>,
}

impl OptionSource {
    /// Options found in an endpoint response. Entries missing the label or value member
    /// are skipped; a missing path yields nothing.
    #[must_use]
    pub fn extract_options(&self, response: &Value) -> Vec<FieldOption> {
        let mapping = &self.options;
        let found = mapping
            .option_obj
            .split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(response, |node, segment| node.get(segment));

        found
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        let label = text_member(item, &mapping.label)?;
                        let value = text_member(item, &mapping.value)?;
                        Some(FieldOption::new(label, value))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn text_member(item: &Value, key: &str) -> Option<String> {
    match item.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// One searchable property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchProperty {
    /// JSON type, usually `string`
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Display title
    #[serde(default)]
    pub title: Option<String>,
    /// Allowed values
    #[serde(rename = "enum", default)]
    pub enum_values: Vec<Value>,
    /// Labels for `enum`, position by position
    #[serde(default)]
    pub enum_names: Vec<String>,
    /// Remote source for the options
    #[serde(default)]
    pub api: Option<OptionSource>,
}

impl SearchProperty {
    /// Static options: `enum` zipped with `enumNames`, the raw value standing in for a
    /// missing name
    #[must_use]
    pub fn options(&self) -> Vec<FieldOption> {
        self.enum_values
            .iter()
            .enumerate()
            .map(|(idx, raw)| {
                let value = raw.as_str().map_or_else(|| raw.to_string(), str::to_string);
                let label = self.enum_names.get(idx).cloned().unwrap_or_else(|| value.clone());
                FieldOption::new(label, value)
            })
            .collect()
    }
}

/// Property map of a search schema
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchSchema {
    /// Properties in definition order
    #[serde(default)]
    pub properties: IndexMap<String, SearchProperty>,
}

/// A search schema and its UI order
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchForm {
    /// Property definitions
    pub schema: SearchSchema,
    /// Preferred property order
    pub ui_order: Vec<String>,
}

impl SearchForm {
    /// Parse `{"schema": {...}, "uiSchema": {"ui:order": [...]}}`. A missing UI schema
    /// means definition order.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidInput`] when `schema` is missing or `ui:order` is not a
    /// list of strings, and [`FieldError::Json`] for a malformed property.
    pub fn from_value(mut value: Value) -> Result<Self> {
        let schema = value
            .get_mut("schema")
            .map(Value::take)
            .ok_or_else(|| FieldError::invalid("search form needs a `schema` object"))?;
        let schema: SearchSchema = serde_json::from_value(schema)?;

        let ui_order = match value.get("uiSchema").and_then(|ui| ui.get(UI_ORDER_KEY)) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| FieldError::invalid("`ui:order` entries must be strings"))
                })
                .collect::<Result<_>>()?,
            Some(_) => return Err(FieldError::invalid("`ui:order` must be a list")),
        };

        Ok(Self { schema, ui_order })
    }

    /// Parse from JSON text.
    ///
    /// # Errors
    ///
    /// See [`SearchForm::from_value`].
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Properties in UI order. Order entries naming no property are skipped; properties
    /// the order leaves out follow in definition order.
    #[must_use]
    pub fn ordered_fields(&self) -> Vec<(&str, &SearchProperty)> {
        let properties = &self.schema.properties;
        let listed = self
            .ui_order
            .iter()
            .filter_map(|key| properties.get_key_value(key.as_str()));
        let unlisted = properties
            .iter()
            .filter(|(key, _)| !self.ui_order.iter().any(|k| k == *key));

        let mut seen = std::collections::HashSet::new();
        listed
            .chain(unlisted)
            .filter(|(key, _)| seen.insert(key.as_str()))
            .map(|(key, property)| (key.as_str(), property))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form() -> SearchForm {
        SearchForm::from_value(json!({
            "schema": {
                "type": "object",
                "properties": {
                    "state": {
                        "type": "string",
                        "title": "State",
                        "enum": ["Select"],
                        "enumNames": ["Select"],
                        "api": {
                            "url": "/fields/options/read",
                            "method": "POST",
                            "payload": {"fieldName": "state"},
                            "options": {"optionObj": "result.values", "label": "label", "value": "value"},
                            "callType": "initial"
                        }
                    },
                    "firstName": {"type": "string", "title": "Search Key"},
                    "sortBy": {"type": "string", "enum": ["asc", "desc"], "enumNames": ["A-Z"]},
                    "status": {"type": "string", "enum": ["active", "archived"], "enumNames": ["Active", "Archived"]}
                }
            },
            "uiSchema": {"ui:order": ["state", "searchKey", "sortBy", "status"]}
        }))
        .unwrap()
    }

    #[test]
    fn test_order_skips_unknown_and_appends_unlisted() {
        let form = form();
        let keys: Vec<_> = form.ordered_fields().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["state", "sortBy", "status", "firstName"]);
    }

    #[test]
    fn test_options_fall_back_to_raw_value() {
        let form = form();
        let options = form.schema.properties["sortBy"].options();
        assert_eq!(options, vec![FieldOption::new("A-Z", "asc"), FieldOption::new("desc", "desc")]);
    }

    #[test]
    fn test_extract_remote_options() {
        let form = form();
        let api = form.schema.properties["state"].api.as_ref().unwrap();
        let response = json!({
            "result": {"values": [
                {"label": "Maharashtra", "value": 27},
                {"label": "Kerala"},
                {"label": "Goa", "value": "30"}
            ]}
        });

        assert_eq!(
            api.extract_options(&response),
            vec![FieldOption::new("Maharashtra", "27"), FieldOption::new("Goa", "30")]
        );
        assert!(api.extract_options(&json!({"result": {}})).is_empty());
    }

    #[test]
    fn test_missing_schema_is_invalid() {
        assert!(matches!(
            SearchForm::from_value(json!({"uiSchema": {}})),
            Err(FieldError::InvalidInput(_))
        ));
    }
}
