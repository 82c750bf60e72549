//! Read-only display fields and the projections that filter them

use super::{FieldDefinition, FieldId, FieldOption, FieldType, FieldValue, UNSET};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Which UI mode a display list is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    /// Read-only profile view; fields with `order == 0` are hidden
    #[default]
    View,
    /// Edit form; every field is kept
    Edit,
}

impl Projection {
    /// Whether a field belongs in this projection
    #[must_use]
    pub const fn includes(self, field: &DisplayField) -> bool {
        match self {
            Self::View => field.order != 0,
            Self::Edit => true,
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::View => "view",
            Self::Edit => "edit",
        })
    }
}

impl FromStr for Projection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "view" => Ok(Self::View),
            "edit" => Ok(Self::Edit),
            other => Err(format!("Unknown projection: '{other}' (expected view or edit)")),
        }
    }
}

/// A field ready for read-only rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayField {
    /// Attribute name
    pub name: String,
    /// Custom-field identifier, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_id: Option<FieldId>,
    /// Label key
    pub label: String,
    /// Value to show; `None` when no source provided one
    pub value: Option<FieldValue>,
    /// Sort key
    pub order: i64,
    /// Declared input type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Choices used to turn option codes into labels
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
}

impl DisplayField {
    /// Start from a schema entry, carrying over any value it already holds
    #[must_use]
    pub fn from_definition(definition: &FieldDefinition) -> Self {
        Self {
            name: definition.name.clone(),
            field_id: definition.field_id.clone(),
            label: definition.label.clone(),
            value: definition.value.as_ref().and_then(FieldValue::from_json),
            order: definition.order,
            field_type: definition.field_type.clone(),
            options: definition.options.clone(),
        }
    }

    /// Whether the value is the explicit "unset" placeholder
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.value.as_ref().is_some_and(FieldValue::is_unset)
    }

    /// Raw value as text, or the placeholder when there is none
    #[must_use]
    pub fn display_value(&self) -> String {
        self.value
            .as_ref()
            .filter(|v| v.is_truthy())
            .map_or_else(|| UNSET.to_string(), FieldValue::to_display_string)
    }
}
