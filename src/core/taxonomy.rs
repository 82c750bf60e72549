//! Framework taxonomy: categories, their terms, and term associations

use crate::core::error::{FieldError, Result};
use crate::core::models::{find_by_label, CustomFieldRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Category code holding the education boards
pub const BOARD_CATEGORY: &str = "board";
/// Custom-field label listing the boards a user belongs to
pub const BOARD_LABEL: &str = "BOARD";

/// Link from a term to a term in another category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    /// Code of the associated term
    pub code: String,
    /// Category of the associated term
    pub category: String,
    /// Name of the associated term
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One selectable value in a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Term code
    pub code: String,
    /// Display name
    pub name: String,
    /// Links to terms in other categories
    #[serde(default)]
    pub associations: Vec<Association>,
}

/// A group of terms, such as boards or grades
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category code
    pub code: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Terms in served order
    #[serde(default)]
    pub terms: Vec<Term>,
}

/// A framework read from the taxonomy service
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Framework {
    /// Framework identifier
    #[serde(default)]
    pub identifier: Option<String>,
    /// Categories in served order
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Framework {
    /// Parse a framework, unwrapping `{"result": {"framework": {...}}}` envelopes.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Json`] when the framework body does not match the expected shape
    /// and [`FieldError::InvalidInput`] when the envelope is not an object.
    pub fn from_value(value: Value) -> Result<Self> {
        let body = unwrap_framework(value)?;
        Ok(serde_json::from_value(body)?)
    }

    /// Parse a framework from JSON text.
    ///
    /// # Errors
    ///
    /// See [`Framework::from_value`].
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Category by code
    #[must_use]
    pub fn category(&self, code: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.code == code)
    }

    /// Terms of a category; empty when the category does not exist
    #[must_use]
    pub fn options_by_category(&self, code: &str) -> &[Term] {
        self.category(code).map_or(&[], |c| c.terms.as_slice())
    }

    /// Terms in `category` that `term` is associated with, in association order
    #[must_use]
    pub fn associated_terms(&self, term: &Term, category: &str) -> Vec<&Term> {
        let terms = self.options_by_category(category);
        term.associations
            .iter()
            .filter(|assoc| assoc.category == category)
            .filter_map(|assoc| terms.iter().find(|t| t.code == assoc.code))
            .collect()
    }
}

fn unwrap_framework(value: Value) -> Result<Value> {
    let Value::Object(mut map) = value else {
        return Err(FieldError::invalid("framework source must be a JSON object"));
    };
    if let Some(result) = map.remove("result") {
        return unwrap_framework(result);
    }
    Ok(map.remove("framework").unwrap_or(Value::Object(map)))
}

/// Boards the user may pick from, in the order the framework serves them.
///
/// A user with a `BOARD` record only sees boards whose names match one of its selected
/// values, ignoring case. A user without one sees every board.
#[must_use]
pub fn visible_boards<'a>(framework: &'a Framework, records: &[CustomFieldRecord]) -> Vec<&'a Term> {
    let mut boards: Vec<&Term> = framework.options_by_category(BOARD_CATEGORY).iter().collect();

    if let Some(record) = find_by_label(records, BOARD_LABEL) {
        let allowed: HashSet<String> = record
            .selected_value_strings()
            .iter()
            .map(|board| board.to_lowercase())
            .collect();
        boards.retain(|board| allowed.contains(&board.name.to_lowercase()));
    }

    boards
}
