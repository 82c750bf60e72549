//! Display-field merging and option label lookup

use crate::core::models::{
    CustomFieldRecord, DisplayField, FieldId, FieldOption, FieldValue, FormSchema, Projection,
    UNSET,
};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Values keyed by custom-field id that take precedence over every other source
pub type OverrideMap = HashMap<FieldId, FieldValue>;

/// Build the override map from custom-field records.
///
/// Records without an id or with an empty value are skipped; a later record with the
/// same id replaces an earlier one.
#[must_use]
pub fn override_map(records: &[CustomFieldRecord]) -> OverrideMap {
    records
        .iter()
        .filter_map(|record| {
            let id = record.field_id.clone()?;
            let value = record
                .effective_value()
                .as_ref()
                .and_then(FieldValue::from_json)
                .filter(FieldValue::is_truthy)?;
            Some((id, value))
        })
        .collect()
}

/// Merge schema fields with override and core values into a sorted display list.
///
/// Precedence per field: an override for its `fieldId` (the `-` placeholder is kept as
/// is), then for core fields the core attribute or `-` when it is missing or empty,
/// otherwise the value the schema entry already carries. The result is stably sorted by
/// `order`; [`Projection::View`] drops `order == 0` fields.
#[must_use]
pub fn merge_overrides(
    schema: &FormSchema,
    overrides: &OverrideMap,
    core: &Map<String, Value>,
    projection: Projection,
) -> Vec<DisplayField> {
    let mut fields: Vec<DisplayField> = schema
        .definitions()
        .map(|definition| {
            let mut field = DisplayField::from_definition(definition);
            if let Some(value) = definition.field_id.as_ref().and_then(|id| overrides.get(id)) {
                field.value = Some(value.clone());
            } else if definition.core_field {
                field.value = Some(
                    core.get(&definition.name)
                        .and_then(FieldValue::from_json)
                        .filter(FieldValue::is_truthy)
                        .unwrap_or_else(FieldValue::unset),
                );
            }
            field
        })
        .filter(|field| projection.includes(field))
        .collect();

    fields.sort_by_key(|field| field.order);
    fields
}

/// Text to show for a field's value.
///
/// Radio and drop-down values are looked up by exact match in `options`; a hit returns
/// the option's label, a miss the raw value. Other types return the raw value. A field
/// without a value shows `-`.
#[must_use]
pub fn derive_display_label(field: &DisplayField, options: &[FieldOption]) -> String {
    let Some(value) = field.value.as_ref() else {
        return UNSET.to_string();
    };
    let raw = value.to_display_string();
    if !field.field_type.has_options() {
        return raw;
    }
    options
        .iter()
        .find(|option| option.value == raw)
        .map_or(raw, |option| option.label.clone())
}
