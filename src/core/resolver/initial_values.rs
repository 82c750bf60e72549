//! Initial edit-form values from core attributes and custom-field records

use super::{FieldIssue, ResolveOptions, ResolvedForm};
use crate::core::models::{
    CustomFieldRecord, FieldKind, FieldValue, FormSchema, FormValues, ProfileData, SchemaField,
};
use crate::debug;

/// Outcome of resolving one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A value the form should show
    Present(FieldValue),
    /// No source provided anything
    Absent,
    /// A source provided a falsy value (empty text, zero, `false`, `NaN`)
    Cleared(FieldValue),
}

impl Resolution {
    fn gate(value: FieldValue) -> Self {
        if value.is_truthy() {
            Self::Present(value)
        } else {
            Self::Cleared(value)
        }
    }

    /// The value, if one should be written into the form
    #[must_use]
    pub fn into_value(self, keep_cleared: bool) -> Option<FieldValue> {
        match self {
            Self::Present(value) => Some(value),
            Self::Cleared(value) if keep_cleared => Some(value),
            Self::Cleared(_) | Self::Absent => None,
        }
    }
}

/// Resolve the initial edit-form values for every schema field.
///
/// Returns a sparse map in schema order containing only fields that produced a value.
/// Per-field data problems never abort resolution; use [`resolve_form`] to see them.
#[must_use]
pub fn resolve_initial_values(
    schema: &FormSchema,
    source: &ProfileData,
    options: ResolveOptions,
) -> FormValues {
    resolve_form(schema, source, options).values
}

/// Resolve every schema field and collect per-field diagnostics
#[must_use]
pub fn resolve_form(schema: &FormSchema, source: &ProfileData, options: ResolveOptions) -> ResolvedForm {
    let mut resolved = ResolvedForm::default();

    for field in schema.fields() {
        let (resolution, issue) = resolve_field(field, source);
        if let Some(issue) = issue {
            debug!("{issue}");
            resolved.issues.push(issue);
        }
        if let Some(value) = resolution.into_value(options.keep_cleared) {
            resolved.values.insert(field.definition.name.clone(), value);
        }
    }

    resolved
}

/// Resolve a single field against its sources.
///
/// Custom fields with a truthy `default` take it unconditionally; core fields ignore
/// `default`. Returns the three-state outcome and any data issue encountered.
#[must_use]
pub fn resolve_field(field: &SchemaField, source: &ProfileData) -> (Resolution, Option<FieldIssue>) {
    if field.definition.core_field {
        resolve_core(field, source)
    } else {
        resolve_custom(field, source)
    }
}

fn resolve_core(field: &SchemaField, source: &ProfileData) -> (Resolution, Option<FieldIssue>) {
    let name = &field.definition.name;
    let Some(value) = source.core_attribute(name).and_then(FieldValue::from_json) else {
        return (Resolution::Absent, Some(FieldIssue::missing(name)));
    };

    match field.kind {
        FieldKind::MultiSelect => (Resolution::gate(value).map(wrap_in_list), None),
        FieldKind::Checkbox => (Resolution::Present(split_codes(&value)), None),
        FieldKind::Numeric => {
            let (number, issue) = coerce_numeric(name, &value);
            (Resolution::Present(number), issue)
        }
        FieldKind::Text if value.is_truthy() => {
            (Resolution::Present(FieldValue::Text(value.to_display_string())), None)
        }
        FieldKind::Text => (Resolution::Cleared(value), None),
        FieldKind::Radio | FieldKind::Passthrough => (Resolution::gate(value), None),
    }
}

fn resolve_custom(field: &SchemaField, source: &ProfileData) -> (Resolution, Option<FieldIssue>) {
    let definition = &field.definition;
    let name = &definition.name;

    if let Some(default) = definition.default.as_ref().and_then(FieldValue::from_json) {
        if default.is_truthy() {
            return (Resolution::Present(default), None);
        }
    }

    let Some(record) = definition.field_id.as_ref().and_then(|id| source.record(id)) else {
        return (Resolution::Absent, Some(FieldIssue::missing(name)));
    };

    let mut issue = None;
    let candidate = match field.kind {
        FieldKind::Checkbox => record_code(record).map(|code| split_codes(&code)),
        kind => record_value(record).map(|value| match kind {
            FieldKind::MultiSelect => wrap_in_list(value),
            FieldKind::Radio => normalise_radio(value),
            FieldKind::Numeric => {
                let (number, coercion_issue) = coerce_numeric(name, &value);
                issue = coercion_issue;
                number
            }
            FieldKind::Text => FieldValue::Text(value.to_display_string()),
            FieldKind::Checkbox | FieldKind::Passthrough => value,
        }),
    };

    match candidate {
        Some(value) => (Resolution::gate(value), issue),
        None => {
            let expected = if field.kind == FieldKind::Checkbox { "code" } else { "value" };
            (
                Resolution::Absent,
                Some(FieldIssue::MalformedRecord {
                    field: name.clone(),
                    expected,
                }),
            )
        }
    }
}

impl Resolution {
    fn map(self, f: impl FnOnce(FieldValue) -> FieldValue) -> Self {
        match self {
            Self::Present(value) => Self::Present(f(value)),
            Self::Cleared(value) => Self::Cleared(f(value)),
            Self::Absent => Self::Absent,
        }
    }
}

fn record_value(record: &CustomFieldRecord) -> Option<FieldValue> {
    record.effective_value().as_ref().and_then(FieldValue::from_json)
}

fn record_code(record: &CustomFieldRecord) -> Option<FieldValue> {
    record.code.as_ref().and_then(FieldValue::from_json)
}

fn wrap_in_list(value: FieldValue) -> FieldValue {
    match value {
        FieldValue::List(_) => value,
        scalar => FieldValue::List(vec![scalar]),
    }
}

/// Split the stringified value on `,`. An empty string yields `[""]`.
fn split_codes(value: &FieldValue) -> FieldValue {
    FieldValue::list(value.to_display_string().split(','))
}

/// `ROLE_A` becomes `role a`; non-text values are left alone
fn normalise_radio(value: FieldValue) -> FieldValue {
    match value {
        FieldValue::Text(text) => FieldValue::Text(text.replace('_', " ").to_lowercase()),
        other => other,
    }
}

fn coerce_numeric(name: &str, value: &FieldValue) -> (FieldValue, Option<FieldIssue>) {
    coerce_integer(value).map_or_else(
        || {
            (
                FieldValue::NotANumber,
                Some(FieldIssue::TypeCoercionFailure {
                    field: name.to_string(),
                    raw: value.to_display_string(),
                }),
            )
        },
        |n| (FieldValue::integer(n), None),
    )
}

/// Integer coercion with leading-integer semantics: `"12abc"` is `12`, `"abc"` is `None`,
/// floats truncate toward zero.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn coerce_integer(value: &FieldValue) -> Option<i64> {
    if let FieldValue::Number(n) = value {
        return n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64));
    }
    parse_leading_integer(&value.to_display_string())
}

fn parse_leading_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits: &str = rest
        .find(|c: char| !c.is_ascii_digit())
        .map_or(rest, |end| &rest[..end]);
    if digits.is_empty() {
        return None;
    }
    // digits are non-empty ASCII, so parsing only fails on overflow
    Some(match digits.parse::<i64>() {
        Ok(magnitude) if negative => -magnitude,
        Ok(magnitude) => magnitude,
        Err(_) if negative => i64::MIN,
        Err(_) => i64::MAX,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{FieldDefinition, FieldType};
    use serde_json::{json, Map, Value};

    fn profile(core: Value, records: Vec<CustomFieldRecord>) -> ProfileData {
        let Value::Object(core) = core else {
            return ProfileData::new(Map::new(), records);
        };
        ProfileData::new(core, records)
    }

    fn single(def: FieldDefinition) -> SchemaField {
        SchemaField::from(def)
    }

    #[test]
    fn test_parse_leading_integer() {
        assert_eq!(parse_leading_integer("42"), Some(42));
        assert_eq!(parse_leading_integer("  -7 years"), Some(-7));
        assert_eq!(parse_leading_integer("+3"), Some(3));
        assert_eq!(parse_leading_integer("abc"), None);
        assert_eq!(parse_leading_integer(""), None);
        assert_eq!(parse_leading_integer("-"), None);
    }

    #[test]
    fn test_parse_leading_integer_saturates() {
        assert_eq!(parse_leading_integer("99999999999999999999 pupils"), Some(i64::MAX));
        assert_eq!(parse_leading_integer("-99999999999999999999"), Some(i64::MIN));
    }

    #[test]
    fn test_coerce_integer_truncates_floats() {
        assert_eq!(coerce_integer(&FieldValue::from_json(&json!(3.9)).unwrap()), Some(3));
        assert_eq!(coerce_integer(&FieldValue::Bool(true)), None);
    }

    #[test]
    fn test_core_checkbox_empty_string_yields_single_empty_entry() {
        let field = single(FieldDefinition::new("langs", FieldType::Checkbox).core());
        let source = profile(json!({"langs": ""}), Vec::new());

        let (resolution, issue) = resolve_field(&field, &source);
        assert_eq!(resolution, Resolution::Present(FieldValue::list([""])));
        assert!(issue.is_none());
    }

    #[test]
    fn test_core_numeric_failure_is_not_a_number() {
        let field = single(FieldDefinition::new("age", FieldType::Numeric).core());
        let source = profile(json!({"age": "unknown"}), Vec::new());

        let (resolution, issue) = resolve_field(&field, &source);
        assert_eq!(resolution, Resolution::Present(FieldValue::NotANumber));
        assert!(matches!(issue, Some(FieldIssue::TypeCoercionFailure { .. })));
    }

    #[test]
    fn test_core_text_empty_is_cleared() {
        let field = single(FieldDefinition::new("phone", FieldType::Text).core());
        let source = profile(json!({"phone": ""}), Vec::new());

        let (resolution, _) = resolve_field(&field, &source);
        assert_eq!(resolution, Resolution::Cleared(FieldValue::text("")));
    }

    #[test]
    fn test_core_text_checks_raw_value() {
        let source = profile(json!({"pincode": 0, "verified": false}), Vec::new());

        for name in ["pincode", "verified"] {
            let field = single(FieldDefinition::new(name, FieldType::Text).core());
            let (resolution, _) = resolve_field(&field, &source);
            assert!(matches!(resolution, Resolution::Cleared(_)), "{name}");
        }
    }

    #[test]
    fn test_core_multi_select_cleared_keeps_list_shape() {
        let field = single(FieldDefinition::new("langs", FieldType::Dropdown).core().multi_select(3));
        let source = profile(json!({"langs": ""}), Vec::new());

        let (resolution, _) = resolve_field(&field, &source);
        assert_eq!(resolution, Resolution::Cleared(FieldValue::list([""])));
        assert_eq!(resolution.into_value(true), Some(FieldValue::list([""])));
    }

    #[test]
    fn test_core_ignores_default() {
        let field = single(
            FieldDefinition::new("email", FieldType::Text)
                .core()
                .with_default(json!("fallback@example.org")),
        );
        let source = profile(json!({}), Vec::new());

        let (resolution, issue) = resolve_field(&field, &source);
        assert_eq!(resolution, Resolution::Absent);
        assert!(matches!(issue, Some(FieldIssue::MissingFieldSource { .. })));
    }

    #[test]
    fn test_custom_default_wins_over_record() {
        let field = single(
            FieldDefinition::new("state", FieldType::Dropdown)
                .with_field_id("1")
                .with_default(json!("MH")),
        );
        let source = profile(
            json!({}),
            vec![CustomFieldRecord::new("1").with_value(json!("KA"))],
        );

        let (resolution, _) = resolve_field(&field, &source);
        assert_eq!(resolution, Resolution::Present(FieldValue::text("MH")));
    }

    #[test]
    fn test_custom_checkbox_without_code_is_malformed() {
        let field = single(FieldDefinition::new("subjects", FieldType::Checkbox).with_field_id("9"));
        let source = profile(
            json!({}),
            vec![CustomFieldRecord::new("9").with_value(json!("math"))],
        );

        let (resolution, issue) = resolve_field(&field, &source);
        assert_eq!(resolution, Resolution::Absent);
        assert_eq!(
            issue,
            Some(FieldIssue::MalformedRecord {
                field: "subjects".into(),
                expected: "code"
            })
        );
    }

    #[test]
    fn test_custom_numeric_uses_leading_integer() {
        let field = single(FieldDefinition::new("experience", FieldType::Numeric).with_field_id("5"));
        let source = profile(
            json!({}),
            vec![CustomFieldRecord::new("5").with_value(json!("12 years"))],
        );

        let (resolution, _) = resolve_field(&field, &source);
        assert_eq!(resolution, Resolution::Present(FieldValue::integer(12)));
    }

    #[test]
    fn test_custom_zero_is_cleared() {
        let field = single(FieldDefinition::new("experience", FieldType::Numeric).with_field_id("5"));
        let source = profile(json!({}), vec![CustomFieldRecord::new("5").with_value(json!(0))]);

        let (resolution, _) = resolve_field(&field, &source);
        assert_eq!(resolution, Resolution::Cleared(FieldValue::integer(0)));
        assert_eq!(resolution.clone().into_value(false), None);
        assert_eq!(resolution.into_value(true), Some(FieldValue::integer(0)));
    }
}
