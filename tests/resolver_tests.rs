//! Integration tests for initial-value resolution and display merging

use portal_fields::core::models::{
    CustomFieldRecord, FieldDefinition, FieldType, FieldValue, FormSchema, ProfileData, Projection,
};
use portal_fields::core::resolver::{
    merge_overrides, override_map, partition_ordered_subjects, resolve_form,
    resolve_initial_values, FieldIssue, OverrideMap, ResolveOptions,
};
use portal_fields::core::FieldError;
use serde_json::{json, Map, Value};
use std::path::PathBuf;

fn sample(path: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("samples").join(path);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
}

fn profile(records: Vec<CustomFieldRecord>) -> ProfileData {
    ProfileData::new(Map::new(), records)
}

fn core(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[test]
fn falsy_core_text_values_are_omitted() {
    let schema = FormSchema::new(vec![
        FieldDefinition::new("pincode", FieldType::Text).core(),
        FieldDefinition::new("verified", FieldType::Text).core(),
    ]);
    let source = ProfileData::new(core(json!({"pincode": 0, "verified": false})), Vec::new());

    let values = resolve_initial_values(&schema, &source, ResolveOptions::default());
    assert!(values.is_empty());
}

#[test]
fn kept_cleared_multi_select_is_still_a_list() {
    let schema = FormSchema::new(vec![FieldDefinition::new("langs", FieldType::Dropdown)
        .core()
        .multi_select(3)]);
    let source = ProfileData::new(core(json!({"langs": ""})), Vec::new());

    let values = resolve_initial_values(&schema, &source, ResolveOptions { keep_cleared: true });
    assert_eq!(values.get("langs"), Some(&FieldValue::list([""])));
}

#[test]
fn absent_fields_produce_no_key() {
    let schema = FormSchema::new(vec![
        FieldDefinition::new("email", FieldType::Text).core(),
        FieldDefinition::new("age", FieldType::Numeric).core(),
        FieldDefinition::new("tags", FieldType::Checkbox).core(),
        FieldDefinition::new("state", FieldType::Dropdown).with_field_id("s1"),
        FieldDefinition::new("board", FieldType::Radio).with_field_id("b1"),
    ]);
    let source = ProfileData::new(core(json!({"email": null})), Vec::new());

    let values = resolve_initial_values(&schema, &source, ResolveOptions::default());
    assert!(values.is_empty());
}

#[test]
fn resolution_is_idempotent() {
    let schema = FormSchema::from_json(&sample("forms/users.teacher.json")).unwrap();
    let source = ProfileData::from_json(&sample("profiles/u-1001.json")).unwrap();

    let first = resolve_initial_values(&schema, &source, ResolveOptions::default());
    let second = resolve_initial_values(&schema, &source, ResolveOptions::default());
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn checkbox_code_splits_into_list() {
    let schema = FormSchema::new(vec![
        FieldDefinition::new("subjects", FieldType::Checkbox).with_field_id("c1")
    ]);
    let source = profile(vec![CustomFieldRecord::new("c1")
        .with_value(json!("ignored"))
        .with_code(json!("a,b,c"))]);

    let values = resolve_initial_values(&schema, &source, ResolveOptions::default());
    assert_eq!(values.get("subjects"), Some(&FieldValue::list(["a", "b", "c"])));
}

#[test]
fn multiselect_wraps_single_scalar_once() {
    let schema = FormSchema::new(vec![FieldDefinition::new("grade", FieldType::Dropdown)
        .with_field_id("m1")
        .multi_select(2)]);
    let source = profile(vec![CustomFieldRecord::new("m1").with_value(json!("x"))]);

    let values = resolve_initial_values(&schema, &source, ResolveOptions::default());
    assert_eq!(values.get("grade"), Some(&FieldValue::list(["x"])));
}

#[test]
fn radio_values_are_normalised() {
    let schema = FormSchema::new(vec![
        FieldDefinition::new("role", FieldType::Radio).with_field_id("r1")
    ]);
    let source = profile(vec![CustomFieldRecord::new("r1").with_value(json!("ROLE_A"))]);

    let values = resolve_initial_values(&schema, &source, ResolveOptions::default());
    assert_eq!(values.get("role"), Some(&FieldValue::text("role a")));
}

#[test]
fn custom_default_wins_but_core_default_is_ignored() {
    let schema = FormSchema::new(vec![
        FieldDefinition::new("country", FieldType::Text)
            .with_field_id("k1")
            .with_default(json!("India")),
        FieldDefinition::new("email", FieldType::Text)
            .core()
            .with_default(json!("fallback@example.org")),
    ]);
    let source = profile(vec![CustomFieldRecord::new("k1").with_value(json!("Nepal"))]);

    let values = resolve_initial_values(&schema, &source, ResolveOptions::default());
    assert_eq!(values.get("country"), Some(&FieldValue::text("India")));
    assert!(!values.contains_key("email"));
}

#[test]
fn falsy_values_are_dropped_unless_kept() {
    let schema = FormSchema::new(vec![
        FieldDefinition::new("years", FieldType::Numeric).with_field_id("y1"),
        FieldDefinition::new("nickname", FieldType::Text).with_field_id("n1"),
    ]);
    let source = profile(vec![
        CustomFieldRecord::new("y1").with_value(json!(0)),
        CustomFieldRecord::new("n1").with_value(json!("")),
    ]);

    let dropped = resolve_initial_values(&schema, &source, ResolveOptions::default());
    assert!(dropped.is_empty());

    let kept = resolve_initial_values(&schema, &source, ResolveOptions { keep_cleared: true });
    assert_eq!(kept.get("years"), Some(&FieldValue::integer(0)));
    assert_eq!(kept.get("nickname"), Some(&FieldValue::text("")));
}

#[test]
fn per_field_issues_do_not_affect_other_fields() {
    let schema = FormSchema::new(vec![
        FieldDefinition::new("age", FieldType::Numeric).with_field_id("a1"),
        FieldDefinition::new("subjects", FieldType::Checkbox).with_field_id("c1"),
        FieldDefinition::new("missing", FieldType::Text).with_field_id("zz"),
        FieldDefinition::new("city", FieldType::Text).with_field_id("t1"),
    ]);
    let source = profile(vec![
        CustomFieldRecord::new("a1").with_value(json!("abc")),
        CustomFieldRecord::new("c1").with_value(json!("no code")),
        CustomFieldRecord::new("t1").with_value(json!("Pune")),
    ]);

    let resolved = resolve_form(&schema, &source, ResolveOptions::default());

    assert_eq!(resolved.values.keys().collect::<Vec<_>>(), vec!["city"]);
    assert!(matches!(
        &resolved.issues[0],
        FieldIssue::TypeCoercionFailure { field, raw } if field == "age" && raw == "abc"
    ));
    assert!(matches!(
        &resolved.issues[1],
        FieldIssue::MalformedRecord { field, expected: "code" } if field == "subjects"
    ));
    assert!(matches!(&resolved.issues[2], FieldIssue::MissingFieldSource { field } if field == "missing"));
}

#[test]
fn sample_teacher_form_resolves() {
    let schema = FormSchema::from_json(&sample("forms/users.teacher.json")).unwrap();
    let source = ProfileData::from_json(&sample("profiles/u-1001.json")).unwrap();

    let values = resolve_initial_values(&schema, &source, ResolveOptions::default());

    assert_eq!(values.get("name"), Some(&FieldValue::text("asha patil")));
    assert_eq!(values.get("mobile"), Some(&FieldValue::integer(9_876_543_210)));
    assert_eq!(values.get("gender"), Some(&FieldValue::text("female")));
    assert_eq!(values.get("years_of_experience"), Some(&FieldValue::integer(7)));
    assert_eq!(
        values.get("subject_taught"),
        Some(&FieldValue::list(["math,sci,eng"]))
    );
    assert_eq!(values.keys().next(), Some("name"));
}

#[test]
fn override_wins_over_core_value() {
    let schema = FormSchema::new(vec![FieldDefinition::new("email", FieldType::Text)
        .core()
        .with_field_id("42")
        .with_order(1)]);
    let mut overrides = OverrideMap::new();
    overrides.insert("42".into(), FieldValue::unset());

    let fields = merge_overrides(
        &schema,
        &overrides,
        &core(json!({"email": "asha@example.org"})),
        Projection::View,
    );
    assert_eq!(fields[0].value, Some(FieldValue::text("-")));
    assert!(fields[0].is_unset());
}

#[test]
fn order_zero_only_in_edit_projection() {
    let schema = FormSchema::from_json(&sample("forms/users.teacher.json")).unwrap();
    let source = ProfileData::from_json(&sample("profiles/u-1001.json")).unwrap();
    let overrides = override_map(&source.custom_fields);

    let view = merge_overrides(&schema, &overrides, &source.core, Projection::View);
    let edit = merge_overrides(&schema, &overrides, &source.core, Projection::Edit);

    assert!(view.iter().all(|f| f.order != 0));
    assert!(edit.iter().any(|f| f.name == "name" && f.order == 0));
    assert_eq!(edit.len(), schema.len());
    assert!(view.windows(2).all(|w| w[0].order <= w[1].order));
    assert_eq!(view[0].name, "gender");
}

#[test]
fn subject_partition_puts_main_subjects_first() {
    assert_eq!(
        partition_ordered_subjects(&["math", "sci", "art"], &["sci"]),
        vec!["sci", "math", "art"]
    );
    assert_eq!(
        partition_ordered_subjects(&["math", "math", "art"], &["bio", "art"]),
        vec!["art", "math"]
    );
}

#[test]
fn non_sequence_fields_are_rejected() {
    assert!(matches!(
        FormSchema::from_json(r#"{"fields": {"name": "email"}}"#),
        Err(FieldError::InvalidInput(_))
    ));
}
