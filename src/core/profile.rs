//! Teacher profile composition on top of the resolution engine

use crate::core::models::{
    find_by_label, CustomFieldRecord, DisplayField, FieldValue, FormContextType, FormSchema,
    FormValues, ProfileData, Projection, Role,
};
use crate::core::resolver::{
    derive_display_label, merge_overrides, override_map, partition_ordered_subjects, resolve_form,
    FieldIssue, ResolveOptions,
};
use crate::core::providers::LabelTranslator;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Field listing every subject a teacher teaches
pub const SUBJECT_TAUGHT_FIELD: &str = "subject_taught";
/// Field listing a teacher's main subjects; folded into the subject badges
pub const MAIN_SUBJECT_FIELD: &str = "main_subject";
/// Record labels forming the address line, most general first
pub const ADDRESS_LABELS: [&str; 3] = ["STATE", "DISTRICT", "BLOCK"];
/// Record label holding a learner's village
pub const VILLAGE_LABEL: &str = "VILLAGE";
/// Record label holding the blocks a user covers
pub const BLOCK_LABEL: &str = "BLOCK";
/// Prefix for form label translation keys
pub const FORM_LABEL_PREFIX: &str = "FORM.";

/// Who is looking at a profile. Passed in explicitly rather than read from session storage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewerContext {
    /// Signed-in user's id
    pub user_id: Option<String>,
    /// Signed-in user's role
    pub role: Option<Role>,
}

impl ViewerContext {
    /// Viewer with a known id and role
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: Some(user_id.into()),
            role: Some(role),
        }
    }

    /// Whether the viewer is looking at their own profile
    #[must_use]
    pub fn is_self(&self, profile_user_id: &str) -> bool {
        self.user_id.as_deref() == Some(profile_user_id)
    }
}

/// Form variant to read for a profile: team leaders viewing themselves get the team leader
/// form, everyone else the teacher form.
#[must_use]
pub fn form_context_type(viewer: &ViewerContext, profile_user_id: &str) -> FormContextType {
    if viewer.role == Some(Role::TeamLeader) && viewer.is_self(profile_user_id) {
        FormContextType::TeamLeader
    } else {
        FormContextType::Teacher
    }
}

/// Capitalise the first letter of every whitespace-separated word and lowercase the rest
#[must_use]
pub fn to_pascal_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `firstName middleName lastName`, each pascal-cased, skipping blanks
#[must_use]
pub fn full_name(core: &Map<String, Value>) -> String {
    ["firstName", "middleName", "lastName"]
        .iter()
        .filter_map(|key| core.get(*key).and_then(Value::as_str))
        .map(to_pascal_case)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pascal-cased values of the records with the given labels, in label order, joined by `, `
#[must_use]
pub fn extract_address(records: &[CustomFieldRecord], labels: &[&str]) -> String {
    labels
        .iter()
        .filter_map(|label| find_by_label(records, label))
        .filter_map(|record| record.effective_value())
        .filter_map(|value| FieldValue::from_json(&value))
        .map(|value| to_pascal_case(&value.to_display_string()))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Label translation key for a form label
#[must_use]
pub fn form_label_key(label: &str) -> String {
    format!("{FORM_LABEL_PREFIX}{label}")
}

/// One subject chip in the profile view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectBadge {
    /// Stored subject code
    pub value: String,
    /// Option label for the code, when the subject field lists one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_label: Option<String>,
    /// Also one of the teacher's main subjects
    pub primary: bool,
}

impl SubjectBadge {
    /// Translation key for the badge text; `None` means show `value` as is
    #[must_use]
    pub fn label_key(&self) -> Option<String> {
        self.option_label.as_deref().map(form_label_key)
    }
}

/// Subject badges from the merged display fields: main subjects first, then the rest
#[must_use]
pub fn subject_badges(fields: &[DisplayField]) -> Vec<SubjectBadge> {
    let taught_field = fields.iter().find(|f| f.name == SUBJECT_TAUGHT_FIELD);
    let taught = taught_field.map_or_else(Vec::new, display_entries);
    let main = fields
        .iter()
        .find(|f| f.name == MAIN_SUBJECT_FIELD)
        .map_or_else(Vec::new, display_entries);
    let main_set: HashSet<&str> = main.iter().map(String::as_str).collect();

    partition_ordered_subjects(&taught, &main)
        .into_iter()
        .map(|subject| {
            let option_label = taught_field.and_then(|field| {
                field
                    .options
                    .iter()
                    .find(|option| option.value == subject)
                    .map(|option| option.label.clone())
            });
            SubjectBadge {
                primary: main_set.contains(subject.as_str()),
                option_label,
                value: subject,
            }
        })
        .collect()
}

fn display_entries(field: &DisplayField) -> Vec<String> {
    field
        .value
        .as_ref()
        .filter(|value| !value.is_unset())
        .map_or_else(Vec::new, FieldValue::split_entries)
}

/// A field line in the profile view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileLine {
    /// Translation key of the field label
    pub label_key: String,
    /// Untranslated label, used when no translation exists
    pub label: String,
    /// Text to show: option label or pascal-cased value, `-` when empty
    pub text: String,
    /// Sort key
    pub order: i64,
}

impl ProfileLine {
    fn from_field(field: &DisplayField) -> Self {
        let text = if field.value.as_ref().is_some_and(FieldValue::is_truthy) {
            to_pascal_case(&derive_display_label(field, &field.options))
        } else {
            crate::core::models::UNSET.to_string()
        };
        Self {
            label_key: form_label_key(&field.label),
            label: field.label.clone(),
            text,
            order: field.order,
        }
    }
}

/// Everything the read-only teacher profile shows, plus the edit form's initial values
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    /// Full display name
    pub name: String,
    /// `State, District, Block`
    pub address: String,
    /// View projection without the main-subject field
    pub fields: Vec<DisplayField>,
    /// Rendered field lines, parallel to `fields`
    pub lines: Vec<ProfileLine>,
    /// Subject chips, main subjects first
    pub subjects: Vec<SubjectBadge>,
    /// Initial values for the edit form
    pub form_values: FormValues,
    /// Per-field issues met while resolving the edit form
    #[serde(skip)]
    pub issues: Vec<FieldIssue>,
}

impl ProfileView {
    /// Compose the profile view from a schema and the profile's sources
    #[must_use]
    pub fn build(schema: &FormSchema, profile: &ProfileData, options: ResolveOptions) -> Self {
        let overrides = override_map(&profile.custom_fields);
        let all_fields = merge_overrides(schema, &overrides, &profile.core, Projection::Edit);
        let subjects = subject_badges(&all_fields);

        let fields: Vec<DisplayField> = all_fields
            .into_iter()
            .filter(|field| Projection::View.includes(field) && field.name != MAIN_SUBJECT_FIELD)
            .collect();
        let lines = fields.iter().map(ProfileLine::from_field).collect();

        let resolved = resolve_form(schema, profile, options);

        Self {
            name: full_name(&profile.core),
            address: extract_address(&profile.custom_fields, &ADDRESS_LABELS),
            fields,
            lines,
            subjects,
            form_values: resolved.values,
            issues: resolved.issues,
        }
    }
}

/// Label key for a count of exactly one village
pub const VILLAGE_COUNT_KEY: &str = "YOUTHNET_USERS_AND_VILLAGES.VILLAGE";
/// Label key for any other village count
pub const VILLAGES_COUNT_KEY: &str = "YOUTHNET_USERS_AND_VILLAGES.VILLAGES";
/// Label key after a single block name
pub const BLOCK_NAME_KEY: &str = "YOUTHNET_USERS_AND_VILLAGES.BLOCK";
/// Label key after several block names
pub const BLOCK_NAMES_KEY: &str = "YOUTHNET_USERS_AND_VILLAGES.BLOCKS";

/// A calendar day read from the leading `YYYY-MM-DD` of a date or timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CalendarDate {
    /// Year
    pub year: i32,
    /// Month, `1..=12`
    pub month: u32,
    /// Day of month, `1..=31`
    pub day: u32,
}

impl CalendarDate {
    /// Date from its parts
    #[must_use]
    pub const fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Parse `2024-03-09` or `2024-03-09T10:00:00Z`; anything else is `None`
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let date = text.trim().get(..10)?;
        let mut parts = date.split('-');
        let year = parts.next()?.parse().ok()?;
        let month = parts.next()?.parse().ok()?;
        let day = parts.next()?.parse().ok()?;
        ((1..=12).contains(&month) && (1..=31).contains(&day)).then_some(Self { year, month, day })
    }

    /// Whole years from this date to `on`; `None` when `on` comes first
    #[must_use]
    pub fn years_until(self, on: Self) -> Option<u32> {
        let mut years = on.year - self.year;
        if (on.month, on.day) < (self.month, self.day) {
            years -= 1;
        }
        u32::try_from(years).ok()
    }
}

impl std::fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Compact summary shown in user lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCard {
    /// Display name
    pub name: String,
    /// Avatar initials from first and last name
    pub initials: String,
    /// Village, when the profile records one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub village: Option<String>,
    /// Age in whole years, when `dob` is a date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Day the account was created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_on: Option<String>,
    /// `34 y/o • Wagholi` with age, otherwise just the village
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Villages assigned through the `VILLAGE` record
    pub village_count: usize,
    /// Blocks named by the `BLOCK` record
    pub block_names: Vec<String>,
}

impl UserCard {
    /// Summarise a profile, computing age as of `today`
    #[must_use]
    pub fn from_profile(profile: &ProfileData, today: CalendarDate) -> Self {
        let core = &profile.core;
        let name = Some(full_name(core))
            .filter(|name| !name.is_empty())
            .or_else(|| core.get("name").and_then(Value::as_str).map(to_pascal_case))
            .unwrap_or_default();
        let initials = ["firstName", "lastName"]
            .iter()
            .filter_map(|key| core.get(*key).and_then(Value::as_str))
            .filter_map(|part| part.trim().chars().next())
            .flat_map(char::to_uppercase)
            .collect();

        let villages = profile
            .record_by_label(VILLAGE_LABEL)
            .map(CustomFieldRecord::selected_value_strings)
            .unwrap_or_default();
        let village = villages.first().cloned();
        let block_names = profile
            .record_by_label(BLOCK_LABEL)
            .map(|record| {
                let selected = record.selected_value_strings();
                if selected.is_empty() {
                    record
                        .effective_value()
                        .and_then(|value| FieldValue::from_json(&value))
                        .filter(FieldValue::is_truthy)
                        .map(|value| vec![value.to_display_string()])
                        .unwrap_or_default()
                } else {
                    selected
                }
            })
            .unwrap_or_default();

        let age = core
            .get("dob")
            .and_then(Value::as_str)
            .and_then(CalendarDate::parse)
            .and_then(|dob| dob.years_until(today));
        let join_on = core
            .get("createdAt")
            .and_then(Value::as_str)
            .and_then(CalendarDate::parse)
            .map(|date| date.to_string());
        let subtitle = match age {
            Some(age) => {
                let place = village.as_deref().or(join_on.as_deref()).unwrap_or_default();
                Some(format!("{age} y/o \u{2022} {place}"))
            }
            None => village.clone(),
        };

        Self {
            name,
            initials,
            village,
            age,
            join_on,
            subtitle,
            village_count: villages.len(),
            block_names,
        }
    }

    /// Label key for the village count: singular only for exactly one
    #[must_use]
    pub const fn village_count_key(&self) -> &'static str {
        if self.village_count == 1 {
            VILLAGE_COUNT_KEY
        } else {
            VILLAGES_COUNT_KEY
        }
    }

    /// Label key after the block names; `None` without blocks
    #[must_use]
    pub fn block_names_key(&self) -> Option<&'static str> {
        match self.block_names.len() {
            0 => None,
            1 => Some(BLOCK_NAME_KEY),
            _ => Some(BLOCK_NAMES_KEY),
        }
    }

    /// `3 Villages (Haveli,Mulshi Blocks)`; `None` when no villages are assigned
    #[must_use]
    pub fn coverage_line(&self, translator: &impl LabelTranslator) -> Option<String> {
        if self.village_count == 0 {
            return None;
        }
        let fallback = if self.village_count == 1 { "Village" } else { "Villages" };
        let mut line = format!(
            "{} {}",
            self.village_count,
            translator.translate(self.village_count_key(), fallback)
        );
        if let Some(key) = self.block_names_key() {
            let fallback = if self.block_names.len() == 1 { "Block" } else { "Blocks" };
            line.push_str(&format!(
                " ({} {})",
                self.block_names.join(","),
                translator.translate(key, fallback)
            ));
        }
        Some(line)
    }
}
