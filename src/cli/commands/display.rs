//! Display command handler

use super::{fail, load_profile, load_schema, to_json};
use crate::args::{FormArgs, ProfileArgs};
use portal_fields::config::Config;
use portal_fields::core::models::{FormContextType, Projection};
use portal_fields::core::resolver::{derive_display_label, merge_overrides, override_map};

/// Print the merged display fields for a projection
pub fn run(form: &FormArgs, profile: &ProfileArgs, projection: Projection, json: bool, config: &Config) {
    let schema = load_schema(form, config, FormContextType::Teacher).unwrap_or_else(|e| fail(&e));
    let data = load_profile(profile, config).unwrap_or_else(|e| fail(&e));

    let overrides = override_map(&data.custom_fields);
    let fields = merge_overrides(&schema, &overrides, &data.core, projection);

    if json {
        match to_json(&fields) {
            Ok(out) => println!("{out}"),
            Err(e) => fail(&e),
        }
        return;
    }

    let width = fields.iter().map(|f| f.label.len()).max().unwrap_or(0);
    for field in &fields {
        let text = derive_display_label(field, &field.options);
        println!("{:<width$}  {text}", field.label);
    }
}
