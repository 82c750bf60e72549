//! Resolve command handler

use super::{fail, load_profile, load_schema, to_json};
use crate::args::{FormArgs, ProfileArgs};
use portal_fields::config::Config;
use portal_fields::core::models::FormContextType;
use portal_fields::core::resolver::{resolve_form, ResolveOptions};

/// Print the initial values of the edit form as JSON
pub fn run(form: &FormArgs, profile: &ProfileArgs, show_issues: bool, config: &Config) {
    let schema = load_schema(form, config, FormContextType::Teacher).unwrap_or_else(|e| fail(&e));
    let data = load_profile(profile, config).unwrap_or_else(|e| fail(&e));

    let options = ResolveOptions {
        keep_cleared: config.resolver.keep_cleared,
    };
    let resolved = resolve_form(&schema, &data, options);

    if show_issues {
        for issue in &resolved.issues {
            eprintln!("! {issue}");
        }
    }

    match to_json(&resolved.values) {
        Ok(json) => println!("{json}"),
        Err(e) => fail(&e),
    }
}
