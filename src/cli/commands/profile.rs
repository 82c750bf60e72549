//! Profile command handler

use super::{fail, load_profile, load_schema, to_json};
use crate::args::{FormArgs, ProfileArgs};
use portal_fields::config::Config;
use portal_fields::core::models::Role;
use portal_fields::core::profile::{form_context_type, ProfileView, ViewerContext};
use portal_fields::core::providers::{CatalogTranslator, LabelTranslator, PassthroughTranslator};
use portal_fields::core::resolver::ResolveOptions;
use portal_fields::verbose;
use std::path::PathBuf;

/// Options for the profile command beyond its data sources
pub struct ProfileOptions {
    /// Signed-in user id
    pub viewer_id: Option<String>,
    /// Signed-in user role
    pub viewer_role: Option<Role>,
    /// Label catalog file
    pub labels: Option<PathBuf>,
    /// Print JSON
    pub json: bool,
}

/// Print the read-only profile of a teacher
pub fn run(form: &FormArgs, profile: &ProfileArgs, options: ProfileOptions, config: &Config) {
    let viewer = ViewerContext {
        user_id: options.viewer_id,
        role: options.viewer_role,
    };
    let profile_user = profile.user.as_deref().unwrap_or_default();
    let context_type = form_context_type(&viewer, profile_user);
    verbose!("Using the {context_type} form");

    let schema = load_schema(form, config, context_type).unwrap_or_else(|e| fail(&e));
    let data = load_profile(profile, config).unwrap_or_else(|e| fail(&e));
    let view = ProfileView::build(
        &schema,
        &data,
        ResolveOptions {
            keep_cleared: config.resolver.keep_cleared,
        },
    );

    if options.json {
        match to_json(&view) {
            Ok(out) => println!("{out}"),
            Err(e) => fail(&e),
        }
        return;
    }

    let translator: Box<dyn LabelTranslator> = match &options.labels {
        Some(path) => Box::new(
            CatalogTranslator::from_file(path)
                .unwrap_or_else(|e| fail(&format!("Invalid label catalog {}: {e}", path.display()))),
        ),
        None => Box::new(PassthroughTranslator),
    };
    print_view(&view, translator.as_ref());
}

fn print_view(view: &ProfileView, translator: &dyn LabelTranslator) {
    println!("{}", if view.name.is_empty() { "-" } else { view.name.as_str() });
    if !view.address.is_empty() {
        println!("{}", view.address);
    }
    println!();

    for line in &view.lines {
        let label = translator.translate(&line.label_key, &line.label);
        println!("{label}: {}", line.text);
    }

    if !view.subjects.is_empty() {
        let subjects: Vec<String> = view
            .subjects
            .iter()
            .map(|badge| {
                let text = badge
                    .label_key()
                    .map_or_else(|| badge.value.clone(), |key| {
                        translator.translate(&key, badge.option_label.as_deref().unwrap_or(&badge.value))
                    });
                if badge.primary {
                    format!("{text}*")
                } else {
                    text
                }
            })
            .collect();
        println!("\nSubjects: {}", subjects.join(", "));
    }
}
