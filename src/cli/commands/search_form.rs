//! Search form command handler

use super::fail;
use portal_fields::core::search_form::SearchForm;
use std::fs;
use std::path::{Path, PathBuf};

/// Print each search field in UI order with its options
pub fn run(file: &Path, options_response: Option<&PathBuf>) {
    let form = fs::read_to_string(file)
        .map_err(|e| format!("Failed to read {}: {e}", file.display()))
        .and_then(|content| {
            SearchForm::from_json(&content)
                .map_err(|e| format!("Invalid search form {}: {e}", file.display()))
        })
        .unwrap_or_else(|e| fail(&e));

    let response = options_response.map(|path| {
        fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))
            .and_then(|content| {
                serde_json::from_str::<serde_json::Value>(&content)
                    .map_err(|e| format!("Invalid options response {}: {e}", path.display()))
            })
            .unwrap_or_else(|e| fail(&e))
    });

    for (key, property) in form.ordered_fields() {
        let title = property.title.as_deref().unwrap_or(key);
        println!("{key} ({title})");

        let remote = property
            .api
            .as_ref()
            .zip(response.as_ref())
            .map(|(api, response)| api.extract_options(response));
        let options = remote.unwrap_or_else(|| property.options());
        for option in options {
            println!("  {} = {}", option.value, option.label);
        }
    }
}
