//! CLI command handlers for `PortalFields`.
//!
//! Each command is implemented in its own submodule. The loaders here turn source flags
//! plus config into schemas, profiles and frameworks.

pub mod boards;
pub mod config;
pub mod display;
pub mod profile;
pub mod resolve;
pub mod search_form;

use crate::args::{FormArgs, ProfileArgs};
use portal_fields::config::Config;
use portal_fields::core::models::{FormContextType, FormSchema, ProfileData};
use portal_fields::core::providers::{
    DirectoryProfileProvider, DirectorySchemaProvider, ProfileProvider, SchemaProvider,
};
use portal_fields::core::taxonomy::Framework;
use portal_fields::{error, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Print a failure line and exit non-zero
pub fn fail(message: &str) -> ! {
    error!("{message}");
    eprintln!("✗ {message}");
    std::process::exit(1);
}

fn read_file(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))
}

/// Load the form schema named by `args`, reading the configured form directory unless a
/// file is given. `default_type` applies when no context type was passed.
pub fn load_schema(
    args: &FormArgs,
    config: &Config,
    default_type: FormContextType,
) -> Result<FormSchema, String> {
    if let Some(path) = &args.schema {
        let schema = FormSchema::from_json(&read_file(path)?)
            .map_err(|e| format!("Invalid schema {}: {e}", path.display()))?;
        info!("Schema loaded from {} ({} fields)", path.display(), schema.len());
        return Ok(schema);
    }

    let context_type = args.context_type.unwrap_or(default_type);
    let provider = DirectorySchemaProvider::new(&config.sources.schema_dir);
    let schema = provider
        .read_form(args.context, context_type)
        .map_err(|e| e.to_string())?;
    info!("Form {}/{context_type} loaded ({} fields)", args.context, schema.len());
    Ok(schema)
}

/// Load the profile named by `args`
pub fn load_profile(args: &ProfileArgs, config: &Config) -> Result<ProfileData, String> {
    let profile = match (&args.profile, &args.user) {
        (Some(path), _) => ProfileData::from_json(&read_file(path)?)
            .map_err(|e| format!("Invalid profile {}: {e}", path.display()))?,
        (None, Some(user_id)) => DirectoryProfileProvider::new(&config.sources.profile_dir)
            .profile(user_id)
            .map_err(|e| e.to_string())?,
        (None, None) => return Err("Pass --profile FILE or --user ID".to_string()),
    };

    if profile.skipped_records > 0 {
        info!("{} custom field record(s) skipped", profile.skipped_records);
    }
    Ok(profile)
}

/// Load a framework from `path`, falling back to the configured framework file
pub fn load_framework(path: Option<&PathBuf>, config: &Config) -> Result<Framework, String> {
    let path = path.map_or_else(|| PathBuf::from(&config.sources.framework_file), Clone::clone);
    if path.as_os_str().is_empty() {
        return Err("No framework file configured; pass --framework FILE".to_string());
    }
    Framework::from_json(&read_file(&path)?)
        .map_err(|e| format!("Invalid framework {}: {e}", path.display()))
}

/// Pretty JSON for command output
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("Failed to serialise output: {e}"))
}
