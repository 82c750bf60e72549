//! Integration tests for configuration management

use portal_fields::config::{Config, ConfigOverrides};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_config_from_defaults() {
    let config = Config::from_defaults();

    assert!(!config.logging.level.is_empty(), "Default log level should not be empty");
    assert!(!config.sources.schema_dir.is_empty(), "Default schema_dir should not be empty");
    assert!(!config.sources.profile_dir.is_empty(), "Default profile_dir should not be empty");
    assert!(!config.resolver.keep_cleared);
}

#[test]
fn test_config_from_toml_basic() {
    let toml_str = r#"
[logging]
level = "info"
file = "/tmp/test.log"
verbose = true

[sources]
schema_dir = "./forms"
profile_dir = "./profiles"
framework_file = "./framework.json"

[resolver]
keep_cleared = true
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file, "/tmp/test.log");
    assert!(config.logging.verbose);
    assert_eq!(config.sources.schema_dir, "./forms");
    assert_eq!(config.sources.profile_dir, "./profiles");
    assert_eq!(config.sources.framework_file, "./framework.json");
    assert!(config.resolver.keep_cleared);
}

#[test]
fn test_config_from_toml_partial() {
    let toml_str = r#"
[logging]
level = "error"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse partial TOML");

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "");
    assert!(!config.logging.verbose);
    assert_eq!(config.sources.schema_dir, "");
    assert!(!config.resolver.keep_cleared);
}

#[test]
fn test_config_variable_expansion() {
    let toml_str = r#"
[logging]
file = "$PORTAL_FIELDS/test.log"

[sources]
schema_dir = "$PORTAL_FIELDS/forms"
framework_file = "$PORTAL_FIELDS/framework.json"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML with variables");

    assert!(config.logging.file.contains("portalfields"));
    assert!(!config.logging.file.contains("$PORTAL_FIELDS"));
    assert!(config.sources.schema_dir.ends_with("forms"));
    assert!(!config.sources.schema_dir.contains("$PORTAL_FIELDS"));
    assert!(!config.sources.framework_file.contains("$PORTAL_FIELDS"));
}

#[test]
fn test_config_get_set() {
    let mut config = Config::from_defaults();

    assert!(config.get("level").is_some());

    config.set("level", "debug").expect("Failed to set level");
    assert_eq!(config.get("level").unwrap(), "debug");

    config.set("keep-cleared", "true").expect("Failed to set keep_cleared");
    assert_eq!(config.get("keep_cleared").unwrap(), "true");
    assert!(config.resolver.keep_cleared);

    config.set("schema_dir", "/srv/forms").expect("Failed to set schema_dir");
    assert_eq!(config.get("schema-dir").unwrap(), "/srv/forms");

    assert!(config.set("verbose", "maybe").is_err());
    assert!(config.get("unknown_key").is_none());
    assert!(config.set("unknown_key", "value").is_err());
}

#[test]
fn test_config_unset() {
    let mut config = Config::from_defaults();
    let defaults = Config::from_defaults();

    config.set("profile_dir", "/elsewhere").expect("Failed to set profile_dir");
    config.set("keep_cleared", "true").expect("Failed to set keep_cleared");

    config.unset("profile_dir", &defaults).expect("Failed to unset profile_dir");
    config.unset("keep_cleared", &defaults).expect("Failed to unset keep_cleared");

    assert_eq!(config.sources.profile_dir, defaults.sources.profile_dir);
    assert_eq!(config.resolver.keep_cleared, defaults.resolver.keep_cleared);
    assert!(config.unset("nope", &defaults).is_err());
}

#[test]
fn test_config_save_and_reload_from_disk() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_file = temp_dir.path().join("config.toml");

    let mut config = Config::from_defaults();
    config.set("level", "info").expect("Failed to set level");
    config.set("keep_cleared", "true").expect("Failed to set keep_cleared");

    let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");
    fs::write(&config_file, toml_str).expect("Failed to write config");

    let content = fs::read_to_string(&config_file).expect("Failed to read config");
    let loaded = Config::from_toml(&content).expect("Failed to parse loaded config");

    assert_eq!(loaded.logging.level, "info");
    assert!(loaded.resolver.keep_cleared);
}

#[test]
fn test_config_overrides_apply() {
    let mut config = Config::from_defaults();

    let overrides = ConfigOverrides {
        level: Some("error".to_string()),
        file: Some("/custom/path.log".to_string()),
        verbose: Some(true),
        schema_dir: Some("./custom_forms".to_string()),
        profile_dir: Some("./custom_profiles".to_string()),
        framework_file: Some("./fw.json".to_string()),
        keep_cleared: Some(true),
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/custom/path.log");
    assert!(config.logging.verbose);
    assert_eq!(config.sources.schema_dir, "./custom_forms");
    assert_eq!(config.sources.profile_dir, "./custom_profiles");
    assert_eq!(config.sources.framework_file, "./fw.json");
    assert!(config.resolver.keep_cleared);
}

#[test]
fn test_config_overrides_partial() {
    let mut config = Config::from_defaults();
    let before = config.sources.schema_dir.clone();

    config.apply_overrides(&ConfigOverrides {
        level: Some("debug".to_string()),
        ..ConfigOverrides::default()
    });

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.sources.schema_dir, before);
}

#[test]
fn test_config_display_format() {
    let display_str = format!("{}", Config::from_defaults());

    assert!(display_str.contains("[logging]"));
    assert!(display_str.contains("[sources]"));
    assert!(display_str.contains("[resolver]"));
    assert!(display_str.contains("schema_dir"));
    assert!(display_str.contains("keep_cleared"));
}

#[test]
fn test_merge_defaults_adds_missing_fields() {
    let toml_str = r#"
[logging]
level = "error"

[sources]
schema_dir = ""
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse minimal config");
    let defaults = Config::from_defaults();

    assert!(config.merge_defaults(&defaults));
    assert_eq!(config.sources.schema_dir, defaults.sources.schema_dir);
    assert!(!config.merge_defaults(&defaults), "second merge should change nothing");
}

#[test]
fn test_merge_defaults_preserves_existing() {
    let toml_str = r#"
[logging]
level = "error"
file = "/my/custom/path.log"

[sources]
schema_dir = "/my/forms"
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse config");
    config.merge_defaults(&Config::from_defaults());

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/my/custom/path.log");
    assert_eq!(config.sources.schema_dir, "/my/forms");
}

#[test]
fn test_get_portalfields_dir() {
    let dir = Config::get_portalfields_dir();

    assert!(dir.to_string_lossy().contains("portalfields"));
    assert_ne!(dir, PathBuf::from("."));
}

#[test]
fn test_get_config_file_path() {
    let path = Config::get_config_file_path();
    let path_str = path.to_string_lossy();
    assert!(path_str.ends_with("config.toml") || path_str.ends_with("dconfig.toml"));
}
