//! Configuration module for `PortalFields`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the config directory inside path values
const DIR_VARIABLE: &str = "$PORTAL_FIELDS";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Where forms, profiles and the framework are read from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Directory of `<context>.<context_type>.json` form definitions
    #[serde(default)]
    pub schema_dir: String,
    /// Directory of `<user_id>.json` profiles
    #[serde(default)]
    pub profile_dir: String,
    /// Framework taxonomy file
    #[serde(default)]
    pub framework_file: String,
}

/// Resolution behaviour
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Keep explicitly cleared values instead of omitting them
    #[serde(default)]
    pub keep_cleared: bool,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Data source settings
    #[serde(default)]
    pub sources: SourcesConfig,
    /// Resolver settings
    #[serde(default)]
    pub resolver: ResolverConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override form directory
    pub schema_dir: Option<String>,
    /// Override profile directory
    pub profile_dir: Option<String>,
    /// Override framework file
    pub framework_file: Option<String>,
    /// Override cleared-value handling
    pub keep_cleared: Option<bool>,
}

impl Config {
    /// Get the `$PORTAL_FIELDS` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/portalfields`
    /// - macOS: `~/Library/Application Support/portalfields`
    /// - Windows: `%APPDATA%\portalfields`
    #[must_use]
    pub fn get_portalfields_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("portalfields")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Only fields that are empty here and non-empty in `defaults` are updated, so an
    /// upgraded binary fills in newly added settings without touching user values.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let pairs = [
            (&mut self.logging.level, &defaults.logging.level),
            (&mut self.logging.file, &defaults.logging.file),
            (&mut self.sources.schema_dir, &defaults.sources.schema_dir),
            (&mut self.sources.profile_dir, &defaults.sources.profile_dir),
            (&mut self.sources.framework_file, &defaults.sources.framework_file),
        ];

        let mut changed = false;
        for (value, default) in pairs {
            if value.is_empty() && !default.is_empty() {
                value.clone_from(default);
                changed = true;
            }
        }
        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Overrides last for a single run and are never saved. Only non-`None` values
    /// replace config values.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let mut config = Config::load();
    /// let overrides = ConfigOverrides {
    ///     level: Some("debug".to_string()),
    ///     ..Default::default()
    /// };
    /// config.apply_overrides(&overrides);
    /// ```
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file = Self::expand_variables(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }

        if let Some(dir) = &overrides.schema_dir {
            self.sources.schema_dir = Self::expand_variables(dir);
        }
        if let Some(dir) = &overrides.profile_dir {
            self.sources.profile_dir = Self::expand_variables(dir);
        }
        if let Some(file) = &overrides.framework_file {
            self.sources.framework_file = Self::expand_variables(file);
        }

        if let Some(keep_cleared) = overrides.keep_cleared {
            self.resolver.keep_cleared = keep_cleared;
        }
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds, inside
    /// [`get_portalfields_dir`](Self::get_portalfields_dir).
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_portalfields_dir().join(CONFIG_FILE_NAME)
    }

    /// Replace `$PORTAL_FIELDS` with the config directory
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_portalfields_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Expands `$PORTAL_FIELDS` in path values. Missing fields use their serde defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let config = Config::from_toml(r#"
    /// [logging]
    /// level = "info"
    /// file = "$PORTAL_FIELDS/portalfields.log"
    /// "#)?;
    /// ```
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.sources.schema_dir = Self::expand_variables(&config.sources.schema_dir);
        config.sources.profile_dir = Self::expand_variables(&config.sources.profile_dir);
        config.sources.framework_file = Self::expand_variables(&config.sources.framework_file);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// Debug builds use `DefaultCLIConfigDebug.toml`, release builds
    /// `DefaultCLIConfigRelease.toml`. Falls back to empty settings if the embedded
    /// file cannot be parsed.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).unwrap_or_else(|e| {
            crate::error!("Compiled-in default configuration is invalid: {e}");
            Self::default()
        })
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// An existing file has missing fields merged from defaults and is saved back when
    /// that changed anything. On first run the config directory and file are created
    /// from defaults. Any read or parse failure falls back to defaults.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save();
                    }
                    return config;
                }
            }
        } else {
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Save configuration to file
    ///
    /// The saved file will use the format:
    /// ```toml
    /// [logging]
    /// level = "info"
    /// file = "$PORTAL_FIELDS/portalfields.log"
    /// verbose = false
    ///
    /// [sources]
    /// schema_dir = "$PORTAL_FIELDS/forms"
    /// profile_dir = "$PORTAL_FIELDS/profiles"
    /// framework_file = "$PORTAL_FIELDS/framework.json"
    ///
    /// [resolver]
    /// keep_cleared = false
    /// ```
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be created or the file cannot be
    /// written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Supported keys: `level`, `file`, `verbose`, `schema_dir`, `profile_dir`,
    /// `framework_file`, `keep_cleared`. Dashed spellings are accepted too.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "schema_dir" | "schema-dir" => Some(self.sources.schema_dir.clone()),
            "profile_dir" | "profile-dir" => Some(self.sources.profile_dir.clone()),
            "framework_file" | "framework-file" => Some(self.sources.framework_file.clone()),
            "keep_cleared" | "keep-cleared" => Some(self.resolver.keep_cleared.to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Updates the in-memory config only; call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized or a boolean value does not parse.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        let parse_bool = |value: &str| {
            value
                .parse::<bool>()
                .map_err(|_| format!("Invalid boolean value for '{key}': '{value}'"))
        };
        match key {
            "level" => self.logging.level = value.to_string(),
            "file" => self.logging.file = value.to_string(),
            "verbose" => self.logging.verbose = parse_bool(value)?,
            "schema_dir" | "schema-dir" => self.sources.schema_dir = value.to_string(),
            "profile_dir" | "profile-dir" => self.sources.profile_dir = value.to_string(),
            "framework_file" | "framework-file" => self.sources.framework_file = value.to_string(),
            "keep_cleared" | "keep-cleared" => self.resolver.keep_cleared = parse_bool(value)?,
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset a single configuration value to its default
    ///
    /// Updates the in-memory config only; call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "schema_dir" | "schema-dir" => self
                .sources
                .schema_dir
                .clone_from(&defaults.sources.schema_dir),
            "profile_dir" | "profile-dir" => self
                .sources
                .profile_dir
                .clone_from(&defaults.sources.profile_dir),
            "framework_file" | "framework-file" => self
                .sources
                .framework_file
                .clone_from(&defaults.sources.framework_file),
            "keep_cleared" | "keep-cleared" => {
                self.resolver.keep_cleared = defaults.resolver.keep_cleared;
            }
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults
    ///
    /// Deletes the configuration file so the next [`load()`](Config::load) recreates it.
    /// Succeeds when there is no file.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted.
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[sources]")?;
        writeln!(f, "  schema_dir = \"{}\"", self.sources.schema_dir)?;
        writeln!(f, "  profile_dir = \"{}\"", self.sources.profile_dir)?;
        writeln!(f, "  framework_file = \"{}\"", self.sources.framework_file)?;

        writeln!(f, "\n[resolver]")?;
        write!(f, "  keep_cleared = {}", self.resolver.keep_cleared)
    }
}
