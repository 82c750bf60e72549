//! CLI argument definitions for `PortalFields`

use clap::{builder::BoolishValueParser, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use portal_fields::config::ConfigOverrides;
use portal_fields::core::models::{FormContext, FormContextType, Projection, Role};
use portal_fields::logger::Level;

/// CLI log level argument
///
/// Represents log levels that can be passed via CLI arguments. Converts to lowercase
/// strings for config storage and to `logger::Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `schema_dir`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

/// Where the form schema comes from
#[derive(Debug, Clone, Args)]
pub struct FormArgs {
    /// Read the schema from this file instead of the configured form directory
    #[arg(long, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Form context looked up in the form directory
    #[arg(long, value_name = "CONTEXT", default_value = "users")]
    pub context: FormContext,

    /// Form context type looked up in the form directory (default: teacher)
    #[arg(long = "context-type", value_name = "TYPE")]
    pub context_type: Option<FormContextType>,
}

/// Where the profile data comes from
#[derive(Debug, Clone, Args)]
pub struct ProfileArgs {
    /// Read the profile from this file
    #[arg(long, value_name = "FILE", conflicts_with = "user")]
    pub profile: Option<PathBuf>,

    /// Read `<user>.json` from the configured profile directory
    #[arg(long, value_name = "USER_ID")]
    pub user: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Resolve the edit form's initial values for a profile.
    ///
    /// Prints the sparse value map as JSON.
    Resolve {
        #[command(flatten)]
        form: FormArgs,

        #[command(flatten)]
        profile: ProfileArgs,

        /// Keep values explicitly cleared to `0`, `false` or `""`
        #[arg(long)]
        keep_cleared: bool,

        /// Also print per-field issues to stderr
        #[arg(long)]
        issues: bool,
    },
    /// Merge schema and profile values into display fields.
    Display {
        #[command(flatten)]
        form: FormArgs,

        #[command(flatten)]
        profile: ProfileArgs,

        /// Projection to build: view hides fields with order 0
        #[arg(long, value_name = "MODE", default_value = "view")]
        projection: Projection,

        /// Print JSON instead of label/value lines
        #[arg(long)]
        json: bool,
    },
    /// Show the read-only teacher profile.
    Profile {
        #[command(flatten)]
        form: FormArgs,

        #[command(flatten)]
        profile: ProfileArgs,

        /// Signed-in user id (selects the team leader form on their own profile)
        #[arg(long = "viewer-id", value_name = "USER_ID")]
        viewer_id: Option<String>,

        /// Signed-in user role
        #[arg(long = "viewer-role", value_name = "ROLE")]
        viewer_role: Option<Role>,

        /// Label catalog (`{"FORM.KEY": "text"}`) used to translate field labels
        #[arg(long, value_name = "FILE")]
        labels: Option<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List the boards a user may pick from.
    Boards {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Framework file (defaults to config `framework_file`)
        #[arg(long, value_name = "FILE")]
        framework: Option<PathBuf>,
    },
    /// Show a search form's fields in UI order with their options.
    SearchForm {
        /// Search form definition (`{"schema": ..., "uiSchema": ...}`)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Saved option endpoint response, used for fields with remote options
        #[arg(long = "options-response", value_name = "FILE")]
        options_response: Option<PathBuf>,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "portalfields",
    about = "Portal form field resolution",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config form directory
    #[arg(long = "schema-dir", value_name = "DIR")]
    pub schema_dir: Option<PathBuf>,

    /// Override config profile directory
    #[arg(long = "profile-dir", value_name = "DIR")]
    pub profile_dir: Option<PathBuf>,

    /// Override config framework file
    #[arg(long = "framework-file", value_name = "FILE")]
    pub framework_file: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

fn path_string(path: Option<&PathBuf>) -> Option<String> {
    path.map(|p| p.to_string_lossy().to_string())
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// `None` means no override. `--keep-cleared` on `resolve` is folded in here so the
    /// command only has to read the effective config.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        let keep_cleared = match self.command {
            Command::Resolve {
                keep_cleared: true, ..
            } => Some(true),
            _ => None,
        };

        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: path_string(self.config_log_file.as_ref()),
            verbose: self.config_verbose,
            schema_dir: path_string(self.schema_dir.as_ref()),
            profile_dir: path_string(self.profile_dir.as_ref()),
            framework_file: path_string(self.framework_file.as_ref()),
            keep_cleared,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("portalfields").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevelArg::Error.to_string(), "error");
        assert_eq!(LogLevelArg::Warn.to_string(), "warn");
        assert_eq!(LogLevelArg::Info.to_string(), "info");
        assert_eq!(LogLevelArg::Debug.to_string(), "debug");
    }

    #[test]
    fn test_log_level_to_logger_level() {
        assert_eq!(Level::from(LogLevelArg::Error), Level::Error);
        assert_eq!(Level::from(LogLevelArg::Warn), Level::Warn);
        assert_eq!(Level::from(LogLevelArg::Info), Level::Info);
        assert_eq!(Level::from(LogLevelArg::Debug), Level::Debug);
    }

    #[test]
    fn test_to_config_overrides_empty() {
        let overrides = cli(&["config"]).to_config_overrides();
        assert!(overrides.level.is_none());
        assert!(overrides.file.is_none());
        assert!(overrides.verbose.is_none());
        assert!(overrides.schema_dir.is_none());
        assert!(overrides.profile_dir.is_none());
        assert!(overrides.framework_file.is_none());
        assert!(overrides.keep_cleared.is_none());
    }

    #[test]
    fn test_to_config_overrides_with_values() {
        let overrides = cli(&[
            "--config-level",
            "debug",
            "--config-log-file",
            "/tmp/test.log",
            "--config-verbose",
            "yes",
            "--schema-dir",
            "/srv/forms",
            "--profile-dir",
            "/srv/profiles",
            "resolve",
            "--user",
            "u1",
            "--keep-cleared",
        ])
        .to_config_overrides();

        assert_eq!(overrides.level, Some("debug".to_string()));
        assert_eq!(overrides.file, Some("/tmp/test.log".to_string()));
        assert_eq!(overrides.verbose, Some(true));
        assert_eq!(overrides.schema_dir, Some("/srv/forms".to_string()));
        assert_eq!(overrides.profile_dir, Some("/srv/profiles".to_string()));
        assert_eq!(overrides.keep_cleared, Some(true));
    }

    #[test]
    fn test_form_args_parse_context() {
        let Command::Display { form, projection, .. } = cli(&[
            "display",
            "--context-type",
            "TEAM_LEADER",
            "--projection",
            "edit",
            "--profile",
            "p.json",
        ])
        .command
        else {
            panic!("expected display command");
        };

        assert_eq!(form.context, FormContext::Users);
        assert_eq!(form.context_type, Some(FormContextType::TeamLeader));
        assert_eq!(projection, Projection::Edit);
    }

    #[test]
    fn test_profile_and_user_conflict() {
        let result = Cli::try_parse_from([
            "portalfields",
            "resolve",
            "--profile",
            "p.json",
            "--user",
            "u1",
        ]);
        assert!(result.is_err());
    }
}
